use std::collections::BTreeMap;

use tracing::trace;

use super::{HandParseError, LineKind};

/// Who is sitting where, and with how much.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeatRegistry {
    pub table_name: String,
    pub button_seat: u8,
    /// Seat number to nickname. Seat numbers don't have to be contiguous.
    pub seats: BTreeMap<u8, String>,
    /// Nickname to starting stack.
    pub stacks: BTreeMap<String, f64>,
}

impl SeatRegistry {
    /// Build the registry from the table line and the `Seat n: ... in chips`
    /// lines of a hand.
    pub fn from_lines(lines: &[LineKind<'_>]) -> Result<Self, HandParseError> {
        let (table_name, button_seat) = lines
            .iter()
            .find_map(|line| match line {
                LineKind::Table { name, button_seat } => Some((*name, *button_seat)),
                _ => None,
            })
            .ok_or(HandParseError::MissingTable)?;
        let button_seat = button_seat.ok_or(HandParseError::MissingTable)?;

        let mut registry = SeatRegistry {
            table_name: table_name.to_string(),
            button_seat,
            ..Default::default()
        };

        for line in lines {
            if let LineKind::Seat { seat, name, stack } = line {
                if registry.stacks.contains_key(*name) {
                    return Err(HandParseError::DuplicatePlayer(name.to_string()));
                }
                trace!(seat, name, stack, "Seat");
                registry.seats.insert(*seat, name.to_string());
                registry.stacks.insert(name.to_string(), *stack);
            }
        }
        Ok(registry)
    }

    /// The nickname in a seat, if the seat is occupied.
    pub fn name_at(&self, seat: u8) -> Result<&str, HandParseError> {
        self.seats
            .get(&seat)
            .map(String::as_str)
            .ok_or(HandParseError::UnknownSeat(seat))
    }

    pub fn is_seated(&self, name: &str) -> bool {
        self.stacks.contains_key(name)
    }

    pub fn num_seated(&self) -> usize {
        self.seats.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.seats.values().map(String::as_str)
    }
}
