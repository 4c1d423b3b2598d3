use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{BlindMarker, HandParseError, LineKind, SeatRegistry};

/// Hand histories number seats as if every table had nine of them.
const VIRTUAL_TABLE_SIZE: i32 = 9;

/// A seat relative to the dealer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Button,
    SmallBlind,
    BigBlind,
    /// `n` occupied seats before the button, counting backwards.
    BeforeButton(u8),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Button => write!(f, "BTN"),
            Position::SmallBlind => write!(f, "SB"),
            Position::BigBlind => write!(f, "BB"),
            Position::BeforeButton(n) => write!(f, "BTN+{n}"),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Label every seated player relative to the button.
///
/// The button comes from the table line and the blinds from the summary
/// markers. Everyone else is found by walking backwards from the seat
/// before the button. The walk stops at the first occupied seat that
/// already has a label, which is normally the big blind.
///
/// On a heads up table the button is also the small blind. The summary
/// marker wins so that player is labeled `SB` and nobody is `BTN`.
pub fn assign_positions(
    registry: &SeatRegistry,
    summary: &[LineKind<'_>],
) -> Result<BTreeMap<String, Position>, HandParseError> {
    let mut positions = BTreeMap::new();
    let button = registry.button_seat;
    positions.insert(registry.name_at(button)?.to_string(), Position::Button);

    for line in summary {
        if let LineKind::SummarySeat(seat_line) = line {
            let label = match seat_line.blind {
                Some(BlindMarker::Small) => Position::SmallBlind,
                Some(BlindMarker::Big) => Position::BigBlind,
                None => continue,
            };
            positions.insert(registry.name_at(seat_line.seat)?.to_string(), label);
        }
    }

    let mut next_label = 1;
    for i in (-VIRTUAL_TABLE_SIZE..=i32::from(button) - 2).rev() {
        let seat = (i.rem_euclid(VIRTUAL_TABLE_SIZE) + 1) as u8;
        let Ok(name) = registry.name_at(seat) else {
            continue;
        };
        if positions.contains_key(name) {
            break;
        }
        positions.insert(name.to_string(), Position::BeforeButton(next_label));
        next_label += 1;
    }

    let mut taken = BTreeSet::new();
    for position in positions.values() {
        if !taken.insert(*position) {
            return Err(HandParseError::DuplicatePosition(*position));
        }
    }
    if positions.len() != registry.num_seated() {
        return Err(HandParseError::PositionMismatch {
            seated: registry.num_seated(),
            labeled: positions.len(),
        });
    }
    Ok(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand_history::classify;

    /// Build a registry from `(seat, name)` pairs and summary lines from
    /// `(seat, marker)` pairs.
    fn positions_for(
        button: u8,
        seats: &[(u8, &str)],
        blinds: &[(u8, &str)],
    ) -> Result<BTreeMap<String, Position>, HandParseError> {
        let registry = SeatRegistry {
            table_name: "T".to_string(),
            button_seat: button,
            seats: seats.iter().map(|(s, n)| (*s, n.to_string())).collect(),
            stacks: seats.iter().map(|(_, n)| (n.to_string(), 100.0)).collect(),
        };
        let summary_text: Vec<String> = blinds
            .iter()
            .map(|(seat, marker)| format!("Seat {seat}: {} {marker} folded", registry.seats[seat]))
            .collect();
        let summary: Vec<LineKind<'_>> = summary_text.iter().map(|l| classify(l)).collect();
        assign_positions(&registry, &summary)
    }

    fn labels(positions: &BTreeMap<String, Position>) -> Vec<(String, String)> {
        positions
            .iter()
            .map(|(n, p)| (n.clone(), p.to_string()))
            .collect()
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::Button.to_string(), "BTN");
        assert_eq!(Position::BeforeButton(3).to_string(), "BTN+3");
    }

    #[test]
    fn test_full_ring_walks_back_to_big_blind() {
        let seats: Vec<(u8, String)> = (1..=9).map(|s| (s, format!("p{s}"))).collect();
        let seats: Vec<(u8, &str)> = seats.iter().map(|(s, n)| (*s, n.as_str())).collect();
        let positions =
            positions_for(4, &seats, &[(5, "(small blind)"), (6, "(big blind)")]).unwrap();
        assert_eq!(positions["p4"], Position::Button);
        assert_eq!(positions["p5"], Position::SmallBlind);
        assert_eq!(positions["p6"], Position::BigBlind);
        assert_eq!(positions["p3"], Position::BeforeButton(1));
        assert_eq!(positions["p2"], Position::BeforeButton(2));
        assert_eq!(positions["p1"], Position::BeforeButton(3));
        assert_eq!(positions["p9"], Position::BeforeButton(4));
        assert_eq!(positions["p8"], Position::BeforeButton(5));
        assert_eq!(positions["p7"], Position::BeforeButton(6));
    }

    #[test]
    fn test_button_in_seat_one_wraps_to_seat_nine() {
        let positions = positions_for(
            1,
            &[(1, "a"), (2, "b"), (3, "c"), (7, "d"), (9, "e")],
            &[(2, "(small blind)"), (3, "(big blind)")],
        )
        .unwrap();
        assert_eq!(positions["e"], Position::BeforeButton(1));
        assert_eq!(positions["d"], Position::BeforeButton(2));
    }

    #[test]
    fn test_heads_up_button_is_small_blind() {
        let positions = positions_for(
            2,
            &[(1, "hank"), (2, "ivy")],
            &[(2, "(button) (small blind)"), (1, "(big blind)")],
        )
        .unwrap();
        assert_eq!(
            labels(&positions),
            vec![
                ("hank".to_string(), "BB".to_string()),
                ("ivy".to_string(), "SB".to_string())
            ]
        );
    }

    #[test]
    fn test_three_handed_has_no_early_positions() {
        let positions = positions_for(
            1,
            &[(1, "carol"), (2, "alice"), (3, "bob")],
            &[(2, "(small blind)"), (3, "(big blind)")],
        )
        .unwrap();
        assert_eq!(
            labels(&positions),
            vec![
                ("alice".to_string(), "SB".to_string()),
                ("bob".to_string(), "BB".to_string()),
                ("carol".to_string(), "BTN".to_string()),
            ]
        );
    }

    #[test]
    fn test_four_handed_labels_one_early_seat() {
        let positions = positions_for(
            5,
            &[(1, "dan"), (3, "eve"), (5, "finn"), (6, "gus")],
            &[(6, "(small blind)"), (1, "(big blind)")],
        )
        .unwrap();
        assert_eq!(positions["eve"], Position::BeforeButton(1));
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn test_walk_stops_before_unlabeled_gap_player() {
        // Seat 4 sits between the button and the small blind but posted
        // nothing. The walk reaches the small blind first and stops, so
        // seat 4 never gets a label.
        let err = positions_for(
            3,
            &[(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e"), (6, "f")],
            &[(5, "(small blind)"), (6, "(big blind)")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            HandParseError::PositionMismatch {
                seated: 6,
                labeled: 5
            }
        );
    }

    #[test]
    fn test_seat_ten_is_never_reached() {
        let err = positions_for(
            2,
            &[(1, "a"), (2, "b"), (3, "c"), (4, "d"), (10, "z")],
            &[(3, "(small blind)"), (4, "(big blind)")],
        )
        .unwrap_err();
        assert!(matches!(err, HandParseError::PositionMismatch { .. }));
    }

    #[test]
    fn test_two_small_blinds() {
        let err = positions_for(
            1,
            &[(1, "a"), (2, "b"), (3, "c")],
            &[(2, "(small blind)"), (3, "(small blind)")],
        )
        .unwrap_err();
        assert_eq!(err, HandParseError::DuplicatePosition(Position::SmallBlind));
    }

    #[test]
    fn test_unoccupied_button_seat() {
        let err = positions_for(7, &[(1, "a"), (2, "b")], &[]).unwrap_err();
        assert_eq!(err, HandParseError::UnknownSeat(7));
    }
}
