use std::collections::BTreeMap;

use approx::abs_diff_eq;
use tracing::warn;

use super::{HandParseError, LineKind, SeatRegistry, Street, StreetRecord, Winning};

/// Money reported by the site is compared to what the replay computed
/// within this tolerance.
pub const MONEY_EPSILON: f64 = 1e-6;

/// What the `*** SUMMARY ***` section reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_pot: f64,
    pub rake: f64,
    /// In the order the summary lists them. A player can appear more than
    /// once when they won more than one pot.
    pub winners: Vec<Winning>,
    /// Card codes with the spaces taken out.
    pub board: String,
    /// Cards shown or mucked face up, by nickname.
    pub reveals: BTreeMap<String, String>,
}

/// Strip the spaces out of a bracketed card group.
pub(crate) fn card_codes(cards: &str) -> String {
    cards.split_whitespace().collect()
}

impl Summary {
    pub fn from_lines(
        lines: &[LineKind<'_>],
        registry: &SeatRegistry,
    ) -> Result<Self, HandParseError> {
        let (total_pot, rake) = lines
            .iter()
            .find_map(|line| match line {
                LineKind::TotalPot { pot, rake } => Some((*pot, *rake)),
                _ => None,
            })
            .ok_or(HandParseError::MissingTotalPot)?;

        let board = lines
            .iter()
            .find_map(|line| match line {
                LineKind::Board(cards) => Some(card_codes(cards)),
                _ => None,
            })
            .unwrap_or_default();

        let mut winners = Vec::new();
        let mut reveals = BTreeMap::new();
        for line in lines {
            let LineKind::SummarySeat(seat_line) = line else {
                continue;
            };
            let name = registry.name_at(seat_line.seat)?;
            if let Some(amount) = seat_line.amount {
                winners.push(Winning {
                    player: name.to_string(),
                    amount,
                });
            }
            if let Some(cards) = seat_line.cards {
                reveals.insert(name.to_string(), card_codes(cards));
            }
        }
        if winners.is_empty() {
            return Err(HandParseError::NoWinners);
        }

        Ok(Self {
            total_pot,
            rake,
            winners,
            board,
            reveals,
        })
    }

    pub fn total_pot_no_rake(&self) -> f64 {
        self.total_pot - self.rake
    }

    /// Each winner's share of the rake, in proportion to what they won.
    pub fn rake_contribution(&self) -> BTreeMap<String, f64> {
        let pot_no_rake = self.total_pot_no_rake();
        let mut contribution = BTreeMap::new();
        for winner in &self.winners {
            let share = if pot_no_rake > 0.0 {
                winner.amount / pot_no_rake * self.rake
            } else {
                0.0
            };
            *contribution.entry(winner.player.clone()).or_insert(0.0) += share;
        }
        contribution
    }

    /// Check the summary against the replay.
    ///
    /// Winnings are checked first, then the board, then the pot. Only the
    /// pot check logs, since a mismatch there usually means the replay
    /// misread an action.
    pub fn reconcile(
        &self,
        hand_no: u64,
        streets: &BTreeMap<Street, StreetRecord>,
        total_investment: &BTreeMap<String, f64>,
    ) -> Result<(), HandParseError> {
        let won: f64 = self.winners.iter().map(|w| w.amount).sum();
        let pot_no_rake = self.total_pot_no_rake();
        if !abs_diff_eq!(won, pot_no_rake, epsilon = MONEY_EPSILON) {
            return Err(HandParseError::WinningsMismatch { won, pot_no_rake });
        }

        if let Some(street) = streets.keys().next_back() {
            if self.board.len() < street.min_board_len() {
                return Err(HandParseError::BoardTooShort {
                    street: *street,
                    board_len: self.board.len(),
                });
            }
        }

        let invested: f64 = total_investment.values().sum();
        if !abs_diff_eq!(invested, self.total_pot, epsilon = MONEY_EPSILON) {
            warn!(
                hand_no,
                total_pot = self.total_pot,
                invested,
                "Total pot doesn't match calculated values"
            );
            return Err(HandParseError::PotMismatch {
                hand_no,
                total_pot: self.total_pot,
                invested,
            });
        }
        Ok(())
    }
}
