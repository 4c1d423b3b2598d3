use std::collections::BTreeMap;
use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;

use crate::core::{CardError, CardMask};

use super::Position;

/// Betting rounds, plus `Showdown` for hands that went past the river.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    /// The streets that have betting, in order.
    pub const BETTING: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

    /// How many board characters must exist once this street is reached.
    pub fn min_board_len(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 6,
            Street::Turn => 8,
            Street::River | Street::Showdown => 10,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "preflop"),
            Street::Flop => write!(f, "flop"),
            Street::Turn => write!(f, "turn"),
            Street::River => write!(f, "river"),
            Street::Showdown => write!(f, "showdown"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Bet,
    Call,
    Raise,
    Check,
    Fold,
}

/// One replayed action and the state of the street right after it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub player: String,
    pub kind: ActionKind,
    /// The first amount on the line. For a raise that's the raise size,
    /// not the total. Checks and folds have none.
    pub amount: Option<f64>,
    pub pot_after: f64,
    pub highwater_after: f64,
}

/// Everything that happened on one street.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreetRecord {
    pub actions: Vec<Action>,
    /// Minimum investment of each player who put money in this street.
    pub investment: BTreeMap<String, f64>,
}

/// Money that was bet, not called, and handed back.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct UncalledBet {
    pub amount: f64,
    pub player: String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Winning {
    pub player: String,
    pub amount: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Stakes {
    pub small_blind: f64,
    pub big_blind: f64,
    /// Three letter currency code.
    pub currency: String,
}

/// A fully parsed and reconciled hand.
///
/// Records are only built once every check has passed, so the money in
/// one always adds up: the total investment of all players equals the
/// total pot, and the winnings equal the pot minus the rake.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct HandRecord {
    pub hand_no: u64,
    pub game: String,
    pub stakes: Stakes,
    pub timestamp: DateTime<Tz>,
    pub table_name: String,
    pub button_seat: u8,

    pub seats: BTreeMap<u8, String>,
    pub stacks: BTreeMap<String, f64>,
    /// Table position of every seated player. Heads up the button posts
    /// the small blind and is labelled `SB`, so there is no `BTN` entry.
    pub positions: BTreeMap<String, Position>,

    pub ante: f64,
    pub antes: BTreeMap<String, f64>,
    pub extra_antes: BTreeMap<String, f64>,
    pub posts: BTreeMap<String, f64>,

    pub hero: Option<String>,
    /// Hero's dealt cards and every hand shown or mucked face up.
    pub hole_cards: BTreeMap<String, String>,

    pub streets: BTreeMap<Street, StreetRecord>,
    pub uncalled_bet: Option<UncalledBet>,
    pub total_investment: BTreeMap<String, f64>,

    pub total_pot: f64,
    pub rake: f64,
    pub total_pot_no_rake: f64,

    pub winners: Vec<Winning>,
    pub rake_contribution: BTreeMap<String, f64>,

    pub board: String,
    pub last_street: Street,
}

impl HandRecord {
    pub fn street(&self, street: Street) -> Option<&StreetRecord> {
        self.streets.get(&street)
    }

    pub fn num_players(&self) -> usize {
        self.seats.len()
    }

    pub fn board_mask(&self) -> Result<CardMask, CardError> {
        self.board.parse()
    }

    /// The card mask of a player's hole cards, if they are known.
    pub fn hole_card_mask(&self, player: &str) -> Option<Result<CardMask, CardError>> {
        self.hole_cards.get(player).map(|cards| cards.parse())
    }

    /// How much a player won across all the pots they took.
    pub fn amount_won(&self, player: &str) -> f64 {
        self.winners
            .iter()
            .filter(|w| w.player == player)
            .map(|w| w.amount)
            .sum()
    }
}
