use thiserror::Error;

use super::Card;

/// Errors that can come from parsing card codes.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CardError {
    #[error("Unexpected char for a card value")]
    UnexpectedValueChar,
    #[error("Unexpected char for a card suit")]
    UnexpectedSuitChar,
    #[error("Card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("Card string ended in the middle of a card")]
    UnparsedCharsRemaining,
}
