use thiserror::Error;

use crate::core::CardError;

use super::{Position, Street};

/// Everything that can make a single hand unusable.
///
/// None of these stop a batch. The hand is dropped, the error is tallied
/// by its message, and parsing moves on to the next hand.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum HandParseError {
    #[error("Run-it-twice parsing is not supported yet")]
    RunItTwiceUnsupported,

    #[error("Incomplete hand history")]
    IncompleteHand,

    #[error("Hand cancelled")]
    HandCancelled,

    #[error("Header is missing {0}")]
    IncompleteHeader(&'static str),

    #[error("Table line is missing")]
    MissingTable,

    #[error("Seat {0} is not occupied")]
    UnknownSeat(u8),

    #[error("Player is not seated at the table")]
    UnknownPlayer(String),

    #[error("Player is seated more than once")]
    DuplicatePlayer(String),

    #[error("Positions don't cover every seated player")]
    PositionMismatch { seated: usize, labeled: usize },

    #[error("Position is given to more than one player")]
    DuplicatePosition(Position),

    #[error("Antes are not uniform across players")]
    NonUniformAnte,

    #[error("Unexpected investment action: {0}")]
    UnexpectedAction(String),

    #[error("Wager is missing its amount")]
    MalformedAction { player: String, verb: String },

    #[error("Total pot line is missing")]
    MissingTotalPot,

    #[error("No winners in the summary")]
    NoWinners,

    #[error("Winnings don't add up to the pot without rake")]
    WinningsMismatch { won: f64, pot_no_rake: f64 },

    #[error("Board is too short for the streets played")]
    BoardTooShort { street: Street, board_len: usize },

    #[error("Total pot doesn't match calculated values")]
    PotMismatch {
        hand_no: u64,
        total_pot: f64,
        invested: f64,
    },

    #[error("Invalid cards: {0}")]
    InvalidCards(#[from] CardError),
}
