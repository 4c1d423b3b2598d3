//! Parsing of a single PokerStars hand.
//!
//! A hand goes through the same steps every time:
//!
//! 1. Every line is classified on its own ([`classify`]).
//! 2. The header, table and seat lines give the identity and the seating
//!    ([`parse_header`], [`SeatRegistry`]).
//! 3. The button and the blind markers in the summary give everyone a
//!    position ([`assign_positions`]).
//! 4. Antes and blinds are collected ([`PostLedger`]).
//! 5. The betting is replayed one street at a time ([`replay_hand`]).
//! 6. The summary is checked against the replay ([`Summary`]).
//!
//! [`parse_hand`] does all of it and returns a [`HandRecord`].
mod assembler;
mod errors;
mod header;
mod line;
mod position;
mod posts;
mod record;
mod replay;
mod seats;
mod summary;

pub use assembler::parse_hand;
pub use errors::HandParseError;
pub use header::{parse_header, Header};
pub use line::{classify, ActionLine, BlindMarker, LineKind, Marker, PostKind, SummarySeatLine, Verb};
pub use position::{assign_positions, Position};
pub use posts::PostLedger;
pub use record::{
    Action, ActionKind, HandRecord, Stakes, Street, StreetRecord, UncalledBet, Winning,
};
pub use replay::{replay_hand, replay_street, HandReplay, Markers, StreetLedger, StreetOutcome};
pub use seats::SeatRegistry;
pub use summary::{Summary, MONEY_EPSILON};

#[cfg(any(test, feature = "test-util"))]
pub mod test_util;
