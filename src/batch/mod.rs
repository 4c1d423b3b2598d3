//! Parsing many hands at once.
//!
//! Hand history files hold many hands back to back. This module splits
//! them apart ([`split_hands`]), parses each one and keeps going when one
//! fails ([`parse_hands`]), and drives whole directory trees of files in
//! parallel ([`BatchDriver`]). Failures never stop a batch; they are
//! counted in an [`ErrorTally`] keyed by the error message.
mod config;
mod driver;
mod error;
mod file;
mod tally;

pub use config::BatchConfig;
pub use driver::{BatchDriver, BatchResult};
pub use error::{BatchError, FileError};
pub use file::{
    find_files, parse_file, parse_hands, read_file, split_hands, FailureLocation, ParseFailure,
    ParsedText,
};
pub use tally::ErrorTally;
