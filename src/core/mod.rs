//! Card codes shared by the parser and by anything that consumes parsed
//! hands. Codes and masks use the layout external hand evaluators expect:
//! `code = value + 13 * suit`, one bit per code.
mod card;
mod error;

pub use card::*;
pub use error::*;
