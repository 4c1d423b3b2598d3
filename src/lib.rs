//! # rs_hand_history
//!
//! A library for turning PokerStars hand history text into validated,
//! structured per hand records.
//!
//! The interesting part of the crate is the betting state reconstruction.
//! Hand histories only print what each player did; they never print the pot
//! or the amount that was needed to call. This crate replays every street,
//! tracking how much each player has put in, and then reconciles that
//! against the totals printed in the summary section. Hands that don't add
//! up are rejected with a typed error instead of being silently repaired.
//!
//! ## Parsing a single hand
//!
//! ```
//! use rs_hand_history::hand_history::{parse_hand, Street};
//!
//! let text = "\
//! PokerStars Hand #1: Hold'em No Limit ($0.01/$0.02 USD) - 2022/03/01 8:05:09 ET
//! Table 'Gamma' 2-max Seat #2 is the button
//! Seat 1: Hank ($2 in chips)
//! Seat 2: Ivy ($1.37 in chips)
//! Ivy: posts small blind $0.01
//! Hank: posts big blind $0.02
//! *** HOLE CARDS ***
//! Ivy: folds
//! Uncalled bet ($0.01) returned to Hank
//! Hank collected $0.02 from pot
//! *** SUMMARY ***
//! Total pot $0.02 | Rake $0
//! Seat 1: Hank (big blind) collected ($0.02)
//! Seat 2: Ivy (button) (small blind) folded before Flop
//! ";
//!
//! let hand = parse_hand(text).unwrap();
//! assert_eq!(hand.hand_no, 1);
//! assert_eq!(hand.last_street, Street::Preflop);
//! assert_eq!(hand.winners[0].player, "Hank");
//! ```
//!
//! ## Parsing many files
//!
//! The [`batch`] module splits multi hand files, parses every hand, and
//! keeps a tally of what went wrong. Files are parsed in parallel.
//!
//! ```no_run
//! use rs_hand_history::batch::{BatchConfig, BatchDriver};
//!
//! let driver = BatchDriver::new(BatchConfig::default()).unwrap();
//! let result = driver.run("./hand_histories").unwrap();
//! println!("{} hands, {} skipped files", result.hands.len(), result.tally.skipped_files);
//! ```

/// Card codes and card masks.
pub mod core;

/// Single hand parsing: line classification, replay and reconciliation.
pub mod hand_history;

/// Multi hand and multi file driving.
pub mod batch;
