use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::hand_history::{parse_hand, HandRecord};

use super::{ErrorTally, FileError};

static HAND_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\x{feff}?PokerStars Hand #\d+:").expect("hand start regex"));

/// Where a failure happened.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureLocation {
    /// The index of the hand within its file.
    Hand(usize),
    /// The file couldn't be read.
    File,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub location: FailureLocation,
    pub message: String,
}

/// The hands in one piece of text and the ones that couldn't be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedText {
    pub hands: Vec<HandRecord>,
    pub failures: Vec<ParseFailure>,
}

impl ParsedText {
    fn unreadable(err: FileError) -> Self {
        Self {
            hands: vec![],
            failures: vec![ParseFailure {
                location: FailureLocation::File,
                message: err.to_string(),
            }],
        }
    }

    pub fn tally(&self) -> ErrorTally {
        let mut tally = ErrorTally::default();
        for failure in &self.failures {
            match failure.location {
                FailureLocation::Hand(_) => tally.record(failure.message.as_str()),
                FailureLocation::File => tally.record_skipped_file(),
            }
        }
        tally
    }
}

/// Split the text of a file into one slice per hand.
///
/// A hand starts at a `PokerStars Hand #<digits>:` line and runs up to
/// the next one. Anything before the first hand is dropped, as is a byte
/// order mark in front of it.
pub fn split_hands(text: &str) -> Vec<&str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let starts: Vec<usize> = HAND_START.find_iter(text).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(idx, start)| {
            let end = starts.get(idx + 1).copied().unwrap_or(text.len());
            &text[*start..end]
        })
        .collect()
}

/// Parse every hand in `text`. A hand that fails is recorded and parsing
/// carries on with the next one.
pub fn parse_hands(text: &str) -> ParsedText {
    let mut parsed = ParsedText::default();
    for (idx, block) in split_hands(text).into_iter().enumerate() {
        match parse_hand(block) {
            Ok(hand) => parsed.hands.push(hand),
            Err(err) => {
                trace!(idx, %err, "Discarding hand");
                parsed.failures.push(ParseFailure {
                    location: FailureLocation::Hand(idx),
                    message: err.to_string(),
                });
            }
        }
    }
    parsed
}

pub fn read_file(path: &Path) -> Result<String, FileError> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8(bytes)?)
}

/// Parse every hand in a file.
///
/// A file that can't be read or isn't UTF-8 gives no hands and a single
/// file level failure.
pub fn parse_file(path: &Path) -> ParsedText {
    match read_file(path) {
        Ok(text) => {
            let parsed = parse_hands(&text);
            debug!(
                path = %path.display(),
                hands = parsed.hands.len(),
                failures = parsed.failures.len(),
                "Parsed file"
            );
            parsed
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "Skipping file");
            ParsedText::unreadable(err)
        }
    }
}

/// Every file under `dir` whose name ends with `suffix`, sorted.
pub fn find_files(dir: &Path, suffix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(suffix))
            {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}
