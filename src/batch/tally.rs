use std::collections::BTreeMap;
use std::ops::AddAssign;

/// How many hands failed for each reason, plus how many files could not
/// be read at all.
///
/// Tallies from different files can be merged in any order and grouping
/// and give the same result.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTally {
    /// Error message to the number of hands that failed with it.
    pub counts: BTreeMap<String, usize>,
    pub skipped_files: usize,
}

impl ErrorTally {
    pub fn record(&mut self, message: impl Into<String>) {
        *self.counts.entry(message.into()).or_insert(0) += 1;
    }

    pub fn record_skipped_file(&mut self) {
        self.skipped_files += 1;
    }

    pub fn merge(mut self, other: ErrorTally) -> ErrorTally {
        self += other;
        self
    }

    /// Hands that failed, not counting skipped files.
    pub fn failed_hands(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty() && self.skipped_files == 0
    }
}

impl AddAssign for ErrorTally {
    fn add_assign(&mut self, rhs: Self) {
        for (message, count) in rhs.counts {
            *self.counts.entry(message).or_insert(0) += count;
        }
        self.skipped_files += rhs.skipped_files;
    }
}
