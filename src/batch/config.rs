use super::BatchError;

/// How a batch run finds and parses files.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Only files whose name ends with this are parsed.
    pub suffix: String,
    /// Worker threads. `None` lets rayon pick one per core.
    pub threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            suffix: ".txt".to_string(),
            threads: None,
        }
    }
}

impl BatchConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.suffix.is_empty() {
            return Err(BatchError::ValidationError(
                "suffix must not be empty".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(BatchError::ValidationError(
                "threads must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
