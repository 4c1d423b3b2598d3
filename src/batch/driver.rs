use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, instrument};

use crate::hand_history::HandRecord;

use super::{find_files, parse_file, BatchConfig, BatchError, ErrorTally, ParseFailure};

/// Everything a batch run produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// Parsed hands, in file order and then in the order of the hands
    /// within each file.
    pub hands: Vec<HandRecord>,
    pub tally: ErrorTally,
    /// Failures of each file that had any.
    pub failures: BTreeMap<PathBuf, Vec<ParseFailure>>,
    /// Files that were parsed, or tried and skipped.
    pub files_parsed: usize,
    /// Files that were never looked at because the run was cancelled.
    pub files_cancelled: usize,
}

/// Parses every hand history file in a directory tree on a fixed size
/// thread pool.
///
/// ```no_run
/// use rs_hand_history::batch::{BatchConfig, BatchDriver};
///
/// let driver = BatchDriver::new(BatchConfig::default().with_threads(4)).unwrap();
/// let cancel = driver.cancel_handle();
/// // Another thread can call `cancel.store(true, Ordering::Relaxed)`.
/// let result = driver.run("hands/").unwrap();
/// for (message, count) in &result.tally.counts {
///     println!("{count:>6} {message}");
/// }
/// ```
pub struct BatchDriver {
    config: BatchConfig,
    pool: ThreadPool,
    cancel: Arc<AtomicBool>,
}

impl BatchDriver {
    pub fn new(config: BatchConfig) -> Result<Self, BatchError> {
        config.validate()?;
        let mut builder = ThreadPoolBuilder::new().thread_name(|idx| format!("hh-parse-{idx}"));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;
        Ok(Self {
            config,
            pool,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Setting the returned flag stops the driver from starting any more
    /// files. Files already being parsed finish.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    #[instrument(level = "debug", skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn run(&self, dir: impl AsRef<Path>) -> Result<BatchResult, BatchError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(BatchError::MissingDirectory(dir.to_path_buf()));
        }
        let files = find_files(dir, &self.config.suffix)?;
        let total = files.len();
        info!(total, threads = self.pool.current_num_threads(), "Starting batch");

        let done = AtomicUsize::new(0);
        let cancel = &self.cancel;
        let mut results: Vec<_> = self.pool.install(|| {
            files
                .into_par_iter()
                .enumerate()
                .map(|(idx, path)| {
                    if cancel.load(Ordering::Relaxed) {
                        return (idx, path, None);
                    }
                    let parsed = parse_file(&path);
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    info!(
                        file = %path.display(),
                        hands = parsed.hands.len(),
                        failures = parsed.failures.len(),
                        "Finished file {finished}/{total}"
                    );
                    (idx, path, Some(parsed))
                })
                .collect()
        });
        // Workers finish in any order.
        results.sort_by_key(|(idx, _, _)| *idx);

        let mut result = BatchResult::default();
        for (_, path, parsed) in results {
            let Some(parsed) = parsed else {
                result.files_cancelled += 1;
                continue;
            };
            result.files_parsed += 1;
            result.tally += parsed.tally();
            result.hands.extend(parsed.hands);
            if !parsed.failures.is_empty() {
                result.failures.insert(path, parsed.failures);
            }
        }
        info!(
            hands = result.hands.len(),
            failed_hands = result.tally.failed_hands(),
            skipped_files = result.tally.skipped_files,
            cancelled = result.files_cancelled,
            "Finished batch"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::hand_history::test_util::*;

    fn write_fixture_tree(dir: &Path) {
        fs::create_dir_all(dir.join("z2022")).unwrap();
        fs::write(dir.join("a.txt"), fixture_file()).unwrap();
        let broken = THREE_HANDED_RIVER_FOLD.replace("Bob: checks\n", "Hand cancelled\n");
        fs::write(
            dir.join("z2022/b.txt"),
            [HEADS_UP_PREFLOP_RERAISE, broken.as_str()].join("\n\n"),
        )
        .unwrap();
        fs::write(dir.join("z2022/c.txt"), [0xffu8, 0xfe, 0xfd]).unwrap();
        fs::write(dir.join("z2022/notes.md"), "not a hand").unwrap();
    }

    #[test_log::test]
    fn test_run_over_tree() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_tree(dir.path());

        let driver = BatchDriver::new(BatchConfig::default().with_threads(2)).unwrap();
        let result = driver.run(dir.path()).unwrap();

        assert_eq!(result.files_parsed, 3);
        assert_eq!(result.files_cancelled, 0);
        let hand_nos: Vec<u64> = result.hands.iter().map(|h| h.hand_no).collect();
        assert_eq!(
            hand_nos,
            vec![100000000001, 200000000002, 300000000003, 400000000004, 300000000003]
        );
        for hand in &result.hands {
            assert_valid_hand_record(hand);
        }
        assert_eq!(result.tally.counts["Hand cancelled"], 1);
        assert_eq!(result.tally.failed_hands(), 1);
        assert_eq!(result.tally.skipped_files, 1);
        assert_eq!(result.failures.len(), 2);
    }

    #[test]
    fn test_results_do_not_depend_on_threads() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_tree(dir.path());

        let one = BatchDriver::new(BatchConfig::default().with_threads(1))
            .unwrap()
            .run(dir.path())
            .unwrap();
        let four = BatchDriver::new(BatchConfig::default().with_threads(4))
            .unwrap()
            .run(dir.path())
            .unwrap();
        assert_eq!(one, four);
    }

    #[test]
    fn test_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_tree(dir.path());

        let driver = BatchDriver::new(BatchConfig::default()).unwrap();
        driver.cancel_handle().store(true, Ordering::Relaxed);
        let result = driver.run(dir.path()).unwrap();
        assert!(result.hands.is_empty());
        assert_eq!(result.files_cancelled, 3);
        assert!(result.tally.is_empty());
    }

    #[test]
    fn test_bad_inputs() {
        assert!(matches!(
            BatchDriver::new(BatchConfig::default().with_threads(0)),
            Err(BatchError::ValidationError(_))
        ));
        let driver = BatchDriver::new(BatchConfig::default()).unwrap();
        assert!(matches!(
            driver.run("/definitely/not/a/real/dir"),
            Err(BatchError::MissingDirectory(_))
        ));
    }
}
