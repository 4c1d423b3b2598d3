use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use rs_hand_history::batch::{BatchConfig, BatchDriver, BatchError, BatchResult};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "hh_report",
    about = "Parse a directory of PokerStars hand histories and report what failed",
    long_about = "Walks a directory tree, parses every hand of every matching file in parallel,\n\
                  and prints how many hands parsed along with a tally of the reasons hands\n\
                  were discarded."
)]
struct Args {
    /// Directory containing hand history files
    dir: PathBuf,

    /// Only parse files whose name ends with this
    #[arg(long = "suffix", default_value = ".txt")]
    suffix: String,

    /// Number of parsing threads (defaults to one per core)
    #[arg(short = 't', long = "threads")]
    threads: Option<usize>,

    /// Write every parsed hand as one JSON object per line to this file
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

#[derive(Error, Debug)]
enum ReportError {
    #[error("Batch failed: {0}")]
    Batch(#[from] BatchError),

    #[error("Error writing output")]
    Io(#[from] std::io::Error),

    #[error("Error serializing hand")]
    Json(#[from] serde_json::Error),
}

fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("{level},rs_hand_history={level}"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn write_jsonl(path: &Path, result: &BatchResult) -> Result<(), ReportError> {
    let mut out = BufWriter::new(File::create(path)?);
    for hand in &result.hands {
        serde_json::to_writer(&mut out, hand)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    info!(path = %path.display(), hands = result.hands.len(), "Wrote hands");
    Ok(())
}

fn print_report(result: &BatchResult) {
    println!("Files parsed:  {}", result.files_parsed);
    println!("Hands parsed:  {}", result.hands.len());
    println!("Hands failed:  {}", result.tally.failed_hands());
    println!("Files skipped: {}", result.tally.skipped_files);
    if result.files_cancelled > 0 {
        println!("Files not started: {}", result.files_cancelled);
    }
    if !result.tally.counts.is_empty() {
        println!();
        let mut counts: Vec<(&String, &usize)> = result.tally.counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (message, count) in counts {
            println!("{count:>8}  {message}");
        }
    }
}

fn main() -> Result<(), ReportError> {
    let args = Args::parse();
    init_tracing(args.verbosity);

    let config = BatchConfig {
        suffix: args.suffix,
        threads: args.threads,
    };
    let driver = BatchDriver::new(config)?;
    let result = driver.run(&args.dir)?;

    if let Some(path) = &args.output {
        write_jsonl(path, &result)?;
    }
    print_report(&result);
    Ok(())
}
