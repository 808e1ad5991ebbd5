//! Configuration types for word-walker
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime scan configuration with validation

use crate::error::{ConfigError, ValidationError};
use clap::Parser;
use std::path::PathBuf;

/// Maximum reasonable worker count
pub const MAX_WORKERS: usize = 512;

/// Minimum work queue size
const MIN_QUEUE_SIZE: usize = 16;

/// Minimum error sink capacity
const MIN_SINK_CAPACITY: usize = 1;

/// Default number of scan workers
pub const DEFAULT_WORKERS: usize = 10;

/// Default error sink capacity
pub const DEFAULT_SINK_CAPACITY: usize = 100;

/// Concurrent word-occurrence counter for text corpora
#[derive(Parser, Debug, Clone)]
#[command(
    name = "word-walker",
    version,
    about = "Counts occurrences of a word across all .txt files under a directory",
    long_about = "Recursively walks a directory tree with a bounded pool of workers,\n\
                  counting case-insensitive substring occurrences of a target word\n\
                  in every .txt file. Failures on individual files are reported\n\
                  without aborting the rest of the scan.",
    after_help = "EXAMPLES:\n    \
        word-walker --dir corpus --word john\n    \
        word-walker --dir /data/books --word whale --workers 32\n    \
        word-walker serve --root corpus --port 8080",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct CliArgs {
    /// Directory to scan for files
    #[arg(long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Word to search for
    #[arg(long = "word", value_name = "WORD")]
    pub word: Option<String>,

    /// Subcommand (serve, etc.)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Maximum number of concurrent scan workers
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
    pub workers: usize,

    /// Work queue capacity (controls memory usage)
    #[arg(long, default_value = "1024", value_name = "NUM")]
    pub queue_size: usize,

    /// Error sink capacity
    #[arg(long, default_value_t = DEFAULT_SINK_CAPACITY, value_name = "NUM")]
    pub sink_capacity: usize,

    /// Quiet mode - suppress the final summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (show per-task activity)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Subcommands
#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP counting server
    Serve {
        /// Corpus root directory all scans are anchored under
        #[arg(long, default_value = "corpus", value_name = "DIR")]
        root: PathBuf,

        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Maximum number of concurrent scan workers per request
        #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS, value_name = "NUM")]
        workers: usize,
    },
}

/// Validated runtime configuration for one scan session
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory the walk starts from
    pub root: PathBuf,

    /// Target word, compared case-insensitively
    pub word: String,

    /// Number of pool workers
    pub worker_count: usize,

    /// Work queue capacity
    pub queue_size: usize,

    /// Error sink capacity
    pub sink_capacity: usize,
}

impl ScanConfig {
    /// Create a configuration with default pool sizing
    pub fn new(root: impl Into<PathBuf>, word: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            word: word.into(),
            worker_count: DEFAULT_WORKERS,
            queue_size: 1024,
            sink_capacity: DEFAULT_SINK_CAPACITY,
        }
    }

    /// Override the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: &CliArgs) -> crate::error::Result<Self> {
        let root = args
            .dir
            .clone()
            .ok_or(ConfigError::MissingArgument { name: "--dir" })?;

        let word = args
            .word
            .clone()
            .ok_or(ConfigError::MissingArgument { name: "--word" })?;

        Self::validate_word(&word)?;

        let config = Self {
            root,
            word,
            worker_count: args.workers,
            queue_size: args.queue_size,
            sink_capacity: args.sink_capacity,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate field ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.worker_count,
                max: MAX_WORKERS,
            });
        }

        if self.queue_size < MIN_QUEUE_SIZE {
            return Err(ConfigError::InvalidQueueSize {
                size: self.queue_size,
                min: MIN_QUEUE_SIZE,
            });
        }

        if self.sink_capacity < MIN_SINK_CAPACITY {
            return Err(ConfigError::InvalidSinkCapacity {
                size: self.sink_capacity,
                min: MIN_SINK_CAPACITY,
            });
        }

        Ok(())
    }

    /// Validate the target word
    pub fn validate_word(word: &str) -> Result<(), ValidationError> {
        if word.trim().is_empty() {
            return Err(ValidationError::EmptyWord);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ScanConfig {
        ScanConfig::new("/corpus", "john")
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(base_config().validate().is_ok());
        assert_eq!(base_config().worker_count, DEFAULT_WORKERS);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = base_config().with_workers(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWorkerCount { count: 0, .. })
        ));
    }

    #[test]
    fn test_excessive_workers_rejected() {
        let config = base_config().with_workers(MAX_WORKERS + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tiny_queue_rejected() {
        let mut config = base_config();
        config.queue_size = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQueueSize { .. })
        ));
    }

    #[test]
    fn test_empty_word_rejected() {
        assert!(ScanConfig::validate_word("").is_err());
        assert!(ScanConfig::validate_word("   ").is_err());
        assert!(ScanConfig::validate_word("john").is_ok());
    }

    #[test]
    fn test_missing_required_args() {
        let args = CliArgs::parse_from(["word-walker", "--word", "john"]);
        assert!(ScanConfig::from_args(&args).is_err());

        let args = CliArgs::parse_from(["word-walker", "--dir", "corpus"]);
        assert!(ScanConfig::from_args(&args).is_err());
    }

    #[test]
    fn test_cli_parsing() {
        let args =
            CliArgs::parse_from(["word-walker", "--dir", "corpus", "--word", "john", "-w", "4"]);
        let config = ScanConfig::from_args(&args).unwrap();
        assert_eq!(config.root, PathBuf::from("corpus"));
        assert_eq!(config.word, "john");
        assert_eq!(config.worker_count, 4);
    }

    #[test]
    fn test_cli_serve_subcommand() {
        let args = CliArgs::parse_from(["word-walker", "serve", "--port", "9090"]);
        match args.command {
            Some(Command::Serve { port, root, .. }) => {
                assert_eq!(port, 9090);
                assert_eq!(root, PathBuf::from("corpus"));
            }
            _ => panic!("expected serve subcommand"),
        }
    }
}
