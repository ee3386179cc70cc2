use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::select::SelectionMode;

#[derive(Parser, Debug)]
#[command(
    name = "photo-upload",
    version,
    about = "Upload event photos to the gallery API, once or as a paced stress test"
)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Directory holding the photos (*.jpg, *.JPG, *.jpeg, *.JPEG)
    #[arg(short, long, global = true, default_value = "./photos")]
    pub dir: PathBuf,

    /// API base URL, e.g. https://example.com/api
    #[arg(long, global = true, env = "PHOTO_UPLOAD_API_URL")]
    pub api_url: Option<String>,

    /// API key sent in the x-api-key header
    #[arg(long, global = true, env = "PHOTO_UPLOAD_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Event the photos are uploaded to
    #[arg(long, global = true, env = "PHOTO_UPLOAD_EVENT_ID")]
    pub event_id: Option<String>,

    /// Per-request timeout in seconds (default 120)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Read defaults from this JSON file instead of the user config dir
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Start without asking for confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Upload every photo in the directory once
    Upload {
        /// Pause between two uploads, in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,

        /// Only upload the first N photos
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Upload a batch of photos every interval for a while
    Stress {
        /// Photos per iteration
        #[arg(short, long, default_value_t = 5)]
        batch_size: usize,

        /// Seconds between the start of two iterations
        #[arg(short, long, default_value_t = 60)]
        interval: u64,

        /// Number of iterations (takes precedence over --duration)
        #[arg(short = 'n', long)]
        iterations: Option<u64>,

        /// Total run time in minutes (default 60)
        #[arg(short = 't', long)]
        duration: Option<u64>,

        /// How photos are picked for each batch
        #[arg(long, value_enum, default_value_t = SelectionMode::Sequential)]
        mode: SelectionMode,

        /// Shorthand for --mode random
        #[arg(short, long, conflicts_with = "mode")]
        random: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_stress_flags() {
        let cli = Cli::try_parse_from([
            "photo-upload",
            "stress",
            "--batch-size",
            "3",
            "--interval",
            "10",
            "--duration",
            "2",
            "--random",
            "--dir",
            "/tmp/pics",
        ])
        .unwrap();
        assert_eq!(cli.common.dir, PathBuf::from("/tmp/pics"));
        match cli.command {
            Command::Stress {
                batch_size,
                interval,
                iterations,
                duration,
                random,
                ..
            } => {
                assert_eq!(batch_size, 3);
                assert_eq!(interval, 10);
                assert_eq!(iterations, None);
                assert_eq!(duration, Some(2));
                assert!(random);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn random_conflicts_with_explicit_mode() {
        let res = Cli::try_parse_from([
            "photo-upload",
            "stress",
            "--mode",
            "sequential",
            "--random",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn upload_defaults() {
        let cli = Cli::try_parse_from(["photo-upload", "upload"]).unwrap();
        match cli.command {
            Command::Upload { delay_ms, limit } => {
                assert_eq!(delay_ms, 500);
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
