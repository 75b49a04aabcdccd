//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use gallery_grab::download::{DEFAULT_INTERVAL_SECS, DEFAULT_OUTPUT_DIR};
use gallery_grab::{LoopConfig, Pacing, RetryPolicy};

/// Scrape an index page for gallery links and download them one by one.
///
/// Links are taken from `div.ently_text a[target="_blank"]` anchors and
/// saved under their last URL path segment. A failed download is retried
/// until it succeeds unless --max-attempts is given.
#[derive(Parser, Debug)]
#[command(name = "gallery-grab")]
#[command(author, version, about)]
pub struct Args {
    /// Index page to scrape
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Seconds to wait after each download attempt (0 or negative disables;
    /// fractions are truncated to whole seconds)
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        default_value_t = DEFAULT_INTERVAL_SECS,
        allow_negative_numbers = true
    )]
    pub interval: f64,

    /// Give up on a URL after this many attempts (default: retry forever)
    #[arg(short = 'm', long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: Option<u32>,

    /// Directory to save downloads into
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// The index page URL; empty when none was given, which fails the fetch.
    pub fn index_url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// Builds the download loop configuration from the parsed flags.
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            pacing: Pacing::from_secs(self.interval),
            retry_policy: self
                .max_attempts
                .map_or_else(RetryPolicy::unlimited, RetryPolicy::with_max_attempts),
            output_dir: self.output_dir.clone(),
        }
    }

    /// Default tracing filter directive for the verbosity flags.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
