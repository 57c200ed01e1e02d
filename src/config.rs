use std::time::Duration;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::rank::{Analysis, TOP_N};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1 << 20;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Most used words of a text, over HTTP or from the command line
#[derive(Parser, Debug)]
#[command(name = "topwords", about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, env = "TOPWORDS_LOG", default_value_t = LevelFilter::Info, global = true)]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the most-used-words endpoint
    Serve(ServeArgs),
    /// Print the most used words of a text
    Count {
        /// Text to analyze (or use stdin)
        text: Option<String>,

        /// Show top N words
        #[arg(short = 'n', long, default_value_t = TOP_N)]
        top: usize,

        /// Split on single spaces and keep superseded counts
        #[arg(long)]
        compat: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on (0 lets the OS pick one)
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Worker threads handling connections
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Largest accepted request body
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Seconds to wait for a slow client, 0 waits forever
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_SECS)]
    pub read_timeout_secs: u64,

    /// Split on single spaces and keep superseded counts
    #[arg(long)]
    pub compat: bool,
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_body_bytes: usize,
    pub read_timeout: Option<Duration>,
    pub analysis: Analysis,
}

impl ServeConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        ServeConfig {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            read_timeout: Some(Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS)),
            analysis: Analysis::default(),
        }
    }
}

impl From<&ServeArgs> for ServeConfig {
    fn from(args: &ServeArgs) -> Self {
        ServeConfig {
            host: args.host.clone(),
            port: args.port,
            workers: args.workers,
            max_body_bytes: args.max_body_bytes,
            read_timeout: match args.read_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            analysis: analysis(args.compat),
        }
    }
}

pub fn analysis(compat: bool) -> Analysis {
    if compat {
        Analysis::compat()
    } else {
        Analysis::default()
    }
}
