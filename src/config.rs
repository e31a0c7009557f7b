//! Command-line and environment configuration.
//!
//! Every flag can also be set through a `BLOGSCROLL_*` environment variable,
//! and a `.env` file in the working directory is loaded first.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "blogscroll")]
#[command(about = "Infinitely scrolling blog feed for the terminal", long_about = None)]
#[command(version)]
pub struct Config {
    /// Base URL of the blog API.
    #[arg(long, env = "BLOGSCROLL_API_URL", default_value = "http://localhost:3000/api")]
    pub api_url: String,

    /// Category to open on start.  `all` shows recommendations when signed in.
    #[arg(short, long, env = "BLOGSCROLL_CATEGORY", default_value = "all")]
    pub category: String,

    /// Categories reachable with ←/→, comma separated.
    #[arg(
        long,
        env = "BLOGSCROLL_CATEGORIES",
        value_delimiter = ',',
        default_value = "tech,travel,food,lifestyle"
    )]
    pub categories: Vec<String>,

    /// Read as this user (enables recommendations on `all`).
    #[arg(short, long, env = "BLOGSCROLL_USER_ID")]
    pub user_id: Option<String>,

    /// Per-request HTTP timeout, in seconds.
    #[arg(long, env = "BLOGSCROLL_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Where diagnostics are written; the terminal belongs to the UI.
    #[arg(long, env = "BLOGSCROLL_LOG_FILE", default_value = "blogscroll.log")]
    pub log_file: PathBuf,
}

impl Config {
    /// Load `.env` (if present), then parse the process arguments.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
