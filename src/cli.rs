use clap::{Parser, Subcommand};

use crate::api::DEFAULT_API_URL;
use crate::stats::StatsOptions;

#[derive(Parser)]
#[command(name = "devto", version, about = "Manage and track your dev.to articles")]
pub struct Cli {
    /// dev.to API key
    #[arg(
        short = 't',
        long = "token",
        env = "DEVTO_TOKEN",
        global = true,
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Repository, as "user/repo" or a git URL (falls back to DEVTO_REPO)
    #[arg(short = 'r', long, global = true)]
    pub repo: Option<String>,

    /// Fallback repository, consulted only when no --repo is given
    #[arg(long = "env-repo", env = "DEVTO_REPO", global = true, hide = true)]
    pub env_repo: Option<String>,

    /// Show debug logs
    #[arg(long, global = true)]
    pub verbose: bool,

    /// dev.to API base URL
    #[arg(
        long,
        env = "DEVTO_API_URL",
        default_value = DEFAULT_API_URL,
        global = true,
        hide = true
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Display stats for your latest published articles
    Stats(StatsArgs),
    /// Show the repository this project resolves to
    Repo(RepoArgs),
}

#[derive(Parser)]
pub struct StatsArgs {
    /// Number of articles to show (default 10)
    #[arg(short = 'n', long)]
    pub number: Option<u32>,

    /// Print raw JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser)]
pub struct RepoArgs {
    /// Only look at package.json in the current directory
    #[arg(long)]
    pub no_parents: bool,

    /// Print {"user": .., "name": ..} instead of the shorthand
    #[arg(long)]
    pub json: bool,
}

impl StatsArgs {
    pub fn options(&self, token: Option<String>) -> StatsOptions {
        StatsOptions {
            number: self.number,
            devto_key: token,
            json: self.json,
        }
    }
}
