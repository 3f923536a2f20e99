use clap::Parser;
use std::process::ExitCode;

use devto::api::DevtoClient;
use devto::cli::{Cli, Command, RepoArgs, StatsArgs};
use devto::git::GitCli;
use devto::repo::RepositoryResolver;
use devto::stats::{self, Status};
use devto::terminal::Terminal;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

async fn run_stats(
    args: &StatsArgs,
    token: Option<String>,
    api_url: &str,
    verbose: bool,
) -> Status {
    let mut term = Terminal::stdio(verbose);

    let client = match DevtoClient::new(api_url) {
        Ok(client) => client,
        Err(e) => {
            term.error(&format!("Error while showing stats: {e:#}"));
            return Status::Failure;
        }
    };

    stats::show_stats(&client, &args.options(token), &mut term).await
}

async fn run_repo(
    args: &RepoArgs,
    explicit: Option<&str>,
    env_repo: Option<String>,
    verbose: bool,
) -> Status {
    let mut term = Terminal::stdio(verbose);

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            term.error(&format!("Cannot read current directory: {e}"));
            return Status::Failure;
        }
    };

    let resolver = RepositoryResolver::new(cwd.clone(), env_repo, GitCli::from_env(cwd));

    let Some(repo) = resolver.resolve(explicit, !args.no_parents).await else {
        term.error(
            "No repository found.\n\
             Use --repo option or DEVTO_REPO environment variable to provide one.",
        );
        return Status::Failure;
    };

    if args.json {
        match serde_json::to_string(&repo) {
            Ok(json) => term.info(&json),
            Err(e) => {
                term.error(&format!("Cannot serialize repository: {e}"));
                return Status::Failure;
            }
        }
    } else {
        term.info(&repo.to_string());
    }
    Status::Success
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let Cli {
        token,
        repo,
        env_repo,
        verbose,
        api_url,
        command,
    } = Cli::parse();
    init_logging(verbose);

    let status = match command {
        Command::Stats(args) => run_stats(&args, token, &api_url, verbose).await,
        Command::Repo(args) => run_repo(&args, repo.as_deref(), env_repo, verbose).await,
    };

    status.into()
}
