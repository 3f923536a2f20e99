use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::io::Write;
use std::process::ExitCode;

use crate::api::ArticleSource;
use crate::scale::scale_number;
use crate::table::Table;
use crate::terminal::Terminal;

pub const DEFAULT_ARTICLE_COUNT: u32 = 10;

/// Columns budgeted for everything except the title (date, counters, borders).
const OTHER_COLUMNS_WIDTH: usize = 42;
const MIN_TITLE_WIDTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleStat {
    pub date: DateTime<Utc>,
    pub title: String,
    pub views: u64,
    pub reactions: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, Default)]
pub struct StatsOptions {
    pub number: Option<u32>,
    pub devto_key: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            // -1 as seen by the shell
            Status::Failure => ExitCode::from(255),
        }
    }
}

/// Fetch the latest articles and print them as a table, or JSON with `json`.
/// Errors are printed, never returned.
pub async fn show_stats<S, O, E>(
    source: &S,
    options: &StatsOptions,
    term: &mut Terminal<O, E>,
) -> Status
where
    S: ArticleSource,
    O: Write,
    E: Write,
{
    let number = options.number.unwrap_or(DEFAULT_ARTICLE_COUNT);
    log::debug!(
        "stats options: number={number} json={} key={}",
        options.json,
        if options.devto_key.is_some() { "set" } else { "unset" }
    );

    let Some(key) = options.devto_key.as_deref().filter(|k| !k.is_empty()) else {
        term.error(
            "No dev.to API key provided.\n\
             Use --token option or DEVTO_TOKEN environment variable to provide one.",
        );
        return Status::Failure;
    };

    term.start_spinner("Retrieving articles from dev.to…");
    let result = source.last_articles_stats(key, number).await;
    term.stop_spinner();

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            term.error(&format!("Error while showing stats: {e:#}"));
            return Status::Failure;
        }
    };

    if stats.is_empty() {
        term.info("No published articles found.");
        return Status::Success;
    }

    if options.json {
        return match serde_json::to_string_pretty(&stats) {
            Ok(json) => {
                term.info(&json);
                Status::Success
            }
            Err(e) => {
                term.error(&format!("Error while showing stats: {e}"));
                Status::Failure
            }
        };
    }

    let table = build_table(&stats, title_width(term.width));
    term.info(table.render().trim_end());
    Status::Success
}

/// Width left for the title column on a terminal `available` columns wide.
pub fn title_width(available: usize) -> usize {
    available
        .saturating_sub(OTHER_COLUMNS_WIDTH)
        .max(MIN_TITLE_WIDTH)
}

pub fn build_table(stats: &[ArticleStat], title_width: usize) -> Table {
    let mut table =
        Table::new(["Date", "Title", "Views", "Likes", "Comm."]).fixed_width(1, title_width);
    for a in stats {
        table.push_row([
            format_date(a.date),
            a.title.clone(),
            scale_number(a.views),
            scale_number(a.reactions),
            scale_number(a.comments),
        ]);
    }
    table
}

/// Short local date, `M/D/YYYY`.
fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
}
