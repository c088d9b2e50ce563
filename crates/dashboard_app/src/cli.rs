use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use dashboard_core::{CrawlStatus, ResultId, ResultQuery, SortOrder};

/// Crawl dashboard: submit URLs and follow their crawl results from the terminal.
#[derive(Parser, Debug)]
#[command(name = "crawl-dashboard", version, long_about = None)]
pub struct Args {
    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File, global = true)]
    pub log: LogTarget,

    /// Log file used by `--log file` and `--log both`
    #[arg(long, default_value = "./dashboard.log", global = true)]
    pub log_file: PathBuf,

    /// Include debug output in the log
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL, overrides DASHBOARD_API_BASE_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one page of results
    List(PageArgs),
    /// Print results and keep polling while any crawl is pending or running
    Watch(PageArgs),
    /// Submit a URL for crawling, then follow it until it settles
    Submit {
        url: String,
        /// Return right after the submission is acknowledged
        #[arg(long)]
        no_watch: bool,
    },
    /// Print metadata, links and headings of one result
    Details { id: ResultId },
    /// Crawl the given URLs again
    Rerun { urls: Vec<String> },
    /// Delete the results of the given URLs
    Delete { urls: Vec<String> },
    /// Stop a pending or running crawl
    Stop { id: ResultId },
}

#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Filter by URL or title
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_parser = parse_status)]
    pub status: Option<CrawlStatus>,

    #[arg(long, default_value = "created_at")]
    pub sort_by: String,

    /// Oldest first
    #[arg(long)]
    pub asc: bool,
}

impl PageArgs {
    pub fn query(&self, page_size: u32) -> ResultQuery {
        let order = if self.asc {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        };
        let mut query = ResultQuery::with_page_size(page_size)
            .page(self.page)
            .sorted_by(self.sort_by.clone(), order);
        if let Some(search) = &self.search {
            query = query.search(search.as_str());
        }
        if let Some(status) = self.status {
            query = query.status(status);
        }
        query
    }
}

fn parse_status(raw: &str) -> Result<CrawlStatus, String> {
    CrawlStatus::ALL
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| {
            let known: Vec<&str> = CrawlStatus::ALL.iter().map(|s| s.as_str()).collect();
            format!("unknown status {raw:?}, expected one of {}", known.join(", "))
        })
}
