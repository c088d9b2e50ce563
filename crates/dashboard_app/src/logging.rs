//! Logger setup for the CLI.
//!
//! Defaults to `./dashboard.log` so log lines do not interleave with the
//! result tables printed on stdout.

use log::LevelFilter;

use dashboard_logging::LogDestination;

use crate::cli::{Args, LogTarget};

pub fn initialize(args: &Args) {
    let destination = match args.log {
        LogTarget::File => LogDestination::File,
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::Both => LogDestination::Both,
    };
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    dashboard_logging::initialize(destination, level, &args.log_file);
}
