mod app;
mod cli;
mod logging;
mod render;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    let _ = dotenvy::dotenv();
    let args = cli::Args::parse();
    logging::initialize(&args);
    app::run(args).await
}
