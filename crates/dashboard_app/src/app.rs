use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;

use dashboard_client::{
    DashboardConfig, DetailFetcher, HttpResultsProvider, ResultsProvider, ResultsSynchronizer,
};
use dashboard_core::{ResultQuery, SyncView};
use dashboard_logging::{dash_info, dash_warn};

use crate::cli::{Args, Command};
use crate::render;

pub async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = DashboardConfig::from_env();
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    dash_info!(
        "backend={} poll_interval_ms={} page_size={}",
        config.api_base_url,
        config.poll_interval.as_millis(),
        config.page_size
    );

    let provider: Arc<dyn ResultsProvider> = Arc::new(
        HttpResultsProvider::new(&config).context("could not set up the backend client")?,
    );

    match args.command {
        Command::List(page) => {
            let sync = ResultsSynchronizer::new(provider, config.sync_settings());
            let outcome = sync.refresh(page.query(config.page_size)).await;
            sync.shutdown();
            outcome.context("failed to load results")?;
            print!("{}", render::results(&sync.snapshot()));
        }
        Command::Watch(page) => {
            let sync = ResultsSynchronizer::new(provider, config.sync_settings());
            watch_results(&sync, page.query(config.page_size)).await?;
        }
        Command::Submit { url, no_watch } => {
            let sync = ResultsSynchronizer::new(provider, config.sync_settings());
            let outcome = sync.submit_url(&url).await;
            print_notice(&sync);
            let ack = outcome.context("submission failed")?;
            if let Some(created) = ack.data {
                println!("created result #{} for {}", created.id, created.url);
            }
            if no_watch {
                sync.shutdown();
            } else {
                follow(&sync).await;
            }
        }
        Command::Details { id } => {
            let fetcher = DetailFetcher::new(provider);
            fetcher.open(id).await;
            let view = fetcher.view();
            if let (None, Some(diagnostic)) = (&view.meta, &view.diagnostic) {
                anyhow::bail!("result #{id}: {diagnostic}");
            }
            print!("{}", render::details(&view));
        }
        Command::Rerun { urls } => {
            let sync = ResultsSynchronizer::new(provider, config.sync_settings());
            let outcome = sync.rerun_urls(&urls).await;
            print_notice(&sync);
            outcome.context("rerun failed")?;
            follow(&sync).await;
        }
        Command::Delete { urls } => {
            let sync = ResultsSynchronizer::new(provider, config.sync_settings());
            let outcome = sync.delete_urls(&urls).await;
            sync.shutdown();
            print_notice(&sync);
            outcome.context("delete failed")?;
        }
        Command::Stop { id } => {
            let sync = ResultsSynchronizer::new(provider, config.sync_settings());
            let outcome = sync.stop_crawl(id).await;
            sync.shutdown();
            print_notice(&sync);
            outcome.context("stop failed")?;
        }
    }
    Ok(())
}

fn print_notice(sync: &ResultsSynchronizer) {
    if let Some(notice) = sync.snapshot().notice {
        println!("{}", render::notice(&notice));
    }
}

async fn watch_results(sync: &ResultsSynchronizer, query: ResultQuery) -> anyhow::Result<()> {
    if let Err(err) = sync.refresh(query).await {
        sync.shutdown();
        return Err(err).context("failed to load results");
    }
    follow(sync).await;
    Ok(())
}

/// Print the current page, then reprint on every change until polling stops
/// on its own or the user interrupts.
async fn follow(sync: &ResultsSynchronizer) {
    let mut views = sync.subscribe();
    let mut shown = views.borrow_and_update().clone();
    print!("{}", render::results(&shown));

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    while shown.is_polling {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = latest(&mut views);
                if worth_printing(&shown, &view) {
                    println!();
                    print!("{}", render::results(&view));
                }
                shown = view;
            }
            result = &mut interrupted => {
                if let Err(err) = result {
                    dash_warn!("could not listen for ctrl-c: {}", err);
                }
                dash_info!("interrupted while watching");
                break;
            }
        }
    }
    sync.shutdown();
}

fn latest(views: &mut watch::Receiver<SyncView>) -> SyncView {
    views.borrow_and_update().clone()
}

fn worth_printing(shown: &SyncView, next: &SyncView) -> bool {
    shown.page != next.page || shown.last_error != next.last_error
}
