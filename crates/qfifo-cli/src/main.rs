use std::path::Path;
use std::process::ExitCode;

use qfifo_core::{PublishContext, Publisher, PublisherOptions};
use tracing_subscriber::EnvFilter;

const DEFAULT_ITEMS: u64 = 10;

/// Usage: qfifo-cli [options.json] [items]
///
/// Pushes `items` integers into a publisher configured from `options.json`,
/// closes it, and prints the shutdown report.
#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut args = std::env::args().skip(1);
    let options = match args.next() {
        Some(path) => match load_options(Path::new(&path)) {
            Ok(opts) => opts,
            Err(e) => {
                tracing::error!(path = %path, error = %e, "failed to load options");
                return ExitCode::FAILURE;
            }
        },
        None => PublisherOptions::default(),
    };
    let items = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            tracing::error!(error = %e, "item count must be a non-negative integer");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_ITEMS,
    };

    // The sink runs under the queue lock: print, never push back.
    let publisher = match Publisher::builder()
        .options(options)
        .publish_fn(|ctx: PublishContext, value: u64| {
            println!("published #{} ({:?}): {value}", ctx.sequence(), ctx.phase());
        })
        .build()
        .await
    {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "failed to start publisher");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(items, sleep_interval_ms = options.sleep_interval_ms, "pushing");
    for value in 0..items {
        publisher.push(value);
    }

    let report = publisher.close().await;
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(error = %e, "failed to encode shutdown report"),
    }
    ExitCode::SUCCESS
}

fn load_options(path: &Path) -> Result<PublisherOptions, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
