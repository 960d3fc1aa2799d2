//! Main entry point for the vimeo-scope CLI

use clap::Parser;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vimeo_scope::cli::{Args, OutputFormatter, VerbosityLevel};
use vimeo_scope::core::{CollectingReply, Query, RESULTS_CATEGORY};
use vimeo_scope::platform::{AccountProvider, ApiClient, EnvAccounts, FileAccounts};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbosity_level())?;
    debug!("Starting vimeo-scope with args: {:?}", args);

    let mut formatter = OutputFormatter::new(args.verbosity_level());

    let accounts: Arc<dyn AccountProvider> = match &args.accounts_file {
        Some(path) => Arc::new(FileAccounts::new(path)),
        None => Arc::new(EnvAccounts),
    };

    let client = Arc::new(ApiClient::new(args.client_options(), accounts)?);
    cancel_on_ctrl_c(client.clone());

    let query = Query::new(args.canned_query(), client.clone());
    let mut reply = match args.result_limit() {
        Some(limit) => CollectingReply::with_limit(limit),
        None => CollectingReply::new(),
    };

    let canned = query.canned_query();
    if canned.query_string.trim().is_empty() {
        formatter.info(&format!("Browsing department {:?}", canned.department_id));
    } else {
        formatter.info(&format!("Searching for {:?}", canned.query_string.trim()));
    }

    let start_time = Instant::now();
    formatter.start_spinner("Querying Vimeo...");
    let outcome = query.run(&mut reply);
    formatter.finish_spinner();

    // Partial output is still shown when the query fails
    formatter.print_reply(&reply)?;
    client.shutdown();

    if let Err(e) = outcome {
        formatter.error(&e.to_string());
        return Err(e.into());
    }

    if let Some(limit) = args.result_limit() {
        if reply.results.len() >= limit {
            formatter.warning(&format!("Output limited to {} results", limit));
        }
    }

    let elapsed = Duration::from_millis(start_time.elapsed().as_millis() as u64);
    info!("Query finished with {} results", reply.results.len());
    formatter.success(&format!(
        "{} results in {}",
        reply.results_in(RESULTS_CATEGORY).len(),
        humantime::format_duration(elapsed)
    ));

    Ok(())
}

/// Cancel the client's requests on the first Ctrl-C, exit on the second
fn cancel_on_ctrl_c(client: Arc<ApiClient>) {
    let spawned = thread::Builder::new().name("ctrl-c".to_string()).spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Ctrl-C handler unavailable: {}", e);
                return;
            }
        };

        runtime.block_on(async {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            info!("Interrupted, cancelling requests");
            client.cancel();

            // A request stuck before its first checkpoint does not see the flag
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        });
    });

    if let Err(e) = spawned {
        warn!("Ctrl-C handler unavailable: {}", e);
    }
}

/// Initialize logging system
fn init_logging(verbosity: VerbosityLevel) -> Result<(), Box<dyn std::error::Error>> {
    let default_level = match verbosity {
        VerbosityLevel::Verbose => "debug",
        VerbosityLevel::Normal | VerbosityLevel::Quiet => "warn",
    };
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(true)
                .with_thread_names(true)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
