pub mod chart_store;
pub mod commands;
pub mod config;
pub mod console;
pub mod core_state;
pub mod interpreter;
pub mod models;
pub mod speech;
pub mod storage;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Capacity of the finalized-transcript queue.
const TRANSCRIPT_QUEUE: usize = 1;

pub fn run() {
    // Tracing goes to stderr; stdout belongs to the console
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("PerioChart starting v{}", config::APP_VERSION);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start async runtime");
            return;
        }
    };

    runtime.block_on(async {
        let (source, feed, rx) = speech::channel(TRANSCRIPT_QUEUE);
        let state = Arc::new(core_state::CoreState::new(
            Some(config::chart_path()),
            Box::new(source),
        ));

        tokio::spawn(speech::pump_utterances(state.clone(), rx, |outcome| {
            println!("{}", console::format_voice_outcome(&outcome));
        }));

        if let Err(e) = console::run_console(state, Some(feed)).await {
            tracing::error!(error = %e, "Console input failed");
        }
    });

    tracing::info!("PerioChart stopped");
}
