//! Application startup and session lifecycle

use super::cli::api::{load_config_file, Args, ConfigError, ConfigResult, Settings};
use super::input::{pump, InputSummary};
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::logging::init_logging;
use crate::core::shutdown::ShutdownCoordinator;
use crate::endpoint::api::StandardEndpointFactory;
use crate::relay::api::{ProducerWrapper, RelayError, RelayResult, RelayStatsSnapshot};
use clap::Parser;
use log::{debug, info};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio::task::JoinError;

/// Run the binary: configure, stream stdin through the relay, shut down
///
/// Returns the process exit code.
pub async fn startup() -> i32 {
    let args = Args::parse();
    let use_color = args.use_color(std::io::stderr().is_terminal());

    let settings = match resolve_settings(args).await {
        Ok(settings) => settings,
        Err(e) => {
            // Logging is not initialised yet
            eprintln!("{}", config_error_report(&e));
            return 1;
        }
    };

    if let Err(e) = init_logging(
        settings.log_level.as_deref(),
        settings.log_format.as_deref(),
        settings.log_file.as_ref().and_then(|path| path.to_str()),
        use_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return 1;
    }

    info!("keystream {} starting", crate::core::version::long_version());
    debug!("Settings: {:?}", settings);

    match run_session(settings).await {
        Ok(()) => 0,
        Err(e) => {
            log_error_with_context(&e, "Streaming input to the endpoint");
            1
        }
    }
}

fn config_error_report(error: &ConfigError) -> String {
    match error.user_message() {
        Some(hint) if error.is_user_actionable() => {
            format!("Error: {}\n{}", error, hint)
        }
        _ => format!("Error: {}", error),
    }
}

async fn resolve_settings(mut args: Args) -> ConfigResult<Settings> {
    if let Some(config) = load_config_file(args.config_file.as_deref()).await? {
        args.apply_toml_values(&config)?;
    }
    args.into_settings()
}

async fn run_session(settings: Settings) -> Result<(), RelayError> {
    let factory = StandardEndpointFactory::new(settings.output_dir.clone());
    match factory.output_dir() {
        Some(dir) => info!(
            "Writing input to {}",
            dir.join(&settings.relay.endpoint_name).display()
        ),
        None => info!("No output directory configured; logging input instead"),
    }

    if settings.relay.full_policy.may_suspend() {
        info!("Input pauses while the buffer is full");
    }
    let wrapper = Arc::new(ProducerWrapper::new(settings.relay, factory)?);

    let (coordinator, input_shutdown_rx) = ShutdownCoordinator::new();
    coordinator.listen_for_signals();

    let runner = {
        let wrapper = Arc::clone(&wrapper);
        let mut loop_shutdown_rx = coordinator.subscribe();
        tokio::spawn(async move {
            wrapper
                .run_until(async move {
                    let _ = loop_shutdown_rx.recv().await;
                })
                .await
        })
    };

    info!("Type to stream characters; end with ESC, Ctrl-D or Ctrl-C");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let pumped = pump(stdin, &wrapper, input_shutdown_rx).await;
    if coordinator.is_shutdown_requested() {
        debug!("Input ended by a shutdown signal");
    }

    info!("Waiting for buffered input to be delivered");
    wrapper.shutdown().await?;

    let delivery = join_outcome(runner.await);

    // Relay failures explain a refused pump, so report them first
    delivery?;
    let summary = pumped?;
    report(&summary, &wrapper.statistics());
    Ok(())
}

fn join_outcome(joined: Result<RelayResult<()>, JoinError>) -> RelayResult<()> {
    joined.unwrap_or_else(|e| {
        Err(RelayError::TaskFailed {
            task: "delivery loop",
            reason: e.to_string(),
        })
    })
}

fn report(summary: &InputSummary, stats: &RelayStatsSnapshot) {
    info!(
        "Finished: {} characters read, {} delivered, {} dropped (buffer full), {} failed",
        summary.read, stats.delivered, stats.rejected_full, stats.failed
    );
    if let Ok(json) = serde_json::to_string(stats) {
        debug!("Relay statistics: {}", json);
    }
}
