#![doc = include_str!("../README.md")]

mod logger;

use anyhow::Context;
use clap::Parser;
use logger::Logger;
use logger::config::{CliArgs, LoggerConfig};
use logger::telemetry::init_telemetry;
use mesg_service::{LogSink, Service};
use tokio::signal;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = LoggerConfig::try_from(args)?;

    let log = LogSink::new(init_telemetry(config.log_format)?);

    let result = run(config, log).await;
    if let Err(err) = &result {
        tracing::error!("service-logger stopped: {err:#}");
    }
    result
}

async fn run(config: LoggerConfig, log: LogSink) -> anyhow::Result<()> {
    log_startup_info(&config);

    let service = Service::builder()
        .config(config.service)
        .log_sink(log.clone())
        .connect()
        .await
        .context("failed to connect to the core daemon")?;

    let mut logger = Logger::new(service, log);
    logger.start().context("failed to register tasks")?;
    tracing::info!("Serving tasks {:?}", logger.service().task_names());

    let stopped = tokio::select! {
        () = shutdown_signal() => None,
        stopped = logger.wait() => Some(stopped),
    };

    match stopped {
        None => {
            tracing::info!("Shutdown signal received, terminating gracefully...");
            logger.close().await?;
            tracing::info!("Service shut down successfully");
            Ok(())
        }
        Some(stopped) => Err(anyhow::Error::new(stopped?).context("dispatch loop terminated")),
    }
}

fn log_startup_info(config: &LoggerConfig) {
    tracing::info!(
        "Starting service-logger against {} (call timeout {:?})",
        config.service.endpoint,
        config.service.call_timeout
    );
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }
}
