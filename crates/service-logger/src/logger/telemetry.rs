//! Process-wide log subscriber.
//!
//! Events are filtered by `RUST_LOG` (default `info`) and printed with RFC
//! 3339 local timestamps, source location and thread ids. The same
//! [`Dispatch`] is installed as global default, for the binary's own
//! diagnostics, and handed to the service and the logger so every line ends
//! up on one stream.

use super::config::LogFormat;
use tracing::Dispatch;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
};

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<Dispatch> {
    let dispatch = build_dispatch(format);
    tracing::dispatcher::set_global_default(dispatch.clone())?;
    Ok(dispatch)
}

pub(crate) fn build_dispatch(format: LogFormat) -> Dispatch {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    let layer = fmt::layer()
        .with_thread_ids(true)
        .with_line_number(true)
        .with_target(false)
        .with_timer(ChronoLocal::rfc_3339())
        .with_file(true);

    match format {
        LogFormat::Pretty => Dispatch::new(registry.with(layer.pretty())),
        LogFormat::Compact => Dispatch::new(registry.with(layer.compact())),
        LogFormat::Json => Dispatch::new(registry.with(layer.json())),
    }
}
