//! Explicit log destination for a service.
//!
//! A service never logs through the process-global subscriber. It owns a
//! [`LogSink`] handed to it at construction and enters that sink's dispatcher
//! only for the duration of each log call.

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

/// A cloneable handle to the subscriber that receives a service's log events.
#[derive(Clone, Debug)]
pub struct LogSink {
    dispatch: Dispatch,
}

impl LogSink {
    /// Wraps an existing dispatcher, e.g. the one a binary built for its own
    /// diagnostics.
    pub const fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }

    /// Plain-text events written to standard output.
    pub fn stdout() -> Self {
        Self::writer(std::io::stdout)
    }

    /// Plain-text events written to `make_writer`.
    pub fn writer<W>(make_writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_ansi(false)
            .finish();
        Self::new(Dispatch::new(subscriber))
    }

    /// Runs `f` with this sink as the current default dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    pub const fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl From<Dispatch> for LogSink {
    fn from(dispatch: Dispatch) -> Self {
        Self::new(dispatch)
    }
}
