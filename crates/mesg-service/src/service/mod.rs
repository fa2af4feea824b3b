//! The process-wide service handle.
//!
//! A [`Service`] owns its transport, its task registry and its log sink. It is
//! shared by reference (typically behind an `Arc`) between the task running
//! the dispatch loop and whoever eventually calls [`Service::close`].
//!
//! ## Structure
//!
//! - [`builder`] - [`ServiceConfig`] and the ordered [`ServiceBuilder`].
//! - `registry` - The write-once task table.
//! - `dispatch` - [`Service::listen`] and the receive loop.

pub mod builder;
mod dispatch;
mod registry;

pub use builder::{ServiceBuilder, ServiceConfig};
pub use dispatch::DispatchState;

use crate::{log::LogSink, task::Task, transport::Connection, transport::Transport};
use core::{fmt, time::Duration};
use mesg_service_core::{Error, Result, proto::EmitEventRequest};
use parking_lot::Mutex;
use registry::TaskRegistry;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// A MESG service: a set of tasks served to the core daemon.
pub struct Service<T = Connection> {
    token: String,
    call_timeout: Duration,
    transport: T,
    registry: TaskRegistry,
    state: Mutex<DispatchState>,
    shutdown: CancellationToken,
    log: LogSink,
}

impl<T> fmt::Debug for Service<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("call_timeout", &self.call_timeout)
            .field("tasks", &self.registry.names())
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Starts the configuration of a service backed by a gRPC [`Connection`].
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::new()
    }
}

impl<T: Transport> Service<T> {
    pub(crate) fn from_parts(config: ServiceConfig, transport: T, log: LogSink) -> Self {
        Self {
            token: config.token,
            call_timeout: config.call_timeout,
            transport,
            registry: TaskRegistry::default(),
            state: Mutex::new(DispatchState::Idle),
            shutdown: CancellationToken::new(),
            log,
        }
    }

    /// Registers `tasks`. Only the first successful call has an effect.
    ///
    /// Duplicate names within `tasks` overwrite each other, the last one wins.
    ///
    /// # Errors
    ///
    /// - [`Error::NoTasks`] if `tasks` is empty.
    /// - [`Error::AlreadyConfigured`] if tasks were registered before. The
    ///   existing registry is left untouched.
    pub fn register<I>(&self, tasks: I) -> Result<()>
    where
        I: IntoIterator<Item = Task>,
    {
        self.registry.register(tasks.into_iter().collect())
    }

    /// Names of the registered tasks, sorted.
    pub fn task_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn state(&self) -> DispatchState {
        *self.state.lock()
    }

    /// Publishes `event` with `data` serialized as JSON.
    ///
    /// Independent of task dispatch. No retry.
    ///
    /// # Errors
    ///
    /// [`Error::Encode`] if `data` cannot be serialized, otherwise whatever
    /// the call itself failed with, including [`Error::Timeout`].
    pub async fn emit<D>(&self, event: &str, data: &D) -> Result<()>
    where
        D: Serialize + ?Sized,
    {
        let event_data = serde_json::to_string(data).map_err(Error::Encode)?;
        let request = EmitEventRequest {
            token: self.token.clone(),
            event_key: event.to_owned(),
            event_data,
        };
        self.call("EmitEvent", self.transport.emit_event(request))
            .await
    }

    /// Stops the dispatch loop and releases the connection.
    ///
    /// An in-flight receive is abandoned and [`Service::listen`] returns
    /// [`Error::ClosedConnection`]. Safe to call more than once, and before
    /// the loop ever started.
    pub fn close(&self) {
        self.shutdown.cancel();
        self.transport.close();
    }

    pub const fn log(&self) -> &LogSink {
        &self.log
    }

    /// Bounds an outbound call by the configured call timeout.
    async fn call<F>(&self, operation: &'static str, call: F) -> Result<()>
    where
        F: Future<Output = Result<()>>,
    {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .map_err(|_| Error::Timeout {
                operation,
                timeout: self.call_timeout,
            })?
    }

    fn set_state(&self, state: DispatchState) {
        *self.state.lock() = state;
    }
}
