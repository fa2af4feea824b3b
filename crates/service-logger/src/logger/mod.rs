//! The `log` service.
//!
//! ## Structure
//!
//! - [`config`] - Flags and environment of the binary.
//! - [`handler`] - The `log` task.
//! - [`telemetry`] - The process log subscriber.

pub mod config;
pub mod handler;
pub mod telemetry;

use anyhow::Context;
use mesg_service::{Connection, Error, LogSink, Result, Service, Transport};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A [`Service`] serving the `log` task on a background tokio task.
pub struct Logger<T = Connection> {
    service: Arc<Service<T>>,
    log: LogSink,
    listener: Option<JoinHandle<Error>>,
}

impl<T: Transport> Logger<T> {
    /// `log` receives the lines written by the `log` task. It is usually the
    /// same sink the service was built with.
    pub fn new(service: Service<T>, log: LogSink) -> Self {
        Self {
            service: Arc::new(service),
            log,
            listener: None,
        }
    }

    pub fn service(&self) -> &Service<T> {
        &self.service
    }

    /// Registers the `log` task and spawns the dispatch loop.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyConfigured`] if the service already has tasks. No loop
    /// is spawned in that case.
    pub fn start(&mut self) -> Result<()> {
        self.service
            .register([handler::log_task(self.log.clone())])?;

        let service = Arc::clone(&self.service);
        self.listener = Some(tokio::spawn(async move { service.run().await }));
        Ok(())
    }

    /// Waits for the dispatch loop to end on its own and returns what stopped
    /// it. Cancel safe: dropping the future leaves the loop running.
    pub async fn wait(&mut self) -> anyhow::Result<Error> {
        let listener = self
            .listener
            .as_mut()
            .context("logger has not been started")?;
        let joined = listener.await;
        self.listener = None;
        joined.context("dispatch loop panicked")
    }

    /// Closes the service and joins the dispatch loop.
    ///
    /// # Errors
    ///
    /// Fails if the loop had already stopped with anything other than a
    /// closed connection, or if it panicked.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.service.close();

        let Some(listener) = self.listener.take() else {
            return Ok(());
        };
        let err = listener.await.context("dispatch loop panicked")?;
        if err.is_closed() {
            Ok(())
        } else {
            Err(err).context("dispatch loop failed before shutdown")
        }
    }
}
