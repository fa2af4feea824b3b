//! The receive loop.
//!
//! [`Service::listen`] moves a service through three states:
//!
//! - [`DispatchState::Idle`] - Before the task stream is open.
//! - [`DispatchState::Streaming`] - Receiving. Each invocation is handled and
//!   its result submitted before the next one is read.
//! - [`DispatchState::Terminated`] - The stream failed, ended, or the service
//!   was closed. The cause is what `listen` returns.
//!
//! Failures scoped to a single invocation never leave `Streaming`: an unknown
//! task key is logged and dropped, and a failed submission is logged and
//! skipped.

use super::Service;
use crate::{
    exchange::{Request, Response},
    task::Task,
    transport::{TaskStream, Transport},
};
use core::convert::Infallible;
use mesg_service_core::{
    Error, Result,
    proto::{ListenTaskRequest, SubmitResultRequest, TaskData},
};
use tokio_stream::StreamExt;

/// Where a service is in its dispatch lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Streaming,
    Terminated,
}

impl<T: Transport> Service<T> {
    /// Registers `tasks`, then serves invocations until the task stream
    /// terminates.
    ///
    /// This future only completes on failure, so it returns the error that
    /// stopped it rather than a `Result`:
    ///
    /// - A registration error if `tasks` is empty or tasks were already set.
    ///   The loop never starts.
    /// - [`Error::ClosedConnection`] when the daemon ends the stream or
    ///   [`Service::close`] is called.
    /// - Any other receive error reported by the transport.
    pub async fn listen<I>(&self, tasks: I) -> Error
    where
        I: IntoIterator<Item = Task>,
    {
        if let Err(err) = self.register(tasks) {
            return err;
        }
        self.run().await
    }

    /// Serves the tasks registered through [`Service::register`].
    ///
    /// Same termination semantics as [`Service::listen`]. Fails with
    /// [`Error::NoTasks`] if nothing was registered.
    pub async fn run(&self) -> Error {
        let Err(err) = self.serve().await;
        err
    }

    async fn serve(&self) -> Result<Infallible> {
        self.validate_tasks()?;
        self.listen_tasks().await
    }

    // Task shapes are not declared yet, so there is nothing to check beyond
    // the registry being populated.
    fn validate_tasks(&self) -> Result<()> {
        if self.registry.is_empty() {
            return Err(Error::NoTasks);
        }
        Ok(())
    }

    async fn listen_tasks(&self) -> Result<Infallible> {
        let request = ListenTaskRequest {
            token: self.token.clone(),
        };
        // The daemon may hold the stream open without answering, so opening
        // it has to yield to close just like receiving does.
        let mut stream = tokio::select! {
            biased;
            () = self.shutdown.cancelled() => return Err(Error::ClosedConnection),
            opened = self.transport.listen_task(request) => opened?,
        };

        self.set_state(DispatchState::Streaming);
        self.log
            .in_scope(|| tracing::info!(tasks = ?self.task_names(), "Listening for tasks"));

        let Err(err) = self.receive(&mut stream).await;

        self.set_state(DispatchState::Terminated);
        self.log
            .in_scope(|| tracing::info!("Stopped listening for tasks: {err}"));
        Err(err)
    }

    async fn receive(&self, stream: &mut TaskStream) -> Result<Infallible> {
        loop {
            let next = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => None,
                next = stream.next() => next,
            };
            let data = next.ok_or(Error::ClosedConnection)??;
            self.execute_task(data).await;
        }
    }

    async fn execute_task(&self, data: TaskData) {
        let Some(task) = self.registry.get(&data.task_key) else {
            self.log.in_scope(|| {
                tracing::warn!(
                    execution_id = %data.execution_id,
                    task_key = %data.task_key,
                    "Dropping invocation of unregistered task"
                );
            });
            return;
        };

        let request = Request::from(data);
        let response = task.handle(&request);

        if let Err(e) = self.submit(&request, &response).await {
            self.log.in_scope(|| {
                tracing::error!(
                    execution_id = %request.execution_id(),
                    task_key = %request.key(),
                    "Failed to submit result: {e}"
                );
            });
        }
    }

    /// Sends `response` as the single output of `request`.
    pub(crate) async fn submit(&self, request: &Request, response: &Response) -> Result<()> {
        let result = SubmitResultRequest {
            execution_id: request.execution_id().to_owned(),
            output_key: response.key().to_owned(),
            output_data: response.encode()?,
        };
        self.call("SubmitResult", self.transport.submit_result(result))
            .await
    }
}
