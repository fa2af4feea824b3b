//! The seam between a [`Service`](crate::Service) and the core daemon.
//!
//! ## Structure
//!
//! - [`Transport`] - The three RPCs a service consumes, plus teardown.
//! - [`connection`] - gRPC implementation over a tonic [`Channel`].
//!
//! The `servicetest` module provides an in-memory implementation for tests.
//!
//! [`Channel`]: tonic::transport::Channel

pub mod connection;

pub use connection::Connection;

use core::pin::Pin;
use futures::Stream;
use mesg_service_core::{
    Result,
    proto::{EmitEventRequest, ListenTaskRequest, SubmitResultRequest, TaskData},
};

/// Inbound task invocations. The stream ending means the daemon closed it.
pub type TaskStream = Pin<Box<dyn Stream<Item = Result<TaskData>> + Send>>;

/// RPC surface of the core daemon as seen by a service.
pub trait Transport: Send + Sync + 'static {
    /// Opens the server-streamed sequence of task invocations.
    fn listen_task(
        &self,
        request: ListenTaskRequest,
    ) -> impl Future<Output = Result<TaskStream>> + Send;

    /// Reports the output of one invocation. The reply carries no data.
    fn submit_result(
        &self,
        request: SubmitResultRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Publishes a domain event. The reply carries no data.
    fn emit_event(&self, request: EmitEventRequest) -> impl Future<Output = Result<()>> + Send;

    /// Releases the underlying connection. Must be safe to call more than
    /// once.
    fn close(&self) {}
}
