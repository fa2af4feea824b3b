#![doc = include_str!("../README.md")]
//!
//! ## Module Overview
//!
//! - [`service`] - The [`Service`] handle: registration, the dispatch loop,
//!   result submission and event emission.
//! - [`task`] - [`Task`] and the [`Handler`] capability.
//! - [`exchange`] - The per-invocation [`Request`] and its [`Response`].
//! - [`transport`] - The [`Transport`] seam and the gRPC [`Connection`].
//! - [`log`] - The injected [`LogSink`].
//! - `servicetest` - In-memory daemon (feature `servicetest`).

pub mod exchange;
pub mod log;
pub mod service;
pub mod task;
pub mod transport;

#[cfg(any(test, feature = "servicetest"))]
pub mod servicetest;

pub use exchange::{Request, Response};
pub use log::LogSink;
pub use mesg_service_core::{Error, Result, hash, proto, types};
pub use service::{DispatchState, Service, ServiceBuilder, ServiceConfig};
pub use task::{Handler, Task};
pub use transport::{Connection, TaskStream, Transport};
