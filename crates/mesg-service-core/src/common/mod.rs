pub mod error;
pub mod types;

pub use error::{Error, Result};

/// gRPC message and client definitions generated from `proto/api.proto`.
///
/// ## Service
///
/// - `ListenTask` - Server-streamed task invocations for one service token.
/// - `SubmitResult` - Reports the output of one invocation.
/// - `EmitEvent` - Publishes a domain event.
///
/// Every `*_data` field carries JSON text. The schema is owned by the task or
/// event, this layer treats it as opaque.
pub mod proto {
    tonic::include_proto!("api");
}
