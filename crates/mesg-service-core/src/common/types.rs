//! # Shared Constants
//!
//! Names and defaults that both the service library and the bootstrap layer
//! of a service binary agree on.
//!
//! ## Output Keys
//!
//! A task invocation is answered with exactly one output. The daemon knows the
//! two outputs below:
//!
//! - [`SUCCESS_OUTPUT_KEY`] - The task completed.
//! - [`ERROR_OUTPUT_KEY`] - The task failed. The payload explains why.
//!
//! ## Environment
//!
//! The core daemon starts services with [`ENDPOINT_ENV`] and [`TOKEN_ENV`] set.
//! Reading them is the job of the service binary, the library only ever sees
//! explicit values.

use core::time::Duration;

/// Output key reported for a successful invocation.
pub const SUCCESS_OUTPUT_KEY: &str = "success";

/// Output key reported for a failed invocation.
pub const ERROR_OUTPUT_KEY: &str = "error";

/// Environment variable holding the daemon's TCP endpoint.
pub const ENDPOINT_ENV: &str = "MESG_ENDPOINT_TCP";

/// Environment variable holding the token which identifies this service.
pub const TOKEN_ENV: &str = "MESG_TOKEN";

/// Budget for dialing the daemon and for each unary call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);
