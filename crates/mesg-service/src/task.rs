//! Named task handlers.

use crate::exchange::{Request, Response};
use core::fmt;
use std::sync::Arc;

/// The capability of answering a task invocation.
///
/// Handlers run synchronously on the dispatch loop, one invocation at a time.
/// Any `Fn(&Request) -> Response` that is `Send + Sync` is a handler.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: &Request) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&Request) -> Response + Send + Sync + 'static,
{
    fn handle(&self, request: &Request) -> Response {
        self(request)
    }
}

/// An immutable pairing of a task name with its handler.
///
/// Cloning a task shares the handler.
#[derive(Clone)]
pub struct Task {
    name: String,
    handler: Arc<dyn Handler>,
}

impl Task {
    /// Creates a task that runs `handler` when an invocation for `name`
    /// arrives.
    pub fn new(name: impl Into<String>, handler: impl Handler) -> Self {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
        }
    }

    /// Like [`Task::new`], but guides closure type inference.
    pub fn from_fn<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        Self::new(name, handler)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn handle(&self, request: &Request) -> Response {
        self.handler.handle(request)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
