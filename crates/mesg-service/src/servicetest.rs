//! In-memory stand-in for the core daemon.
//!
//! [`pair`] returns a [`Client`], which a [`Service`](crate::Service) uses as
//! its transport, and the daemon-side [`Server`] that feeds it task
//! invocations and captures everything the service sends back.
//!
//! ```
//! use mesg_service::{Request, Response, Service, Task, servicetest};
//!
//! fn ok(_: &Request) -> Response {
//!     Response::Success(serde_json::Value::Null)
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (client, mut server) = servicetest::pair();
//! let service = Service::builder().with_transport(client);
//!
//! server.send_task("e1", "ok", "{}").await.unwrap();
//! server.close_tasks();
//!
//! let err = service.listen([Task::new("ok", ok)]).await;
//! assert!(err.is_closed());
//! assert_eq!(server.try_next_submit().unwrap().execution_id, "e1");
//! # }
//! ```

use crate::{
    log::LogSink,
    transport::{TaskStream, Transport},
};
use mesg_service_core::{
    Error, Result,
    proto::{EmitEventRequest, ListenTaskRequest, SubmitResultRequest, TaskData},
};
use parking_lot::Mutex;
use std::{io, sync::Arc};
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};
use tracing_subscriber::fmt::MakeWriter;

/// Capacity of each simulated channel created by [`pair`].
pub const BUFFER_SIZE: usize = 64;

/// Creates a connected client/daemon pair with [`BUFFER_SIZE`] buffering.
pub fn pair() -> (Client, Server) {
    with_capacity(BUFFER_SIZE)
}

/// Creates a connected client/daemon pair whose channels each hold
/// `capacity` messages. Once a capture channel is full, calls from the
/// service block until the test drains it.
pub fn with_capacity(capacity: usize) -> (Client, Server) {
    let (task_tx, task_rx) = mpsc::channel(capacity);
    let (submit_tx, submit_rx) = mpsc::channel(capacity);
    let (emit_tx, emit_rx) = mpsc::channel(capacity);
    let listen = Arc::new(Mutex::new(None));

    let client = Client {
        tasks: Mutex::new(Some(task_rx)),
        submits: submit_tx,
        emits: emit_tx,
        listen: Arc::clone(&listen),
    };
    let server = Server {
        tasks: Some(task_tx),
        submits: submit_rx,
        emits: emit_rx,
        listen,
    };
    (client, server)
}

/// Service side of the simulated connection.
#[derive(Debug)]
pub struct Client {
    tasks: Mutex<Option<mpsc::Receiver<TaskData>>>,
    submits: mpsc::Sender<SubmitResultRequest>,
    emits: mpsc::Sender<EmitEventRequest>,
    listen: Arc<Mutex<Option<ListenTaskRequest>>>,
}

impl Transport for Client {
    /// Hands out the inbound task stream. There is a single stream per pair.
    async fn listen_task(&self, request: ListenTaskRequest) -> Result<TaskStream> {
        let rx = self.tasks.lock().take().ok_or_else(|| Error::ChannelError {
            context: "task stream already taken".to_owned(),
        })?;
        *self.listen.lock() = Some(request);
        Ok(Box::pin(ReceiverStream::new(rx).map(Ok::<_, Error>)))
    }

    async fn submit_result(&self, request: SubmitResultRequest) -> Result<()> {
        self.submits
            .send(request)
            .await
            .map_err(|e| Error::ChannelError {
                context: format!("Failed to submit result: {e}"),
            })
    }

    async fn emit_event(&self, request: EmitEventRequest) -> Result<()> {
        self.emits.send(request).await.map_err(|e| Error::ChannelError {
            context: format!("Failed to emit event: {e}"),
        })
    }
}

/// Daemon side of the simulated connection.
#[derive(Debug)]
pub struct Server {
    tasks: Option<mpsc::Sender<TaskData>>,
    submits: mpsc::Receiver<SubmitResultRequest>,
    emits: mpsc::Receiver<EmitEventRequest>,
    listen: Arc<Mutex<Option<ListenTaskRequest>>>,
}

impl Server {
    /// Queues one task invocation for the service.
    ///
    /// # Errors
    ///
    /// [`Error::ClosedConnection`] after [`Server::close_tasks`], and
    /// [`Error::ChannelError`] once the client is gone.
    pub async fn send_task(
        &self,
        execution_id: impl Into<String>,
        task_key: impl Into<String>,
        input_data: impl Into<String>,
    ) -> Result<()> {
        let tasks = self.tasks.as_ref().ok_or(Error::ClosedConnection)?;
        let data = TaskData {
            execution_id: execution_id.into(),
            task_key: task_key.into(),
            input_data: input_data.into(),
        };
        tasks.send(data).await.map_err(|e| Error::ChannelError {
            context: format!("Failed to send task: {e}"),
        })
    }

    /// Ends the task stream. Invocations already queued are still delivered,
    /// after which the service's receive fails with
    /// [`Error::ClosedConnection`].
    pub fn close_tasks(&mut self) {
        self.tasks = None;
    }

    /// Makes every further `SubmitResult` call from the service fail.
    /// Results captured so far stay readable.
    pub fn close_submits(&mut self) {
        self.submits.close();
    }

    pub async fn next_submit(&mut self) -> Option<SubmitResultRequest> {
        self.submits.recv().await
    }

    pub fn try_next_submit(&mut self) -> Option<SubmitResultRequest> {
        self.submits.try_recv().ok()
    }

    pub async fn next_emit(&mut self) -> Option<EmitEventRequest> {
        self.emits.recv().await
    }

    pub fn try_next_emit(&mut self) -> Option<EmitEventRequest> {
        self.emits.try_recv().ok()
    }

    /// The request the service opened its task stream with, if it did.
    pub fn listen_request(&self) -> Option<ListenTaskRequest> {
        self.listen.lock().clone()
    }
}

/// Log destination that keeps everything written to it in memory.
#[derive(Clone, Debug, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// A sink writing into this capture.
    pub fn sink(&self) -> LogSink {
        LogSink::writer(self.clone())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
