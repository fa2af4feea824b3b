//! gRPC connection to the core daemon.

use super::{TaskStream, Transport};
use core::time::Duration;
use mesg_service_core::{
    Error, Result,
    error::missing,
    proto::{
        EmitEventRequest, ListenTaskRequest, SubmitResultRequest,
        service_client::ServiceClient,
    },
};
use parking_lot::Mutex;
use tokio_stream::StreamExt;
use tonic::transport::{Channel, Endpoint};

/// An open channel to the daemon.
///
/// The channel is plain-text HTTP/2, as the daemon serves services on a
/// private network. Closing drops the channel. Every call made afterwards
/// fails with [`Error::ClosedConnection`].
#[derive(Debug)]
pub struct Connection {
    client: Mutex<Option<ServiceClient<Channel>>>,
}

impl Connection {
    /// Dials `endpoint`, waiting at most `timeout` for the channel to be
    /// ready.
    ///
    /// `token` is not sent at this layer, but an empty one means the service
    /// cannot authenticate any call, so it is rejected before dialing along
    /// with an empty endpoint. There are no retries.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `endpoint` or `token` is empty.
    /// - [`Error::Transport`] if the endpoint is invalid or refuses the
    ///   connection.
    /// - [`Error::Timeout`] if the channel is not ready within `timeout`.
    pub async fn connect(endpoint: &str, token: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Self::endpoint(endpoint, token)?.connect_timeout(timeout);
        let channel = tokio::time::timeout(timeout, endpoint.connect())
            .await
            .map_err(|_| Error::Timeout {
                operation: "Connect",
                timeout,
            })??;
        Ok(Self::from_channel(channel))
    }

    /// Builds a connection that dials on first use instead of up front.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `endpoint` or `token` is empty.
    /// - [`Error::Transport`] if the endpoint is invalid.
    pub fn connect_lazy(endpoint: &str, token: &str) -> Result<Self> {
        let endpoint = Self::endpoint(endpoint, token)?;
        Ok(Self::from_channel(endpoint.connect_lazy()))
    }

    fn from_channel(channel: Channel) -> Self {
        Self {
            client: Mutex::new(Some(ServiceClient::new(channel))),
        }
    }

    fn endpoint(endpoint: &str, token: &str) -> Result<Endpoint> {
        if endpoint.is_empty() {
            return Err(missing("endpoint"));
        }
        if token.is_empty() {
            return Err(missing("token"));
        }
        Ok(Endpoint::from_shared(endpoint_uri(endpoint))?)
    }

    /// Whether [`Transport::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.client.lock().is_none()
    }

    // The generated client needs `&mut self` per call, clones share the
    // underlying channel.
    fn client(&self) -> Result<ServiceClient<Channel>> {
        self.client.lock().clone().ok_or(Error::ClosedConnection)
    }
}

impl Transport for Connection {
    async fn listen_task(&self, request: ListenTaskRequest) -> Result<TaskStream> {
        let mut client = self.client()?;
        let stream = client.listen_task(request).await?.into_inner();
        Ok(Box::pin(stream.map(|item| item.map_err(Error::from))))
    }

    async fn submit_result(&self, request: SubmitResultRequest) -> Result<()> {
        let mut client = self.client()?;
        client.submit_result(request).await?;
        Ok(())
    }

    async fn emit_event(&self, request: EmitEventRequest) -> Result<()> {
        let mut client = self.client()?;
        client.emit_event(request).await?;
        Ok(())
    }

    fn close(&self) {
        self.client.lock().take();
    }
}

/// Addresses handed out by the daemon are `host:port`. Tonic needs a URI.
fn endpoint_uri(address: &str) -> String {
    if address.contains("://") {
        address.to_owned()
    } else {
        format!("http://{address}")
    }
}
