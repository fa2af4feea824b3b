use super::Service;
use crate::{log::LogSink, transport::Connection, transport::Transport};
use core::time::Duration;
use mesg_service_core::{Result, types::DEFAULT_CALL_TIMEOUT};
use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

/// Connection settings of a service.
///
/// Populated by the bootstrap layer of a service binary, typically from
/// [`ENDPOINT_ENV`] and [`TOKEN_ENV`], and passed in by value.
///
/// [`ENDPOINT_ENV`]: mesg_service_core::types::ENDPOINT_ENV
/// [`TOKEN_ENV`]: mesg_service_core::types::TOKEN_ENV
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// TCP endpoint of the core daemon, `host:port`.
    pub endpoint: String,
    /// Token identifying this service to the daemon.
    pub token: String,
    /// Budget for the dial and for each unary call.
    pub call_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: String::new(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Ordered configuration of a [`Service`].
///
/// Each setter overrides whatever an earlier one set, including fields set
/// through [`ServiceBuilder::config`].
#[derive(Debug, Default)]
pub struct ServiceBuilder {
    config: ServiceConfig,
    log: Option<LogSink>,
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every connection setting at once.
    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = token.into();
        self
    }

    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.config.call_timeout = timeout;
        self
    }

    pub fn log_sink(mut self, log: LogSink) -> Self {
        self.log = Some(log);
        self
    }

    pub fn log_dispatch(self, dispatch: Dispatch) -> Self {
        self.log_sink(LogSink::new(dispatch))
    }

    /// Writes service logs as plain text to `make_writer`. Defaults to
    /// standard output.
    pub fn log_writer<W>(self, make_writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        self.log_sink(LogSink::writer(make_writer))
    }

    /// Dials the daemon and returns a service bound to the new connection.
    ///
    /// # Errors
    ///
    /// Fails with a configuration error if the endpoint or token is empty,
    /// and with a connection error if the dial fails or times out.
    pub async fn connect(self) -> Result<Service<Connection>> {
        let connection = Connection::connect(
            &self.config.endpoint,
            &self.config.token,
            self.config.call_timeout,
        )
        .await?;
        Ok(self.with_transport(connection))
    }

    /// Returns a service bound to `transport` without dialing. Endpoint and
    /// token are not validated, as the transport owns the connection.
    pub fn with_transport<T: Transport>(self, transport: T) -> Service<T> {
        Service::from_parts(self.config, transport, self.log.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::servicetest;
    use mesg_service_core::Error;

    #[test]
    fn later_options_override_earlier_ones() {
        let builder = ServiceBuilder::new()
            .endpoint("a:1")
            .config(ServiceConfig {
                endpoint: "b:2".into(),
                token: "t1".into(),
                call_timeout: Duration::from_secs(1),
            })
            .token("t2");

        assert_eq!(builder.config.endpoint, "b:2");
        assert_eq!(builder.config.token, "t2");
        assert_eq!(builder.config.call_timeout, Duration::from_secs(1));
    }

    #[test]
    fn default_call_timeout_is_ten_seconds() {
        assert_eq!(
            ServiceConfig::default().call_timeout,
            Duration::from_secs(10)
        );
    }

    #[tokio::test]
    async fn connect_requires_endpoint() {
        let err = Service::builder().token("t").connect().await.unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert_eq!(err.to_string(), "Configuration error: endpoint is not set");
    }

    #[tokio::test]
    async fn connect_requires_token() {
        let err = Service::builder()
            .endpoint("localhost:50052")
            .connect()
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: token is not set");
    }

    #[test]
    fn injected_transport_skips_validation() {
        let (client, _server) = servicetest::pair();
        let service = Service::builder()
            .log_writer(std::io::sink)
            .with_transport(client);
        assert!(service.task_names().is_empty());
    }
}
