use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use mesg_service::ServiceConfig;

/// Runtime configuration for the `service-logger` binary.
///
/// Every value can come from a flag, from the environment, or from a `.env`
/// file loaded before parsing.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "service-logger",
    version,
    about = "A MESG service that logs the payloads other services send it"
)]
pub struct CliArgs {
    /// TCP endpoint of the MESG core daemon, `host:port`.
    ///
    /// Environment variable: `MESG_ENDPOINT_TCP`
    #[arg(long, env = "MESG_ENDPOINT_TCP")]
    pub endpoint: String,

    /// Token identifying this service to the daemon.
    ///
    /// Environment variable: `MESG_TOKEN`
    #[arg(long, env = "MESG_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Budget, in seconds, for dialing the daemon and for each call made to
    /// it.
    ///
    /// Environment variable: `MESG_CALL_TIMEOUT_SECS`
    #[arg(long, env = "MESG_CALL_TIMEOUT_SECS", default_value_t = 10)]
    pub call_timeout_secs: u64,

    /// Output format of the process log.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human readable.
    Pretty,
    /// One line per event.
    Compact,
    /// Newline-delimited JSON.
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub service: ServiceConfig,
    pub log_format: LogFormat,
}

impl TryFrom<CliArgs> for LoggerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.endpoint.trim().is_empty() {
            bail!("MESG_ENDPOINT_TCP must not be empty");
        }

        if args.token.is_empty() {
            bail!("MESG_TOKEN must not be empty");
        }

        if args.call_timeout_secs == 0 {
            bail!("MESG_CALL_TIMEOUT_SECS must be greater than 0");
        }

        Ok(Self {
            service: ServiceConfig {
                endpoint: args.endpoint,
                token: args.token,
                call_timeout: Duration::from_secs(args.call_timeout_secs),
            },
            log_format: args.log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs {
            endpoint: "localhost:50052".into(),
            token: "token".into(),
            call_timeout_secs: 10,
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn parses_flags() {
        let args = CliArgs::try_parse_from([
            "service-logger",
            "--endpoint",
            "core:50052",
            "--token",
            "abc",
            "--call-timeout-secs",
            "3",
            "--log-format",
            "json",
        ])
        .unwrap();

        let config = LoggerConfig::try_from(args).unwrap();
        assert_eq!(config.service.endpoint, "core:50052");
        assert_eq!(config.service.token, "abc");
        assert_eq!(config.service.call_timeout, Duration::from_secs(3));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn rejects_empty_endpoint() {
        let err = LoggerConfig::try_from(CliArgs {
            endpoint: " ".into(),
            ..args()
        })
        .unwrap_err();
        assert!(err.to_string().contains("MESG_ENDPOINT_TCP"));
    }

    #[test]
    fn rejects_empty_token() {
        let err = LoggerConfig::try_from(CliArgs {
            token: String::new(),
            ..args()
        })
        .unwrap_err();
        assert!(err.to_string().contains("MESG_TOKEN"));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = LoggerConfig::try_from(CliArgs {
            call_timeout_secs: 0,
            ..args()
        })
        .unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn rejects_unknown_log_format() {
        let parsed = CliArgs::try_parse_from([
            "service-logger",
            "--endpoint",
            "core:50052",
            "--token",
            "abc",
            "--log-format",
            "xml",
        ]);
        assert!(parsed.is_err());
    }
}
