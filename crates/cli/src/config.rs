//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use gitea::GiteaClientConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, one event per line.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Report one lifecycle event as a Gitea commit status.
#[derive(Debug, Parser)]
#[command(name = "commit-notify", version, about)]
pub struct CliConfig {
    /// Repository address, e.g. `https://gitea.example.com/owner/repo`.
    #[arg(long, env = "NOTIFY_ADDRESS")]
    pub address: String,

    /// API token used to authenticate against the hosting service.
    #[arg(long, env = "NOTIFY_TOKEN", hide_env_values = true)]
    pub token: String,

    /// PEM bundle of additional CA certificates trusted for the host.
    #[arg(long, env = "NOTIFY_CA_FILE")]
    pub ca_file: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "NOTIFY_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// JSON file holding the event to report; `-` reads standard input.
    #[arg(default_value = "-")]
    pub event: PathBuf,
}

impl CliConfig {
    /// Client settings derived from the flags.
    pub fn client_config(&self) -> GiteaClientConfig {
        GiteaClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..GiteaClientConfig::default()
        }
    }

    /// Returns `true` if the event should be read from standard input.
    pub fn event_from_stdin(&self) -> bool {
        self.event.as_os_str() == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::try_parse_from([
            "commit-notify",
            "--address",
            "https://try.example.io/foo/bar",
            "--token",
            "t",
        ])
        .unwrap();
        assert!(config.event_from_stdin());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.ca_file.is_none());
        assert_eq!(config.client_config().timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_explicit_flags() {
        let config = CliConfig::try_parse_from([
            "commit-notify",
            "--address",
            "https://try.example.io/foo/bar",
            "--token",
            "t",
            "--ca-file",
            "/etc/ssl/gitea.pem",
            "--timeout-secs",
            "5",
            "--log-format",
            "json",
            "event.json",
        ])
        .unwrap();
        assert!(!config.event_from_stdin());
        assert_eq!(config.event, PathBuf::from("event.json"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.client_config().timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_address_is_required() {
        // Guard against NOTIFY_ADDRESS leaking in from the test environment.
        if std::env::var_os("NOTIFY_ADDRESS").is_none() {
            assert!(CliConfig::try_parse_from(["commit-notify", "--token", "t"]).is_err());
        }
    }
}
