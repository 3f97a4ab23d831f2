//! commit-notify CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration** — flags with environment fallbacks (see [`config`]).
//! 2. **Wire observability** — configure `tracing-subscriber` with an
//!    `EnvFilter` (`RUST_LOG`, default `info`) and a pretty or JSON layer.
//!    All `tracing` events emitted by the workspace crates flow through it.
//! 3. **Construct infrastructure** — build a [`gitea::GiteaNotifier`] from the
//!    address, token, and optional trust root. Construction errors abort
//!    before any event is read.
//! 4. **Report** — read one JSON lifecycle event and report it once. There
//!    is no retry; a non-zero exit status lets the caller decide.

mod config;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use gitea::GiteaNotifier;
use notifier::{LifecycleEvent, Notifier};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, LogFormat};

#[tokio::main]
async fn main() -> Result<()> {
    let config = CliConfig::parse();
    init_tracing(config.log_format);

    let trust_root = config
        .ca_file
        .as_deref()
        .map(|path| {
            std::fs::read(path)
                .with_context(|| format!("could not read CA file '{}'", path.display()))
        })
        .transpose()?;

    let notifier = GiteaNotifier::with_config(
        &config.address,
        &config.token,
        trust_root.as_deref(),
        &config.client_config(),
    )
    .context("could not create Gitea notifier")?;

    let event = if config.event_from_stdin() {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("could not read event from stdin")?;
        parse_event(&raw)?
    } else {
        read_event(&config.event)?
    };

    notifier
        .report(&event)
        .await
        .context("could not report event")?;

    info!(
        owner = %notifier.owner(),
        repo = %notifier.repository(),
        object = %event.involved_object.name,
        "Event reported"
    );
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn read_event(path: &Path) -> Result<LifecycleEvent> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read event file '{}'", path.display()))?;
    parse_event(&raw)
}

fn parse_event(raw: &str) -> Result<LifecycleEvent> {
    serde_json::from_str(raw).context("event is not a valid lifecycle event")
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifier::{Severity, REVISION_METADATA_KEY};

    #[test]
    fn test_parse_event() {
        let event = parse_event(
            r#"{
                "involvedObject": {"kind": "HelmRelease", "name": "podinfo"},
                "severity": "error",
                "reasons": ["InstallFailed"],
                "metadata": {"revision": "main@sha1:5394cb7f48332b2de7c17dd8b8384bbc84b7e738"}
            }"#,
        )
        .unwrap();
        assert_eq!(event.severity, Severity::Error);
        assert!(event.metadata_value(REVISION_METADATA_KEY).is_some());
    }

    #[test]
    fn test_parse_event_rejects_garbage() {
        let err = parse_event("{not json").unwrap_err();
        assert!(err.to_string().contains("not a valid lifecycle event"));
    }

    #[test]
    fn test_read_event_missing_file() {
        let err = read_event(Path::new("/nonexistent/event.json")).unwrap_err();
        assert!(err.to_string().contains("could not read event file"));
    }
}
