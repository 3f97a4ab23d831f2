//! JSON shapes of the Gitea commit-status endpoints.
//!
//! Gitea reports a status' state under `status` but accepts it under `state`
//! when creating one. State strings are converted to [`RemoteState`] here so
//! that nothing past this module compares raw strings.

use notifier::{RemoteState, StatusInput, StatusRecord, StatusState};
use serde::{Deserialize, Serialize};

/// A commit status as returned by `GET`/`POST .../statuses/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireStatus {
    #[serde(default)]
    context: Option<String>,
    #[serde(default, rename = "status", alias = "state")]
    state: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<WireStatus> for StatusRecord {
    fn from(wire: WireStatus) -> Self {
        Self {
            context: wire.context.unwrap_or_default(),
            // `warning` and any future state survive as `RemoteState::Other`.
            state: wire.state.as_deref().and_then(RemoteState::from_wire),
            description: wire.description.unwrap_or_default(),
        }
    }
}

/// Request body for `POST .../statuses/{sha}`.
#[derive(Debug, Serialize)]
pub(crate) struct WireCreateStatus<'a> {
    state: StatusState,
    target_url: &'a str,
    description: &'a str,
    context: &'a str,
}

impl<'a> From<&'a StatusInput> for WireCreateStatus<'a> {
    fn from(status: &'a StatusInput) -> Self {
        Self {
            state: status.state,
            target_url: &status.target_url,
            description: &status.description,
            context: &status.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_status_reads_status_field() {
        let wire: WireStatus = serde_json::from_str(
            r#"{"id": 7, "status": "failure", "context": "c", "description": "d", "target_url": ""}"#,
        )
        .unwrap();
        assert_eq!(
            StatusRecord::from(wire),
            StatusRecord {
                context: "c".into(),
                state: Some(RemoteState::Known(StatusState::Failure)),
                description: "d".into(),
            }
        );
    }

    #[test]
    fn test_unknown_state_is_kept_and_missing_state_is_none() {
        let warning: WireStatus =
            serde_json::from_str(r#"{"status": "warning", "context": "c", "description": "d"}"#)
                .unwrap();
        assert_eq!(
            StatusRecord::from(warning).state,
            Some(RemoteState::Other("warning".into()))
        );

        let empty: WireStatus =
            serde_json::from_str(r#"{"status": "", "context": "c", "description": "d"}"#).unwrap();
        assert_eq!(StatusRecord::from(empty).state, None);

        let bare: WireStatus = serde_json::from_str(r#"{"context": null}"#).unwrap();
        let record = StatusRecord::from(bare);
        assert!(!record.is_comparable());
        assert_eq!(record.context, "");
    }

    #[test]
    fn test_newest_warning_blocks_older_identical_success() {
        let records: Vec<StatusRecord> = serde_json::from_str::<Vec<WireStatus>>(
            r#"[
                {"status": "warning", "context": "c", "description": "d"},
                {"status": "success", "context": "c", "description": "d"}
            ]"#,
        )
        .unwrap()
        .into_iter()
        .map(StatusRecord::from)
        .collect();
        let status = StatusInput::new(StatusState::Success, "c", "d");
        assert!(!notifier::is_duplicate(&records, &status));
    }

    #[test]
    fn test_create_body_uses_state_field() {
        let status = StatusInput::new(StatusState::Pending, "kustomization/podinfo", "progressing");
        let body = serde_json::to_value(WireCreateStatus::from(&status)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "state": "pending",
                "target_url": "",
                "description": "progressing",
                "context": "kustomization/podinfo",
            })
        );
    }
}
