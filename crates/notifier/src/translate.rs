//! Translation of lifecycle events into commit statuses.
//!
//! Both functions are pure: identical events always yield identical output,
//! which duplicate detection in [`crate::reporter`] relies on.

use crate::{
    LifecycleEvent, ReportError, Severity, StatusState, PROGRESSING_REASON, SUMMARY_METADATA_KEY,
};

/// Maximum length of a status description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 140;

/// Maps an event to a status state.
///
/// A progressing reason always wins; otherwise `Info` maps to
/// [`StatusState::Success`] and `Error` to [`StatusState::Failure`]. Any other
/// severity is rejected and must not be reported.
pub fn to_status_state(event: &LifecycleEvent) -> Result<StatusState, ReportError> {
    if event.has_reason(PROGRESSING_REASON) {
        return Ok(StatusState::Pending);
    }
    match event.severity {
        Severity::Info => Ok(StatusState::Success),
        Severity::Error => Ok(StatusState::Failure),
        other => Err(ReportError::UnknownSeverity {
            severity: other.to_string(),
        }),
    }
}

/// Derives the status `(context, description)` pair for an event.
///
/// The context is the lowercased `kind/name` of the involved object, prefixed
/// with the `summary` metadata value when one is present. The description is
/// the event's reasons rendered as lowercase words (`ReconciliationSucceeded`
/// becomes `reconciliation succeeded`), falling back to the event message
/// when there are no reasons.
pub fn format_name_and_description(event: &LifecycleEvent) -> (String, String) {
    let object = &event.involved_object;
    let mut name = format!("{}/{}", object.kind, object.name).to_lowercase();
    if let Some(summary) = event
        .metadata_value(SUMMARY_METADATA_KEY)
        .filter(|s| !s.is_empty())
    {
        name = format!("{summary}/{name}");
    }

    let description = if event.reasons.is_empty() {
        event.message.clone()
    } else {
        event
            .reasons
            .iter()
            .map(|reason| split_camel_case(reason).join(" ").to_lowercase())
            .collect::<Vec<_>>()
            .join(", ")
    };

    (name, truncate_chars(&description, MAX_DESCRIPTION_CHARS))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_lowercase() {
            Self::Lower
        } else if c.is_uppercase() {
            Self::Upper
        } else if c.is_numeric() {
            Self::Digit
        } else {
            Self::Other
        }
    }
}

/// Splits an identifier into words at case and digit boundaries.
///
/// Runs of capitals stay together except for the last one, which starts the
/// next word: `HTTPServerFailed` → `["HTTP", "Server", "Failed"]`.
/// Separator characters (`_`, `-`, whitespace, …) are dropped.
fn split_camel_case(s: &str) -> Vec<String> {
    let mut runs: Vec<(CharClass, Vec<char>)> = Vec::new();
    for c in s.chars() {
        let class = CharClass::of(c);
        match runs.last_mut() {
            Some((last, chars)) if *last == class => chars.push(c),
            _ => runs.push((class, vec![c])),
        }
    }

    for i in 1..runs.len() {
        if runs[i - 1].0 == CharClass::Upper && runs[i].0 == CharClass::Lower {
            if let Some(c) = runs[i - 1].1.pop() {
                runs[i].1.insert(0, c);
            }
        }
    }

    runs.into_iter()
        .filter(|(class, chars)| *class != CharClass::Other && !chars.is_empty())
        .map(|(_, chars)| chars.into_iter().collect())
        .collect()
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
