//! Input checks used by the conversation steps.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Loose address check: something, `@`, something, `.`, something.
pub fn is_valid_email(input: &str) -> bool {
    let trimmed = input.trim();
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(trimmed))
}

/// Answer to a yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

/// Exact `si` / `no` after trimming and lower-casing; anything else is `None`.
pub fn parse_yes_no(input: &str) -> Option<YesNo> {
    match input.trim().to_lowercase().as_str() {
        "si" => Some(YesNo::Yes),
        "no" => Some(YesNo::No),
        _ => None,
    }
}

/// Connection medium named in free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Cable,
    Wifi,
}

/// Substring check; "cable" wins when both appear.
pub fn parse_connection_kind(input: &str) -> Option<ConnectionKind> {
    let normalized = input.trim().to_lowercase();
    if normalized.contains("cable") {
        Some(ConnectionKind::Cable)
    } else if normalized.contains("wifi") {
        Some(ConnectionKind::Wifi)
    } else {
        None
    }
}
