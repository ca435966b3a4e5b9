// Case result rows, status badges, and status counts.
//
// Rows arrive as raw JSON values and are decoded per render region, so a
// malformed row degrades the region that reads it instead of the whole view.

use serde_json::Value;
use thiserror::Error;

use super::display_value;

/// Placeholder shown for any absent field.
pub const PLACEHOLDER: &str = "-";

/// A single case result, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseRow {
    pub filing_date: Option<String>,
    pub stage: Option<String>,
    pub case_number: Option<String>,
    pub complainant: Option<String>,
    pub complainant_advocate: Option<String>,
    pub respondent: Option<String>,
    pub respondent_advocate: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("result row {index} is null")]
    Null { index: usize },
}

impl CaseRow {
    /// Decode one row. Non-object values decode to an all-absent row;
    /// only `null` is an error.
    pub fn from_value(index: usize, value: &Value) -> Result<CaseRow, RowError> {
        let map = match value {
            Value::Null => return Err(RowError::Null { index }),
            Value::Object(map) => map,
            _ => return Ok(CaseRow::default()),
        };
        let field = |key: &str| map.get(key).and_then(display_value);
        Ok(CaseRow {
            filing_date: field("caseFilingDate"),
            stage: field("caseStageName"),
            case_number: field("caseNumber"),
            complainant: field("complainantName"),
            complainant_advocate: field("complainantAdvocateName"),
            respondent: field("respondentName"),
            respondent_advocate: field("respondentAdvocateName"),
        })
    }
}

/// Decode a whole result list, failing on the first bad row.
pub fn decode_rows(rows: &[Value]) -> Result<Vec<CaseRow>, RowError> {
    rows.iter()
        .enumerate()
        .map(|(i, v)| CaseRow::from_value(i, v))
        .collect()
}

/// Text for a field, or the placeholder dash.
pub fn or_placeholder(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(PLACEHOLDER)
}

// ---------------------------------------------------------------------------
// Status badge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub style: BadgeStyle,
}

/// Classify a case stage for display.
///
/// "closed" wins over "pending" when both appear. Absent stages show as
/// pending with the informational style.
pub fn status_badge(status: Option<&str>) -> StatusBadge {
    let Some(status) = status else {
        return StatusBadge {
            label: "Pending".to_string(),
            style: BadgeStyle::Info,
        };
    };
    let lower = status.to_lowercase();
    if lower.contains("closed") {
        StatusBadge {
            label: "Closed".to_string(),
            style: BadgeStyle::Success,
        }
    } else if lower.contains("pending") {
        StatusBadge {
            label: "Pending".to_string(),
            style: BadgeStyle::Warning,
        }
    } else {
        StatusBadge {
            label: status.to_string(),
            style: BadgeStyle::Info,
        }
    }
}

// ---------------------------------------------------------------------------
// Status counts
// ---------------------------------------------------------------------------

/// Aggregate counts over the current result list.
///
/// `pending` and `closed` are substring matches and not mutually
/// exclusive, so `active` goes negative when a stage matches both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub closed: i64,
    pub active: i64,
}

impl StatusCounts {
    pub fn from_rows(rows: &[CaseRow]) -> Self {
        let matching = |needle: &str| {
            rows.iter()
                .filter(|r| {
                    r.stage
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(needle))
                })
                .count() as i64
        };
        let total = rows.len() as i64;
        let pending = matching("pending");
        let closed = matching("closed");
        StatusCounts {
            total,
            pending,
            closed,
            active: total - pending - closed,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
