// Search form state, validation, and the fixed-shape case search request.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `dateRequestType` sent with every search (filter on filing date).
pub const DATE_REQUEST_TYPE: u8 = 1;

/// `orderType` sent with every search.
pub const ORDER_TYPE: u8 = 1;

/// `serchType` for a case-number search. Every search uses this mode.
pub const CASE_NUMBER_SEARCH_TYPE: u8 = 4;

/// Date format the backend expects.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// SearchBy
// ---------------------------------------------------------------------------

/// The "Search By" field selector.
///
/// Collected from the user but not part of the request: every search is a
/// case-number search regardless of this choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchBy {
    CaseNumber,
    Complainant,
    Respondent,
    ComplainantAdvocate,
    RespondentAdvocate,
    IndustryType,
    Judge,
}

impl SearchBy {
    /// Selector order.
    pub const ALL: [SearchBy; 7] = [
        SearchBy::CaseNumber,
        SearchBy::Complainant,
        SearchBy::Respondent,
        SearchBy::ComplainantAdvocate,
        SearchBy::RespondentAdvocate,
        SearchBy::IndustryType,
        SearchBy::Judge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SearchBy::CaseNumber => "Case Number",
            SearchBy::Complainant => "Complainant",
            SearchBy::Respondent => "Respondent",
            SearchBy::ComplainantAdvocate => "Complainant Advocate",
            SearchBy::RespondentAdvocate => "Respondent Advocate",
            SearchBy::IndustryType => "Industry Type",
            SearchBy::Judge => "Judge",
        }
    }
}

// ---------------------------------------------------------------------------
// SearchRequest
// ---------------------------------------------------------------------------

/// Body of `POST /meta/case-search`.
///
/// The misspelled `serchType`/`serchTypeValue` keys are what the backend
/// reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub commission_id: i64,
    pub date_request_type: u8,
    pub from_date: String,
    pub to_date: String,
    pub judge_id: String,
    pub order_type: u8,
    #[serde(rename = "serchType")]
    pub search_type: u8,
    #[serde(rename = "serchTypeValue")]
    pub search_type_value: String,
}

impl SearchRequest {
    /// Build a case-number search for one commission.
    pub fn by_case_number(
        commission_id: i64,
        from_date: &str,
        to_date: &str,
        case_number: &str,
    ) -> Self {
        SearchRequest {
            commission_id,
            date_request_type: DATE_REQUEST_TYPE,
            from_date: from_date.to_string(),
            to_date: to_date.to_string(),
            judge_id: String::new(),
            order_type: ORDER_TYPE,
            search_type: CASE_NUMBER_SEARCH_TYPE,
            search_type_value: case_number.trim().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SearchForm
// ---------------------------------------------------------------------------

/// Reasons a submission is rejected before any request is made.
///
/// The `Display` text is the alert shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a commission first")]
    NoCommission,
    #[error("Please select both from and to dates")]
    MissingDates,
    #[error("Please enter a case number")]
    MissingCaseNumber,
}

/// The filter fields of the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub from_date: String,
    pub to_date: String,
    pub search_by: Option<SearchBy>,
    pub case_number: String,
}

impl SearchForm {
    /// Reset every filter field.
    pub fn clear(&mut self) {
        *self = SearchForm::default();
    }

    /// True once the user has typed into a date or the case number.
    ///
    /// `search_by` does not count.
    pub fn is_touched(&self) -> bool {
        !self.from_date.is_empty() || !self.to_date.is_empty() || !self.case_number.is_empty()
    }

    /// Validate the form against the selected commission and build the
    /// request. Checks run in order and stop at the first failure.
    pub fn build_request(&self, commission: Option<i64>) -> Result<SearchRequest, ValidationError> {
        let commission_id = commission.ok_or(ValidationError::NoCommission)?;
        if self.from_date.is_empty() || self.to_date.is_empty() {
            return Err(ValidationError::MissingDates);
        }
        if self.case_number.trim().is_empty() {
            return Err(ValidationError::MissingCaseNumber);
        }
        Ok(SearchRequest::by_case_number(
            commission_id,
            &self.from_date,
            &self.to_date,
            &self.case_number,
        ))
    }
}

/// True when `value` parses as a `YYYY-MM-DD` calendar date.
///
/// Used only for an advisory hint; submissions pass dates through verbatim.
pub fn is_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

/// Format a date the way the backend expects.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The `(from, to)` window ending at `today` and spanning `days` days back.
pub fn date_window(today: NaiveDate, days: u32) -> (String, String) {
    let start = today - Duration::days(i64::from(days));
    (format_date(start), format_date(today))
}

// ---------------------------------------------------------------------------
// Conditional view selection
// ---------------------------------------------------------------------------

/// Which results region is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsView {
    /// Non-empty results: stats tiles and the result table.
    Table,
    /// No results after the user has started filling filters.
    Empty,
    /// Nothing to show yet (first load, or a search in flight).
    Hidden,
}

/// Pick the results region from the current result count, search flag and
/// form contents.
pub fn results_view(result_count: usize, searching: bool, form: &SearchForm) -> ResultsView {
    if result_count > 0 {
        ResultsView::Table
    } else if !searching && form.is_touched() {
        ResultsView::Empty
    } else {
        ResultsView::Hidden
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled_form() -> SearchForm {
        SearchForm {
            from_date: "2025-01-01".to_string(),
            to_date: "2025-08-29".to_string(),
            search_by: Some(SearchBy::Complainant),
            case_number: "  DC/77/CC/104/2025 ".to_string(),
        }
    }

    #[test]
    fn request_serializes_with_backend_keys() {
        let request = filled_form().build_request(Some(15290525)).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "commissionId": 15290525,
                "dateRequestType": 1,
                "fromDate": "2025-01-01",
                "toDate": "2025-08-29",
                "judgeId": "",
                "orderType": 1,
                "serchType": 4,
                "serchTypeValue": "DC/77/CC/104/2025"
            })
        );
    }

    #[test]
    fn search_by_is_not_part_of_the_request() {
        let mut form = filled_form();
        let with_complainant = form.build_request(Some(1)).unwrap();
        form.search_by = Some(SearchBy::Judge);
        let with_judge = form.build_request(Some(1)).unwrap();
        assert_eq!(with_complainant, with_judge);
        assert_eq!(with_judge.search_type, CASE_NUMBER_SEARCH_TYPE);
    }

    #[test]
    fn validation_order_commission_first() {
        let form = SearchForm::default();
        assert_eq!(form.build_request(None), Err(ValidationError::NoCommission));
    }

    #[test]
    fn validation_requires_both_dates() {
        let mut form = filled_form();
        form.to_date.clear();
        assert_eq!(form.build_request(Some(1)), Err(ValidationError::MissingDates));
        let mut form = filled_form();
        form.from_date.clear();
        assert_eq!(form.build_request(Some(1)), Err(ValidationError::MissingDates));
    }

    #[test]
    fn validation_rejects_blank_case_number() {
        let mut form = filled_form();
        form.case_number = "   ".to_string();
        assert_eq!(
            form.build_request(Some(1)),
            Err(ValidationError::MissingCaseNumber)
        );
        form.case_number.clear();
        assert_eq!(
            form.build_request(Some(1)),
            Err(ValidationError::MissingCaseNumber)
        );
    }

    #[test]
    fn validation_messages_match_alerts() {
        assert_eq!(
            ValidationError::NoCommission.to_string(),
            "Please select a commission first"
        );
        assert_eq!(
            ValidationError::MissingDates.to_string(),
            "Please select both from and to dates"
        );
        assert_eq!(
            ValidationError::MissingCaseNumber.to_string(),
            "Please enter a case number"
        );
    }

    #[test]
    fn dates_pass_through_unparsed() {
        let mut form = filled_form();
        form.from_date = "01/02/2025".to_string();
        let request = form.build_request(Some(1)).unwrap();
        assert_eq!(request.from_date, "01/02/2025");
    }

    #[test]
    fn clear_then_reenter_reproduces_payload() {
        let mut form = filled_form();
        let first = form.build_request(Some(42)).unwrap();
        form.clear();
        assert_eq!(form, SearchForm::default());
        form = filled_form();
        let second = form.build_request(Some(42)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn touched_ignores_search_by() {
        let mut form = SearchForm::default();
        assert!(!form.is_touched());
        form.search_by = Some(SearchBy::Judge);
        assert!(!form.is_touched());
        form.to_date = "2025-01-01".to_string();
        assert!(form.is_touched());
    }

    #[test]
    fn results_view_selection() {
        let empty = SearchForm::default();
        let touched = filled_form();
        assert_eq!(results_view(3, false, &empty), ResultsView::Table);
        assert_eq!(results_view(3, true, &touched), ResultsView::Table);
        assert_eq!(results_view(0, false, &touched), ResultsView::Empty);
        assert_eq!(results_view(0, true, &touched), ResultsView::Hidden);
        assert_eq!(results_view(0, false, &empty), ResultsView::Hidden);
    }

    #[test]
    fn iso_date_hint() {
        assert!(is_iso_date("2025-08-29"));
        assert!(!is_iso_date("2025-02-30"));
        assert!(!is_iso_date("29/08/2025"));
        assert!(!is_iso_date(""));
    }

    #[test]
    fn date_window_spans_days_back() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(
            date_window(today, 30),
            ("2025-02-08".to_string(), "2025-03-10".to_string())
        );
        assert_eq!(
            date_window(today, 0),
            ("2025-03-10".to_string(), "2025-03-10".to_string())
        );
    }

    #[test]
    fn search_by_labels_cover_all_variants() {
        let labels: Vec<&str> = SearchBy::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], "Case Number");
        assert_eq!(labels[6], "Judge");
    }
}
