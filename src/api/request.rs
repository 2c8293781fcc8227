//! Request types for the expense report API.
//!
//! Records arrive in their flat wire shape and are validated while they are
//! deserialized, so a handler only ever sees well-formed [`ExpenseRecord`]s.

use serde::{Deserialize, Serialize};

use crate::models::{ExpenseRecord, GeolocationFix, NewExpense};

/// Request body for `POST /reports`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Records in the order they should appear.
    pub records: Vec<ExpenseRecord>,
    /// Where the report is being generated, if known.
    #[serde(default)]
    pub location: Option<GeolocationFix>,
}

/// Query string of `POST /reports`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    /// Overrides the configured file-name prefix, e.g. `Admin`.
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Request body for `POST /expenses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Records to append.
    pub records: Vec<ExpenseRecord>,
}

/// Query string of `GET /expenses`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive search term.
    #[serde(default)]
    pub search: Option<String>,
}

/// Query string of `GET /expenses/report`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredReportQuery {
    /// Restricts the report to matching records, as in `GET /expenses`.
    #[serde(default)]
    pub search: Option<String>,
    /// Overrides the configured file-name prefix, e.g. `Admin`.
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Request body for `POST /expenses/intake`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeRequest {
    /// The entered expense.
    #[serde(flatten)]
    pub expense: NewExpense,
    /// Where the expense was entered.
    #[serde(default)]
    pub location: Option<GeolocationFix>,
}

/// Request body for `POST /translations/optimize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// The record to improve.
    pub record: ExpenseRecord,
    /// Used when the record has no location of its own.
    #[serde(default)]
    pub fallback_location: Option<GeolocationFix>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_request_without_location() {
        let body = r#"{"records": []}"#;
        let request: ReportRequest = serde_json::from_str(body).unwrap();
        assert!(request.records.is_empty());
        assert!(request.location.is_none());
    }

    #[test]
    fn test_intake_request_flattens_expense() {
        let body = r#"{
            "expense_for": "VPS",
            "other_expense_details": "Droplet",
            "amount": "12.00",
            "description_english": "Hosting",
            "description_bangla": "Hosting bill",
            "paid_by": "Card",
            "location": {"latitude": 23.8, "longitude": 90.4}
        }"#;
        let request: IntakeRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.expense.expense_for, "VPS");
        assert_eq!(request.location.map(|l| l.latitude), Some(23.8));
    }
}
