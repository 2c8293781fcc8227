//! Expense persistence on top of a [`DocumentStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::{PROJECT_ID_ENV, StoreBackend, StoreConfig};
use crate::error::StoreError;
use crate::models::{
    Approver, Currency, ExpenseCategory, ExpenseRecord, ExpenseRecordWire, GeolocationFix,
};

use super::document::{DocumentStore, JsonFileDocumentStore, MemoryDocumentStore, StoredDocument};

/// Collection expense documents live in.
pub const EXPENSES_COLLECTION: &str = "expenses";

const NOT_AVAILABLE: &str = "N/A";
const NO_DETAILS: &str = "No details";

/// Result of a batch save, reported to the caller as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// Whether every record was saved.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Records written before the call finished.
    pub count: usize,
}

/// Saves and lists expense records.
#[derive(Clone)]
pub struct ExpenseRepository {
    store: Arc<dyn DocumentStore>,
    project_id: Option<String>,
}

impl std::fmt::Debug for ExpenseRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseRepository")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl ExpenseRepository {
    /// Wraps an existing store. Saves are refused while `project_id` is `None`.
    pub fn new(store: Arc<dyn DocumentStore>, project_id: Option<String>) -> Self {
        Self { store, project_id }
    }

    /// Builds the configured backend.
    pub fn from_config(config: &StoreConfig) -> Self {
        let store: Arc<dyn DocumentStore> = match &config.backend {
            StoreBackend::Memory => Arc::new(MemoryDocumentStore::new()),
            StoreBackend::File { path } => Arc::new(JsonFileDocumentStore::new(path)),
        };
        Self::new(store, config.project_id.clone())
    }

    /// Appends every record, in order.
    ///
    /// Failures are reported in the outcome rather than as an error: a
    /// missing project id, or the first backend error together with the
    /// number of records already written.
    pub async fn save_all(&self, records: &[ExpenseRecord]) -> SaveOutcome {
        if self.project_id.is_none() {
            error!(key = PROJECT_ID_ENV, "Store project id is not configured");
            return SaveOutcome {
                success: false,
                message: StoreError::MissingConfiguration {
                    key: PROJECT_ID_ENV.to_string(),
                }
                .to_string(),
                count: 0,
            };
        }

        if records.is_empty() {
            return SaveOutcome {
                success: true,
                message: "No expenses to save.".to_string(),
                count: 0,
            };
        }

        let mut saved = 0;
        for record in records {
            if let Err(e) = self.save_one(record).await {
                error!(error = %e, saved, "Saving expenses failed");
                return SaveOutcome {
                    success: false,
                    message: format!("Failed to save expenses: {}", e),
                    count: saved,
                };
            }
            saved += 1;
        }

        info!(count = saved, "Expenses saved");
        SaveOutcome {
            success: true,
            message: format!("Successfully saved {} expense(s)", saved),
            count: saved,
        }
    }

    async fn save_one(&self, record: &ExpenseRecord) -> Result<String, StoreError> {
        let data = serde_json::to_value(ExpenseRecordWire::from(record.clone()))?;
        self.store.insert(EXPENSES_COLLECTION, data).await
    }

    /// All stored records, newest first.
    ///
    /// Documents are never rejected: unreadable fields are replaced with
    /// defaults and a warning is logged for each substitution.
    pub async fn list_all(&self) -> Result<Vec<ExpenseRecord>, StoreError> {
        let documents = self.store.list_by_date_desc(EXPENSES_COLLECTION).await?;
        Ok(documents.iter().map(decode_with_defaults).collect())
    }
}

/// Looks up `field`, falling back to its camelCase spelling.
fn field_value<'a>(doc: &'a StoredDocument, field: &str) -> Option<&'a Value> {
    doc.data
        .get(field)
        .filter(|v| !v.is_null())
        .or_else(|| doc.data.get(camel_case(field)))
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn text_field<'a>(doc: &'a StoredDocument, field: &str) -> Option<&'a str> {
    field_value(doc, field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn text_or(doc: &StoredDocument, field: &str, fallback: &str) -> String {
    match text_field(doc, field) {
        Some(value) => value.to_string(),
        None => {
            warn!(document = %doc.id, field, fallback, "Missing text field, using fallback");
            fallback.to_string()
        }
    }
}

/// Turns a stored document into a record, substituting defaults.
pub fn decode_with_defaults(doc: &StoredDocument) -> ExpenseRecord {
    let date = field_value(doc, "date")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|| {
            warn!(
                document = %doc.id,
                value = ?doc.data.get("date"),
                "Invalid or missing date, using current time"
            );
            Utc::now()
        });

    let amount = field_value(doc, "amount")
        .and_then(|v| serde_json::from_value::<Decimal>(v.clone()).ok())
        .unwrap_or_else(|| {
            warn!(
                document = %doc.id,
                value = ?doc.data.get("amount"),
                "Invalid or missing amount, using 0"
            );
            Decimal::ZERO
        });

    let label = text_or(doc, "expense_for", NOT_AVAILABLE);
    let category = ExpenseCategory::from_parts(
        &label,
        text_field(doc, "employee_name"),
        text_field(doc, "domain_panel_name"),
    )
    .unwrap_or_else(|e| {
        warn!(document = %doc.id, error = %e, "Category sub-field missing, keeping label only");
        ExpenseCategory::Other(label.clone())
    });

    let location = field_value(doc, "location")
        .filter(|v| !v.is_null())
        .and_then(|v| serde_json::from_value::<GeolocationFix>(v.clone()).ok());

    ExpenseRecord {
        id: doc.id.clone(),
        category,
        details: text_or(doc, "other_expense_details", NO_DETAILS),
        amount,
        currency: Currency::from(text_or(doc, "currency", NOT_AVAILABLE)),
        description_english: text_or(doc, "description_english", NOT_AVAILABLE),
        description_bangla: text_or(doc, "description_bangla", NOT_AVAILABLE),
        date,
        paid_by: text_or(doc, "paid_by", NOT_AVAILABLE),
        approved_by: Approver::from(text_or(doc, "approved_by", NOT_AVAILABLE)),
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::str::FromStr;

    fn record(id: &str, day: u32) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            category: ExpenseCategory::EmployeeExpenses {
                employee_name: "Tanvir".to_string(),
            },
            details: "Travel".to_string(),
            amount: Decimal::from_str("250.00").unwrap(),
            currency: Currency::Bdt,
            description_english: "Bus fare".to_string(),
            description_bangla: "Bus bhara".to_string(),
            date: Utc.with_ymd_and_hms(2025, 5, day, 0, 0, 0).unwrap(),
            paid_by: "Office".to_string(),
            approved_by: Approver::RaiyanBashar,
            location: Some(GeolocationFix::new(23.8, 90.4)),
        }
    }

    fn configured() -> ExpenseRepository {
        ExpenseRepository::new(
            Arc::new(MemoryDocumentStore::new()),
            Some("snbd-expenses".to_string()),
        )
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn insert(&self, _: &str, _: Value) -> Result<String, StoreError> {
            Err(StoreError::Backend {
                message: "permission denied".to_string(),
            })
        }

        async fn list_by_date_desc(&self, _: &str) -> Result<Vec<StoredDocument>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_save_without_project_id_is_refused() {
        let repo = ExpenseRepository::new(Arc::new(MemoryDocumentStore::new()), None);
        let outcome = repo.save_all(&[record("a", 1)]).await;
        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            "Server configuration error: EXPENSE_STORE_PROJECT_ID is missing"
        );
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_empty_batch() {
        let outcome = configured().save_all(&[]).await;
        assert_eq!(
            outcome,
            SaveOutcome {
                success: true,
                message: "No expenses to save.".to_string(),
                count: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_save_and_list_newest_first() {
        let repo = configured();
        let outcome = repo.save_all(&[record("a", 1), record("b", 20)]).await;
        assert!(outcome.success);
        assert_eq!(outcome.count, 2);
        assert_eq!(outcome.message, "Successfully saved 2 expense(s)");

        let listed = repo.list_all().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].date.format("%d").to_string(), "20");
        assert_eq!(listed[1].category.employee_name(), Some("Tanvir"));
        assert_eq!(listed[1].amount, Decimal::from_str("250").unwrap());
        assert_eq!(listed[1].location, Some(GeolocationFix::new(23.8, 90.4)));
    }

    #[tokio::test]
    async fn test_backend_failure_is_reported_in_outcome() {
        let repo = ExpenseRepository::new(Arc::new(FailingStore), Some("p".to_string()));
        let outcome = repo.save_all(&[record("a", 1)]).await;
        assert!(!outcome.success);
        assert_eq!(outcome.count, 0);
        assert!(outcome.message.contains("permission denied"));
    }

    #[test]
    fn test_decode_substitutes_defaults() {
        let doc = StoredDocument {
            id: "doc1".to_string(),
            data: json!({"amount": "not a number", "paid_by": ""}),
        };
        let before = Utc::now();
        let record = decode_with_defaults(&doc);

        assert_eq!(record.id, "doc1");
        assert_eq!(record.amount, Decimal::ZERO);
        assert!(record.date >= before);
        assert_eq!(record.details, "No details");
        assert_eq!(record.paid_by, "N/A");
        assert_eq!(record.category, ExpenseCategory::Other("N/A".to_string()));
        assert_eq!(record.currency, Currency::from("N/A"));
        assert_eq!(record.location, None);
    }

    #[test]
    fn test_decode_employee_category_without_name_keeps_label() {
        let doc = StoredDocument {
            id: "doc2".to_string(),
            data: json!({"expense_for": "Employee Expenses", "amount": 12}),
        };
        let record = decode_with_defaults(&doc);
        assert_eq!(record.category.label(), "Employee Expenses");
        assert_eq!(record.category.sub_field(), None);
        assert_eq!(record.amount, Decimal::from(12));
    }

    #[test]
    fn test_decode_reads_camel_case_documents() {
        let doc = StoredDocument {
            id: "doc3".to_string(),
            data: json!({
                "expenseFor": "Employee Expenses",
                "employeeName": "Tanvir",
                "otherExpenseDetails": "Travel",
                "amount": "250.00",
                "currency": "BDT",
                "descriptionEnglish": "Bus fare",
                "descriptionBangla": "Bus bhara",
                "date": "2025-05-03T00:00:00Z",
                "paidBy": "Office",
                "approvedBy": "RAIYAN BASHAR"
            }),
        };
        let record = decode_with_defaults(&doc);

        assert_eq!(record.category.sub_field(), Some(("Employee Name", "Tanvir")));
        assert_eq!(record.details, "Travel");
        assert_eq!(record.description_english, "Bus fare");
        assert_eq!(record.paid_by, "Office");
        assert_eq!(record.approved_by, Approver::RaiyanBashar);
        assert_eq!(record.date, Utc.with_ymd_and_hms(2025, 5, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_camel_case_spelling() {
        assert_eq!(camel_case("other_expense_details"), "otherExpenseDetails");
        assert_eq!(camel_case("amount"), "amount");
    }
}
