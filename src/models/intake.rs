//! Validated expense intake.
//!
//! [`NewExpense`] is what the entry form submits. It only becomes an
//! [`ExpenseRecord`] after [`NewExpense::into_record`] has checked it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ReportError, ReportResult};

use super::{Approver, Currency, ExpenseCategory, ExpenseRecord, GeolocationFix};

/// An expense as entered, before validation and id assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    /// Category label.
    #[serde(alias = "expenseFor")]
    pub expense_for: String,
    /// Employee name, required for "Employee Expenses".
    #[serde(alias = "employeeName", default)]
    pub employee_name: Option<String>,
    /// Panel name, required for "Domain Panel Fund".
    #[serde(alias = "domainPanelName", default)]
    pub domain_panel_name: Option<String>,
    /// Free-text details.
    #[serde(alias = "otherExpenseDetails")]
    pub other_expense_details: String,
    /// Monetary amount, must be positive.
    pub amount: Decimal,
    /// Currency code.
    #[serde(default = "default_currency")]
    pub currency: Currency,
    /// English description.
    #[serde(alias = "descriptionEnglish")]
    pub description_english: String,
    /// Bangla description.
    #[serde(alias = "descriptionBangla")]
    pub description_bangla: String,
    /// When the expense was incurred; defaults to now.
    #[serde(default = "Utc::now")]
    pub date: DateTime<Utc>,
    /// Who paid.
    #[serde(alias = "paidBy")]
    pub paid_by: String,
    /// Who approved.
    #[serde(alias = "approvedBy", default = "default_approver")]
    pub approved_by: Approver,
}

fn default_currency() -> Currency {
    Currency::Usd
}

fn default_approver() -> Approver {
    Approver::YeaminAdib
}

fn non_blank(value: &str, field: &str) -> ReportResult<()> {
    if value.trim().is_empty() {
        return Err(ReportError::InvalidRecord {
            field: field.to_string(),
            message: "is required".to_string(),
        });
    }
    Ok(())
}

impl NewExpense {
    /// Validates the entry and turns it into a record with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidRecord`] naming the first field that is
    /// blank, a non-positive amount, or a missing category sub-field.
    pub fn into_record(self, location: Option<GeolocationFix>) -> ReportResult<ExpenseRecord> {
        let category = ExpenseCategory::from_parts(
            &self.expense_for,
            self.employee_name.as_deref(),
            self.domain_panel_name.as_deref(),
        )?;
        non_blank(&self.other_expense_details, "other_expense_details")?;
        if self.amount <= Decimal::ZERO {
            return Err(ReportError::InvalidRecord {
                field: "amount".to_string(),
                message: "must be positive".to_string(),
            });
        }
        non_blank(&self.description_english, "description_english")?;
        non_blank(&self.description_bangla, "description_bangla")?;
        non_blank(&self.paid_by, "paid_by")?;

        Ok(ExpenseRecord {
            id: Uuid::new_v4().to_string(),
            category,
            details: self.other_expense_details,
            amount: self.amount,
            currency: self.currency,
            description_english: self.description_english,
            description_bangla: self.description_bangla,
            date: self.date,
            paid_by: self.paid_by,
            approved_by: self.approved_by,
            location,
        })
    }
}
