//! Expense record model and its enumerated fields.
//!
//! The category and its sub-field are one tagged value: an employee name can
//! only exist inside [`ExpenseCategory::EmployeeExpenses`], a panel name only
//! inside [`ExpenseCategory::DomainPanelFund`]. On the wire the record keeps
//! the flat shape (`expense_for`, `employee_name`, `domain_panel_name`) and is
//! converted through [`ExpenseRecordWire`].

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

use super::GeolocationFix;

/// Wire label of the employee-expense category.
pub const EMPLOYEE_EXPENSES: &str = "Employee Expenses";
/// Wire label of the domain-panel category.
pub const DOMAIN_PANEL_FUND: &str = "Domain Panel Fund";

/// What an expense was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseCategory {
    /// Virtual private server costs.
    Vps,
    /// Software licences.
    License,
    /// Expenses incurred by a named employee.
    EmployeeExpenses {
        /// The employee the expense belongs to.
        employee_name: String,
    },
    /// Top-ups of a domain reseller panel.
    DomainPanelFund {
        /// The panel that received the funds.
        panel_name: String,
    },
    /// Any other category, kept as entered.
    Other(String),
}

impl ExpenseCategory {
    /// The four categories offered by the intake form.
    pub const OPTIONS: [&'static str; 4] = ["VPS", "License", EMPLOYEE_EXPENSES, DOMAIN_PANEL_FUND];

    /// Builds a category from its wire label and the optional sub-fields.
    ///
    /// Sub-fields that do not belong to the category are dropped. A category
    /// that requires a sub-field fails when the matching one is blank.
    pub fn from_parts(
        label: &str,
        employee_name: Option<&str>,
        panel_name: Option<&str>,
    ) -> ReportResult<Self> {
        fn required(value: Option<&str>, field: &str) -> ReportResult<String> {
            match value.map(str::trim) {
                Some(v) if !v.is_empty() => Ok(v.to_string()),
                _ => Err(ReportError::InvalidRecord {
                    field: field.to_string(),
                    message: "is required for this category".to_string(),
                }),
            }
        }

        Ok(match label {
            "VPS" => Self::Vps,
            "License" => Self::License,
            EMPLOYEE_EXPENSES => Self::EmployeeExpenses {
                employee_name: required(employee_name, "employee_name")?,
            },
            DOMAIN_PANEL_FUND => Self::DomainPanelFund {
                panel_name: required(panel_name, "domain_panel_name")?,
            },
            other => Self::Other(other.to_string()),
        })
    }

    /// The category label as shown in reports and stored on the wire.
    pub fn label(&self) -> &str {
        match self {
            Self::Vps => "VPS",
            Self::License => "License",
            Self::EmployeeExpenses { .. } => EMPLOYEE_EXPENSES,
            Self::DomainPanelFund { .. } => DOMAIN_PANEL_FUND,
            Self::Other(label) => label.as_str(),
        }
    }

    /// The category-specific sub-field as `(heading, value)`, if any.
    pub fn sub_field(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::EmployeeExpenses { employee_name } => Some(("Employee Name", employee_name.as_str())),
            Self::DomainPanelFund { panel_name } => Some(("Domain Panel", panel_name.as_str())),
            _ => None,
        }
    }

    /// The employee name, for employee-expense records.
    pub fn employee_name(&self) -> Option<&str> {
        match self {
            Self::EmployeeExpenses { employee_name } => Some(employee_name.as_str()),
            _ => None,
        }
    }

    /// The panel name, for domain-panel records.
    pub fn panel_name(&self) -> Option<&str> {
        match self {
            Self::DomainPanelFund { panel_name } => Some(panel_name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Generates a "known values plus free text" string enum.
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value outside the known set, kept as entered.
            Other(String),
        }

        impl $name {
            /// The known values, in form order.
            pub const OPTIONS: &'static [&'static str] = &[$($label),+];

            /// The value as displayed and stored.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Other(value) => value.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($label => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum! {
    /// Currency code of an expense amount.
    Currency {
        /// US dollar.
        Usd => "USD",
        /// Bangladeshi taka.
        Bdt => "BDT",
        /// Euro.
        Euro => "EURO",
    }
}

open_enum! {
    /// Person who approved an expense.
    Approver {
        /// Yeamin Adib.
        YeaminAdib => "YEAMIN ADIB",
        /// Raiyan Bashar.
        RaiyanBashar => "RAIYAN BASHAR",
    }
}

/// One user-submitted outlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseRecordWire", into = "ExpenseRecordWire")]
pub struct ExpenseRecord {
    /// Unique identifier.
    pub id: String,
    /// Category, carrying its sub-field where one applies.
    pub category: ExpenseCategory,
    /// Free-text details.
    pub details: String,
    /// Positive monetary amount.
    pub amount: Decimal,
    /// Currency of `amount`.
    pub currency: Currency,
    /// English description.
    pub description_english: String,
    /// Bangla description.
    pub description_bangla: String,
    /// When the expense was incurred.
    pub date: DateTime<Utc>,
    /// Who paid.
    pub paid_by: String,
    /// Who approved.
    pub approved_by: Approver,
    /// Where the expense was entered, if known.
    pub location: Option<GeolocationFix>,
}

impl ExpenseRecord {
    /// The amount with two decimal places followed by the currency code.
    ///
    /// ```
    /// # use expense_report::models::Currency;
    /// # use rust_decimal::Decimal;
    /// # use std::str::FromStr;
    /// let line = expense_report::models::ExpenseRecord::format_amount(
    ///     Decimal::from_str("1234.5").unwrap(),
    ///     &Currency::Usd,
    /// );
    /// assert_eq!(line, "1234.50 USD");
    /// ```
    pub fn format_amount(amount: Decimal, currency: &Currency) -> String {
        format!("{:.2} {}", amount, currency)
    }

    /// [`format_amount`](Self::format_amount) for this record.
    pub fn amount_display(&self) -> String {
        Self::format_amount(self.amount, &self.currency)
    }
}

/// Flat JSON shape of an [`ExpenseRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecordWire {
    /// Unique identifier.
    pub id: String,
    /// Category label.
    #[serde(alias = "expenseFor")]
    pub expense_for: String,
    /// Employee name, for "Employee Expenses".
    #[serde(alias = "employeeName", default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    /// Panel name, for "Domain Panel Fund".
    #[serde(alias = "domainPanelName", default, skip_serializing_if = "Option::is_none")]
    pub domain_panel_name: Option<String>,
    /// Free-text details.
    #[serde(alias = "otherExpenseDetails")]
    pub other_expense_details: String,
    /// Monetary amount.
    pub amount: Decimal,
    /// Currency code.
    pub currency: Currency,
    /// English description.
    #[serde(alias = "descriptionEnglish")]
    pub description_english: String,
    /// Bangla description.
    #[serde(alias = "descriptionBangla")]
    pub description_bangla: String,
    /// When the expense was incurred.
    pub date: DateTime<Utc>,
    /// Who paid.
    #[serde(alias = "paidBy")]
    pub paid_by: String,
    /// Who approved.
    #[serde(alias = "approvedBy")]
    pub approved_by: Approver,
    /// Where the expense was entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeolocationFix>,
}

impl TryFrom<ExpenseRecordWire> for ExpenseRecord {
    type Error = ReportError;

    fn try_from(wire: ExpenseRecordWire) -> Result<Self, Self::Error> {
        let category = ExpenseCategory::from_parts(
            &wire.expense_for,
            wire.employee_name.as_deref(),
            wire.domain_panel_name.as_deref(),
        )?;
        if wire.amount <= Decimal::ZERO {
            return Err(ReportError::InvalidRecord {
                field: "amount".to_string(),
                message: "must be positive".to_string(),
            });
        }
        Ok(Self {
            id: wire.id,
            category,
            details: wire.other_expense_details,
            amount: wire.amount,
            currency: wire.currency,
            description_english: wire.description_english,
            description_bangla: wire.description_bangla,
            date: wire.date,
            paid_by: wire.paid_by,
            approved_by: wire.approved_by,
            location: wire.location,
        })
    }
}

impl From<ExpenseRecord> for ExpenseRecordWire {
    fn from(record: ExpenseRecord) -> Self {
        Self {
            id: record.id,
            expense_for: record.category.label().to_string(),
            employee_name: record.category.employee_name().map(str::to_string),
            domain_panel_name: record.category.panel_name().map(str::to_string),
            other_expense_details: record.details,
            amount: record.amount,
            currency: record.currency,
            description_english: record.description_english,
            description_bangla: record.description_bangla,
            date: record.date,
            paid_by: record.paid_by,
            approved_by: record.approved_by,
            location: record.location,
        }
    }
}
