//! Core data models for the expense report service.
//!
//! This module contains the expense record, its enumerated fields, the
//! geolocation fix and the intake/search helpers built on them.

mod expense;
mod geolocation;
mod intake;
mod search;

pub use expense::{
    Approver, Currency, DOMAIN_PANEL_FUND, EMPLOYEE_EXPENSES, ExpenseCategory, ExpenseRecord,
    ExpenseRecordWire,
};
pub use geolocation::GeolocationFix;
pub use intake::NewExpense;
pub use search::filter_expenses;
