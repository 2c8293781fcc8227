//! Expense tracking service with paginated PDF reports.
//!
//! Expense records are entered, stored and searched, and rendered into a
//! printable A4 report. The report layout engine in [`layout`] handles text
//! measurement, word wrapping and page breaks; everything else is a thin
//! boundary around external collaborators.

#![warn(missing_docs)]

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod store;
