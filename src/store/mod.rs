//! Expense persistence.
//!
//! The [`DocumentStore`] trait is the backend seam: an in-memory store for
//! tests and development, and a JSON file store for single-node use. The
//! [`ExpenseRepository`] turns expense records into documents and back.

mod document;
mod repository;

pub use document::{
    DocumentStore, JsonFileDocumentStore, MemoryDocumentStore, StoredDocument, sort_by_date_desc,
};
pub use repository::{EXPENSES_COLLECTION, ExpenseRepository, SaveOutcome, decode_with_defaults};
