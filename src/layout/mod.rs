//! Report layout and PDF output.
//!
//! Layout is a single pass over the records. A [`PageWriter`] holds the
//! vertical cursor and starts a new page whenever a line would otherwise
//! land too close to the bottom margin. The finished [`ReportDocument`] is
//! plain data and is serialized separately by [`render_pdf`].
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use expense_report::config::ReportConfig;
//! use expense_report::layout::generate_report;
//!
//! let report = generate_report(&[], None, &ReportConfig::default(), Utc::now()).unwrap();
//! assert_eq!(report.page_count, 1);
//! assert!(report.bytes.starts_with(b"%PDF-"));
//! ```

mod metrics;
mod pdf;
mod report;
mod wrap;
mod writer;

pub use metrics::{BASE_FONT, FontMetrics, Helvetica, UnencodableChar, encode_winansi, prepare_text};
pub use pdf::render_pdf;
pub use report::{
    GeneratedReport, emit_header, emit_record, emit_signature, generate_report, layout_report,
    report_filename,
};
pub use wrap::wrap_text;
pub use writer::{DrawOp, Page, PageWriter, ReportDocument};
