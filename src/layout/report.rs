//! Report emission: header, one block per record, signature.

use chrono::{DateTime, Utc};

use crate::config::ReportConfig;
use crate::error::ReportResult;
use crate::models::{ExpenseRecord, GeolocationFix};

use super::metrics::{Helvetica, prepare_text};
use super::pdf::render_pdf;
use super::wrap::wrap_text;
use super::writer::{PageWriter, ReportDocument};

/// A serialized report ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// The PDF bytes.
    pub bytes: Vec<u8>,
    /// Number of pages in the document.
    pub page_count: usize,
    /// Suggested download name.
    pub filename: String,
}

/// Suggested file name: `<prefix>_Expense_Report_<YYYY-MM-DD>.pdf`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use expense_report::layout::report_filename;
///
/// let at = Utc.with_ymd_and_hms(2025, 6, 30, 18, 5, 0).unwrap();
/// assert_eq!(report_filename("SNBD", at), "SNBD_Expense_Report_2025-06-30.pdf");
/// ```
pub fn report_filename(prefix: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "{}_Expense_Report_{}.pdf",
        prefix,
        generated_at.format("%Y-%m-%d")
    )
}

/// Lays out and serializes a report.
///
/// Records are emitted in the order given. Nothing is returned unless every
/// line could be measured and the document serialized.
pub fn generate_report(
    records: &[ExpenseRecord],
    location: Option<&GeolocationFix>,
    config: &ReportConfig,
    generated_at: DateTime<Utc>,
) -> ReportResult<GeneratedReport> {
    let document = layout_report(records, location, config, generated_at)?;
    let bytes = render_pdf(&document, config)?;

    Ok(GeneratedReport {
        bytes,
        page_count: document.page_count(),
        filename: report_filename(&config.filename_prefix, generated_at),
    })
}

/// Lays out a report without serializing it.
pub fn layout_report(
    records: &[ExpenseRecord],
    location: Option<&GeolocationFix>,
    config: &ReportConfig,
    generated_at: DateTime<Utc>,
) -> ReportResult<ReportDocument> {
    config.validate()?;
    let mut writer = PageWriter::new(config);

    emit_header(&mut writer, location, generated_at)?;
    for record in records {
        emit_record(&mut writer, record)?;
    }
    emit_signature(&mut writer)?;

    Ok(writer.finish())
}

/// Title, timestamp and optional location, followed by a section gap.
pub fn emit_header(
    writer: &mut PageWriter<'_>,
    location: Option<&GeolocationFix>,
    generated_at: DateTime<Utc>,
) -> ReportResult<()> {
    let config = writer.config().clone();
    let x = config.margin_left;

    let title = prepare_text(
        &format!("{} Expense Report", config.organization),
        "organization",
        config.unencodable,
    )?;
    writer.write_line(
        x,
        config.title_font_size,
        title,
        config.title_font_size + config.section_spacing / 2.0,
    );

    let meta_advance = config.meta_font_size + 5.0;
    writer.write_line(
        x,
        config.meta_font_size,
        format!(
            "Generated on: {}",
            generated_at.format(&config.timestamp_format)
        ),
        meta_advance,
    );
    if let Some(fix) = location {
        writer.write_line(x, config.meta_font_size, fix.report_line(), meta_advance);
    }

    writer.advance(config.section_spacing);
    Ok(())
}

/// Emits one record's labeled lines and wrapped text blocks.
///
/// A block heading is checked for space like any other line, but it is not
/// kept together with its first wrapped line.
pub fn emit_record(writer: &mut PageWriter<'_>, record: &ExpenseRecord) -> ReportResult<()> {
    let config = writer.config().clone();
    let policy = config.unencodable;
    let size = config.body_font_size;
    let step = config.line_spacing;
    let x = config.margin_left;
    let indented = x + config.content_indent;

    let label = |heading: &str, value: &str, field: &str| -> ReportResult<String> {
        Ok(format!("{}: {}", heading, prepare_text(value, field, policy)?))
    };

    writer.write_line(
        x,
        size,
        label("Expense For", record.category.label(), "expense_for")?,
        step,
    );
    if let Some((heading, value)) = record.category.sub_field() {
        writer.write_line(indented, size, label(heading, value, "sub_field")?, step);
    }
    writer.write_line(
        x,
        size,
        label("Amount", &record.amount_display(), "amount")?,
        step,
    );
    writer.write_line(
        x,
        size,
        format!("Date: {}", record.date.format(&config.date_format)),
        step,
    );
    writer.write_line(x, size, label("Paid By", &record.paid_by, "paid_by")?, step);
    writer.write_line(
        x,
        size,
        label("Approved By", record.approved_by.as_str(), "approved_by")?,
        step,
    );

    let blocks = [
        ("Details:", record.details.as_str(), "other_expense_details"),
        ("Desc (EN):", record.description_english.as_str(), "description_english"),
        ("Desc (BN):", record.description_bangla.as_str(), "description_bangla"),
    ];
    for (heading, text, field) in blocks {
        let prepared = prepare_text(text, field, policy)?;
        let lines = wrap_text(&prepared, config.wrap_width(), &Helvetica, size)
            .map_err(|e| e.in_field(field))?;
        writer.write_line(x, size, heading, step);
        for line in lines {
            writer.write_line(indented, size, line, step);
        }
    }

    writer.advance(config.section_spacing / 2.0);
    Ok(())
}

/// Emits the signature label and rule.
///
/// The block follows the last record when it fits; otherwise it opens a new
/// page at the top margin.
pub fn emit_signature(writer: &mut PageWriter<'_>) -> ReportResult<()> {
    let config = writer.config().clone();
    writer.reserve(config.signature_block_height);

    let label = prepare_text(
        &format!("Authorized by {}", config.organization),
        "organization",
        config.unencodable,
    )?;
    let label_y = writer.cursor_y();
    let rule_y = label_y - config.line_spacing;
    writer.draw_text(config.margin_left, label_y, config.body_font_size, label);
    writer.draw_rule(config.margin_left, rule_y, config.signature_rule_length, 1.0);
    writer.advance(config.line_spacing);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnencodablePolicy;
    use crate::error::ReportError;
    use crate::layout::DrawOp;
    use crate::models::{Approver, Currency, ExpenseCategory};
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 30, 9, 15, 0).unwrap()
    }

    fn record(category: ExpenseCategory) -> ExpenseRecord {
        ExpenseRecord {
            id: "exp_001".to_string(),
            category,
            details: "Monthly droplet".to_string(),
            amount: Decimal::from_str("1234.5").unwrap(),
            currency: Currency::Usd,
            description_english: "Server rent for June".to_string(),
            description_bangla: "June mash er server bhara".to_string(),
            date: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            paid_by: "Accounts".to_string(),
            approved_by: Approver::YeaminAdib,
            location: None,
        }
    }

    fn layout(records: &[ExpenseRecord], fix: Option<&GeolocationFix>) -> ReportDocument {
        layout_report(records, fix, &ReportConfig::default(), at()).unwrap()
    }

    #[test]
    fn test_empty_report_has_title_timestamp_and_signature() {
        let doc = layout(&[], None);
        assert_eq!(doc.page_count(), 1);

        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(
            lines,
            vec![
                "SNBD HOST Expense Report",
                "Generated on: 2025-06-30 09:15:00 UTC",
                "Authorized by SNBD HOST",
            ]
        );
        assert!(doc.pages()[0]
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::Rule { length, .. } if *length == 200.0)));
    }

    #[test]
    fn test_location_line_uses_four_decimals() {
        let fix = GeolocationFix::new(23.810332, 90.412518);
        let doc = layout(&[], Some(&fix));
        assert!(doc.pages()[0].contains_line("Location: Lat 23.8103, Lon 90.4125"));
    }

    #[test]
    fn test_record_lines_in_order() {
        let doc = layout(&[record(ExpenseCategory::Vps)], None);
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(
            &lines[2..14],
            &[
                "Expense For: VPS",
                "Amount: 1234.50 USD",
                "Date: 2025-06-01",
                "Paid By: Accounts",
                "Approved By: YEAMIN ADIB",
                "Details:",
                "Monthly droplet",
                "Desc (EN):",
                "Server rent for June",
                "Desc (BN):",
                "June mash er server bhara",
                "Authorized by SNBD HOST",
            ]
        );
    }

    #[test]
    fn test_employee_name_line_only_for_employee_expenses() {
        let employee = record(ExpenseCategory::EmployeeExpenses {
            employee_name: "Tanvir".to_string(),
        });
        let doc = layout(&[employee], None);
        assert!(doc.pages()[0].contains_line("Employee Name: Tanvir"));

        let doc = layout(&[record(ExpenseCategory::License)], None);
        assert!(!doc.lines().any(|l| l.starts_with("Employee Name")));
    }

    #[test]
    fn test_sub_field_is_indented() {
        let panel = record(ExpenseCategory::DomainPanelFund {
            panel_name: "ResellerOne".to_string(),
        });
        let doc = layout(&[panel], None);
        let x = doc.pages()[0].ops().iter().find_map(|op| match op {
            DrawOp::Text { x, text, .. } if text == "Domain Panel: ResellerOne" => Some(*x),
            _ => None,
        });
        assert_eq!(x, Some(82.0));
    }

    #[test]
    fn test_long_details_spill_onto_second_page() {
        let mut long = record(ExpenseCategory::Vps);
        long.details = vec!["reimbursement"; 300].join(" ");
        let doc = layout(&[long], None);
        assert!(doc.page_count() >= 2);
        assert_eq!(doc.lines().last(), Some("Authorized by SNBD HOST"));
    }

    #[test]
    fn test_empty_block_emits_one_blank_line() {
        let mut rec = record(ExpenseCategory::Vps);
        rec.details = String::new();
        let doc = layout(&[rec], None);
        let lines: Vec<&str> = doc.lines().collect();
        let heading = lines.iter().position(|l| *l == "Details:").unwrap();
        assert_eq!(lines[heading + 1], "");
        assert_eq!(lines[heading + 2], "Desc (EN):");
    }

    #[test]
    fn test_signature_moves_to_new_page_when_space_is_short() {
        let config = ReportConfig::default();
        let mut writer = PageWriter::new(&config);
        writer.advance(config.content_height() - 40.0);
        emit_signature(&mut writer).unwrap();

        let doc = writer.finish();
        assert_eq!(doc.page_count(), 2);
        match &doc.pages()[1].ops()[0] {
            DrawOp::Text { y, text, .. } => {
                assert_eq!(*y, config.top_y());
                assert_eq!(text, "Authorized by SNBD HOST");
            }
            other => panic!("Expected signature text, got {:?}", other),
        }
    }

    #[test]
    fn test_signature_follows_last_record_when_it_fits() {
        let config = ReportConfig::default();
        let mut writer = PageWriter::new(&config);
        emit_record(&mut writer, &record(ExpenseCategory::Vps)).unwrap();
        let expected_y = writer.cursor_y();
        emit_signature(&mut writer).unwrap();

        let doc = writer.finish();
        assert_eq!(doc.page_count(), 1);
        let sig_y = doc.pages()[0].ops().iter().find_map(|op| match op {
            DrawOp::Text { y, text, .. } if text.starts_with("Authorized") => Some(*y),
            _ => None,
        });
        assert_eq!(sig_y, Some(expected_y));
    }

    #[test]
    fn test_bangla_text_fails_whole_report() {
        let mut rec = record(ExpenseCategory::Vps);
        rec.description_bangla = "সার্ভার ভাড়া".to_string();

        let result = layout_report(&[rec], None, &ReportConfig::default(), at());
        match result {
            Err(ReportError::UnencodableCharacter { field, .. }) => {
                assert_eq!(field, "description_bangla")
            }
            other => panic!("Expected UnencodableCharacter, got {:?}", other),
        }
    }

    #[test]
    fn test_replace_policy_renders_placeholder() {
        let mut rec = record(ExpenseCategory::Vps);
        rec.description_bangla = "খরচ".to_string();
        let config = ReportConfig {
            unencodable: UnencodablePolicy::Replace,
            ..ReportConfig::default()
        };

        let doc = layout_report(&[rec], None, &config, at()).unwrap();
        assert!(doc.pages()[0].contains_line("???"));
    }

    #[test]
    fn test_bad_timestamp_format_is_an_error() {
        let config = ReportConfig {
            timestamp_format: "%Y-%m-%d %".to_string(),
            ..ReportConfig::default()
        };

        let result = layout_report(&[record(ExpenseCategory::Vps)], None, &config, at());
        assert!(matches!(result, Err(ReportError::InvalidLayout { .. })));
    }

    #[test]
    fn test_generate_report_returns_pdf_and_filename() {
        let report = generate_report(
            &[record(ExpenseCategory::Vps)],
            None,
            &ReportConfig::default(),
            at(),
        )
        .unwrap();
        assert!(report.bytes.starts_with(b"%PDF-"));
        assert_eq!(report.page_count, 1);
        assert_eq!(report.filename, "SNBD_Expense_Report_2025-06-30.pdf");
    }
}
