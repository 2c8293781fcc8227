//! Free-text search over expense records.

use super::ExpenseRecord;

/// Returns the records matching `term`, preserving order.
///
/// A blank term matches everything. Otherwise the match is a case-insensitive
/// substring test against every text, amount and date field; the id and the
/// location are not searched. Dates are compared in `date_format`.
pub fn filter_expenses<'a>(
    records: &'a [ExpenseRecord],
    term: &str,
    date_format: &str,
) -> Vec<&'a ExpenseRecord> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| matches(record, &term, date_format))
        .collect()
}

fn matches(record: &ExpenseRecord, term: &str, date_format: &str) -> bool {
    let date = record.date.format(date_format).to_string();
    let amount = record.amount.normalize().to_string();
    let mut fields = vec![
        record.category.label(),
        record.details.as_str(),
        amount.as_str(),
        record.currency.as_str(),
        record.description_english.as_str(),
        record.description_bangla.as_str(),
        date.as_str(),
        record.paid_by.as_str(),
        record.approved_by.as_str(),
    ];
    if let Some((_, value)) = record.category.sub_field() {
        fields.push(value);
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(term))
}
