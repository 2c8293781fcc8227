//! Request building and response parsing for the translation assistant.

use serde::{Deserialize, Serialize};

use crate::error::AssistantError;
use crate::models::{ExpenseRecord, GeolocationFix};

/// Shown to the assistant when no coordinates are known.
pub const LOCATION_UNAVAILABLE: &str = "User location not available";

/// What the assistant is asked to improve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    /// One-line summary of the expense.
    pub expense_details: String,
    /// The Bangla description already on the record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_translation: Option<String>,
    /// Where the expense was incurred, in words.
    pub expense_location: String,
}

/// The assistant's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSuggestion {
    /// Suggested Bangla description.
    pub optimized_translation: String,
    /// Why the wording was chosen.
    pub reasoning: String,
}

/// `Type: <category>, Amount: <amount> <currency>, Details: <details>, English Desc: <english>`
pub fn expense_details_summary(record: &ExpenseRecord) -> String {
    format!(
        "Type: {}, Amount: {} {}, Details: {}, English Desc: {}",
        record.category.label(),
        record.amount,
        record.currency,
        record.details,
        record.description_english
    )
}

/// The record's own fix, else `fallback`, else [`LOCATION_UNAVAILABLE`].
pub fn location_description(
    record_fix: Option<&GeolocationFix>,
    fallback: Option<&GeolocationFix>,
) -> String {
    record_fix
        .or(fallback)
        .map(GeolocationFix::describe)
        .unwrap_or_else(|| LOCATION_UNAVAILABLE.to_string())
}

impl OptimizationRequest {
    /// Builds the request for `record`.
    pub fn for_record(record: &ExpenseRecord, fallback: Option<&GeolocationFix>) -> Self {
        let current = record.description_bangla.trim();
        Self {
            expense_details: expense_details_summary(record),
            current_translation: (!current.is_empty()).then(|| current.to_string()),
            expense_location: location_description(record.location.as_ref(), fallback),
        }
    }
}

/// Renders the instruction text sent to a language model.
pub fn build_prompt(request: &OptimizationRequest) -> String {
    format!(
        "You are an expert in Bangla translation and financial compliance.\n\
         \n\
         Given the following expense details, current translation, and expense location, \
         recommend a Bangla translation that optimizes financial compliance for tax purposes.\n\
         \n\
         Expense Details: {}\n\
         Current Translation: {}\n\
         Expense Location: {}\n\
         \n\
         Provide the optimized translation and a brief explanation of why the translation \
         was optimized for financial compliance.\n\
         \n\
         Return the response in the following JSON format:\n\
         {{\n  \"optimizedTranslation\": \"<optimized Bangla translation>\",\n  \
         \"reasoning\": \"<explanation of optimization>\"\n}}",
        request.expense_details,
        request.current_translation.as_deref().unwrap_or(""),
        request.expense_location
    )
}

/// Reads a suggestion from raw model output.
///
/// The JSON object may be wrapped in a ```` ```json ```` fence.
pub fn parse_suggestion(raw: &str) -> Result<OptimizationSuggestion, AssistantError> {
    let body = strip_fence(raw.trim());
    let suggestion: OptimizationSuggestion =
        serde_json::from_str(body).map_err(|e| AssistantError::MalformedResponse {
            message: e.to_string(),
        })?;
    if suggestion.optimized_translation.trim().is_empty() {
        return Err(AssistantError::MalformedResponse {
            message: "optimizedTranslation is empty".to_string(),
        });
    }
    Ok(suggestion)
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
