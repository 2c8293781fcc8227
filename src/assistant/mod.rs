//! Translation assistant boundary.
//!
//! An assistant suggests Bangla wording for an expense description. It is
//! an external collaborator reached through [`TranslationAssistant`]; this
//! module only builds the request and interprets the answer. A failed call
//! is reported once to the caller and the record keeps its description.

mod prompt;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::AssistantError;
use crate::models::{ExpenseRecord, GeolocationFix};

pub use prompt::{
    LOCATION_UNAVAILABLE, OptimizationRequest, OptimizationSuggestion, build_prompt,
    expense_details_summary, location_description, parse_suggestion,
};

/// Something that can suggest a Bangla translation.
#[async_trait]
pub trait TranslationAssistant: Send + Sync {
    /// Asks for one suggestion. Implementations must not retry.
    async fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationSuggestion, AssistantError>;
}

/// Used when no assistant backend is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredAssistant;

#[async_trait]
impl TranslationAssistant for UnconfiguredAssistant {
    async fn optimize(
        &self,
        _request: &OptimizationRequest,
    ) -> Result<OptimizationSuggestion, AssistantError> {
        Err(AssistantError::Unavailable {
            message: "no translation assistant is configured".to_string(),
        })
    }
}

/// Requests a suggestion for `record`.
///
/// Any failure, including a malformed answer, comes back as
/// [`AssistantError::Unavailable`].
pub async fn run_tax_optimization(
    assistant: &dyn TranslationAssistant,
    record: &ExpenseRecord,
    fallback_location: Option<&GeolocationFix>,
) -> Result<OptimizationSuggestion, AssistantError> {
    let request = OptimizationRequest::for_record(record, fallback_location);
    match assistant.optimize(&request).await {
        Ok(suggestion) => {
            info!(record = %record.id, "Translation suggestion received");
            Ok(suggestion)
        }
        Err(AssistantError::Unavailable { message }) => {
            warn!(record = %record.id, error = %message, "Translation assistant failed");
            Err(AssistantError::Unavailable { message })
        }
        Err(e) => {
            warn!(record = %record.id, error = %e, "Translation assistant failed");
            Err(AssistantError::Unavailable {
                message: e.to_string(),
            })
        }
    }
}

/// Replaces the record's Bangla description with the suggestion.
pub fn apply_suggestion(record: &mut ExpenseRecord, suggestion: &OptimizationSuggestion) {
    record.description_bangla = suggestion.optimized_translation.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Approver, Currency, ExpenseCategory};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    struct RecordingAssistant {
        reply: Result<&'static str, ()>,
        seen: Mutex<Vec<OptimizationRequest>>,
    }

    #[async_trait]
    impl TranslationAssistant for RecordingAssistant {
        async fn optimize(
            &self,
            request: &OptimizationRequest,
        ) -> Result<OptimizationSuggestion, AssistantError> {
            self.seen.lock().unwrap().push(request.clone());
            match self.reply {
                Ok(raw) => parse_suggestion(raw),
                Err(()) => Err(AssistantError::Unavailable {
                    message: "timeout".to_string(),
                }),
            }
        }
    }

    fn assistant(reply: Result<&'static str, ()>) -> RecordingAssistant {
        RecordingAssistant {
            reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn record() -> ExpenseRecord {
        ExpenseRecord {
            id: "exp_2".to_string(),
            category: ExpenseCategory::Vps,
            details: "Droplet".to_string(),
            amount: Decimal::from(20),
            currency: Currency::Usd,
            description_english: "Hosting".to_string(),
            description_bangla: "হোস্টিং".to_string(),
            date: Utc::now(),
            paid_by: "Card".to_string(),
            approved_by: Approver::YeaminAdib,
            location: None,
        }
    }

    #[tokio::test]
    async fn test_suggestion_is_returned_and_applied() {
        let mock = assistant(Ok(r#"{"optimizedTranslation": "সার্ভার হোস্টিং", "reasoning": "r"}"#));
        let mut rec = record();
        let fallback = GeolocationFix::new(23.5, 90.25);

        let suggestion = run_tax_optimization(&mock, &rec, Some(&fallback))
            .await
            .unwrap();
        apply_suggestion(&mut rec, &suggestion);
        assert_eq!(rec.description_bangla, "সার্ভার হোস্টিং");

        let seen = mock.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].expense_location, "Latitude: 23.5, Longitude: 90.25");
        assert_eq!(seen[0].current_translation.as_deref(), Some("হোস্টিং"));
    }

    #[tokio::test]
    async fn test_failure_is_single_error_without_retry() {
        let mock = assistant(Err(()));
        let result = run_tax_optimization(&mock, &record(), None).await;
        assert!(matches!(result, Err(AssistantError::Unavailable { .. })));
        assert_eq!(mock.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_answer_becomes_unavailable() {
        let mock = assistant(Ok("no json here"));
        match run_tax_optimization(&mock, &record(), None).await {
            Err(AssistantError::Unavailable { message }) => {
                assert!(message.starts_with("Malformed assistant response"))
            }
            other => panic!("Expected Unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_assistant_fails() {
        let result = run_tax_optimization(&UnconfiguredAssistant, &record(), None).await;
        assert!(result.is_err());
    }
}
