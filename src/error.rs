//! Error types for the expense report service.
//!
//! Each collaborator boundary gets its own `thiserror` enum so callers can
//! tell a failed report apart from a failed save or a failed translation.

use thiserror::Error;

/// Errors raised while building or serializing a report.
///
/// Every variant is fatal for the whole report-generation call; no partial
/// document is ever returned alongside one of these.
///
/// # Example
///
/// ```
/// use expense_report::error::ReportError;
///
/// let error = ReportError::ConfigNotFound {
///     path: "/missing/report.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/report.yaml");
/// ```
#[derive(Debug, Error)]
pub enum ReportError {
    /// A character cannot be encoded (and therefore measured) in the base font.
    #[error("Cannot measure character {ch:?} in field '{field}' with the base font")]
    UnencodableCharacter {
        /// The offending character.
        ch: char,
        /// The record field or report line the character came from.
        field: String,
    },

    /// The page geometry leaves no writable area.
    #[error("Invalid page layout: {message}")]
    InvalidLayout {
        /// A description of the geometry problem.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An expense record failed validation.
    #[error("Invalid expense field '{field}': {message}")]
    InvalidRecord {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return ReportError.
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors raised by the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Required server configuration is absent.
    #[error("Server configuration error: {key} is missing")]
    MissingConfiguration {
        /// The configuration key or environment variable that is missing.
        key: String,
    },

    /// The backing store rejected or failed the operation.
    #[error("Store backend error: {message}")]
    Backend {
        /// A description of the failure.
        message: String,
    },

    /// Reading or writing the store file failed.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded.
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by the translation assistant boundary.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The assistant could not be reached or refused the request.
    #[error("Failed to get tax optimization suggestions: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },

    /// The assistant answered with something that is not a suggestion.
    #[error("Malformed assistant response: {message}")]
    MalformedResponse {
        /// A description of what was wrong with the response.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unencodable_character_displays_char_and_field() {
        let error = ReportError::UnencodableCharacter {
            ch: 'ক',
            field: "description_bangla".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot measure character 'ক' in field 'description_bangla' with the base font"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = ReportError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_record_displays_field_and_message() {
        let error = ReportError::InvalidRecord {
            field: "amount".to_string(),
            message: "must be positive".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid expense field 'amount': must be positive"
        );
    }

    #[test]
    fn test_missing_configuration_displays_key() {
        let error = StoreError::MissingConfiguration {
            key: "EXPENSE_STORE_PROJECT_ID".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Server configuration error: EXPENSE_STORE_PROJECT_ID is missing"
        );
    }

    #[test]
    fn test_store_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: StoreError = io.into();
        assert!(matches!(error, StoreError::Io(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<ReportError>();
        assert_error::<StoreError>();
        assert_error::<AssistantError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn fails() -> ReportResult<()> {
            Err(ReportError::InvalidLayout {
                message: "no content width".to_string(),
            })
        }

        fn propagates() -> ReportResult<()> {
            fails()?;
            Ok(())
        }

        assert!(propagates().is_err());
    }
}
