//! Application state for the expense report API.

use std::sync::Arc;

use crate::assistant::{TranslationAssistant, UnconfiguredAssistant};
use crate::config::ConfigLoader;
use crate::store::ExpenseRepository;

/// Shared application state.
///
/// Holds the loaded configuration and the two external collaborators.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    repository: Arc<ExpenseRepository>,
    assistant: Arc<dyn TranslationAssistant>,
}

impl AppState {
    /// Creates the state from explicit collaborators.
    pub fn new(
        config: ConfigLoader,
        repository: ExpenseRepository,
        assistant: Arc<dyn TranslationAssistant>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            repository: Arc::new(repository),
            assistant,
        }
    }

    /// Builds the configured store and no translation assistant.
    pub fn from_config(config: ConfigLoader) -> Self {
        let repository = ExpenseRepository::from_config(&config.service().store);
        Self::new(config, repository, Arc::new(UnconfiguredAssistant))
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the expense repository.
    pub fn repository(&self) -> &ExpenseRepository {
        &self.repository
    }

    /// Returns the translation assistant.
    pub fn assistant(&self) -> &dyn TranslationAssistant {
        self.assistant.as_ref()
    }
}
