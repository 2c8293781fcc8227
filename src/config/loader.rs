//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading report and
//! service configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{ReportError, ReportResult};

use super::types::{ReportConfig, ServiceConfig};

/// Environment variable that overrides the store project id.
pub const PROJECT_ID_ENV: &str = "EXPENSE_STORE_PROJECT_ID";

/// Loads and provides access to the service configuration.
///
/// # Directory Structure
///
/// ```text
/// config/snbd/
/// ├── report.yaml   # Page geometry, typography, branding
/// └── service.yaml  # Listener and store settings
/// ```
///
/// # Example
///
/// ```no_run
/// use expense_report::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/snbd").unwrap();
/// println!("Reports for {}", loader.report().organization);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    report: ReportConfig,
    service: ServiceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Both files must exist. After loading, [`PROJECT_ID_ENV`] replaces the
    /// store project id when it is set and non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The report geometry leaves no writable area
    pub fn load<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let path = path.as_ref();

        let report = Self::load_yaml::<ReportConfig>(&path.join("report.yaml"))?;
        report.validate()?;
        let service = Self::load_yaml::<ServiceConfig>(&path.join("service.yaml"))?;

        let mut loader = Self::new(report, service);
        loader.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(loader)
    }

    /// Builds a loader from already-constructed parts.
    pub fn new(report: ReportConfig, service: ServiceConfig) -> Self {
        Self { report, service }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ReportResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ReportError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ReportError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(project_id) = lookup(PROJECT_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.service.store.project_id = Some(project_id);
        }
    }

    /// Returns the report layout configuration.
    pub fn report(&self) -> &ReportConfig {
        &self.report
    }

    /// Returns the service configuration.
    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreBackend;

    fn config_path() -> &'static str {
        "./config/snbd"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.report().organization, "SNBD HOST");
        assert_eq!(loader.report().filename_prefix, "SNBD");
        assert_eq!(loader.service().store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_loaded_report_matches_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let defaults = ReportConfig::default();
        assert_eq!(loader.report().margin_top, defaults.margin_top);
        assert_eq!(loader.report().line_spacing, defaults.line_spacing);
        assert_eq!(loader.report().date_format, defaults.date_format);
        assert!((loader.report().page_height - defaults.page_height).abs() < 0.01);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(ReportError::ConfigNotFound { path }) => {
                assert!(path.contains("report.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_env_override_sets_project_id() {
        let mut loader = ConfigLoader::default();
        loader.apply_env_overrides(|key| {
            (key == PROJECT_ID_ENV).then(|| "snbd-expenses".to_string())
        });
        assert_eq!(
            loader.service().store.project_id.as_deref(),
            Some("snbd-expenses")
        );
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let mut loader = ConfigLoader::default();
        loader.service.store.project_id = Some("from-yaml".to_string());
        loader.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(
            loader.service().store.project_id.as_deref(),
            Some("from-yaml")
        );
    }
}
