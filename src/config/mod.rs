//! Configuration loading and management.
//!
//! This module loads report layout settings and service settings from YAML
//! files in a configuration directory.
//!
//! # Example
//!
//! ```no_run
//! use expense_report::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/snbd").unwrap();
//! println!("Page width: {}pt", config.report().page_width);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, PROJECT_ID_ENV};
pub use types::{
    ReportConfig, ServerConfig, ServiceConfig, StoreBackend, StoreConfig, UnencodablePolicy,
};
