//! Configuration types for report layout and the service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every field has a default,
//! so a YAML file only needs to name the values it changes.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// What to do with characters the base font cannot encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnencodablePolicy {
    /// Abort report generation.
    #[default]
    Fail,
    /// Substitute `?` and carry on.
    Replace,
}

/// Page geometry, typography and branding of the generated report.
///
/// The defaults are an A4 page with one-inch margins and 10pt Helvetica body
/// text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Organisation named in the title and the signature block.
    pub organization: String,
    /// Prefix of the suggested file name.
    pub filename_prefix: String,
    /// Page width in points.
    pub page_width: f32,
    /// Page height in points.
    pub page_height: f32,
    /// Top margin in points.
    pub margin_top: f32,
    /// Bottom margin in points.
    pub margin_bottom: f32,
    /// Left margin in points.
    pub margin_left: f32,
    /// Right margin in points.
    pub margin_right: f32,
    /// Size of record lines.
    pub body_font_size: f32,
    /// Size of the title line.
    pub title_font_size: f32,
    /// Size of the timestamp and location lines.
    pub meta_font_size: f32,
    /// Vertical advance after each record line.
    pub line_spacing: f32,
    /// Gap after the header; half of it separates records.
    pub section_spacing: f32,
    /// A new page starts when less than this remains above the bottom margin.
    pub min_remaining_space: f32,
    /// Space reserved for the signature block.
    pub signature_block_height: f32,
    /// Horizontal offset of sub-field and wrapped lines.
    pub content_indent: f32,
    /// Width taken off the content width when wrapping.
    pub wrap_indent: f32,
    /// Length of the signature rule.
    pub signature_rule_length: f32,
    /// `chrono` format of record dates and file-name dates.
    pub date_format: String,
    /// `chrono` format of the "generated on" timestamp.
    pub timestamp_format: String,
    /// Handling of characters outside the base font encoding.
    pub unencodable: UnencodablePolicy,
    /// Deflate page content streams.
    pub compress: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            organization: "SNBD HOST".to_string(),
            filename_prefix: "SNBD".to_string(),
            page_width: 595.28,
            page_height: 841.89,
            margin_top: 72.0,
            margin_bottom: 72.0,
            margin_left: 72.0,
            margin_right: 72.0,
            body_font_size: 10.0,
            title_font_size: 20.0,
            meta_font_size: 8.0,
            line_spacing: 15.0,
            section_spacing: 20.0,
            min_remaining_space: 50.0,
            signature_block_height: 50.0,
            content_indent: 10.0,
            wrap_indent: 20.0,
            signature_rule_length: 200.0,
            date_format: "%Y-%m-%d".to_string(),
            timestamp_format: "%Y-%m-%d %H:%M:%S UTC".to_string(),
            unencodable: UnencodablePolicy::Fail,
            compress: true,
        }
    }
}

impl ReportConfig {
    /// Writable width between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Writable height between the top and bottom margins.
    pub fn content_height(&self) -> f32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Width available to wrapped free-text lines.
    pub fn wrap_width(&self) -> f32 {
        self.content_width() - self.wrap_indent
    }

    /// Vertical position of the first line on a page.
    pub fn top_y(&self) -> f32 {
        self.page_height - self.margin_top
    }

    /// Checks that the geometry leaves room to write.
    pub fn validate(&self) -> ReportResult<()> {
        if self.wrap_width() <= 0.0 {
            return Err(ReportError::InvalidLayout {
                message: format!(
                    "content width {} leaves no room for wrapped text",
                    self.content_width()
                ),
            });
        }
        if self.content_height() <= self.min_remaining_space {
            return Err(ReportError::InvalidLayout {
                message: format!(
                    "content height {} does not exceed the minimum remaining space {}",
                    self.content_height(),
                    self.min_remaining_space
                ),
            });
        }
        if self.body_font_size <= 0.0 || self.line_spacing <= 0.0 {
            return Err(ReportError::InvalidLayout {
                message: "font size and line spacing must be positive".to_string(),
            });
        }
        check_format("date_format", &self.date_format)?;
        check_format("timestamp_format", &self.timestamp_format)?;
        Ok(())
    }
}

/// Rejects strftime patterns chrono cannot render.
fn check_format(name: &str, format: &str) -> ReportResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ReportError::InvalidLayout {
            message: format!("{} '{}' is not a valid date format", name, format),
        });
    }
    Ok(())
}

/// Where expense documents are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process memory; lost on restart.
    #[default]
    Memory,
    /// A JSON file on disk.
    File {
        /// Path of the JSON file.
        path: PathBuf,
    },
}

/// Persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend selection.
    pub backend: StoreBackend,
    /// Project the documents belong to; saves are refused without one.
    pub project_id: Option<String>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Service configuration from service.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Persistence.
    pub store: StoreConfig,
}
