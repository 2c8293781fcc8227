//! The page writer: an in-memory document plus a vertical cursor.
//!
//! [`PageWriter`] owns every page built so far and the position of the next
//! line. Free functions in the report module drive it line by line; the
//! writer decides when a new page is needed.

use tracing::debug;

use crate::config::ReportConfig;

/// A drawing operation on a page. Coordinates are PDF points from the
/// bottom-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A single line of text with its baseline at `y`.
    Text {
        /// Left edge of the text.
        x: f32,
        /// Baseline.
        y: f32,
        /// Font size in points.
        size: f32,
        /// The text, already prepared for the base font.
        text: String,
    },
    /// A horizontal rule.
    Rule {
        /// Start of the rule.
        x: f32,
        /// Vertical position.
        y: f32,
        /// Length of the rule.
        length: f32,
        /// Stroke width.
        thickness: f32,
    },
}

/// One page of the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    /// The drawing operations in emission order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// The text of every line on the page, top to bottom.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }

    /// Whether any line on the page equals `text`.
    pub fn contains_line(&self, text: &str) -> bool {
        self.texts().any(|t| t == text)
    }
}

/// A laid-out report: fixed-size pages in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    width: f32,
    height: f32,
    pages: Vec<Page>,
}

impl ReportDocument {
    /// Page width in points.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Page height in points.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The pages in order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every line of text in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }
}

/// Builds pages and tracks where the next line goes.
#[derive(Debug)]
pub struct PageWriter<'a> {
    config: &'a ReportConfig,
    pages: Vec<Page>,
    cursor_y: f32,
}

impl<'a> PageWriter<'a> {
    /// Starts a document with one empty page and the cursor at the top margin.
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            config,
            pages: vec![Page::default()],
            cursor_y: config.top_y(),
        }
    }

    /// The layout configuration the writer was created with.
    pub fn config(&self) -> &ReportConfig {
        self.config
    }

    /// Vertical position of the next line.
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    /// Space left above the bottom margin.
    pub fn remaining(&self) -> f32 {
        self.cursor_y - self.config.margin_bottom
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Appends a page and moves the cursor back to the top margin.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor_y = self.config.top_y();
        debug!(page = self.pages.len(), "Started new report page");
    }

    /// Starts a new page when less than `needed` points remain.
    ///
    /// Returns `true` if a page was added.
    pub fn reserve(&mut self, needed: f32) -> bool {
        if self.remaining() < needed {
            self.new_page();
            true
        } else {
            false
        }
    }

    /// Moves the cursor down without drawing.
    pub fn advance(&mut self, amount: f32) {
        self.cursor_y -= amount;
    }

    /// Emits one line of text at `x`, then moves the cursor down by `advance`.
    ///
    /// Space is checked before drawing: if less than the configured minimum
    /// remains, the line goes to the top of a new page.
    pub fn write_line(&mut self, x: f32, size: f32, text: impl Into<String>, advance: f32) {
        self.reserve(self.config.min_remaining_space);
        let y = self.cursor_y;
        self.push(DrawOp::Text {
            x,
            y,
            size,
            text: text.into(),
        });
        self.cursor_y -= advance;
    }

    /// Draws text at an explicit position on the current page.
    pub fn draw_text(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>) {
        self.push(DrawOp::Text {
            x,
            y,
            size,
            text: text.into(),
        });
    }

    /// Draws a horizontal rule on the current page.
    pub fn draw_rule(&mut self, x: f32, y: f32, length: f32, thickness: f32) {
        self.push(DrawOp::Rule {
            x,
            y,
            length,
            thickness,
        });
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Finishes layout and hands over the pages.
    pub fn finish(self) -> ReportDocument {
        ReportDocument {
            width: self.config.page_width,
            height: self.config.page_height,
            pages: self.pages,
        }
    }
}
