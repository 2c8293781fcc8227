//! Greedy word wrapping against measured text width.

use super::metrics::{FontMetrics, UnencodableChar};

/// Splits `text` into lines no wider than `max_width` at `size` points.
///
/// Words are packed greedily: a word joins the current line while the
/// measured width of the candidate line stays within `max_width`; otherwise
/// the current line is closed and the word starts the next one. A single
/// word wider than `max_width` occupies a line of its own and is not broken.
///
/// Input that contains no words yields exactly one empty line.
///
/// # Examples
///
/// ```
/// use expense_report::layout::{Helvetica, wrap_text};
///
/// let lines = wrap_text("alpha beta gamma", 60.0, &Helvetica, 10.0).unwrap();
/// assert_eq!(lines, vec!["alpha beta", "gamma"]);
///
/// assert_eq!(wrap_text("", 60.0, &Helvetica, 10.0).unwrap(), vec![String::new()]);
/// ```
pub fn wrap_text<M>(
    text: &str,
    max_width: f32,
    metrics: &M,
    size: f32,
) -> Result<Vec<String>, UnencodableChar>
where
    M: FontMetrics + ?Sized,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if metrics.text_width(&candidate, size)? <= max_width {
            current = candidate;
        } else {
            // Still measure a lone word so unencodable input is reported.
            metrics.text_width(word, size)?;
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    Ok(lines)
}
