//! PDF serialization of a laid-out report.

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::ReportConfig;
use crate::error::ReportResult;

use super::metrics::{BASE_FONT, encode_winansi};
use super::writer::{DrawOp, ReportDocument};

const FONT_NAME: Name<'static> = Name(b"F1");

/// Serializes `document` into PDF bytes.
///
/// Every page references one shared Type 1 font resource with WinAnsi
/// encoding. Content streams are deflated when `config.compress` is set.
pub fn render_pdf(document: &ReportDocument, config: &ReportConfig) -> ReportResult<Vec<u8>> {
    let mut pdf = Pdf::new();
    let mut alloc = Ref::new(1);

    let catalog_id = alloc.bump();
    let pages_id = alloc.bump();
    let font_id = alloc.bump();
    let info_id = alloc.bump();
    let page_ids: Vec<(Ref, Ref)> = document
        .pages()
        .iter()
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().map(|(page_id, _)| *page_id))
        .count(page_ids.len() as i32);
    pdf.type1_font(font_id)
        .base_font(Name(BASE_FONT))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    let title = format!("{} Expense Report", config.organization);
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr(env!("CARGO_PKG_NAME")));

    for (page, (page_id, content_id)) in document.pages().iter().zip(&page_ids) {
        let raw = page_content(page.ops())?;
        if config.compress {
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
            pdf.stream(*content_id, &compressed)
                .filter(Filter::FlateDecode);
        } else {
            pdf.stream(*content_id, &raw);
        }

        let mut page_writer = pdf.page(*page_id);
        page_writer
            .media_box(Rect::new(0.0, 0.0, document.width(), document.height()))
            .parent(pages_id)
            .contents(*content_id);
        page_writer.resources().fonts().pair(FONT_NAME, font_id);
    }

    Ok(pdf.finish())
}

fn page_content(ops: &[DrawOp]) -> ReportResult<Vec<u8>> {
    let mut content = Content::new();
    for op in ops {
        match op {
            DrawOp::Text { x, y, size, text } => {
                let bytes = encode_winansi(text).map_err(|e| e.in_field("page content"))?;
                content
                    .begin_text()
                    .set_font(FONT_NAME, *size)
                    .next_line(*x, *y)
                    .show(Str(&bytes))
                    .end_text();
            }
            DrawOp::Rule {
                x,
                y,
                length,
                thickness,
            } => {
                content.set_line_width(*thickness);
                content.move_to(*x, *y);
                content.line_to(*x + *length, *y);
                content.stroke();
            }
        }
    }
    Ok(content.finish().as_slice().to_vec())
}
