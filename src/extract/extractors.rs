//! Per-format text extractors.

use crate::error::{PortalError, Result};
use pulldown_cmark::{html, Parser};
use std::io::Read;

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| PortalError::TextExtraction(format!("Failed to extract PDF text: {}", e)))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown = String::from_utf8_lossy(bytes);
        let parser = Parser::new(&markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        Ok(markup_to_text(&html_output))
    }
}

/// DOCX is a zip container; the document body lives in
/// `word/document.xml` with one `<w:p>` element per paragraph.
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let cursor = std::io::Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor)
            .map_err(|e| PortalError::TextExtraction(format!("Failed to open DOCX: {}", e)))?;

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| {
                PortalError::TextExtraction(format!("DOCX has no document body: {}", e))
            })?
            .read_to_string(&mut document)?;

        let with_breaks = document.replace("</w:p>", "</w:p>\n");
        Ok(markup_to_text(&with_breaks))
    }
}

/// Strips markup tags and decodes the common entities, collapsing blank
/// lines.
pub fn markup_to_text(markup: &str) -> String {
    let text = markup
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let re = regex::Regex::new(r"<[^>]*>").expect("Invalid tag regex");
    let clean_text = re.replace_all(&text, "");

    let lines: Vec<String> = clean_text
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    lines.join("\n")
}
