//! Text extraction from various file formats

use crate::error::{Result, ResumeScorerError};
use crate::input::file_detector::FileType;
use log::debug;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Parser};
use regex::{Captures, Regex};
use std::io::{Cursor, Read};

/// Decodes one document format into plain text.
///
/// Extraction is CPU-bound and synchronous; callers that must not block run
/// it on a blocking thread (see [`crate::input::manager::InputManager`]).
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#x[0-9a-fA-F]+|#\d+|amp|lt|gt|quot|apos|nbsp);").expect("Invalid entity regex"));

static HTML_BLOCK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:p|h[1-6]|ul|ol|blockquote|pre)>").expect("Invalid block regex"));

static DOCX_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").expect("Invalid docx break regex"));

static DOCX_TAB: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:tab\s*/>").expect("Invalid docx tab regex"));

fn unescape_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if entity.starts_with("#x") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
            };
            decoded.map(String::from).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ResumeScorerError::ExtractionFailed(format!("Failed to extract text from PDF: {}", e))
        })
    }
}

pub struct DocxExtractor;

impl DocxExtractor {
    fn document_xml(bytes: &[u8]) -> Result<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            ResumeScorerError::ExtractionFailed(format!("Not a valid DOCX archive: {}", e))
        })?;

        let mut entry = archive.by_name("word/document.xml").map_err(|e| {
            ResumeScorerError::ExtractionFailed(format!("DOCX has no document body: {}", e))
        })?;

        let mut xml = String::new();
        entry.read_to_string(&mut xml)?;
        Ok(xml)
    }

    fn xml_to_text(xml: &str) -> String {
        let text = DOCX_BREAK.replace_all(xml, "\n");
        let text = DOCX_TAB.replace_all(&text, "\t");
        let text = TAG.replace_all(&text, "");
        unescape_entities(&text)
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let xml = Self::document_xml(bytes)?;
        Ok(Self::xml_to_text(&xml))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = String::from_utf8_lossy(bytes);
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = PlainTextExtractor.extract(bytes)?;

        let parser = Parser::new(&markdown_content);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(self.html_to_text(&html_output))
    }
}

impl MarkdownExtractor {
    fn html_to_text(&self, html: &str) -> String {
        let text = html
            .replace("<br />", "\n")
            .replace("<li>", "- ")
            .replace("</li>\n", "\n")
            .replace("</li>", "\n");
        let text = HTML_BLOCK_END.replace_all(&text, "\n\n");
        let text = TAG.replace_all(&text, "");
        unescape_entities(&text)
    }
}

/// Extract text from an in-memory document, choosing the decoder from a
/// declared MIME type or extension.
pub fn extract_bytes(bytes: &[u8], declared: &str) -> Result<String> {
    let file_type = FileType::from_declared(declared);
    debug!("Extracting {} bytes as {}", bytes.len(), file_type);

    let text = match file_type {
        FileType::Pdf => PdfExtractor.extract(bytes)?,
        FileType::Docx => DocxExtractor.extract(bytes)?,
        FileType::Text => PlainTextExtractor.extract(bytes)?,
        FileType::Markdown => MarkdownExtractor.extract(bytes)?,
        FileType::Unknown => {
            return Err(ResumeScorerError::UnsupportedFormat(format!(
                "'{}' (expected PDF, DOCX, TXT or Markdown)",
                declared
            )));
        }
    };

    if text.trim().is_empty() {
        return Err(ResumeScorerError::ExtractionFailed(format!(
            "No readable text found in {} document",
            file_type
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_bytes(document_xml: &str) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buffer);
            writer
                .start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(document_xml.as_bytes()).unwrap();
            writer.finish().unwrap();
        }
        buffer.into_inner()
    }

    #[test]
    fn test_plain_text_passthrough() {
        let text = extract_bytes("\u{feff}JOHN SMITH\nSales".as_bytes(), "text/plain").unwrap();
        assert_eq!(text, "JOHN SMITH\nSales");
    }

    #[test]
    fn test_markdown_keeps_structure() {
        let text = extract_bytes(b"# Jane Doe\n\nSummary text &amp; more\n\n- Led team of 5\n- Grew sales", "md").unwrap();
        assert!(text.contains("Jane Doe\n"));
        assert!(text.contains("Summary text & more"));
        assert!(text.contains("- Led team of 5\n- Grew sales"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_docx_paragraphs_and_entities() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>JANE DOE</w:t></w:r></w:p><w:p><w:r><w:t>R&amp;D Lead</w:t><w:tab/><w:t>2020</w:t></w:r></w:p></w:body></w:document>"#;
        let text = extract_bytes(&docx_bytes(xml), "docx").unwrap();
        assert_eq!(text, "JANE DOE\nR&D Lead\t2020\n");
    }

    #[test]
    fn test_invalid_docx_fails() {
        let err = extract_bytes(b"not a zip", "docx").unwrap_err();
        assert!(matches!(err, ResumeScorerError::ExtractionFailed(_)));
    }

    #[test]
    fn test_unsupported_and_empty() {
        assert!(matches!(
            extract_bytes(b"GIF89a", "image/gif"),
            Err(ResumeScorerError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            extract_bytes(b"   \n ", "txt"),
            Err(ResumeScorerError::ExtractionFailed(_))
        ));
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(unescape_entities("caf&#233; &#x2022; &bogus;"), "café • &bogus;");
    }
}
