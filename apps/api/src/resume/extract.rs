//! Resume text extraction by declared MIME type.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::AppError;
use crate::resume::analyzer::{analyze_resume_text, ResumeAnalysis};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_TEXT: &str = "text/plain";

static XML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid xml tag regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    /// Word documents; legacy `.doc` goes through the same path and fails to decode.
    Word,
    PlainText,
}

impl ResumeFormat {
    /// Resolves a declared content type, ignoring parameters such as `charset`.
    pub fn from_mime(mime: &str) -> Result<Self, AppError> {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            MIME_PDF => Ok(ResumeFormat::Pdf),
            MIME_DOCX | MIME_DOC => Ok(ResumeFormat::Word),
            MIME_TEXT => Ok(ResumeFormat::PlainText),
            _ => Err(AppError::UnsupportedFormat(mime.to_string())),
        }
    }
}

/// Decodes resume bytes to plain text.
pub fn extract_text(bytes: &[u8], mime: &str) -> Result<String, AppError> {
    match ResumeFormat::from_mime(mime)? {
        ResumeFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Decode(format!("Failed to parse PDF: {e}"))),
        ResumeFormat::Word => extract_docx_text(bytes),
        ResumeFormat::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Extracts then analyzes. CPU-bound: call from a blocking task.
pub fn parse_resume_buffer(bytes: &[u8], mime: &str) -> Result<ResumeAnalysis, AppError> {
    let text = extract_text(bytes, mime)?;
    Ok(analyze_resume_text(&text))
}

/// Upper bound on the decompressed `word/document.xml`.
const MAX_DOCUMENT_XML_BYTES: u64 = 16 * 1024 * 1024;

fn extract_docx_text(bytes: &[u8]) -> Result<String, AppError> {
    read_document_xml(bytes, MAX_DOCUMENT_XML_BYTES).map(|xml| docx_xml_to_text(&xml))
}

fn read_document_xml(bytes: &[u8], max_bytes: u64) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(docx_error)?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(docx_error)?;

    let mut raw = Vec::new();
    entry
        .take(max_bytes + 1)
        .read_to_end(&mut raw)
        .map_err(docx_error)?;
    if raw.len() as u64 > max_bytes {
        return Err(AppError::Decode(
            "Failed to parse DOCX: document body is too large".to_string(),
        ));
    }

    String::from_utf8(raw).map_err(docx_error)
}

fn docx_error(e: impl std::fmt::Display) -> AppError {
    AppError::Decode(format!("Failed to parse DOCX: {e}"))
}

fn docx_xml_to_text(xml: &str) -> String {
    let text = xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n");
    let text = XML_TAG.replace_all(&text, "");
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
