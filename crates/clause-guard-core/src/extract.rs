use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

/// Document kinds the service accepts, keyed by declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Pdf,
    Docx,
    PlainText,
}

impl ContentKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(ContentKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(ContentKind::Docx)
            }
            "text/plain" => Some(ContentKind::PlainText),
            _ => None,
        }
    }
}

/// Extraction failures. The `Display` forms are the literal strings callers
/// of [`extract_text`] observe in place of extracted text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Error parsing PDF: {0}")]
    Pdf(String),
    #[error("Error parsing DOCX: {0}")]
    Docx(String),
    #[error("Error decoding text file")]
    Decode,
    #[error("Unsupported file type")]
    UnsupportedType,
}

/// Extract document text, reporting failures as the descriptive result
/// strings callers check for (an `"Error"` prefix or the literal
/// `"Unsupported file type"`), never as a panic.
pub fn extract_text(bytes: &[u8], mime: &str) -> String {
    try_extract_text(bytes, mime).unwrap_or_else(|err| err.to_string())
}

/// Extraction with a typed error instead of the string boundary.
pub fn try_extract_text(bytes: &[u8], mime: &str) -> Result<String, ExtractError> {
    match ContentKind::from_mime(mime) {
        Some(ContentKind::Pdf) => parse_pdf(bytes),
        Some(ContentKind::Docx) => parse_docx(bytes),
        Some(ContentKind::PlainText) => parse_plain_text(bytes),
        None => {
            debug!(%mime, "unsupported content type");
            Err(ExtractError::UnsupportedType)
        }
    }
}

fn parse_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|err| ExtractError::Pdf(err.to_string()))
}

/// Pull paragraph text out of the WordprocessingML body (`word/document.xml`):
/// text runs inside `w:t` elements, one output line per `w:p`.
fn parse_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| ExtractError::Docx(err.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|err| ExtractError::Docx(err.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|err| ExtractError::Docx(err.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref element)) if element.local_name().as_ref() == b"t" => {
                in_run_text = true;
            }
            Ok(Event::End(ref element)) if element.local_name().as_ref() == b"t" => {
                in_run_text = false;
            }
            Ok(Event::End(ref element)) if element.local_name().as_ref() == b"p" => {
                text.push('\n');
            }
            Ok(Event::Text(run)) if in_run_text => {
                let unescaped = run
                    .unescape()
                    .map_err(|err| ExtractError::Docx(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ExtractError::Docx(err.to_string())),
            _ => {}
        }
    }
    Ok(text)
}

/// UTF-8 first, then Latin-1. Latin-1 decoding is total over bytes, so the
/// terminal decode-failure arm of [`ExtractError::Decode`] is kept only for
/// the boundary contract.
fn parse_plain_text(bytes: &[u8]) -> Result<String, ExtractError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => Ok(decode_latin1(bytes)),
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| byte as char).collect()
}
