use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::extraction::{DocumentExtractor, ExtractionError};
use crate::models::{DocumentKind, ResumeFile};

/// Shortest printable run kept when scanning a legacy `.doc` binary.
const MIN_LEGACY_RUN: usize = 4;
/// Highest code point (end of Latin Extended-B) accepted inside a legacy run.
const LATIN_MAX: u32 = 0x024F;

/// Reads PDF, DOCX and legacy DOC uploads.
///
/// Parsing is CPU-bound and runs on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextExtractor;

#[async_trait]
impl DocumentExtractor for FileTextExtractor {
    async fn extract_text(&self, file: &ResumeFile) -> Result<String, ExtractionError> {
        let kind = file.kind();
        let data = file.data().clone();

        let text = tokio::task::spawn_blocking(move || extract_sync(kind, data))
            .await
            .map_err(|e| ExtractionError::Task(e.to_string()))??;

        let text = text.trim();
        if text.is_empty() {
            warn!(file = file.file_name(), "No text extracted from resume");
            return Err(ExtractionError::NoText(file.file_name().to_string()));
        }

        debug!(
            file = file.file_name(),
            chars = text.len(),
            "Extracted resume text"
        );
        Ok(text.to_string())
    }
}

fn extract_sync(kind: DocumentKind, data: Bytes) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => extract_pdf(&data),
        DocumentKind::Docx => extract_docx(&data),
        DocumentKind::Doc => Ok(extract_legacy_doc(&data)),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Concatenates the text runs of every top-level paragraph, one line each.
fn extract_docx(data: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(data).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = paragraph_child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

/// Best-effort text recovery from a Word 97-2003 binary.
///
/// Collects printable runs from both the 8-bit and the UTF-16LE reading of
/// the file and keeps whichever reading yields more letters.
fn extract_legacy_doc(data: &[u8]) -> String {
    let narrow = printable_runs(data.iter().map(|&b| char::from(b)));

    let wide = printable_runs(
        char::decode_utf16(
            data.chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]])),
        )
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );

    let letters = |runs: &[String]| -> usize {
        runs.iter()
            .map(|r| r.chars().filter(|c| c.is_alphabetic()).count())
            .sum()
    };

    if letters(&wide) > letters(&narrow) {
        wide.join("\n")
    } else {
        narrow.join("\n")
    }
}

fn printable_runs(chars: impl Iterator<Item = char>) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String| {
        let run = current.trim();
        if run.chars().count() >= MIN_LEGACY_RUN && run.chars().any(char::is_alphabetic) {
            runs.push(run.to_string());
        }
        current.clear();
    };

    for c in chars {
        if c.is_ascii_graphic() || c == ' ' || (c.is_alphabetic() && u32::from(c) <= LATIN_MAX) {
            current.push(c);
        } else {
            flush(&mut current);
        }
    }
    flush(&mut current);
    runs
}
