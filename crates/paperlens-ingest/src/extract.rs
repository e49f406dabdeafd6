//! Text extraction collaborators.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use tracing::debug;

use crate::error::{IngestError, Result};
use crate::sections::{PaperSections, parse_sections};

/// Turns a validated document into plain text.
///
/// Implementations are shared across worker threads.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String>;

    /// Structured decomposition of the extracted text.
    fn extract_sections(&self, path: &Path) -> Result<PaperSections> {
        self.extract_text(path).map(|text| parse_sections(&text))
    }
}

/// Separator placed between pages of extracted text.
pub const PAGE_BREAK: &str = "\x0C";

/// Extractor backed by the `pdf-extract` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        // pdf-extract panics on some malformed inputs
        let parsed = catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| IngestError::Extraction {
            path: path.to_path_buf(),
            message: "PDF parser panicked".to_string(),
        })?;
        let pages = parsed.map_err(|e| IngestError::Extraction {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let text = pages.join(PAGE_BREAK);
        if text.trim().is_empty() {
            return Err(IngestError::EmptyText {
                path: path.to_path_buf(),
            });
        }
        debug!(
            path = %path.display(),
            bytes = bytes.len(),
            pages = pages.len(),
            chars = text.len(),
            "extracted PDF text"
        );
        Ok(text)
    }
}
