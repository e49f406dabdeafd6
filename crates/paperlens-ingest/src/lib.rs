//! Document ingestion: PDF discovery, source validation, and the text
//! extraction collaborator.

pub mod discovery;
pub mod error;
pub mod extract;
pub mod sections;

pub use discovery::{list_pdf_files, normalize_file_name, scan_pdf_directory, validate_pdf};
pub use error::{IngestError, Result};
pub use extract::{PAGE_BREAK, PdfExtractor, TextExtractor};
pub use sections::{PaperSections, parse_sections};
