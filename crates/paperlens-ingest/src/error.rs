//! Error types for document ingestion.

use std::path::PathBuf;

use thiserror::Error;

use paperlens_model::JobError;

#[derive(Debug, Error)]
pub enum IngestError {
    // === Directory Errors ===
    /// Directory not found or not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Validation Errors ===
    /// No directory entry matches the requested file name.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("file is not readable {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a PDF file: {path}")]
    NotPdf { path: PathBuf },

    // === Extraction Errors ===
    /// Failed to read file bytes.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF parser rejected the document.
    #[error("failed to extract text from {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    /// The PDF parsed but carried no text layer.
    #[error("no extractable text in {path}")]
    EmptyText { path: PathBuf },
}

impl IngestError {
    /// Whether the error describes the source document rather than its content.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound { .. }
                | Self::DirectoryRead { .. }
                | Self::FileNotFound { .. }
                | Self::NotAFile { .. }
                | Self::Unreadable { .. }
                | Self::NotPdf { .. }
        )
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            Self::DirectoryNotFound { path }
            | Self::DirectoryRead { path, .. }
            | Self::FileNotFound { path }
            | Self::NotAFile { path }
            | Self::Unreadable { path, .. }
            | Self::NotPdf { path }
            | Self::FileRead { path, .. }
            | Self::Extraction { path, .. }
            | Self::EmptyText { path } => path,
        }
    }
}

impl From<IngestError> for JobError {
    fn from(error: IngestError) -> Self {
        let reason = match &error {
            IngestError::DirectoryNotFound { .. } => "directory not found".to_string(),
            IngestError::DirectoryRead { source, .. } => {
                format!("directory not readable: {source}")
            }
            IngestError::FileNotFound { .. } => "file not found".to_string(),
            IngestError::NotAFile { .. } => "not a regular file".to_string(),
            IngestError::Unreadable { source, .. } => format!("not readable: {source}"),
            IngestError::NotPdf { .. } => "not a PDF file".to_string(),
            IngestError::FileRead { source, .. } => format!("read failed: {source}"),
            IngestError::Extraction { message, .. } => message.clone(),
            IngestError::EmptyText { .. } => "no extractable text".to_string(),
        };
        let path = error.path().clone();
        if error.is_validation() {
            JobError::Validation { path, reason }
        } else {
            JobError::Extraction {
                path,
                message: reason,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
