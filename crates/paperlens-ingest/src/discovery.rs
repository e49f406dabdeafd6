//! PDF discovery and source validation.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use paperlens_model::DocumentSource;

use crate::error::{IngestError, Result};

/// Lists all PDF files in a directory.
///
/// Returns files sorted by filename.
pub fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = read_entries(dir)?
        .into_iter()
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Scans a directory for PDFs with their size and modification time.
///
/// Sources are ordered by title. Missing metadata is left empty rather than
/// failing the scan.
pub fn scan_pdf_directory(dir: &Path) -> Result<Vec<DocumentSource>> {
    let mut sources: Vec<DocumentSource> = list_pdf_files(dir)?
        .into_iter()
        .map(|path| {
            let mut source = DocumentSource::from_path(path);
            match std::fs::metadata(&source.path) {
                Ok(metadata) => {
                    source.size_bytes = Some(metadata.len());
                    source.modified = metadata.modified().ok().map(DateTime::<Local>::from);
                }
                Err(error) => {
                    warn!(path = %source.path.display(), %error, "failed to read PDF metadata");
                }
            }
            source
        })
        .collect();
    sources.sort_by(|a, b| a.title.cmp(&b.title));
    debug!(dir = %dir.display(), count = sources.len(), "scanned PDF directory");
    Ok(sources)
}

/// Checks that `path` names a readable PDF and returns the path as it
/// exists on disk.
///
/// The file name is matched against the directory listing after folding
/// non-breaking and other visual spaces, so names copied from a viewer
/// still resolve to the stored file.
pub fn validate_pdf(path: &Path) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: parent.to_path_buf(),
        });
    }
    let resolved = if path.exists() {
        path.to_path_buf()
    } else {
        find_by_normalized_name(parent, path)?
    };
    if !resolved.is_file() {
        return Err(IngestError::NotAFile { path: resolved });
    }
    if let Err(source) = File::open(&resolved) {
        return Err(IngestError::Unreadable {
            path: resolved,
            source,
        });
    }
    if !has_pdf_extension(&resolved) {
        return Err(IngestError::NotPdf { path: resolved });
    }
    Ok(resolved)
}

fn find_by_normalized_name(parent: &Path, path: &Path) -> Result<PathBuf> {
    let not_found = || IngestError::FileNotFound {
        path: path.to_path_buf(),
    };
    let wanted = path
        .file_name()
        .map(|name| normalize_file_name(&name.to_string_lossy()))
        .ok_or_else(not_found)?;
    let found = read_entries(parent)?.into_iter().find(|candidate| {
        candidate
            .file_name()
            .is_some_and(|name| normalize_file_name(&name.to_string_lossy()) == wanted)
    });
    match found {
        Some(candidate) => {
            debug!(
                requested = %path.display(),
                resolved = %candidate.display(),
                "matched file by normalized name"
            );
            Ok(candidate)
        }
        None => Err(not_found()),
    }
}

/// Folds every Unicode whitespace character to an ASCII space and trims.
pub fn normalize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn read_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut paths = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        paths.push(entry.path());
    }
    Ok(paths)
}
