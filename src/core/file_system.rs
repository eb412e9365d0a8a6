use super::models::{SearchRequest, TEXT_FILE_EXTENSIONS};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/*
 * This module enumerates the candidate files for a search. It walks either
 * the direct children of the root or the whole subtree, and applies the two
 * extension filters: the user's ignored extensions and the fixed text-file
 * allow-list. It defines the errors of traversal, a trait
 * `FileSystemScannerOperations` so the presenter can be tested without a disk,
 * and the concrete `CoreFileSystemScanner` built on `walkdir`.
 */

#[derive(Debug)]
pub enum FileSystemError {
    Io(io::Error),
    Walk(walkdir::Error),
    InvalidPath(PathBuf),
}

impl From<io::Error> for FileSystemError {
    fn from(err: io::Error) -> Self {
        FileSystemError::Io(err)
    }
}

impl From<walkdir::Error> for FileSystemError {
    fn from(err: walkdir::Error) -> Self {
        FileSystemError::Walk(err)
    }
}

impl std::fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileSystemError::Io(e) => write!(f, "I/O error: {e}"),
            FileSystemError::Walk(e) => write!(f, "Directory traversal error: {e}"),
            FileSystemError::InvalidPath(p) => write!(f, "Not a directory: {p:?}"),
        }
    }
}

impl std::error::Error for FileSystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileSystemError::Io(e) => Some(e),
            FileSystemError::Walk(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

/*
 * Produces the list of files a search should examine. A directory that cannot
 * be listed aborts the whole enumeration; there is no partial result.
 */
pub trait FileSystemScannerOperations {
    fn candidate_files(&self, request: &SearchRequest) -> Result<Vec<PathBuf>>;
}

pub struct CoreFileSystemScanner {}

impl CoreFileSystemScanner {
    pub fn new() -> Self {
        CoreFileSystemScanner {}
    }
}

impl Default for CoreFileSystemScanner {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Decides whether a path survives both extension filters. The ignored set is
 * checked first and independently of the allow-list, so ignoring ".txt" or
 * ".log" removes those files even though they are text files.
 */
pub fn is_candidate(path: &Path, ignored_extensions: &std::collections::BTreeSet<String>) -> bool {
    let path_text = path.to_string_lossy();
    if ignored_extensions
        .iter()
        .any(|ext| path_text.ends_with(ext.as_str()))
    {
        return false;
    }
    TEXT_FILE_EXTENSIONS
        .iter()
        .any(|ext| path_text.ends_with(ext))
}

impl FileSystemScannerOperations for CoreFileSystemScanner {
    fn candidate_files(&self, request: &SearchRequest) -> Result<Vec<PathBuf>> {
        let root_path = request.root_path.as_path();
        if !root_path.is_dir() {
            return Err(FileSystemError::InvalidPath(root_path.to_path_buf()));
        }
        log::debug!(
            "FileSystemScanner: Enumerating {root_path:?} (recursive: {}).",
            request.recursive
        );

        let mut walker = WalkDir::new(root_path)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();
        if !request.recursive {
            walker = walker.max_depth(1);
        }

        let mut candidates = Vec::new();
        for entry_result in walker {
            let entry = entry_result?;
            // Directories are only containers; anything else (files, links) is a potential candidate.
            if entry.file_type().is_dir() {
                continue;
            }
            let path = entry.path();
            if is_candidate(path, &request.ignored_extensions) {
                candidates.push(path.to_path_buf());
            } else {
                log::trace!("FileSystemScanner: Filtered out {path:?}.");
            }
        }

        log::debug!(
            "FileSystemScanner: Found {} candidate files under {root_path:?}.",
            candidates.len()
        );
        Ok(candidates)
    }
}
