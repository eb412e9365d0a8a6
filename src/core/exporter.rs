/*
 * Groups matched files by copying them into a freshly named folder,
 * `matched_files_<YYYYMMDD-HHMMSS>`, under a destination chosen by the user.
 * Files are copied, never moved, and land under their base name. The first
 * failure aborts the export; files already copied stay where they are.
 *
 * After each copy the destination is compared with its source by SHA-256 so
 * a truncated or otherwise damaged copy is reported instead of going unnoticed.
 */
use super::checksum_utils;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::macros::format_description;

pub const EXPORT_FOLDER_PREFIX: &str = "matched_files_";

#[derive(Debug)]
pub enum ExportError {
    NothingToExport,
    Timestamp(time::error::Format),
    CreateFolder { path: PathBuf, source: io::Error },
    NoFileName(PathBuf),
    Copy { from: PathBuf, to: PathBuf, source: io::Error },
    VerificationFailed { from: PathBuf, to: PathBuf },
}

impl From<time::error::Format> for ExportError {
    fn from(err: time::error::Format) -> Self {
        ExportError::Timestamp(err)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::NothingToExport => write!(f, "No matched files to group and copy."),
            ExportError::Timestamp(e) => write!(f, "Could not format export timestamp: {e}"),
            ExportError::CreateFolder { path, source } => {
                write!(f, "Could not create export folder {path:?}: {source}")
            }
            ExportError::NoFileName(p) => write!(f, "Path has no file name: {p:?}"),
            ExportError::Copy { from, to, source } => {
                write!(f, "Failed to copy {from:?} to {to:?}: {source}")
            }
            ExportError::VerificationFailed { from, to } => {
                write!(f, "Copy of {from:?} at {to:?} differs from the original")
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Timestamp(e) => Some(e),
            ExportError::CreateFolder { source, .. } => Some(source),
            ExportError::Copy { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

pub trait ExporterOperations {
    /*
     * Copies `files` into a new timestamped folder under `destination_parent`
     * and returns the folder's path.
     */
    fn export_files(&self, files: &[PathBuf], destination_parent: &Path) -> Result<PathBuf>;
}

pub fn export_folder_name(at: OffsetDateTime) -> Result<String> {
    let format = format_description!("[year][month][day]-[hour][minute][second]");
    Ok(format!("{EXPORT_FOLDER_PREFIX}{}", at.format(&format)?))
}

// Local time as the user sees it; UTC when the local offset is unavailable.
fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|e| {
        log::debug!("Exporter: Local offset unavailable ({e}), using UTC for folder name.");
        OffsetDateTime::now_utc()
    })
}

pub struct CoreExporter {}

impl CoreExporter {
    pub fn new() -> Self {
        CoreExporter {}
    }

    /*
     * Same as `export_files`, but with the folder timestamp supplied by the
     * caller. An existing folder of the same name is reused.
     */
    pub fn export_files_at(
        &self,
        files: &[PathBuf],
        destination_parent: &Path,
        at: OffsetDateTime,
    ) -> Result<PathBuf> {
        if files.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        let folder = destination_parent.join(export_folder_name(at)?);
        fs::create_dir_all(&folder).map_err(|source| ExportError::CreateFolder {
            path: folder.clone(),
            source,
        })?;
        log::info!("Exporter: Copying {} files into {folder:?}.", files.len());

        for from in files {
            let file_name = from
                .file_name()
                .ok_or_else(|| ExportError::NoFileName(from.clone()))?;
            let to = folder.join(file_name);
            if to.exists() {
                log::warn!("Exporter: {to:?} already exists and is overwritten by {from:?}.");
            }
            fs::copy(from, &to).map_err(|source| ExportError::Copy {
                from: from.clone(),
                to: to.clone(),
                source,
            })?;
            let identical = checksum_utils::files_identical(from, &to).map_err(|source| {
                ExportError::Copy {
                    from: from.clone(),
                    to: to.clone(),
                    source,
                }
            })?;
            if !identical {
                return Err(ExportError::VerificationFailed {
                    from: from.clone(),
                    to,
                });
            }
            log::debug!("Exporter: Copied {from:?} to {to:?}.");
        }
        Ok(folder)
    }
}

impl Default for CoreExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterOperations for CoreExporter {
    fn export_files(&self, files: &[PathBuf], destination_parent: &Path) -> Result<PathBuf> {
        self.export_files_at(files, destination_parent, now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;
    use tempfile::tempdir;
    use time::macros::datetime;

    #[test]
    fn test_export_folder_name_format() {
        let at = datetime!(2024-03-07 09:05:01 UTC);
        assert_eq!(
            export_folder_name(at).unwrap(),
            "matched_files_20240307-090501"
        );
    }

    #[test]
    fn test_export_creates_byte_identical_copies() {
        // Arrange
        let source_dir = tempdir().unwrap();
        let dest_dir = tempdir().unwrap();
        let a = source_dir.path().join("a.txt");
        let b = source_dir.path().join("b.txt");
        let mut random_bytes = vec![0u8; 4096];
        rand::rng().fill_bytes(&mut random_bytes);
        fs::write(&a, b"alpha\nbeta\n").unwrap();
        fs::write(&b, &random_bytes).unwrap();
        let at = datetime!(2025-01-02 03:04:05 UTC);

        // Act
        let folder = CoreExporter::new()
            .export_files_at(&[a.clone(), b.clone()], dest_dir.path(), at)
            .unwrap();

        // Assert
        assert_eq!(folder, dest_dir.path().join("matched_files_20250102-030405"));
        assert_eq!(fs::read(folder.join("a.txt")).unwrap(), b"alpha\nbeta\n");
        assert_eq!(fs::read(folder.join("b.txt")).unwrap(), random_bytes);
        assert!(a.exists() && b.exists(), "Export must copy, not move.");
    }

    #[test]
    fn test_export_with_no_files_is_refused() {
        let dest_dir = tempdir().unwrap();
        let result = CoreExporter::new().export_files(&[], dest_dir.path());
        assert!(matches!(result, Err(ExportError::NothingToExport)));
        assert_eq!(fs::read_dir(dest_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_aborts_on_missing_source() {
        let source_dir = tempdir().unwrap();
        let dest_dir = tempdir().unwrap();
        let present = source_dir.path().join("present.txt");
        fs::write(&present, "here").unwrap();
        let missing = source_dir.path().join("missing.txt");

        let result = CoreExporter::new().export_files(&[missing.clone(), present], dest_dir.path());

        match result {
            Err(ExportError::Copy { from, source, .. }) => {
                assert_eq!(from, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("Expected copy failure, got {other:?}"),
        }
    }

    #[test]
    fn test_export_reuses_existing_folder() {
        let source_dir = tempdir().unwrap();
        let dest_dir = tempdir().unwrap();
        let file = source_dir.path().join("x.py");
        fs::write(&file, "print(1)").unwrap();
        let at = datetime!(2025-06-01 12:00:00 UTC);
        let exporter = CoreExporter::new();

        let first = exporter
            .export_files_at(std::slice::from_ref(&file), dest_dir.path(), at)
            .unwrap();
        let second = exporter
            .export_files_at(std::slice::from_ref(&file), dest_dir.path(), at)
            .unwrap();

        assert_eq!(first, second);
        assert!(second.join("x.py").is_file());
    }
}
