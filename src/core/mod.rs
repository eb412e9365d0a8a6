/*
 * This module consolidates the platform-agnostic logic of the application:
 * configuration and its validation, candidate file enumeration, per-file line
 * matching, the search session that aggregates results, and exporting matched
 * files. Traits (`FileSystemScannerOperations`, `ExporterOperations`) sit at
 * the file system seams so the presenter can be exercised with mocks.
 */
pub mod checksum_utils;
pub mod config;
pub mod exporter;
pub mod file_system;
pub mod line_matcher;
pub mod models;
pub mod path_utils;
pub mod report;
pub mod session;

pub use models::{MatchHit, SearchRequest};

pub use config::{ConfigError, IgnorableExtension, SearchSettings};

pub use file_system::{CoreFileSystemScanner, FileSystemScannerOperations};

#[cfg(test)]
pub use file_system::FileSystemError;

pub use exporter::{CoreExporter, ExportError, ExporterOperations};

pub use session::{SearchObserver, SearchSession};
