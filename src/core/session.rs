/*
 * The search session owns the accumulating result of a search and drives the
 * scanner and the line matcher. It replaces what would otherwise be shared
 * mutable UI state: the caller holds a `SearchSession`, and every call to
 * `run_search` starts by clearing what the previous search left behind.
 *
 * Validation (patterns present, root present, patterns compile) happens before
 * any file system access. After that, traversal errors abort the search while
 * per-file read errors are recorded and skipped. Progress is reported through
 * an optional `SearchObserver` as each file is processed.
 */
use super::file_system::{FileSystemError, FileSystemScannerOperations};
use super::line_matcher::{LineMatcher, PatternError};
use super::models::{FileScanOutcome, MatchHit, SearchRequest, SearchResult, SkippedFile};
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum SearchError {
    NoPatterns,
    NoRootPath,
    InvalidPattern(PatternError),
    FileSystem(FileSystemError),
}

impl From<PatternError> for SearchError {
    fn from(err: PatternError) -> Self {
        SearchError::InvalidPattern(err)
    }
}

impl From<FileSystemError> for SearchError {
    fn from(err: FileSystemError) -> Self {
        SearchError::FileSystem(err)
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::NoPatterns => write!(f, "Please enter at least one search pattern."),
            SearchError::NoRootPath => write!(f, "No directory selected to search in."),
            SearchError::InvalidPattern(e) => write!(f, "{e}"),
            SearchError::FileSystem(e) => write!(f, "Search aborted: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::InvalidPattern(e) => Some(e),
            SearchError::FileSystem(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Scanning,
}

/*
 * Receives progress while a search runs. `on_file_matched` fires once per file,
 * before the first of its hits; `on_hit` fires for every hit line.
 */
pub trait SearchObserver {
    fn on_file_matched(&mut self, _path: &Path) {}
    fn on_hit(&mut self, _hit: &MatchHit) {}
    fn on_file_skipped(&mut self, _path: &Path, _error: &io::Error) {}
}

#[cfg(test)]
pub struct NoopObserver;

#[cfg(test)]
impl SearchObserver for NoopObserver {}

#[derive(Debug)]
pub struct SearchSession {
    state: SessionState,
    result: SearchResult,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        SearchSession {
            state: SessionState::Idle,
            result: SearchResult::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn result(&self) -> &SearchResult {
        &self.result
    }

    pub fn clear(&mut self) {
        log::debug!("SearchSession: Clearing previous results.");
        self.result.clear();
    }

    fn validate(request: &SearchRequest) -> Result<LineMatcher> {
        if request.patterns.is_empty() || request.patterns.iter().any(|p| p.is_empty()) {
            return Err(SearchError::NoPatterns);
        }
        if request.root_path.as_os_str().is_empty() {
            return Err(SearchError::NoRootPath);
        }
        Ok(LineMatcher::from_request(request)?)
    }

    /*
     * Runs one complete search. The previous result is cleared even when the
     * new request turns out to be invalid, so a failed search never leaves
     * stale matches on display.
     */
    pub fn run_search(
        &mut self,
        request: &SearchRequest,
        scanner: &dyn FileSystemScannerOperations,
        observer: &mut dyn SearchObserver,
    ) -> Result<&SearchResult> {
        self.clear();
        let matcher = Self::validate(request)?;

        log::info!(
            "SearchSession: Searching {:?} for {} pattern(s).",
            request.root_path,
            request.patterns.len()
        );
        self.state = SessionState::Scanning;
        let outcome = self.scan(request, scanner, &matcher, observer);
        self.state = SessionState::Idle;
        outcome?;

        log::info!(
            "SearchSession: Scanned {} files, {} matched, {} skipped.",
            self.result.files_scanned,
            self.result.matched_files.len(),
            self.result.skipped_files.len()
        );
        Ok(&self.result)
    }

    fn scan(
        &mut self,
        request: &SearchRequest,
        scanner: &dyn FileSystemScannerOperations,
        matcher: &LineMatcher,
        observer: &mut dyn SearchObserver,
    ) -> Result<()> {
        let candidates = scanner.candidate_files(request)?;
        for path in candidates {
            self.result.files_scanned += 1;
            match matcher.match_file(&path) {
                FileScanOutcome::Matched(hits) => {
                    if !self.result.matched_files.contains(&path) {
                        self.result.matched_files.push(path.clone());
                        observer.on_file_matched(&path);
                    }
                    for hit in hits {
                        observer.on_hit(&hit);
                        self.result.rendered_text.push_str(&hit.context_text);
                        self.result.hits.push(hit);
                    }
                }
                FileScanOutcome::NoMatch => {}
                FileScanOutcome::Skipped(error) => {
                    observer.on_file_skipped(&path, &error);
                    self.result.skipped_files.push(SkippedFile {
                        path,
                        reason: error.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file_system::CoreFileSystemScanner;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingObserver {
        matched: Vec<PathBuf>,
        hit_lines: Vec<usize>,
        skipped: Vec<PathBuf>,
    }

    impl SearchObserver for RecordingObserver {
        fn on_file_matched(&mut self, path: &Path) {
            self.matched.push(path.to_path_buf());
        }
        fn on_hit(&mut self, hit: &MatchHit) {
            self.hit_lines.push(hit.line_index);
        }
        fn on_file_skipped(&mut self, path: &Path, _error: &io::Error) {
            self.skipped.push(path.to_path_buf());
        }
    }

    struct FixedScanner {
        files: Vec<PathBuf>,
    }

    impl FileSystemScannerOperations for FixedScanner {
        fn candidate_files(
            &self,
            _request: &SearchRequest,
        ) -> crate::core::file_system::Result<Vec<PathBuf>> {
            Ok(self.files.clone())
        }
    }

    struct FailingScanner;

    impl FileSystemScannerOperations for FailingScanner {
        fn candidate_files(
            &self,
            request: &SearchRequest,
        ) -> crate::core::file_system::Result<Vec<PathBuf>> {
            Err(FileSystemError::InvalidPath(request.root_path.clone()))
        }
    }

    fn request(root: &Path, patterns: &[&str]) -> SearchRequest {
        SearchRequest::new(
            root.to_path_buf(),
            patterns.iter().map(|p| p.to_string()).collect(),
        )
    }

    #[test]
    fn test_end_to_end_single_line_without_context() {
        // Arrange
        let dir = tempdir().unwrap();
        let a_path = dir.path().join("a.txt");
        fs::write(&a_path, "foo\nbar\nbaz\n").unwrap();
        let mut session = SearchSession::new();

        // Act
        let result = session
            .run_search(
                &request(dir.path(), &["bar"]),
                &CoreFileSystemScanner::new(),
                &mut NoopObserver,
            )
            .unwrap();

        // Assert
        assert_eq!(result.matched_files, vec![a_path.clone()]);
        let expected = format!(
            "\n--- {} ---\nbar\n{}\n",
            a_path.display(),
            "-".repeat(50)
        );
        assert_eq!(result.rendered_text, expected);
        assert!(!result.rendered_text.contains("foo"));
        assert!(!result.rendered_text.contains("baz"));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_file_with_several_hits_is_listed_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("many.log");
        fs::write(&path, "err 1\nok\nerr 2\nerr 3\n").unwrap();
        let scanner = FixedScanner {
            files: vec![path.clone()],
        };
        let mut observer = RecordingObserver::default();
        let mut session = SearchSession::new();

        let result = session
            .run_search(&request(dir.path(), &["err"]), &scanner, &mut observer)
            .unwrap();

        assert_eq!(result.matched_files, vec![path.clone()]);
        assert_eq!(result.hits.len(), 3);
        assert_eq!(result.rendered_text.matches("--- ").count(), 3);
        assert_eq!(observer.matched, vec![path]);
        assert_eq!(observer.hit_lines, vec![0, 2, 3]);
    }

    #[test]
    fn test_unreadable_file_is_skipped_and_scan_continues() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone.txt");
        let present = dir.path().join("here.txt");
        fs::write(&present, "needle\n").unwrap();
        let scanner = FixedScanner {
            files: vec![missing.clone(), present.clone()],
        };
        let mut observer = RecordingObserver::default();
        let mut session = SearchSession::new();

        let result = session
            .run_search(&request(dir.path(), &["needle"]), &scanner, &mut observer)
            .unwrap();

        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.matched_files, vec![present]);
        assert_eq!(result.skipped_files.len(), 1);
        assert_eq!(result.skipped_files[0].path, missing);
        assert_eq!(observer.skipped, vec![missing]);
    }

    #[test]
    fn test_new_search_clears_previous_results() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha\n").unwrap();
        fs::write(dir.path().join("b.txt"), "beta\n").unwrap();
        let scanner = CoreFileSystemScanner::new();
        let mut session = SearchSession::new();

        session
            .run_search(&request(dir.path(), &["alpha"]), &scanner, &mut NoopObserver)
            .unwrap();
        let second = session
            .run_search(&request(dir.path(), &["beta"]), &scanner, &mut NoopObserver)
            .unwrap();

        assert_eq!(second.matched_files, vec![dir.path().join("b.txt")]);
        assert!(!second.rendered_text.contains("alpha"));
    }

    #[test]
    fn test_validation_happens_before_scanning() {
        let mut session = SearchSession::new();
        let scanner = FailingScanner;

        let no_patterns = session.run_search(
            &request(Path::new("/srv"), &[]),
            &scanner,
            &mut NoopObserver,
        );
        assert!(matches!(no_patterns, Err(SearchError::NoPatterns)));

        let one_empty = session.run_search(
            &request(Path::new("/srv"), &["", "zzz"]),
            &scanner,
            &mut NoopObserver,
        );
        assert!(matches!(one_empty, Err(SearchError::NoPatterns)));

        let no_root = session.run_search(&request(Path::new(""), &["x"]), &scanner, &mut NoopObserver);
        assert!(matches!(no_root, Err(SearchError::NoRootPath)));

        let bad_regex = session.run_search(
            &request(Path::new("/srv"), &["[z-a]"]),
            &scanner,
            &mut NoopObserver,
        );
        assert!(matches!(bad_regex, Err(SearchError::InvalidPattern(_))));
    }

    #[test]
    fn test_traversal_error_aborts_and_returns_to_idle() {
        let mut session = SearchSession::new();

        let result = session.run_search(
            &request(Path::new("/srv"), &["x"]),
            &FailingScanner,
            &mut NoopObserver,
        );

        assert!(matches!(result, Err(SearchError::FileSystem(_))));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!session.result().has_matches());
    }

    #[test]
    fn test_recursive_flag_controls_subdirectory_matches() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.txt"), "needle\n").unwrap();
        let scanner = CoreFileSystemScanner::new();
        let mut session = SearchSession::new();
        let mut req = request(dir.path(), &["needle"]);

        let flat = session
            .run_search(&req, &scanner, &mut NoopObserver)
            .unwrap()
            .matched_files
            .clone();
        req.recursive = true;
        let deep = session
            .run_search(&req, &scanner, &mut NoopObserver)
            .unwrap()
            .matched_files
            .clone();

        assert!(flat.is_empty());
        assert_eq!(deep, vec![dir.path().join("sub").join("deep.txt")]);
    }

    #[test]
    fn test_ignored_log_file_never_matches() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "needle\n").unwrap();
        let mut req = request(dir.path(), &["needle"]);
        req.ignored_extensions.insert(".log".to_string());
        let mut session = SearchSession::new();

        let result = session
            .run_search(&req, &CoreFileSystemScanner::new(), &mut NoopObserver)
            .unwrap();

        assert!(result.matched_files.is_empty());
        assert_eq!(result.files_scanned, 0);
    }
}
