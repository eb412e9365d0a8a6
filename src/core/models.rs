/*
 * Data structures shared by the scan driver, the line matcher and the search
 * session. A `SearchRequest` is built fresh for every search; `SearchResult`
 * is owned by the session and rebuilt on every run. `FileScanOutcome` is the
 * per-file result the matcher hands back to the session for aggregation.
 */
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

// Paths are reported as text; bytes that are not valid UTF-8 are replaced.
fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

fn serialize_paths<S: Serializer>(paths: &[PathBuf], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(paths.iter().map(|p| p.to_string_lossy()))
}

// Files are only examined when their name ends with one of these.
pub const TEXT_FILE_EXTENSIONS: [&str; 3] = [".txt", ".log", ".py"];

/*
 * Everything a single search needs. Patterns are regular expressions, not
 * literals, and must be non-empty before a search runs; the session enforces
 * this before touching the file system.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    #[serde(serialize_with = "serialize_path")]
    pub root_path: PathBuf,
    pub patterns: Vec<String>,
    pub recursive: bool,
    pub case_insensitive: bool,
    pub ignored_extensions: BTreeSet<String>,
    pub context_before: usize,
    pub context_after: usize,
}

#[cfg(test)]
impl SearchRequest {
    /// Creates a request with no flags set and no ignored extensions.
    pub fn new(root_path: PathBuf, patterns: Vec<String>) -> Self {
        SearchRequest {
            root_path,
            patterns,
            recursive: false,
            case_insensitive: false,
            ignored_extensions: BTreeSet::new(),
            context_before: 0,
            context_after: 0,
        }
    }
}

/*
 * One hit line inside a file. `window` is the half-open range of line indices
 * that were rendered into `context_text`, which already includes the header
 * naming the file and the separator footer.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchHit {
    #[serde(serialize_with = "serialize_path")]
    pub file_path: PathBuf,
    pub line_index: usize,
    pub window: Range<usize>,
    pub context_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub reason: String,
}

// What happened to a single candidate file.
#[derive(Debug)]
pub enum FileScanOutcome {
    Matched(Vec<MatchHit>),
    NoMatch,
    Skipped(std::io::Error),
}

/*
 * Accumulated output of a search. `matched_files` holds each file once, in the
 * order it was first seen; `rendered_text` is every context block in scan order.
 */
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    #[serde(serialize_with = "serialize_paths")]
    pub matched_files: Vec<PathBuf>,
    pub rendered_text: String,
    pub hits: Vec<MatchHit>,
    pub files_scanned: usize,
    pub skipped_files: Vec<SkippedFile>,
}

impl SearchResult {
    pub fn clear(&mut self) {
        self.matched_files.clear();
        self.rendered_text.clear();
        self.hits.clear();
        self.files_scanned = 0;
        self.skipped_files.clear();
    }

    pub fn has_matches(&self) -> bool {
        !self.matched_files.is_empty()
    }
}
