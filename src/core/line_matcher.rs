/*
 * Per-file pattern matching with context extraction. Every line of a file is
 * tested against all patterns (regex search semantics, OR-combined); each hit
 * line yields one rendered block containing a header naming the file, the
 * lines of its context window, and a separator footer. Windows of nearby hits
 * are emitted independently, even when they overlap.
 *
 * Read failures are not errors of the search: they are logged and reported as
 * `FileScanOutcome::Skipped` so the session can move on to the next file.
 */
use super::models::{FileScanOutcome, MatchHit, SearchRequest};
use regex::{Regex, RegexBuilder};
use std::fs;
use std::ops::Range;
use std::path::Path;

const FOOTER_WIDTH: usize = 50;

#[derive(Debug)]
pub struct PatternError {
    pub pattern: String,
    pub source: regex::Error,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid pattern '{}': {}", self.pattern, self.source)
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/*
 * The compiled form of the user's patterns. A line is a hit when any of them
 * finds a match anywhere in it.
 */
#[derive(Debug, Clone)]
pub struct PatternSet {
    regexes: Vec<Regex>,
}

impl PatternSet {
    pub fn compile(patterns: &[String], case_insensitive: bool) -> Result<Self, PatternError> {
        let regexes = patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(case_insensitive)
                    .build()
                    .map_err(|source| PatternError {
                        pattern: pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PatternSet { regexes })
    }

    pub fn is_hit(&self, line: &str) -> bool {
        self.regexes.iter().any(|re| re.is_match(line))
    }
}

/// Half-open range of line indices shown around the hit at `hit_index`, clamped to the file.
pub fn context_window(hit_index: usize, line_count: usize, before: usize, after: usize) -> Range<usize> {
    let start = hit_index.saturating_sub(before);
    let end = hit_index
        .saturating_add(after)
        .saturating_add(1)
        .min(line_count);
    start..end
}

/*
 * Splits text into lines. `\n`, `\r\n` and a lone `\r` all end a line, and the
 * terminator is not part of the line. A trailing terminator does not start an
 * extra empty line.
 */
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

pub fn render_block(file_path: &Path, window_lines: &[&str]) -> String {
    let mut block = format!("\n--- {} ---\n", file_path.display());
    for line in window_lines {
        block.push_str(line);
        block.push('\n');
    }
    block.push_str(&"-".repeat(FOOTER_WIDTH));
    block.push('\n');
    block
}

pub struct LineMatcher {
    patterns: PatternSet,
    context_before: usize,
    context_after: usize,
}

impl LineMatcher {
    pub fn new(patterns: PatternSet, context_before: usize, context_after: usize) -> Self {
        LineMatcher {
            patterns,
            context_before,
            context_after,
        }
    }

    pub fn from_request(request: &SearchRequest) -> Result<Self, PatternError> {
        let patterns = PatternSet::compile(&request.patterns, request.case_insensitive)?;
        Ok(Self::new(
            patterns,
            request.context_before,
            request.context_after,
        ))
    }

    /*
     * Matches already-decoded text. One `MatchHit` is produced per hit line,
     * in line order; an empty vector means the text had no hit line.
     */
    pub fn match_text(&self, file_path: &Path, text: &str) -> Vec<MatchHit> {
        let lines = split_lines(text);
        let mut hits = Vec::new();
        for (index, line) in lines.iter().enumerate() {
            if !self.patterns.is_hit(line) {
                continue;
            }
            let window = context_window(
                index,
                lines.len(),
                self.context_before,
                self.context_after,
            );
            let context_text = render_block(file_path, &lines[window.clone()]);
            hits.push(MatchHit {
                file_path: file_path.to_path_buf(),
                line_index: index,
                window,
                context_text,
            });
        }
        hits
    }

    /*
     * Reads the whole file and matches it. Bytes that are not valid UTF-8 are
     * replaced rather than treated as an error. The file handle is closed by
     * the time this returns, whatever the outcome.
     */
    pub fn match_file(&self, file_path: &Path) -> FileScanOutcome {
        let bytes = match fs::read(file_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("LineMatcher: Error reading {file_path:?}: {e}");
                return FileScanOutcome::Skipped(e);
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        let hits = self.match_text(file_path, &text);
        if hits.is_empty() {
            log::trace!("LineMatcher: No hit lines in {file_path:?}.");
            FileScanOutcome::NoMatch
        } else {
            log::debug!("LineMatcher: {} hit lines in {file_path:?}.", hits.len());
            FileScanOutcome::Matched(hits)
        }
    }
}
