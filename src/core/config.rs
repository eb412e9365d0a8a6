/*
 * User-facing search settings and their validation. `SearchSettings` is the
 * plain configuration structure the front end fills in (defaults: home
 * directory, one line before, three lines after). It
 * is converted into a `SearchRequest` only through `to_request`, which is
 * where pattern input is split and every value is range-checked, so that a
 * search never starts from an invalid configuration.
 *
 * The ignorable extensions are a closed set (`IgnorableExtension`); the
 * text-file allow-list lives in `models::TEXT_FILE_EXTENSIONS` and is kept
 * separate on purpose so both filters can be reasoned about independently.
 */
use super::models::SearchRequest;
use super::path_utils;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CONTEXT_BEFORE: usize = 1;
pub const DEFAULT_CONTEXT_AFTER: usize = 3;
pub const MAX_CONTEXT_LINES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyPatternInput,
    NoValidPatterns,
    NoRootPath,
    ContextOutOfRange { which: ContextSide, value: usize },
    UnknownExtension(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextSide {
    Before,
    After,
}

impl fmt::Display for ContextSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextSide::Before => write!(f, "Lines before"),
            ContextSide::After => write!(f, "Lines after"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPatternInput => {
                write!(f, "Please enter at least one search pattern.")
            }
            ConfigError::NoValidPatterns => {
                write!(f, "Please enter valid search patterns separated by commas.")
            }
            ConfigError::NoRootPath => write!(f, "No directory selected to search in."),
            ConfigError::ContextOutOfRange { which, value } => write!(
                f,
                "{which} must be between 0 and {MAX_CONTEXT_LINES}, got {value}."
            ),
            ConfigError::UnknownExtension(ext) => write!(
                f,
                "Unknown extension '{ext}'. Choose from: {}",
                IgnorableExtension::ALL
                    .iter()
                    .map(|e| e.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

pub type Result<T> = std::result::Result<T, ConfigError>;

/*
 * The extensions a user may choose to skip. Anything outside this list is
 * rejected rather than silently accepted.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IgnorableExtension {
    Exe,
    Jpg,
    Png,
    Pdf,
    Docx,
    Xlsx,
    Zip,
    Rar,
    Mp3,
    Mp4,
}

impl IgnorableExtension {
    pub const ALL: [IgnorableExtension; 10] = [
        IgnorableExtension::Exe,
        IgnorableExtension::Jpg,
        IgnorableExtension::Png,
        IgnorableExtension::Pdf,
        IgnorableExtension::Docx,
        IgnorableExtension::Xlsx,
        IgnorableExtension::Zip,
        IgnorableExtension::Rar,
        IgnorableExtension::Mp3,
        IgnorableExtension::Mp4,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IgnorableExtension::Exe => ".exe",
            IgnorableExtension::Jpg => ".jpg",
            IgnorableExtension::Png => ".png",
            IgnorableExtension::Pdf => ".pdf",
            IgnorableExtension::Docx => ".docx",
            IgnorableExtension::Xlsx => ".xlsx",
            IgnorableExtension::Zip => ".zip",
            IgnorableExtension::Rar => ".rar",
            IgnorableExtension::Mp3 => ".mp3",
            IgnorableExtension::Mp4 => ".mp4",
        }
    }
}

impl fmt::Display for IgnorableExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Accepts "pdf", ".pdf" and "PDF".
impl FromStr for IgnorableExtension {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_ascii_lowercase();
        let with_dot = if trimmed.starts_with('.') {
            trimmed
        } else {
            format!(".{trimmed}")
        };
        IgnorableExtension::ALL
            .into_iter()
            .find(|ext| ext.as_str() == with_dot)
            .ok_or_else(|| ConfigError::UnknownExtension(s.to_string()))
    }
}

/*
 * Splits a comma-separated pattern string into individual patterns, trimming
 * surrounding whitespace and dropping empty segments. An input that is empty
 * to begin with and an input that only yields empty segments are reported
 * with different messages.
 */
pub fn parse_patterns(input: &str) -> Result<Vec<String>> {
    if input.trim().is_empty() {
        return Err(ConfigError::EmptyPatternInput);
    }
    let patterns: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if patterns.is_empty() {
        return Err(ConfigError::NoValidPatterns);
    }
    Ok(patterns)
}

fn check_context(which: ContextSide, value: usize) -> Result<usize> {
    if value > MAX_CONTEXT_LINES {
        return Err(ConfigError::ContextOutOfRange { which, value });
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub root_path: PathBuf,
    pub pattern_input: String,
    pub recursive: bool,
    pub case_insensitive: bool,
    pub ignored_extensions: BTreeSet<IgnorableExtension>,
    pub context_before: usize,
    pub context_after: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            root_path: path_utils::default_search_root(),
            pattern_input: String::new(),
            recursive: false,
            case_insensitive: false,
            ignored_extensions: BTreeSet::new(),
            context_before: DEFAULT_CONTEXT_BEFORE,
            context_after: DEFAULT_CONTEXT_AFTER,
        }
    }
}

impl SearchSettings {
    /*
     * Validates the settings and builds the request for one search. Nothing
     * here touches the file system apart from resolving a relative root
     * against the current directory.
     */
    pub fn to_request(&self) -> Result<SearchRequest> {
        if self.root_path.as_os_str().is_empty() {
            return Err(ConfigError::NoRootPath);
        }
        let patterns = parse_patterns(&self.pattern_input)?;
        let context_before = check_context(ContextSide::Before, self.context_before)?;
        let context_after = check_context(ContextSide::After, self.context_after)?;

        Ok(SearchRequest {
            root_path: path_utils::to_absolute(&self.root_path),
            patterns,
            recursive: self.recursive,
            case_insensitive: self.case_insensitive,
            ignored_extensions: self
                .ignored_extensions
                .iter()
                .map(|ext| ext.as_str().to_string())
                .collect(),
            context_before,
            context_after,
        })
    }

    pub fn describe_ignored_extensions(&self) -> String {
        if self.ignored_extensions.is_empty() {
            return "none".to_string();
        }
        self.ignored_extensions
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
