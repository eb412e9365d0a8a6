/*
 * Command-line surface. Every option maps onto one field of `SearchSettings`
 * or onto an action of the presenter; range checks are left to the settings
 * so the console and any other front end report the same errors.
 */
use crate::console::OutputMode;
use crate::core::{IgnorableExtension, SearchSettings, path_utils};
use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Search text files for regex patterns, show context, and group matching files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Comma-separated regular expressions; a line matching any of them is a hit
    pub patterns: String,

    /// Directory to search (defaults to your home directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Search subdirectories too
    #[arg(short, long)]
    pub recursive: bool,

    /// Ignore letter case when matching
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Lines of context before each hit (0-10)
    #[arg(short = 'B', long, default_value_t = crate::core::config::DEFAULT_CONTEXT_BEFORE)]
    pub before: usize,

    /// Lines of context after each hit (0-10)
    #[arg(short = 'A', long, default_value_t = crate::core::config::DEFAULT_CONTEXT_AFTER)]
    pub after: usize,

    /// Skip files with this extension (.exe .jpg .png .pdf .docx .xlsx .zip .rar .mp3 .mp4); repeatable
    #[arg(short = 'x', long = "ignore-ext", value_parser = parse_extension)]
    pub ignore_ext: Vec<IgnorableExtension>,

    /// Copy matched files into a new matched_files_<timestamp> folder under this directory
    #[arg(short, long, value_name = "DIR")]
    pub export_to: Option<PathBuf>,

    /// Only print the paths of matched files
    #[arg(short = 'l', long, conflicts_with = "json")]
    pub files_only: bool,

    /// Print a JSON report instead of context blocks
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write a debug log to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

fn parse_extension(value: &str) -> Result<IgnorableExtension, String> {
    value.parse().map_err(|e: crate::core::ConfigError| e.to_string())
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.files_only {
            OutputMode::FilesOnly
        } else {
            OutputMode::Context
        }
    }

    pub fn ignored_extensions(&self) -> BTreeSet<IgnorableExtension> {
        self.ignore_ext.iter().copied().collect()
    }

    // Ignored extensions are applied separately through the presenter.
    pub fn to_settings(&self) -> SearchSettings {
        SearchSettings {
            root_path: self
                .directory
                .clone()
                .unwrap_or_else(path_utils::default_search_root),
            pattern_input: self.patterns.clone(),
            recursive: self.recursive,
            case_insensitive: self.ignore_case,
            ignored_extensions: BTreeSet::new(),
            context_before: self.before,
            context_after: self.after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["grep_grouper", "Error"]).unwrap();
        let settings = cli.to_settings();
        assert_eq!(settings.pattern_input, "Error");
        assert_eq!(settings.context_before, 1);
        assert_eq!(settings.context_after, 3);
        assert!(!settings.recursive);
        assert!(!settings.case_insensitive);
        assert_eq!(cli.output_mode(), OutputMode::Context);
        assert!(cli.ignored_extensions().is_empty());
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "grep_grouper",
            "foo,bar",
            "-d",
            "/srv/logs",
            "-r",
            "-i",
            "-B",
            "0",
            "-A",
            "5",
            "-x",
            "pdf",
            "--ignore-ext",
            ".zip",
            "-l",
            "-vv",
        ])
        .unwrap();

        let settings = cli.to_settings();
        assert_eq!(settings.root_path, PathBuf::from("/srv/logs"));
        assert!(settings.recursive);
        assert!(settings.case_insensitive);
        assert_eq!(settings.context_before, 0);
        assert_eq!(settings.context_after, 5);
        assert_eq!(
            cli.ignored_extensions(),
            BTreeSet::from([IgnorableExtension::Pdf, IgnorableExtension::Zip])
        );
        assert_eq!(cli.output_mode(), OutputMode::FilesOnly);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(Cli::try_parse_from(["grep_grouper", "x", "-x", "txt"]).is_err());
    }

    #[test]
    fn test_json_and_files_only_conflict() {
        assert!(Cli::try_parse_from(["grep_grouper", "x", "--json", "-l"]).is_err());
    }
}
