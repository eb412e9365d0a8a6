use crate::console::{AppCommand, MessageSeverity};
use crate::core::{
    ConfigError, ExportError, ExporterOperations, FileSystemScannerOperations, IgnorableExtension,
    MatchHit, SearchObserver, SearchRequest, SearchSession, SearchSettings, report,
};
use std::collections::{BTreeSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/*
 * Forwards search progress into the command queue so matched files and context
 * blocks reach the console in the order they are found.
 */
struct QueueingObserver<'a> {
    queue: &'a mut VecDeque<AppCommand>,
}

impl SearchObserver for QueueingObserver<'_> {
    fn on_file_matched(&mut self, path: &Path) {
        self.queue
            .push_back(AppCommand::AppendMatchedFile(path.to_path_buf()));
    }

    fn on_hit(&mut self, hit: &MatchHit) {
        self.queue
            .push_back(AppCommand::AppendContextText(hit.context_text.clone()));
    }

    fn on_file_skipped(&mut self, path: &Path, error: &io::Error) {
        log::debug!("GrepGrouperLogic: Skipped {path:?}: {error}");
    }
}

/*
 * Manages the application state and user actions in a front-end agnostic
 * manner. Each action (search, clear, export, changing the ignored
 * extensions) updates the state and queues `AppCommand`s for the console to
 * execute. The file system is reached only through the scanner and exporter
 * traits, so tests can substitute both.
 */
pub struct GrepGrouperLogic {
    pub(crate) settings: SearchSettings,
    pub(crate) session: SearchSession,
    pub(crate) last_request: Option<SearchRequest>,
    pub(crate) scanner: Arc<dyn FileSystemScannerOperations>,
    pub(crate) exporter: Arc<dyn ExporterOperations>,
    synthetic_commands: VecDeque<AppCommand>,
}

impl GrepGrouperLogic {
    pub fn new(
        settings: SearchSettings,
        scanner: Arc<dyn FileSystemScannerOperations>,
        exporter: Arc<dyn ExporterOperations>,
    ) -> Self {
        GrepGrouperLogic {
            settings,
            session: SearchSession::new(),
            last_request: None,
            scanner,
            exporter,
            synthetic_commands: VecDeque::new(),
        }
    }

    #[cfg(test)]
    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn matched_files(&self) -> &[PathBuf] {
        &self.session.result().matched_files
    }

    pub fn try_dequeue_command(&mut self) -> Option<AppCommand> {
        self.synthetic_commands.pop_front()
    }

    fn show_message(&mut self, severity: MessageSeverity, title: &str, text: String) {
        self.synthetic_commands.push_back(AppCommand::ShowMessage {
            severity,
            title: title.to_string(),
            text,
        });
    }

    fn config_error_title(error: &ConfigError) -> &'static str {
        match error {
            ConfigError::EmptyPatternInput => "No Pattern",
            ConfigError::NoValidPatterns => "Invalid Pattern",
            ConfigError::NoRootPath => "No Directory",
            ConfigError::ContextOutOfRange { .. } | ConfigError::UnknownExtension(_) => {
                "Invalid Setting"
            }
        }
    }

    /*
     * Replaces the set of extensions to skip and confirms the new set to the
     * user.
     */
    pub fn on_set_ignored_extensions(&mut self, extensions: BTreeSet<IgnorableExtension>) {
        self.settings.ignored_extensions = extensions;
        let description = self.settings.describe_ignored_extensions();
        log::debug!("GrepGrouperLogic: Ignored extensions set to {description}.");
        self.show_message(
            MessageSeverity::Information,
            "Extensions Updated",
            format!("Ignored extensions: {description}"),
        );
    }

    pub fn on_clear(&mut self) {
        self.session.clear();
        self.synthetic_commands.push_back(AppCommand::ClearOutput);
    }

    /*
     * Runs a search with the current settings. Output of any previous search is
     * cleared first. Invalid settings are reported as warnings without touching
     * the file system; a traversal failure is reported as an error.
     */
    pub fn on_search(&mut self) {
        self.on_clear();
        self.last_request = None;

        let request = match self.settings.to_request() {
            Ok(request) => request,
            Err(e) => {
                log::warn!("GrepGrouperLogic: Search not started: {e}");
                let title = Self::config_error_title(&e);
                self.show_message(MessageSeverity::Warning, title, e.to_string());
                return;
            }
        };

        let mut observer = QueueingObserver {
            queue: &mut self.synthetic_commands,
        };
        let search_outcome = self
            .session
            .run_search(&request, self.scanner.as_ref(), &mut observer)
            .map(|result| result.has_matches());
        if search_outcome.is_ok() {
            self.last_request = Some(request);
        }
        log::debug!(
            "GrepGrouperLogic: Session {:?} with {} matched file(s).",
            self.session.state(),
            self.matched_files().len()
        );

        match search_outcome {
            Ok(true) => {}
            Ok(false) => self.show_message(
                MessageSeverity::Information,
                "No Matches",
                "No matches found.".to_string(),
            ),
            Err(e) => {
                log::error!("GrepGrouperLogic: Search failed: {e}");
                self.show_message(MessageSeverity::Error, "Search Failed", e.to_string());
            }
        }
    }

    /*
     * Copies the matched files of the last search into a timestamped folder
     * under `destination`. `None` means the user did not pick a destination,
     * which silently abandons the export.
     */
    pub fn on_export(&mut self, destination: Option<&Path>) {
        if self.matched_files().is_empty() {
            self.show_message(
                MessageSeverity::Information,
                "No Files",
                ExportError::NothingToExport.to_string(),
            );
            return;
        }
        let Some(destination) = destination else {
            log::debug!("GrepGrouperLogic: Export cancelled, no destination chosen.");
            return;
        };

        let files = self.matched_files().to_vec();
        match self.exporter.export_files(&files, destination) {
            Ok(folder) => self.show_message(
                MessageSeverity::Information,
                "Files Copied",
                format!("Files copied to: {}", folder.display()),
            ),
            Err(e) => {
                log::error!("GrepGrouperLogic: Export failed: {e}");
                self.show_message(MessageSeverity::Error, "Export Failed", e.to_string());
            }
        }
    }

    // Queues the JSON report of the last search that ran to completion.
    pub fn on_show_report(&mut self) {
        let Some(request) = self.last_request.as_ref() else {
            return;
        };
        match report::to_json(request, self.session.result()) {
            Ok(json) => self.synthetic_commands.push_back(AppCommand::ShowReport(json)),
            Err(e) => {
                log::error!("GrepGrouperLogic: Failed to serialize report: {e}");
                self.show_message(MessageSeverity::Error, "Report Failed", e.to_string());
            }
        }
    }
}
