/*
 * Types exchanged between the application logic and the console layer:
 * the display commands the presenter issues (`AppCommand`) and the severity
 * attached to user-facing messages (`MessageSeverity`).
 */
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Information,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    // Discard the matched-file listing and the context output of a previous search.
    ClearOutput,
    AppendMatchedFile(PathBuf),
    AppendContextText(String),
    ShowMessage {
        severity: MessageSeverity,
        title: String,
        text: String,
    },
    ShowReport(String),
}
