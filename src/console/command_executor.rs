/*
 * Executes `AppCommand`s against a pair of output streams. Search output
 * (context blocks, matched file names, JSON reports) goes to `out`; messages
 * for the user go to `err`, so the search output stays clean for piping.
 *
 * The executor remembers whether any warning or error was shown, which the
 * binary turns into its exit status.
 */
use super::types::{AppCommand, MessageSeverity};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    // Stream context blocks, then list the matched files.
    Context,
    // Only print matched file paths, one per line.
    FilesOnly,
    // Only print the JSON report.
    Json,
}

pub struct CommandExecutor<O: Write, E: Write> {
    mode: OutputMode,
    out: O,
    err: E,
    matched_files: Vec<PathBuf>,
    failure_shown: bool,
}

impl<O: Write, E: Write> CommandExecutor<O, E> {
    pub fn new(mode: OutputMode, out: O, err: E) -> Self {
        CommandExecutor {
            mode,
            out,
            err,
            matched_files: Vec::new(),
            failure_shown: false,
        }
    }

    pub fn failure_shown(&self) -> bool {
        self.failure_shown
    }

    pub fn execute(&mut self, command: AppCommand) -> io::Result<()> {
        log::trace!("CommandExecutor: Executing {command:?}");
        match command {
            AppCommand::ClearOutput => {
                self.matched_files.clear();
            }
            AppCommand::AppendMatchedFile(path) => match self.mode {
                OutputMode::FilesOnly => writeln!(self.out, "{}", path.display())?,
                OutputMode::Context => self.matched_files.push(path),
                OutputMode::Json => {}
            },
            AppCommand::AppendContextText(text) => {
                if self.mode == OutputMode::Context {
                    self.out.write_all(text.as_bytes())?;
                }
            }
            AppCommand::ShowMessage {
                severity,
                title,
                text,
            } => {
                let prefix = match severity {
                    MessageSeverity::Information => "",
                    MessageSeverity::Warning => "warning: ",
                    MessageSeverity::Error => "error: ",
                };
                if severity != MessageSeverity::Information {
                    self.failure_shown = true;
                }
                writeln!(self.err, "{prefix}{title}: {text}")?;
            }
            AppCommand::ShowReport(json) => {
                if self.mode == OutputMode::Json {
                    writeln!(self.out, "{json}")?;
                }
            }
        }
        Ok(())
    }

    // Prints the matched-file listing collected in context mode.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.mode == OutputMode::Context && !self.matched_files.is_empty() {
            writeln!(self.out, "\nMatched files:")?;
            for path in &self.matched_files {
                writeln!(self.out, "{}", path.display())?;
            }
        }
        self.out.flush()?;
        self.err.flush()
    }
}
