/*
 * The console stands in for a windowing layer: it receives display commands
 * from the application logic and renders them on stdout and stderr.
 */
pub mod command_executor;
pub mod types;

pub use command_executor::{CommandExecutor, OutputMode};
pub use types::{AppCommand, MessageSeverity};
