// src/main.rs

mod app_logic;
mod cli;
mod console;
mod core;
mod logging;

use crate::app_logic::GrepGrouperLogic;
use crate::cli::Cli;
use crate::console::CommandExecutor;
use crate::core::{CoreExporter, CoreFileSystemScanner};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

fn drain_commands<O: io::Write, E: io::Write>(
    logic: &mut GrepGrouperLogic,
    executor: &mut CommandExecutor<O, E>,
) -> io::Result<()> {
    while let Some(command) = logic.try_dequeue_command() {
        executor.execute(command)?;
    }
    Ok(())
}

fn run(cli: &Cli) -> io::Result<bool> {
    let mut logic = GrepGrouperLogic::new(
        cli.to_settings(),
        Arc::new(CoreFileSystemScanner::new()),
        Arc::new(CoreExporter::new()),
    );
    let mut executor = CommandExecutor::new(cli.output_mode(), io::stdout().lock(), io::stderr());

    let ignored = cli.ignored_extensions();
    if !ignored.is_empty() {
        logic.on_set_ignored_extensions(ignored);
        drain_commands(&mut logic, &mut executor)?;
    }

    logic.on_search();
    drain_commands(&mut logic, &mut executor)?;

    if cli.json {
        logic.on_show_report();
        drain_commands(&mut logic, &mut executor)?;
    }

    if let Some(destination) = cli.export_to.as_deref() {
        logic.on_export(Some(destination));
        drain_commands(&mut logic, &mut executor)?;
    }

    executor.finish()?;
    Ok(!executor.failure_shown())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("warning: {e}");
    }
    log::debug!("Main: Parsed arguments {cli:?}");

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
