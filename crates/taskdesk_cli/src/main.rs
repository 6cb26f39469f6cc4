//! Command-line front end for `taskdesk_core`.
//!
//! # Responsibility
//! - Map one invocation to one task use case.
//! - Load the task file, apply the command, and save when it changed state.

mod config;

use clap::Parser;
use config::{Cli, CliConfig, Command, SortKey};
use log::info;
use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;
use taskdesk_core::{init_logging, Task, TaskService, TaskServiceError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_default();
    let config = CliConfig::resolve(&cli, &cwd);

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("taskdesk: logging disabled: {err}");
        }
    }

    match run(&cli.command, &config, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskdesk: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run<W: Write>(
    command: &Command,
    config: &CliConfig,
    output: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut service = TaskService::open(&config.tasks_file)?;
    info!(
        "event=cli_command module=cli status=start tasks={}",
        service.store().len()
    );

    let changed = execute(command, &mut service, output)?;
    if changed {
        service.save()?;
    }
    Ok(())
}

/// Applies `command`; returns whether the store needs saving.
fn execute<W: Write>(
    command: &Command,
    service: &mut TaskService,
    output: &mut W,
) -> Result<bool, Box<dyn Error>> {
    match command {
        Command::Add(fields) => {
            let index = service.create_task(fields.to_draft())?;
            print_rows(output, service.tasks().iter().enumerate().skip(index))?;
            Ok(true)
        }
        Command::Edit { index, fields } => {
            let current = service
                .task(*index)
                .ok_or(TaskServiceError::TaskNotFound(*index))?;
            let draft = fields.overlay(current);
            service.modify_task(*index, draft)?;
            print_rows(output, service.tasks().iter().enumerate().skip(*index).take(1))?;
            Ok(true)
        }
        Command::Rm { index } => {
            let removed = service.delete_task(*index)?;
            writeln!(output, "deleted: {}", removed.title)?;
            Ok(true)
        }
        Command::Done { index } => {
            service.complete_task(*index)?;
            print_rows(output, service.tasks().iter().enumerate().skip(*index).take(1))?;
            Ok(true)
        }
        Command::List { json } => {
            if *json {
                print_json(output, service.tasks())?;
            } else {
                print_rows(output, service.tasks().iter().enumerate())?;
            }
            Ok(false)
        }
        Command::Search { query, json } => {
            let hits = service.search(query);
            if *json {
                print_json(output, &hits)?;
            } else {
                // Search results keep their store positions so they can be
                // passed to edit/rm/done.
                let rows = hits.iter().filter_map(|hit| {
                    service
                        .store()
                        .position_of(hit.id)
                        .map(|index| (index, hit))
                });
                print_rows(output, rows)?;
            }
            Ok(false)
        }
        Command::Sort { by } => {
            match by {
                SortKey::Date => service.sort_by_date(),
                SortKey::Status => service.sort_by_status(),
            }
            print_rows(output, service.tasks().iter().enumerate())?;
            Ok(true)
        }
    }
}

fn print_rows<'a, W: Write>(
    output: &mut W,
    rows: impl IntoIterator<Item = (usize, &'a Task)>,
) -> io::Result<()> {
    for (index, task) in rows {
        writeln!(
            output,
            "{:>3} {:10} {:8} {}",
            index,
            task.formatted_due_date(),
            task.status.label(),
            task.title
        )?;
    }
    Ok(())
}

fn print_json<W: Write>(output: &mut W, tasks: &[Task]) -> Result<(), Box<dyn Error>> {
    serde_json::to_writer_pretty(&mut *output, tasks)?;
    writeln!(output)?;
    Ok(())
}
