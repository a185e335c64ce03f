use std::io::{self, Write as _};

use anyhow::Result;
use flatdo_app::{FlatdoConfig, OpOutcome, ServiceError, TaskRow, TaskService, TaskStore};

use crate::{Command, LsFormat};

/// Execute a non-interactive subcommand against the service.
pub fn run<S: TaskStore>(
    command: Command,
    service: &TaskService<S>,
    config: &FlatdoConfig,
) -> Result<()> {
    match command {
        Command::Add { text } => report(service.add(&text.join(" "))),

        Command::Ls { all, format } => {
            let rows = service.current_view(all || config.show_done)?;
            match format {
                LsFormat::Table => render_task_table(&rows),
                LsFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
            }
            Ok(())
        }

        Command::Done { number } => report(service.toggle(number)),

        Command::Edit { number, text } => report(service.edit(number, &text.join(" "))),

        Command::Rm { number, hard } => {
            if hard {
                report(service.hard_delete(number))
            } else {
                report(service.soft_delete(number))
            }
        }

        Command::Raw => {
            match service.raw_view()? {
                Some(lines) => {
                    for line in lines {
                        println!("{line}");
                    }
                }
                None => println!("No task file"),
            }
            Ok(())
        }

        Command::Clear { yes } => {
            if yes || confirm("This will delete all tasks. Confirm (y/n): ")? {
                report(service.clear_all())
            } else {
                println!("Clear cancelled");
                Ok(())
            }
        }

        Command::Tui => unreachable!("tui is dispatched in main"),
    }
}

/// Print the operation's status text. Recoverable failures (bad index,
/// rejected text, full list) are status text too; only storage failures
/// escape to the error path.
fn report(result: Result<OpOutcome, ServiceError>) -> Result<()> {
    match result {
        Ok(outcome) => {
            println!("{outcome}");
            Ok(())
        }
        Err(err) if err.is_recoverable() => {
            println!("{err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn render_task_table(rows: &[TaskRow]) {
    if rows.is_empty() {
        println!("No tasks found");
        return;
    }
    for row in rows {
        println!("{}. [{}] {}", row.number, if row.done { 'x' } else { ' ' }, row.text);
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}
