//! CLI entry point for flatdo.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use flatdo_app::{FlatdoConfig, TaskService};
use flatdo_store_file::FileStore;

mod commands;
mod tui;

/// Tasks kept one per line in a plain text file.
#[derive(Parser, Debug)]
#[command(
    name = "flatdo",
    version,
    about = "flatdo: tasks stored one per line in a plain text file"
)]
struct Cli {
    /// Path to the task file (overrides the configured one).
    #[arg(long)]
    file: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append a new task.
    Add {
        /// Task text; multiple words are joined with spaces.
        text: Vec<String>,
    },

    /// List visible tasks.
    Ls {
        /// Include completed tasks after the open ones.
        #[arg(short, long)]
        all: bool,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Toggle completion of the numbered task.
    Done {
        /// 1-based task number from `ls --all`.
        number: usize,
    },

    /// Replace the text of the numbered task.
    Edit {
        /// 1-based task number from `ls --all`.
        number: usize,
        /// Replacement text; empty input cancels the edit.
        text: Vec<String>,
    },

    /// Delete the numbered task. Soft by default: the record stays in the
    /// file but disappears from every view.
    Rm {
        /// 1-based task number from `ls --all`.
        number: usize,
        /// Remove the record from the file instead of hiding it.
        #[arg(long)]
        hard: bool,
    },

    /// Print the task file exactly as stored.
    Raw,

    /// Delete every task.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Launch interactive terminal UI.
    Tui,
}

/// Output format for `ls`.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum LsFormat {
    /// Numbered checkbox lines.
    Table,
    /// Pretty-printed JSON rows.
    Json,
}

fn main() -> Result<()> {
    let Cli { file, cmd } = Cli::parse();

    if should_install_tracing(&cmd) {
        install_tracing();
    }

    let config = FlatdoConfig::load()?;
    let path = file.map_or_else(|| config.file.clone(), Into::into);
    let store = FileStore::open(path, config.capacity);
    let service = TaskService::new(store);

    match cmd {
        Command::Tui => tui::run(service, config.show_done),
        other => commands::run(other, &service, &config),
    }
}

const fn should_install_tracing(cmd: &Command) -> bool {
    // Raw mode plus the alternate screen would garble log lines.
    !matches!(cmd, Command::Tui)
}

fn install_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from(["flatdo", "--file", "list.txt", "add", "buy", "milk"]);
        assert_eq!(cli.file.as_deref(), Some("list.txt"));
        match cli.cmd {
            Command::Add { text } => assert_eq!(text, vec!["buy", "milk"]),
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_ls_defaults() {
        let cli = Cli::parse_from(["flatdo", "ls"]);
        match cli.cmd {
            Command::Ls { all, format } => {
                assert!(!all);
                assert!(matches!(format, LsFormat::Table));
            }
            _ => panic!("expected ls command"),
        }
    }

    #[test]
    fn parse_ls_all_json() {
        let cli = Cli::parse_from(["flatdo", "ls", "--all", "--format", "json"]);
        match cli.cmd {
            Command::Ls { all, format } => {
                assert!(all);
                assert!(matches!(format, LsFormat::Json));
            }
            _ => panic!("expected ls command"),
        }
    }

    #[test]
    fn parse_rm_hard() {
        let cli = Cli::parse_from(["flatdo", "rm", "3", "--hard"]);
        match cli.cmd {
            Command::Rm { number, hard } => {
                assert_eq!(number, 3);
                assert!(hard);
            }
            _ => panic!("expected rm command"),
        }
    }

    #[test]
    fn parse_tui_command() {
        let cli = Cli::parse_from(["flatdo", "tui"]);
        assert!(matches!(cli.cmd, Command::Tui));
    }

    #[test]
    fn skips_tracing_in_tui_mode() {
        assert!(!should_install_tracing(&Command::Tui));
        assert!(should_install_tracing(&Command::Raw));
    }
}
