//! CLI entry point for taskdeck.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use taskdeck_app::{TaskBoard, TaskStore};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use shell::{Shell, ThemeChoice};

mod config;
mod render;
mod shell;

/// In-memory task tracking with filtered, sorted views.
#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "taskdeck: single-user task tracking with search, sorting and status counters"
)]
struct Cli {
    /// Preferences file (defaults to the platform config directory).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive shell (default).
    Shell,

    /// Print the effective theme, or change and persist it.
    Theme {
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },
}

fn main() -> Result<()> {
    let Cli { config, cmd } = Cli::parse();
    install_tracing();

    let prefs_path = config::resolve_config_path(config)?;
    execute_command(prefs_path, cmd.unwrap_or(Command::Shell))
}

fn execute_command(prefs_path: PathBuf, command: Command) -> Result<()> {
    let (mut prefs, theme) = config::load_preferences(&prefs_path)?;
    match command {
        Command::Shell => {
            let board = TaskBoard::new(TaskStore::new(), prefs.view.initial_query());
            let mut shell = Shell::new(board, prefs, Some(prefs_path), theme);
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            shell.run(stdin.lock(), &mut stdout)?;
            debug!(
                tasks = shell.board().store().len(),
                theme = %shell.theme(),
                "session ended"
            );
            Ok(())
        }

        Command::Theme { choice: None } => {
            writeln!(io::stdout(), "{theme}")?;
            Ok(())
        }

        Command::Theme {
            choice: Some(choice),
        } => {
            let next = choice.apply(theme);
            config::persist_theme(&mut prefs, &prefs_path, next)?;
            writeln!(io::stdout(), "{next}")?;
            Ok(())
        }
    }
}

fn install_tracing() {
    // RUST_LOG overrides the default; stdout is reserved for the shell.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_is_the_default_command() {
        let cli = Cli::parse_from(["taskdeck"]);
        assert!(cli.cmd.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_config_override() {
        let cli = Cli::parse_from(["taskdeck", "--config", "/tmp/prefs.toml", "shell"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/prefs.toml")));
        match cli.cmd {
            Some(Command::Shell) => {}
            _ => panic!("expected shell command"),
        }
    }

    #[test]
    fn parse_theme_command() {
        let cli = Cli::parse_from(["taskdeck", "theme", "light"]);
        match cli.cmd {
            Some(Command::Theme { choice }) => assert_eq!(choice, Some(ThemeChoice::Light)),
            _ => panic!("expected theme command"),
        }

        let cli = Cli::parse_from(["taskdeck", "theme"]);
        match cli.cmd {
            Some(Command::Theme { choice }) => assert!(choice.is_none()),
            _ => panic!("expected theme command"),
        }
    }

    #[test]
    fn theme_command_persists_choice() -> Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("config.toml");
        execute_command(
            path.clone(),
            Command::Theme {
                choice: Some(ThemeChoice::Light),
            },
        )?;

        let (prefs, theme) = config::load_preferences(&path)?;
        assert_eq!(prefs.theme, Some(taskdeck_app::Theme::Light));
        assert_eq!(theme, taskdeck_app::Theme::Light);
        Ok(())
    }
}
