//! Line-oriented task shell: the presentation layer over [`TaskBoard`].

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use taskdeck_app::{Clock, Preferences, StoreError, SystemClock, TaskBoard, Theme};
use taskdeck_core::{Category, Priority, SortField, SortOrder, Status, TaskFields, TaskId};
use thiserror::Error;
use time::macros::format_description;
use time::{Date, OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::warn;

use crate::config::persist_theme;
use crate::render;

const PROMPT: &str = "taskdeck> ";

/// Errors surfaced to the user as one-line notices; none of them end the session.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("No task matches '{0}'")]
    UnknownTask(String),
    #[error("'{prefix}' matches {count} tasks; type more of the id")]
    AmbiguousTask { prefix: String, count: usize },
    #[error("could not split command line: {0}")]
    Split(#[from] shell_words::ParseError),
}

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Theme selection accepted by the shell and the `theme` subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Dark,
    Light,
    Toggle,
}

impl ThemeChoice {
    pub const fn apply(self, current: Theme) -> Theme {
        match self {
            Self::Dark => Theme::Dark,
            Self::Light => Theme::Light,
            Self::Toggle => current.toggled(),
        }
    }
}

/// Value of a `--due` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueInput {
    Clear,
    At(OffsetDateTime),
}

impl DueInput {
    const fn into_option(self) -> Option<OffsetDateTime> {
        match self {
            Self::Clear => None,
            Self::At(when) => Some(when),
        }
    }
}

/// Parse `none`, `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_due(input: &str) -> Result<DueInput, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(DueInput::Clear);
    }
    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        return Ok(DueInput::At(date.midnight().assume_utc()));
    }
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map(DueInput::At)
        .map_err(|_| format!("invalid due date '{trimmed}' (use YYYY-MM-DD, RFC 3339 or none)"))
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, name = "taskdeck", disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    cmd: ShellCommand,
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(short = 'd', long)]
    description: Option<String>,
    #[arg(short = 's', long)]
    status: Option<Status>,
    #[arg(short = 'p', long)]
    priority: Option<Priority>,
    #[arg(short = 'c', long)]
    category: Option<Category>,
    /// YYYY-MM-DD, RFC 3339, or "none".
    #[arg(long, value_parser = parse_due)]
    due: Option<DueInput>,
}

impl FieldArgs {
    fn apply_to(self, fields: &mut TaskFields) {
        let Self {
            description,
            status,
            priority,
            category,
            due,
        } = self;
        if let Some(description) = description {
            fields.description = description;
        }
        if let Some(status) = status {
            fields.status = status;
        }
        if let Some(priority) = priority {
            fields.priority = priority;
        }
        if let Some(category) = category {
            fields.category = category;
        }
        if let Some(due) = due {
            fields.due_date = due.into_option();
        }
    }
}

#[derive(Subcommand, Debug)]
enum ShellCommand {
    /// Create a task.
    New {
        title: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a task; omitted flags keep their current value.
    Edit {
        id: String,
        #[arg(short = 't', long)]
        title: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Change the status of a task.
    Status { id: String, status: Status },
    /// Delete a task.
    #[command(alias = "rm")]
    Delete { id: String },
    /// Show every field of a task.
    Show { id: String },
    /// Print the current list.
    #[command(alias = "ls")]
    List,
    /// Filter by title/description; the rest of the line is the needle, none clears it.
    Search {
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Change the ordering; the direction is kept when omitted.
    Sort {
        field: SortField,
        order: Option<SortOrder>,
    },
    /// Switch between dark and light (toggles by default).
    Theme {
        #[arg(value_enum)]
        choice: Option<ThemeChoice>,
    },
    /// Leave the shell.
    #[command(alias = "exit")]
    Quit,
}

/// Interactive session state.
pub struct Shell<C = SystemClock> {
    board: TaskBoard<C>,
    prefs: Preferences,
    prefs_path: Option<PathBuf>,
    theme: Theme,
}

impl<C: Clock> Shell<C> {
    pub const fn new(
        board: TaskBoard<C>,
        prefs: Preferences,
        prefs_path: Option<PathBuf>,
        theme: Theme,
    ) -> Self {
        Self {
            board,
            prefs,
            prefs_path,
            theme,
        }
    }

    pub const fn board(&self) -> &TaskBoard<C> {
        &self.board
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Read commands from `input` until EOF or `quit`.
    ///
    /// # Errors
    /// Returns an error only when reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> Result<()> {
        self.print_view(out)?;
        let mut line = String::new();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            if self.execute_line(line.trim_end_matches(['\n', '\r']), out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command line, printing results and notices to `out`.
    ///
    /// # Errors
    /// Returns an error only when writing output fails.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "error: {}", ShellError::from(err))?;
                return Ok(Flow::Continue);
            }
        };
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.cmd,
            Err(err) => {
                write!(out, "{err}")?;
                return Ok(Flow::Continue);
            }
        };

        match self.execute(command, out) {
            Ok(flow) => Ok(flow),
            Err(CommandError::Io(err)) => Err(err.into()),
            Err(err) => {
                writeln!(out, "error: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute<W: Write>(&mut self, command: ShellCommand, out: &mut W) -> Result<Flow, CommandError> {
        match command {
            ShellCommand::New { title, fields } => {
                let mut input = TaskFields::titled(title);
                fields.apply_to(&mut input);
                self.board.store_mut().save(None, input)?;
                self.notice(out, "Task created successfully")?;
            }
            ShellCommand::Edit { id, title, fields } => {
                let id = self.resolve_id(&id)?;
                let mut input = self
                    .board
                    .store()
                    .get(id)
                    .map(taskdeck_core::Task::fields)
                    .ok_or(StoreError::NotFound(id))?;
                if let Some(title) = title {
                    input.title = title;
                }
                fields.apply_to(&mut input);
                self.board.store_mut().save(Some(id), input)?;
                self.notice(out, "Task updated successfully")?;
            }
            ShellCommand::Status { id, status } => {
                let id = self.resolve_id(&id)?;
                self.board.store_mut().set_status(id, status)?;
                self.notice(out, &format!("Task marked as {status}"))?;
            }
            ShellCommand::Delete { id } => {
                let id = self.resolve_id(&id)?;
                self.board.store_mut().delete(id)?;
                self.notice(out, "Task deleted")?;
            }
            ShellCommand::Show { id } => {
                let id = self.resolve_id(&id)?;
                let task = self.board.store().get(id).ok_or(StoreError::NotFound(id))?;
                write!(out, "{}", render::render_detail(task))?;
            }
            ShellCommand::List => self.print_view(out)?,
            ShellCommand::Search { words } => {
                self.board.set_search(words.join(" "));
                self.print_view(out)?;
            }
            ShellCommand::Sort { field, order } => {
                let order = order.unwrap_or(self.board.query().sort_order);
                self.board.set_sort(field, order);
                self.print_view(out)?;
            }
            ShellCommand::Theme { choice } => {
                self.theme = choice.unwrap_or(ThemeChoice::Toggle).apply(self.theme);
                if let Some(path) = &self.prefs_path
                    && let Err(err) = persist_theme(&mut self.prefs, path, self.theme)
                {
                    warn!(error = %err, "failed to save theme preference");
                    writeln!(out, "Could not save theme preference: {err:#}")?;
                }
                writeln!(out, "Theme: {}", self.theme)?;
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn notice<W: Write>(&self, out: &mut W, message: &str) -> std::io::Result<()> {
        writeln!(out, "{message}")?;
        self.print_view(out)
    }

    fn print_view<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let view = self.board.view();
        write!(out, "{}", render::render_view(&view, self.board.query(), self.theme))
    }

    /// Accept a full id or an unambiguous prefix of one.
    fn resolve_id(&self, token: &str) -> Result<TaskId, ShellError> {
        if let Ok(id) = token.parse::<TaskId>() {
            return Ok(id);
        }
        let mut matches = self
            .board
            .store()
            .list()
            .iter()
            .filter(|task| task.id.matches_prefix(token))
            .map(|task| task.id);
        match (matches.next(), matches.count()) {
            (Some(id), 0) => Ok(id),
            (Some(_), rest) => Err(ShellError::AmbiguousTask {
                prefix: token.to_owned(),
                count: rest + 1,
            }),
            (None, _) => Err(ShellError::UnknownTask(token.to_owned())),
        }
    }
}

/// Failure of a single command: a user-facing error or an output failure.
#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Shell(#[from] ShellError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        Self::Shell(ShellError::Store(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_app::{ManualClock, TaskStore};
    use taskdeck_core::TaskQuery;
    use time::macros::datetime;

    fn shell() -> Shell<ManualClock> {
        let store = TaskStore::with_clock(ManualClock::starting_at(datetime!(2025-01-01 09:00 UTC)));
        Shell::new(
            TaskBoard::new(store, TaskQuery::default()),
            Preferences::default(),
            None,
            Theme::Dark,
        )
    }

    fn run_line(shell: &mut Shell<ManualClock>, line: &str) -> String {
        let mut out = Vec::new();
        shell
            .execute_line(line, &mut out)
            .unwrap_or_else(|err| panic!("line must execute: {err}"));
        String::from_utf8(out).unwrap_or_else(|err| panic!("output must be utf-8: {err}"))
    }

    fn only_id(shell: &Shell<ManualClock>) -> TaskId {
        shell.board().store().list()[0].id
    }

    #[test]
    fn due_parser_accepts_dates_and_none() {
        assert_eq!(parse_due("none"), Ok(DueInput::Clear));
        assert_eq!(
            parse_due("2024-01-01"),
            Ok(DueInput::At(datetime!(2024-01-01 00:00 UTC)))
        );
        assert_eq!(
            parse_due("2024-01-01T10:30:00+02:00"),
            Ok(DueInput::At(datetime!(2024-01-01 10:30 +2)))
        );
        assert!(parse_due("next week").is_err());
    }

    #[test]
    fn new_prints_notice_and_view() {
        let mut shell = shell();
        let output = run_line(
            &mut shell,
            r#"new "Buy milk" -d "2 litres" -p high -c errands --due 2025-01-05"#,
        );
        assert!(output.starts_with("Task created successfully\n"));
        assert!(output.contains("Total Tasks: 1"));
        assert!(output.contains("Buy milk"));

        let task = &shell.board().store().list()[0];
        assert_eq!(task.description, "2 litres");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, Category::Errands);
        assert_eq!(task.due_date, Some(datetime!(2025-01-05 00:00 UTC)));
    }

    #[test]
    fn edit_keeps_unspecified_fields() {
        let mut shell = shell();
        run_line(&mut shell, "new Draft -d notes -p low --due 2025-02-01");
        let id = only_id(&shell);

        let output = run_line(&mut shell, &format!("edit {id} --title Final --due none"));
        assert!(output.starts_with("Task updated successfully\n"));

        let task = &shell.board().store().list()[0];
        assert_eq!(task.title, "Final");
        assert_eq!(task.description, "notes");
        assert_eq!(task.priority, Priority::Low);
        assert!(task.due_date.is_none());
        assert!(task.updated_at > task.created_at);
    }

    #[test]
    fn status_accepts_id_prefix() {
        let mut shell = shell();
        run_line(&mut shell, "new Chores");
        let id = only_id(&shell).to_string();

        let output = run_line(&mut shell, &format!("status {} ongoing", &id[..13]));
        assert!(output.starts_with("Task marked as ongoing\n"));
        assert!(output.contains("In Progress: 1"));
    }

    #[test]
    fn deleted_task_reports_not_found() {
        let mut shell = shell();
        run_line(&mut shell, "new Temporary");
        let id = only_id(&shell);

        let output = run_line(&mut shell, &format!("delete {id}"));
        assert!(output.starts_with("Task deleted\n"));
        assert!(output.contains("No tasks yet"));

        let output = run_line(&mut shell, &format!("rm {id}"));
        assert_eq!(output, format!("error: Task not found: {id}\n"));

        let output = run_line(&mut shell, &format!("edit {id} -t revived"));
        assert_eq!(output, format!("error: Task not found: {id}\n"));

        let output = run_line(&mut shell, "status abc completed");
        assert_eq!(output, "error: No task matches 'abc'\n");
    }

    #[test]
    fn search_and_sort_update_the_view() {
        let mut shell = shell();
        run_line(&mut shell, "new Alpha -d 'quarterly report'");
        run_line(&mut shell, "new beta");

        let output = run_line(&mut shell, "search REPORT");
        assert!(output.contains("Alpha"));
        assert!(!output.contains("beta"));
        assert!(output.contains("Total Tasks: 2"));

        let output = run_line(&mut shell, "search zzz");
        assert!(output.contains("No tasks found"));

        run_line(&mut shell, "search");
        let output = run_line(&mut shell, "sort title");
        assert!(output.contains("sort: title desc"));
        let beta = output.find("beta").unwrap_or_else(|| panic!("beta listed"));
        let alpha = output.find("Alpha").unwrap_or_else(|| panic!("Alpha listed"));
        assert!(beta < alpha);
    }

    #[test]
    fn search_takes_the_rest_of_the_line() {
        let mut shell = shell();
        run_line(&mut shell, "new 'Buy milk'");
        run_line(&mut shell, "new 'Fix bug' -d 'tagged -urgent by QA'");

        let output = run_line(&mut shell, "search buy milk");
        assert!(output.contains("search: \"buy milk\""));
        assert!(output.contains("Buy milk"));
        assert!(!output.contains("Fix bug"));

        let output = run_line(&mut shell, "search -urgent");
        assert!(output.contains("Fix bug"));
        assert!(!output.contains("Buy milk"));
        assert_eq!(shell.board().query().text, "-urgent");
    }

    #[test]
    fn theme_toggles_without_a_preferences_file() {
        let mut shell = shell();
        let output = run_line(&mut shell, "theme");
        assert_eq!(output, "Theme: light\n");
        assert_eq!(shell.theme(), Theme::Light);
        run_line(&mut shell, "theme dark");
        assert_eq!(shell.theme(), Theme::Dark);
    }

    #[test]
    fn bad_input_does_not_end_the_session() {
        let mut shell = shell();
        let mut out = Vec::new();
        let flow = shell
            .execute_line("frobnicate", &mut out)
            .unwrap_or_else(|err| panic!("line must execute: {err}"));
        assert_eq!(flow, Flow::Continue);
        assert!(!out.is_empty());

        let output = run_line(&mut shell, "new 'unterminated");
        assert!(output.starts_with("error: could not split command line"));
    }

    #[test]
    fn run_stops_at_quit() {
        let mut shell = shell();
        let input = b"new one\nquit\nnew two\n";
        let mut out = Vec::new();
        shell
            .run(&input[..], &mut out)
            .unwrap_or_else(|err| panic!("session must run: {err}"));
        assert_eq!(shell.board().store().len(), 1);
    }
}
