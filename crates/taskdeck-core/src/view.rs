use std::cmp::Ordering;
use std::{fmt, str::FromStr};

use feruca::Collator;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ParseEnumError;
use crate::text_matcher::TextMatcher;
use crate::{Status, Task};

/// Field a task list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    /// Unicode collation order of titles (CLDR root).
    Title,
    /// Priority rank.
    #[default]
    Priority,
    /// Due date; tasks without one always come last.
    DueDate,
    /// Category label.
    Category,
}

impl SortField {
    /// Every sort field.
    pub const ALL: [Self; 4] = [Self::Title, Self::Priority, Self::DueDate, Self::Category];

    /// Label used for parsing, display and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Priority => "priority",
            Self::DueDate => "due-date",
            Self::Category => "category",
        }
    }
}

impl FromStr for SortField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        if matches!(token.as_str(), "duedate" | "due") {
            return Ok(Self::DueDate);
        }
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == token)
            .ok_or_else(|| {
                ParseEnumError::new("sort field", s, "title, priority, due-date, category")
            })
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Label used for parsing, display and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ParseEnumError::new("sort order", s, "asc, desc")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search text plus ordering for a task list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Substring searched in titles and descriptions; empty shows everything.
    #[serde(default)]
    pub text: String,
    /// Field to order by.
    #[serde(default)]
    pub sort_field: SortField,
    /// Direction of the ordering.
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl TaskQuery {
    /// Query without search text using the given ordering.
    #[must_use]
    pub const fn sorted_by(sort_field: SortField, sort_order: SortOrder) -> Self {
        Self {
            text: String::new(),
            sort_field,
            sort_order,
        }
    }

    /// Replace the search text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Whether a search is narrowing the list.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        !self.text.is_empty()
    }

    /// Compare two tasks according to this query's field and order.
    ///
    /// Builds a fresh collator per call; [`TaskView::derive`] reuses one for a whole sort.
    #[must_use]
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        self.compare_with(&mut Collator::default(), a, b)
    }

    fn compare_with(&self, collator: &mut Collator, a: &Task, b: &Task) -> Ordering {
        let order = self.sort_order;
        match self.sort_field {
            SortField::Title => order.apply(collator.collate(a.title.as_str(), b.title.as_str())),
            SortField::Priority => order.apply(a.priority.rank().cmp(&b.priority.rank())),
            SortField::Category => order.apply(a.category.as_str().cmp(b.category.as_str())),
            SortField::DueDate => compare_due_dates(a.due_date, b.due_date, order),
        }
    }
}

// A missing due date counts as +infinity and stays last whatever the direction.
fn compare_due_dates(
    a: Option<OffsetDateTime>,
    b: Option<OffsetDateTime>,
    order: SortOrder,
) -> Ordering {
    match (a, b) {
        (Some(a_due), Some(b_due)) => order.apply(a_due.cmp(&b_due)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Per-status counters over every task, ignoring any search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStats {
    /// Tasks not started.
    pub pending: usize,
    /// Tasks in progress.
    pub ongoing: usize,
    /// Finished tasks.
    pub completed: usize,
    /// All tasks.
    pub total: usize,
}

impl TaskStats {
    /// Count statuses across `tasks`.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(
            Self {
                total: tasks.len(),
                ..Self::default()
            },
            |mut stats, task| {
                match task.status {
                    Status::Pending => stats.pending += 1,
                    Status::Ongoing => stats.ongoing += 1,
                    Status::Completed => stats.completed += 1,
                }
                stats
            },
        )
    }

    /// Count for a single status.
    #[must_use]
    pub const fn count(&self, status: Status) -> usize {
        match status {
            Status::Pending => self.pending,
            Status::Ongoing => self.ongoing,
            Status::Completed => self.completed,
        }
    }
}

/// Filtered and sorted projection of a task list, plus global counters.
///
/// Always a disposable copy: deriving it again from the same inputs yields an equal value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskView {
    /// Tasks passing the search, in query order.
    pub tasks: Vec<Task>,
    /// Counters over the unfiltered input.
    pub stats: TaskStats,
}

impl TaskView {
    /// Derive the view of `tasks` (in insertion order) for `query`.
    #[must_use]
    pub fn derive(tasks: &[Task], query: &TaskQuery) -> Self {
        let mut visible: Vec<Task> = match TextMatcher::new(&query.text) {
            Some(matcher) => tasks.iter().filter(|task| matcher.matches(task)).cloned().collect(),
            None => tasks.to_vec(),
        };
        // `sort_by` is stable, so ties keep insertion order.
        let mut collator = Collator::default();
        visible.sort_by(|a, b| query.compare_with(&mut collator, a, b));

        Self {
            tasks: visible,
            stats: TaskStats::from_tasks(tasks),
        }
    }

    /// Whether no task passed the search.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
