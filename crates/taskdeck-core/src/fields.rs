use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

/// Progress of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Not started yet.
    #[default]
    Pending,
    /// Actively being worked on.
    Ongoing,
    /// Finished.
    Completed,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Ongoing, Self::Completed];

    /// Label used for parsing, display and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
        }
    }

    /// Title-cased label for counters and headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Ongoing => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match token.as_str() {
            "pending" | "todo" => Ok(Self::Pending),
            "ongoing" | "in-progress" => Ok(Self::Ongoing),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseEnumError::new("status", s, "pending, ongoing, completed")),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Importance of a task; `High` is the strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Regular work.
    #[default]
    Medium,
    /// Do this first.
    High,
}

impl Priority {
    /// Every priority, weakest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Numeric strength used for ranking (`High` = 3, `Medium` = 2, `Low` = 1).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// Label used for parsing, display and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("priority", s, "low, medium, high"))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area of life a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Job related.
    Work,
    /// Private matters.
    #[default]
    Personal,
    /// Classes and homework.
    School,
    /// Shopping and chores.
    Errands,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Work,
        Self::Personal,
        Self::School,
        Self::Errands,
        Self::Other,
    ];

    /// Label used for parsing, display, serialization and sorting.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::School => "school",
            Self::Errands => "errands",
            Self::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ParseEnumError::new("category", s, "work, personal, school, errands, other")
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
