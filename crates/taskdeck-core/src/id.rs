use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Identifier of a task (UUID v7).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct TaskId(pub Uuid);

impl TaskId {
    #[must_use]
    /// Generate a fresh task identifier.
    pub fn new() -> Self {
        // v7 ids sort by creation time, which keeps debug listings readable.
        Self(Uuid::now_v7())
    }

    /// Whether the textual form of this id starts with `prefix` (case-insensitive).
    #[must_use]
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let prefix = prefix.trim();
        !prefix.is_empty()
            && self
                .to_string()
                .starts_with(&prefix.to_ascii_lowercase())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_uses_uuid_v7() {
        let id = TaskId::new();
        assert_eq!(id.0.get_version_num(), 7);
    }

    #[test]
    fn task_id_parses_display_form() {
        let uuid = Uuid::now_v7();
        let parsed: TaskId = uuid
            .to_string()
            .parse()
            .unwrap_or_else(|err| panic!("must parse task id: {err}"));
        assert_eq!(parsed.0, uuid);
    }

    #[test]
    fn fresh_ids_do_not_repeat() {
        let ids: std::collections::HashSet<TaskId> = (0..1_000).map(|_| TaskId::new()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn prefix_matching_ignores_case_and_blank_input() {
        let id: TaskId = "019a6ff3-119f-7661-869e-2a6c4fca5c4f"
            .parse()
            .unwrap_or_else(|err| panic!("must parse task id: {err}"));
        assert!(id.matches_prefix("019a6f"));
        assert!(id.matches_prefix("019A6FF3-119F"));
        assert!(!id.matches_prefix("019b"));
        assert!(!id.matches_prefix("   "));
    }
}
