use crate::Task;

/// Case-insensitive substring matcher for task text.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Build a matcher for `query`. Returns `None` for the empty string, which matches everything.
    ///
    /// The query is used verbatim: surrounding whitespace is part of the needle.
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Whether the title or the description contains the query.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title) || self.matches_field(&task.description)
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}
