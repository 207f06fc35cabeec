//! UI state holder: the store plus the query currently shown.

use taskdeck_core::{SortField, SortOrder, TaskQuery, TaskView};

use crate::clock::{Clock, SystemClock};
use crate::store::TaskStore;

/// A task store together with the search and ordering the user picked.
#[derive(Debug, Default)]
pub struct TaskBoard<C = SystemClock> {
    store: TaskStore<C>,
    query: TaskQuery,
}

impl<C: Clock> TaskBoard<C> {
    /// Board over `store`, initially showing `query`.
    pub const fn new(store: TaskStore<C>, query: TaskQuery) -> Self {
        Self { store, query }
    }
}

impl<C> TaskBoard<C> {
    /// The underlying store.
    pub const fn store(&self) -> &TaskStore<C> {
        &self.store
    }

    /// Mutable access for create/update/status/delete.
    pub const fn store_mut(&mut self) -> &mut TaskStore<C> {
        &mut self.store
    }

    /// Query currently applied.
    pub const fn query(&self) -> &TaskQuery {
        &self.query
    }

    /// Replace the search text. An empty string clears the search.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    /// Change the ordering.
    pub const fn set_sort(&mut self, field: SortField, order: SortOrder) {
        self.query.sort_field = field;
        self.query.sort_order = order;
    }

    /// Re-derive the visible list and counters from the current state.
    #[must_use]
    pub fn view(&self) -> TaskView {
        TaskView::derive(self.store.list(), &self.query)
    }
}
