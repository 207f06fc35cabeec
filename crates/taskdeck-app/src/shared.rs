//! Sequential access to one store from several surfaces.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use taskdeck_core::{Status, Task, TaskFields, TaskId, TaskQuery, TaskView};

use crate::clock::{Clock, SystemClock};
use crate::error::StoreResult;
use crate::store::TaskStore;

/// Cloneable handle to a [`TaskStore`] guarded by a mutex.
///
/// Every call holds the lock for the whole operation, so mutations are applied
/// one at a time in arrival order and readers never see a half-applied change.
#[derive(Debug)]
pub struct SharedTaskStore<C = SystemClock> {
    inner: Arc<Mutex<TaskStore<C>>>,
}

impl<C> Clone for SharedTaskStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedTaskStore<SystemClock> {
    /// Shared handle around an empty system-clock store.
    #[must_use]
    pub fn new() -> Self {
        Self::from_store(TaskStore::new())
    }
}

impl Default for SharedTaskStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SharedTaskStore<C> {
    /// Wrap an existing store.
    pub fn from_store(store: TaskStore<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Copy of every task in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Task> {
        self.lock().list().to_vec()
    }

    /// Copy of a single task.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.lock().get(id).cloned()
    }

    /// Derive a view from the current contents.
    #[must_use]
    pub fn view(&self, query: &TaskQuery) -> TaskView {
        TaskView::derive(self.lock().list(), query)
    }

    /// Run `f` with exclusive access to the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut TaskStore<C>) -> R) -> R {
        f(&mut self.lock())
    }

    // A panic in another holder cannot leave the store half-mutated: every
    // mutation is a single push, remove or field assignment.
    fn lock(&self) -> MutexGuard<'_, TaskStore<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> SharedTaskStore<C> {
    /// See [`TaskStore::create`].
    pub fn create(&self, fields: TaskFields) -> Task {
        self.lock().create(fields)
    }

    /// See [`TaskStore::update`].
    ///
    /// # Errors
    /// Returns [`crate::StoreError::NotFound`] if no task has this id.
    pub fn update(&self, id: TaskId, fields: TaskFields) -> StoreResult<Task> {
        self.lock().update(id, fields)
    }

    /// See [`TaskStore::set_status`].
    ///
    /// # Errors
    /// Returns [`crate::StoreError::NotFound`] if no task has this id.
    pub fn set_status(&self, id: TaskId, status: Status) -> StoreResult<Task> {
        self.lock().set_status(id, status)
    }

    /// See [`TaskStore::delete`].
    ///
    /// # Errors
    /// Returns [`crate::StoreError::NotFound`] if no task has this id.
    pub fn delete(&self, id: TaskId) -> StoreResult<()> {
        self.lock().delete(id)
    }
}
