//! Authoritative in-memory task collection.

use std::collections::HashMap;

use taskdeck_core::{Status, Task, TaskFields, TaskId};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};

/// Owns every task, in insertion order, and keeps them consistent.
#[derive(Debug, Clone, Default)]
pub struct TaskStore<C = SystemClock> {
    tasks: Vec<Task>,
    /// Mapping from task id to index into [`tasks`](Self::tasks).
    index: HashMap<TaskId, usize>,
    clock: C,
}

impl TaskStore<SystemClock> {
    /// Empty store stamped by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl<C: Clock> TaskStore<C> {
    /// Empty store stamped by `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            index: HashMap::new(),
            clock,
        }
    }

    /// Add a task built from `fields` and return a copy of it.
    pub fn create(&mut self, fields: TaskFields) -> Task {
        let id = self.fresh_id();
        let now = self.clock.now();
        let task = Task::new(id, fields, now);

        self.index.insert(id, self.tasks.len());
        self.tasks.push(task.clone());
        debug!(task = %id, "created task");
        task
    }

    /// Replace every editable field of the task `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no task has this id.
    pub fn update(&mut self, id: TaskId, fields: TaskFields) -> StoreResult<Task> {
        let idx = self.position(id)?;
        let now = self.clock.now();
        let task = self.slot_mut(idx, id)?;
        task.replace_fields(fields, now);
        debug!(task = %id, "updated task");
        Ok(task.clone())
    }

    /// Change only the status of the task `id`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no task has this id.
    pub fn set_status(&mut self, id: TaskId, status: Status) -> StoreResult<Task> {
        let idx = self.position(id)?;
        let now = self.clock.now();
        let task = self.slot_mut(idx, id)?;
        task.set_status(status, now);
        debug!(task = %id, %status, "changed task status");
        Ok(task.clone())
    }

    /// Create when `id` is `None`, otherwise update the existing task.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when updating an unknown id.
    pub fn save(&mut self, id: Option<TaskId>, fields: TaskFields) -> StoreResult<Task> {
        match id {
            Some(id) => self.update(id, fields),
            None => Ok(self.create(fields)),
        }
    }

    /// Remove the task `id` entirely.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] if no task has this id, including when it was
    /// already deleted.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<()> {
        let position = self.index.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.tasks.remove(position);
        self.rebuild_index_from(position);
        debug!(task = %id, "deleted task");
        Ok(())
    }
}

impl<C> TaskStore<C> {
    /// Current tasks in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.index.get(&id).and_then(|&idx| self.tasks.get(idx))
    }

    /// Whether a task with this id exists.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of tasks held.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn fresh_id(&self) -> TaskId {
        loop {
            let id = TaskId::new();
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    fn position(&self, id: TaskId) -> StoreResult<usize> {
        self.index.get(&id).copied().ok_or(StoreError::NotFound(id))
    }

    fn slot_mut(&mut self, idx: usize, id: TaskId) -> StoreResult<&mut Task> {
        self.tasks.get_mut(idx).ok_or(StoreError::NotFound(id))
    }

    fn rebuild_index_from(&mut self, start: usize) {
        for (idx, task) in self.tasks.iter().enumerate().skip(start) {
            self.index.insert(task.id, idx);
        }
    }
}
