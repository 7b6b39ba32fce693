// Task-list store: collection, mutations, edit state machine, derived views

use crate::filter::StatusFilter;
use crate::notify::{Notifier, NotifyKind};
use crate::storage::Storage;
use crate::task::{Stats, Task};
use eyre::{Context, Result};
use tracing::{debug, warn};

/// Fixed key the task collection is stored under.
pub const BLOB_KEY: &str = "tasks";

/// Two-phase edit state. At most one task is in edit mode at a time;
/// starting a new edit discards any prior unsaved buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Editing { task_id: String, buffer: String },
}

/// The task-list store.
///
/// Owns the canonical ordered collection (newest first), applies mutations,
/// computes derived views on demand, and keeps durable storage in step:
/// the blob is read exactly once in [`TaskStore::open`] and overwritten
/// after every mutation that observably changed state.
pub struct TaskStore<S: Storage, N: Notifier> {
    tasks: Vec<Task>,
    edit: EditState,
    storage: S,
    notifier: N,
}

impl<S: Storage, N: Notifier> TaskStore<S, N> {
    /// Open the store, loading any previously persisted collection.
    ///
    /// An absent blob yields an empty collection. A blob that fails to
    /// parse also yields an empty collection: the failure is logged and
    /// never surfaced to the user, since an empty list is an acceptable
    /// fallback and refusing to start would be worse.
    pub fn open(storage: S, notifier: N) -> Self {
        let tasks = match storage.load(BLOB_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<Task>>(&blob) {
                Ok(tasks) => {
                    debug!(count = tasks.len(), "Loaded task collection");
                    tasks
                }
                Err(e) => {
                    warn!(error = ?e, "Stored tasks failed to parse, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = ?e, "Failed to read stored tasks, starting empty");
                Vec::new()
            }
        };

        Self {
            tasks,
            edit: EditState::Idle,
            storage,
            notifier,
        }
    }

    /// Read-only view of the full collection, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Current edit state.
    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a task with the given text, trimmed, at the front of the
    /// collection. Empty or all-whitespace input is a validation no-op:
    /// nothing is created, persisted, or announced. Returns the new
    /// task's id when one was created.
    pub fn add_task(&mut self, raw_text: &str) -> Result<Option<String>> {
        let text = raw_text.trim();
        if text.is_empty() {
            debug!("Rejected empty task text");
            return Ok(None);
        }

        let task = Task::new(text);
        let id = task.id.clone();
        self.tasks.insert(0, task);
        self.persist()?;

        self.notifier
            .notify(NotifyKind::Success, "Task added", "Your task is on the list.");
        Ok(Some(id))
    }

    /// Flip the completion flag of the task with the given id. Silent on
    /// purpose: toggling is frequent and needs no announcement. Returns
    /// whether a task was found; a miss performs no storage write.
    pub fn toggle_task(&mut self, id: &str) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "Toggle on unknown id ignored");
            return Ok(false);
        };
        task.completed = !task.completed;
        self.persist()?;
        Ok(true)
    }

    /// Begin editing the task with the given id, seeding the edit buffer
    /// with its current text. Any prior unsaved edit is silently
    /// discarded. Returns false (and stays put) when the id is unknown.
    pub fn start_editing(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter().find(|t| t.id == id) else {
            debug!(id, "Edit on unknown id ignored");
            return false;
        };
        self.edit = EditState::Editing {
            task_id: task.id.clone(),
            buffer: task.text.clone(),
        };
        true
    }

    /// Replace the edit buffer. No-op unless an edit is in progress.
    pub fn set_edit_buffer(&mut self, text: &str) {
        if let EditState::Editing { buffer, .. } = &mut self.edit {
            *buffer = text.to_string();
        }
    }

    /// Commit the edit in progress: the target task's text becomes the
    /// trimmed buffer and the store returns to idle. An empty trimmed
    /// buffer commits nothing and the store STAYS in edit mode; the user
    /// either fixes the text or cancels. Returns whether a commit happened.
    pub fn save_edit(&mut self) -> Result<bool> {
        let EditState::Editing { task_id, buffer } = &self.edit else {
            return Ok(false);
        };

        let text = buffer.trim();
        if text.is_empty() {
            debug!("Rejected empty edit buffer, still editing");
            return Ok(false);
        }
        let text = text.to_string();

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == *task_id) else {
            // Target vanished mid-edit; nothing left to commit
            self.edit = EditState::Idle;
            return Ok(false);
        };

        task.text = text;
        self.edit = EditState::Idle;
        self.persist()?;

        self.notifier
            .notify(NotifyKind::Success, "Task updated", "Your changes were saved.");
        Ok(true)
    }

    /// Abandon the edit in progress, discarding the buffer. No I/O.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    /// Remove the task with the given id, irrecoverably. Returns whether
    /// a task was found; a miss performs no storage write.
    pub fn delete_task(&mut self, id: &str) -> Result<bool> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(id, "Delete on unknown id ignored");
            return Ok(false);
        };
        self.tasks.remove(pos);

        // An edit pointed at the removed task has nothing left to commit
        if matches!(&self.edit, EditState::Editing { task_id, .. } if task_id == id) {
            self.edit = EditState::Idle;
        }

        self.persist()?;
        self.notifier
            .notify(NotifyKind::Destructive, "Task deleted", "The task was removed.");
        Ok(true)
    }

    // ========================================================================
    // Derived views (pure, recomputed per call)
    // ========================================================================

    /// Status counts over the full collection.
    pub fn stats(&self) -> Stats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Stats {
            total: self.tasks.len(),
            active: self.tasks.len() - completed,
            completed,
        }
    }

    /// Tasks passing the status filter and a case-insensitive substring
    /// match of `query` against their text, in collection order. An empty
    /// query matches everything.
    pub fn visible_tasks(&self, filter: StatusFilter, query: &str) -> Vec<&Task> {
        let needle = query.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| filter.matches(t))
            .filter(|t| needle.is_empty() || t.text.to_lowercase().contains(&needle))
            .collect()
    }

    /// Serialize the full collection and overwrite the stored blob.
    fn persist(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.tasks).context("Failed to serialize tasks")?;
        self.storage
            .save(BLOB_KEY, &blob)
            .context("Failed to persist tasks")
    }
}
