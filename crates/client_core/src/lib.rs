//! Task board controller: in-memory task state synchronized with a remote
//! store, with optimistic updates and exact-snapshot rollback on failure.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use shared::{
    domain::{NewTask, Task, TaskId},
    error::StoreError,
};
use store::TaskStore;
use tokio::sync::broadcast;
use tracing::{debug, warn};

pub mod session;

/// Tasks fall due this many days after creation.
pub const DUE_AFTER_DAYS: u64 = 7;

const NOTICE_CHANNEL_CAPACITY: usize = 64;

/// One transient user-facing notification per operation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success { message: String },
    Failure { headline: String, detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreAction {
    Fetch,
    Add,
    Update,
    Delete,
}

impl StoreAction {
    fn failure_headline(self) -> &'static str {
        match self {
            StoreAction::Fetch => "Error fetching tasks",
            StoreAction::Add => "Error adding task",
            StoreAction::Update => "Error updating task",
            StoreAction::Delete => "Error deleting task",
        }
    }

    fn permission_detail(self) -> &'static str {
        match self {
            StoreAction::Fetch => {
                "You don't have permission to view tasks. Please contact your administrator or disable RLS for development."
            }
            StoreAction::Add => {
                "You don't have permission to add tasks. Please contact your administrator or disable RLS for development."
            }
            StoreAction::Update => {
                "You don't have permission to update tasks. Please contact your administrator or disable RLS for development."
            }
            StoreAction::Delete => {
                "You don't have permission to delete tasks. Please contact your administrator or disable RLS for development."
            }
        }
    }
}

fn failure_notice(action: StoreAction, err: &StoreError) -> Notice {
    if err.is_permission_denied() {
        Notice::Failure {
            headline: "Permission denied".to_string(),
            detail: action.permission_detail().to_string(),
        }
    } else {
        Notice::Failure {
            headline: action.failure_headline().to_string(),
            detail: err.message.clone(),
        }
    }
}

/// All controller-owned state, mutated only through the named operations.
#[derive(Default, Debug, Clone)]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub draft_text: String,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub editing_id: Option<TaskId>,
    pub edit_draft: String,
}

pub struct TaskBoard {
    store: Arc<dyn TaskStore>,
    notices: broadcast::Sender<Notice>,
    pub state: BoardState,
}

impl TaskBoard {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);
        Self {
            store,
            notices,
            state: BoardState::default(),
        }
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Replaces the task list from the remote store, most recently created
    /// first. On failure the list is left empty, never partially populated.
    pub async fn load(&mut self) {
        self.state.is_loading = true;
        match self.store.list_tasks().await {
            Ok(mut tasks) => {
                tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                debug!(count = tasks.len(), "loaded tasks");
                self.state.tasks = tasks;
            }
            Err(err) => {
                self.state.tasks = Vec::new();
                self.notify_failure(StoreAction::Fetch, &err);
            }
        }
        self.state.is_loading = false;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.state.draft_text = text.into();
    }

    /// Creates a task from the draft input. A blank draft is a silent no-op
    /// and issues no request.
    pub async fn add(&mut self) {
        if self.state.draft_text.trim().is_empty() {
            return;
        }
        self.state.is_submitting = true;
        let draft = NewTask::pending(self.state.draft_text.clone());
        match self.store.insert_task(draft).await {
            Ok(task) => {
                self.state.tasks.insert(0, task);
                self.state.draft_text.clear();
                self.notify_success("Task added successfully");
            }
            Err(err) => self.notify_failure(StoreAction::Add, &err),
        }
        self.state.is_submitting = false;
    }

    /// Flips a task's completed state optimistically, restoring the
    /// pre-mutation snapshot if the remote update fails. Success is silent.
    pub async fn toggle_complete(&mut self, id: TaskId) {
        let Some(next) = self
            .state
            .tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| !task.completed)
        else {
            return;
        };

        let snapshot = self.state.tasks.clone();
        for task in &mut self.state.tasks {
            if task.id == id {
                task.completed = next;
            }
        }

        if let Err(err) = self.store.set_completed(id, next).await {
            self.state.tasks = snapshot;
            self.notify_failure(StoreAction::Update, &err);
        }
    }

    /// Removes a task optimistically, restoring the pre-removal snapshot if
    /// the remote deletion fails.
    pub async fn delete(&mut self, id: TaskId) {
        if !self.state.tasks.iter().any(|task| task.id == id) {
            return;
        }

        let snapshot = self.state.tasks.clone();
        self.state.tasks.retain(|task| task.id != id);

        match self.store.delete_task(id).await {
            Ok(()) => self.notify_success("Task deleted successfully"),
            Err(err) => {
                self.state.tasks = snapshot;
                self.notify_failure(StoreAction::Delete, &err);
            }
        }
    }

    /// Enters edit mode for the given task, seeding the edit draft with its
    /// current text. At most one task is in edit mode at a time; starting an
    /// edit on another task replaces the slot.
    pub fn start_edit(&mut self, id: TaskId) {
        let Some(task) = self.state.tasks.iter().find(|task| task.id == id) else {
            return;
        };
        self.state.edit_draft = task.text.clone();
        self.state.editing_id = Some(id);
    }

    pub fn set_edit_draft(&mut self, text: impl Into<String>) {
        self.state.edit_draft = text.into();
    }

    /// Persists the edit draft for the task in edit mode. A blank draft or
    /// no active edit slot is a silent no-op. On failure edit mode stays
    /// active so the user can retry.
    pub async fn save_edit(&mut self) {
        let Some(id) = self.state.editing_id else {
            return;
        };
        if self.state.edit_draft.trim().is_empty() {
            return;
        }

        self.state.is_submitting = true;
        let text = self.state.edit_draft.clone();
        match self.store.set_text(id, &text).await {
            Ok(()) => {
                for task in &mut self.state.tasks {
                    if task.id == id {
                        task.text = text.clone();
                    }
                }
                self.state.editing_id = None;
                self.notify_success("Task updated successfully");
            }
            Err(err) => self.notify_failure(StoreAction::Update, &err),
        }
        self.state.is_submitting = false;
    }

    pub fn total_count(&self) -> usize {
        self.state.tasks.len()
    }

    pub fn completed_count(&self) -> usize {
        self.state
            .tasks
            .iter()
            .filter(|task| task.completed)
            .count()
    }

    pub fn pending_count(&self) -> usize {
        self.total_count() - self.completed_count()
    }

    fn notify_success(&self, message: &str) {
        let _ = self.notices.send(Notice::Success {
            message: message.to_string(),
        });
    }

    fn notify_failure(&self, action: StoreAction, err: &StoreError) {
        warn!(?action, code = %err.code, "store request failed: {}", err.message);
        let _ = self.notices.send(failure_notice(action, err));
    }
}

/// Derived due date: the task falls due [`DUE_AFTER_DAYS`] after creation.
pub fn due_date(task: &Task) -> NaiveDate {
    task.created_at.date_naive() + Days::new(DUE_AFTER_DAYS)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
