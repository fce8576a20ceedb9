//! Task list screen.
//!
//! The list held here mirrors the backend but is not authoritative. Creating
//! a task re-fetches the whole list; toggling and renaming replace the local
//! entry with the server's answer, and deleting drops it. There is no
//! reconciliation beyond that: if two toggles race, whichever response lands
//! last wins.

use ticklist_core::{NewTask, Task, TaskId, TaskPatch, TaskStats, TaskTitle, User};
use tracing::{info, instrument, warn};

use super::{ViewError, user_message};
use crate::api::ApiClient;
use crate::router::Route;

pub const LOAD_FAILED_MESSAGE: &str = "Could not load tasks";
pub const ADD_FAILED_MESSAGE: &str = "Could not add task";
pub const UPDATE_FAILED_MESSAGE: &str = "Could not update task";
pub const DELETE_FAILED_MESSAGE: &str = "Could not delete task";
pub const PROFILE_FAILED_MESSAGE: &str = "Could not load profile";

/// State of the task list screen.
#[derive(Debug)]
pub struct TodoView {
    client: ApiClient,
    tasks: Vec<Task>,
    profile: Option<User>,
    error: Option<String>,
    loading: bool,
}

impl TodoView {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            profile: None,
            error: None,
            loading: false,
        }
    }

    /// Tasks in backend order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Profile, once [`TodoView::load_profile`] has succeeded.
    #[must_use]
    pub const fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Total/completed/pending counters for the current list.
    #[must_use]
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Fetch the list from the backend, replacing the local copy.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous list is kept.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), ViewError> {
        self.error = None;
        self.loading = true;
        let result = self.client.get_todos().await;
        self.loading = false;

        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                Ok(())
            }
            Err(e) => Err(self.fail(e.into(), LOAD_FAILED_MESSAGE)),
        }
    }

    /// Create a task from raw input, then re-fetch the list.
    ///
    /// Blank input is rejected without touching the network.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` for a blank title, otherwise the API
    /// error from the create or the follow-up fetch.
    #[instrument(skip(self))]
    pub async fn add(&mut self, input: &str) -> Result<Task, ViewError> {
        self.error = None;

        let title = TaskTitle::parse(input)
            .map_err(|e| self.fail(ViewError::Validation(e.to_string()), ADD_FAILED_MESSAGE))?;

        self.loading = true;
        let created = self.client.create_todo(&NewTask::new(title)).await;
        self.loading = false;

        let task = created.map_err(|e| self.fail(e.into(), ADD_FAILED_MESSAGE))?;
        info!(id = %task.id, "Task created");

        self.load().await?;
        Ok(task)
    }

    /// Flip a task's completion flag.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` if the task is not in the local list,
    /// otherwise the API error.
    #[instrument(skip(self))]
    pub async fn toggle(&mut self, id: TaskId) -> Result<Task, ViewError> {
        self.error = None;

        let Some(patch) = self
            .tasks
            .iter()
            .find(|task| task.id == id)
            .map(Task::toggle_patch)
        else {
            let err = ViewError::Validation(format!("No task with id {id} in the current list"));
            return Err(self.fail(err, UPDATE_FAILED_MESSAGE));
        };

        self.loading = true;
        let result = self.client.update_todo(id, &patch).await;
        self.loading = false;

        let updated = result.map_err(|e| self.fail(e.into(), UPDATE_FAILED_MESSAGE))?;

        self.replace_local(&updated);
        Ok(updated)
    }

    /// Give a task a new title.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Validation` for a blank title (no request is
    /// made), otherwise the API error.
    #[instrument(skip(self))]
    pub async fn rename(&mut self, id: TaskId, input: &str) -> Result<Task, ViewError> {
        self.error = None;

        let title = TaskTitle::parse(input)
            .map_err(|e| self.fail(ViewError::Validation(e.to_string()), UPDATE_FAILED_MESSAGE))?;

        self.loading = true;
        let result = self.client.update_todo(id, &TaskPatch::rename(title)).await;
        self.loading = false;

        let updated = result.map_err(|e| self.fail(e.into(), UPDATE_FAILED_MESSAGE))?;

        self.replace_local(&updated);
        Ok(updated)
    }

    /// Delete a task and drop it from the local list.
    ///
    /// # Errors
    ///
    /// Returns the API error; the local list is left untouched.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: TaskId) -> Result<(), ViewError> {
        self.error = None;

        self.loading = true;
        let result = self.client.delete_todo(id).await;
        self.loading = false;

        result.map_err(|e| self.fail(e.into(), DELETE_FAILED_MESSAGE))?;

        self.tasks.retain(|task| task.id != id);
        info!(%id, "Task deleted");
        Ok(())
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns the API error.
    #[instrument(skip(self))]
    pub async fn load_profile(&mut self) -> Result<&User, ViewError> {
        self.error = None;

        self.loading = true;
        let result = self.client.get_profile().await;
        self.loading = false;

        let user = result.map_err(|e| self.fail(e.into(), PROFILE_FAILED_MESSAGE))?;

        Ok(self.profile.insert(user))
    }

    /// End the session and go back to `/login`.
    ///
    /// # Errors
    ///
    /// Returns the session error if storage could not be cleared; the
    /// session is considered ended regardless.
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<(), ViewError> {
        self.tasks.clear();
        self.profile = None;
        self.error = None;

        let cleared = self.client.session().clear().await;
        self.client.navigator().navigate(Route::Login);
        info!("Signed out");

        cleared.map_err(ViewError::from)
    }

    fn replace_local(&mut self, updated: &Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == updated.id) {
            slot.clone_from(updated);
        }
    }

    fn fail(&mut self, error: ViewError, fallback: &str) -> ViewError {
        warn!(error = %error, "{fallback}");
        self.error = Some(user_message(&error, fallback));
        error
    }
}
