//! Task list and profile calls.

use ticklist_core::{NewTask, Task, TaskId, TaskPatch, User};
use tracing::instrument;

use super::{ApiClient, ApiError, decode, paths};

impl ApiClient {
    /// `GET /todos`: the signed-in user's tasks, in backend order.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    #[instrument(skip(self))]
    pub async fn get_todos(&self) -> Result<Vec<Task>, ApiError> {
        decode(self.get(paths::TODOS).await?)
    }

    /// `POST /todos`: create a task.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    #[instrument(skip(self, task), fields(title = %task.title))]
    pub async fn create_todo(&self, task: &NewTask) -> Result<Task, ApiError> {
        decode(self.post(paths::TODOS, task).await?)
    }

    /// `PATCH /todos/:id`: rename and/or (un)complete a task.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    #[instrument(skip(self, patch))]
    pub async fn update_todo(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        decode(self.patch(&paths::todo(id), patch).await?)
    }

    /// `DELETE /todos/:id`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    #[instrument(skip(self))]
    pub async fn delete_todo(&self, id: TaskId) -> Result<(), ApiError> {
        self.delete(&paths::todo(id)).await?;
        Ok(())
    }

    /// `GET /todos/profile`: the signed-in user.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<User, ApiError> {
        decode(self.get(paths::PROFILE).await?)
    }
}
