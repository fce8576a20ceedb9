//! Task list commands.

use ticklist_client::{App, TodoView};
use ticklist_core::TaskId;

use super::{CliError, require_session, view_failure};
use crate::render;

/// Start the app, check the session and load the current list.
async fn open(app: &App) -> Result<TodoView, CliError> {
    require_session(app).await?;

    let mut view = app.todo_view();
    if let Err(e) = view.load().await {
        return Err(view_failure(view.error(), e));
    }
    Ok(view)
}

pub async fn list(app: &App) -> Result<(), CliError> {
    let view = open(app).await?;
    render::tasks(view.tasks());
    Ok(())
}

pub async fn add(app: &App, title: &str) -> Result<(), CliError> {
    let mut view = open(app).await?;

    match view.add(title).await {
        Ok(task) => {
            render::notice(&format!("Added task {}.", task.id));
            render::tasks(view.tasks());
            Ok(())
        }
        Err(e) => Err(view_failure(view.error(), e)),
    }
}

pub async fn rename(app: &App, id: TaskId, title: &str) -> Result<(), CliError> {
    let mut view = open(app).await?;

    match view.rename(id, title).await {
        Ok(task) => {
            render::task(&task);
            Ok(())
        }
        Err(e) => Err(view_failure(view.error(), e)),
    }
}

pub async fn toggle(app: &App, id: TaskId) -> Result<(), CliError> {
    let mut view = open(app).await?;

    match view.toggle(id).await {
        Ok(task) => {
            render::task(&task);
            Ok(())
        }
        Err(e) => Err(view_failure(view.error(), e)),
    }
}

pub async fn delete(app: &App, id: TaskId) -> Result<(), CliError> {
    let mut view = open(app).await?;

    match view.delete(id).await {
        Ok(()) => {
            render::notice(&format!("Deleted task {id}."));
            Ok(())
        }
        Err(e) => Err(view_failure(view.error(), e)),
    }
}

pub async fn stats(app: &App) -> Result<(), CliError> {
    let view = open(app).await?;
    render::stats(&view.stats());
    Ok(())
}
