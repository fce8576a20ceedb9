//! Plain-text output.
//!
//! Formatting lives in `format_*` functions so it can be tested; the
//! printing wrappers are the only place the CLI writes to stdout.

#![allow(clippy::print_stdout)]

use std::fmt::Write as _;

use ticklist_client::{ClientConfig, Route, SessionState};
use ticklist_core::{Task, TaskStats, User};

pub fn notice(message: &str) {
    println!("{message}");
}

pub fn task(task: &Task) {
    println!("{}", format_task(task));
}

pub fn tasks(tasks: &[Task]) {
    print!("{}", format_tasks(tasks));
}

pub fn stats(stats: &TaskStats) {
    println!("{}", format_stats(stats));
}

pub fn user(user: &User) {
    print!("{}", format_user(user));
}

pub fn status(config: &ClientConfig, state: SessionState, route: Route) {
    println!("Session:  {state}");
    println!("Route:    {route}");
    println!("Backend:  {}", config.api_url);
    println!("Storage:  {}", config.session_file.display());
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{mark}] {:>4}  {}", task.id.as_i64(), task.title)
}

fn format_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks yet.\n".to_string();
    }

    tasks.iter().fold(String::new(), |mut out, task| {
        let _ = writeln!(out, "{}", format_task(task));
        out
    })
}

fn format_stats(stats: &TaskStats) -> String {
    format!(
        "{} total, {} completed, {} pending ({}% done)",
        stats.total,
        stats.completed,
        stats.pending,
        stats.progress_percent()
    )
}

fn format_user(user: &User) -> String {
    let mut out = format!("{} <{}>\n", user.name, user.email);
    let _ = writeln!(out, "ID:       {}", user.id);
    if let Some(created_at) = user.created_at {
        let _ = writeln!(out, "Joined:   {}", created_at.format("%Y-%m-%d"));
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ticklist_core::{Email, TaskId, UserId};

    use super::*;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        Task {
            id: TaskId::new(id),
            title: title.to_string(),
            completed,
            owner_id: None,
            created_at: None,
        }
    }

    #[test]
    fn test_format_task_marks_completion() {
        assert_eq!(format_task(&task(3, "Buy milk", false)), "[ ]    3  Buy milk");
        assert_eq!(format_task(&task(12, "Walk dog", true)), "[x]   12  Walk dog");
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_tasks(&[]), "No tasks yet.\n");
    }

    #[test]
    fn test_format_list_one_line_per_task() {
        let out = format_tasks(&[task(1, "a", false), task(2, "b", true)]);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_format_stats() {
        let stats = TaskStats::from_tasks(&[task(1, "a", true), task(2, "b", false)]);
        assert_eq!(
            format_stats(&stats),
            "2 total, 1 completed, 1 pending (50% done)"
        );
    }

    #[test]
    fn test_format_user_without_join_date() {
        let user = User {
            id: UserId::new(7),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            created_at: None,
        };
        assert_eq!(format_user(&user), "Ada <ada@example.com>\nID:       7\n");
    }
}
