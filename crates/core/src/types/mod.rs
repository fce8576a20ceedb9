//! Core types for Ticklist.
//!
//! This module provides type-safe wrappers for the to-do domain.

pub mod auth;
pub mod email;
pub mod id;
pub mod task;
pub mod user;

pub use auth::{AccessToken, AuthInputError, Credentials, Registration};
pub use email::{Email, EmailError};
pub use id::*;
pub use task::{NewTask, Task, TaskPatch, TaskStats, TaskTitle, TaskTitleError};
pub use user::User;
