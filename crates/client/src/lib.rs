//! Ticklist Client - API gateway, session and view models for the to-do
//! service.
//!
//! # Architecture
//!
//! ```text
//! views (login, register, todo)
//!    |
//!    v
//! ApiClient --- SessionContext --- SessionStore (file / memory)
//!    |
//!    +--- Navigator (History)
//! ```
//!
//! The views never talk HTTP directly. Every call goes through
//! [`ApiClient::request`], which attaches the bearer token and turns a
//! `401` into a cleared session plus a redirect to `/login`.
//!
//! # Modules
//!
//! - [`api`] - Gateway client and endpoint wrappers
//! - [`app`] - Wiring of config, session, navigation and views
//! - [`config`] - Environment configuration
//! - [`router`] - Routes, guards and navigation history
//! - [`session`] - Token persistence and session lifecycle
//! - [`views`] - Login, registration and task list view models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod config;
pub mod router;
pub mod session;
pub mod views;

pub use api::{ApiClient, ApiError, RequestOptions};
pub use app::{App, AppError};
pub use config::{ClientConfig, ConfigError};
pub use router::{History, Navigator, Route};
pub use session::{
    FileSessionStore, MemorySessionStore, SessionContext, SessionError, SessionState, SessionStore,
};
pub use views::{LoginView, RegisterView, TodoView, ViewError};
