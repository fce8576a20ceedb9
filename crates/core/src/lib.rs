//! Ticklist Core - Shared types library.
//!
//! This crate provides the domain types shared by the Ticklist components:
//! - `client` - Session store, API gateway client, router and view models
//! - `cli` - Terminal front end for the to-do service
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Entities (tasks, users), type-safe IDs, validated inputs and
//!   authentication payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
