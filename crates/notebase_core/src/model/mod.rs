//! Record shapes for the `users` and `notes` tables.
//!
//! # Invariants
//! - Surrogate ids and default timestamps are assigned by storage, never by
//!   callers; `New*` inputs carry neither an id nor a required timestamp.
//! - Write inputs are validated against column limits before SQL runs.

pub mod note;
pub mod user;
