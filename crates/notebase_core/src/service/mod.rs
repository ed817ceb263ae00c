//! Use-case services over the repositories.
//!
//! Services keep callers away from SQL and map repository errors onto
//! use-case errors.

pub mod account_service;
pub mod note_service;
