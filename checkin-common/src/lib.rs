//! # Check-in Common Library
//!
//! Shared code for the installer check-in services including:
//! - Data model and the fixed checklist catalog
//! - Field validation and identifier generation
//! - Persistence store trait with SQLite and in-memory implementations
//! - Check-in lifecycle state machine and progress tracker
//! - Completion notification contract

pub mod catalog;
pub mod config;
pub mod error;
pub mod fmt;
pub mod ids;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod progress;
pub mod store;
pub mod validate;

pub use error::{Error, FieldError, Result};
