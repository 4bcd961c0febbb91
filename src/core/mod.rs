//! Core state — types, configuration, errors, baseline persistence.

pub mod config;
pub mod error;
pub mod state;
pub mod types;
