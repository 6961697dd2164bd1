//! Common utilities shared across the shelter workspace.
//!
//! This crate provides:
//! - Unified application error with HTTP status mapping
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
