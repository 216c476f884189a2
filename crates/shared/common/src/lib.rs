//! Common utilities shared across the admin core.
//!
//! This crate provides:
//! - Unified error handling
//! - Configuration loaded from the environment
//! - Tracing setup

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
