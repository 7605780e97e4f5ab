//! Common utilities shared across the services and the gateway.
//!
//! This crate provides:
//! - Unified error handling for HTTP
//! - Configuration structures
//! - Database error classification (feature `database`)

pub mod config;
#[cfg(feature = "database")]
pub mod database;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
