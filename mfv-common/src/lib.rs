//! # Manifest Validator Common Library
//!
//! Shared code for the manifest validator binaries:
//! - Error type
//! - TOML configuration model and config file resolution
//! - Tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
