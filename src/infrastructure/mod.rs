//! Infrastructure layer providing external service integrations.
//!
//! This module contains the backend HTTP client, configuration loading,
//! the download file writer and clipboard access.

pub mod api;
pub mod clipboard;
pub mod config;
pub mod persistence;

pub use api::*;
pub use clipboard::*;
pub use config::*;
pub use persistence::*;
