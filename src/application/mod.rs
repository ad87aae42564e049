//! Application layer managing form state and request workflows.
//!
//! This module coordinates between the domain layer and the presentation
//! layer: it owns the form state and runs backend requests off the UI thread.

pub mod state;
pub mod worker;

pub use state::*;
pub use worker::*;
