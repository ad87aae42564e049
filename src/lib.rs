//! jobfit - Resume to Job Matcher
//!
//! A terminal form that sends a resume and a job description to a matching
//! backend, then shows the match score, the critical gaps and rewritten
//! resume bullet points.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
