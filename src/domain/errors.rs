use thiserror::Error;

/// The three backend exchanges the form can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Analyze,
    Rewrite,
}

impl Operation {
    /// Prefix used when a request for this operation fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Upload => "Error uploading file",
            Operation::Analyze => "Error analyzing match",
            Operation::Rewrite => "Error rewriting bullets",
        }
    }

    /// Generic message for a non-2xx response.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Upload => "Failed to upload file",
            Operation::Analyze => "Failed to analyze match",
            Operation::Rewrite => "Failed to rewrite bullets",
        }
    }

    /// Label shown while a request is in flight.
    pub fn progress_label(self) -> &'static str {
        match self {
            Operation::Upload => "Uploading...",
            Operation::Analyze => "Analyzing...",
            Operation::Rewrite => "Rewriting...",
        }
    }
}

/// Checks that fail before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please provide both resume and job description")]
    MissingResumeOrJob,
    #[error("Please add at least one bullet point")]
    NoBullets,
    #[error("Please provide a job description")]
    MissingJobDescription,
    #[error("Please enter the path of a resume file")]
    MissingFilePath,
    #[error("Unsupported file type '{0}' (expected PDF, DOCX or TXT)")]
    UnsupportedFileType(String),
    #[error("There are no rewritten bullets yet")]
    NothingToExport,
}

pub type ValidationResult<T> = Result<T, ValidationError>;
