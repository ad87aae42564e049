//! Application state management for the resume matcher form.
//!
//! This module contains the form state, the focus and mode bookkeeping for
//! the terminal user interface, and one transition method per user action.

use super::worker::{PendingRequest, RequestOutcome};
use crate::domain::{
    AnalysisResult, AnalyzeRequest, BulletExporter, BulletList, MatchBand, Operation,
    ResumeSource, ResumeState, RewriteRequest, RewrittenBullet, ValidationError,
    ValidationResult, check_upload_path,
};
use std::fmt::Display;
use std::path::PathBuf;

/// Represents the current mode of the application.
///
/// The mode determines how key presses are interpreted and which hints the
/// status bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Moving between fields and triggering actions
    Normal,
    /// Typing into the focused text field
    Editing,
    /// Typing the path of a resume file to upload
    FilePath,
    /// Help screen is displayed
    Help,
}

/// A focusable part of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Upload / paste toggle
    Source,
    /// Resume file (upload) or resume text (paste)
    Resume,
    JobDescription,
    BulletCount,
    Bullet(usize),
}

impl Field {
    /// Whether Enter inserts a newline while editing this field.
    pub fn is_multiline(self) -> bool {
        matches!(self, Field::Resume | Field::JobDescription)
    }
}

/// Main application state: the form fields plus UI bookkeeping.
///
/// # Examples
///
/// ```
/// use jobfit::application::{App, AppMode, Field};
///
/// let app = App::default();
/// assert_eq!(app.bullets.len(), 5);
/// assert!(app.analysis.is_none());
/// assert_eq!(app.mode, AppMode::Normal);
/// assert_eq!(app.focus, Field::Source);
/// ```
#[derive(Debug)]
pub struct App {
    /// Which input supplies the resume text
    pub resume_source: ResumeSource,
    /// Resume text and uploaded file name
    pub resume: ResumeState,
    pub job_description: String,
    /// Editable bullet points (1 to 15 entries)
    pub bullets: BulletList,
    /// Last successful analysis, if any
    pub analysis: Option<AnalysisResult>,
    /// Last successful rewrite
    pub rewrites: Vec<RewrittenBullet>,
    /// Operation currently awaiting a response
    pub in_flight: Option<Operation>,
    /// Error banner text
    pub error: Option<String>,
    /// Non-error notice shown in the status bar
    pub status_message: Option<String>,
    pub mode: AppMode,
    pub focus: Field,
    /// Cursor position, in characters, within the buffer being edited
    pub cursor_position: usize,
    /// Path typed at the upload prompt
    pub file_path_input: String,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Directory receiving the download file
    pub download_dir: PathBuf,
}

impl Default for App {
    fn default() -> Self {
        Self::new(PathBuf::from("."))
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

impl App {
    pub fn new(download_dir: PathBuf) -> Self {
        Self {
            resume_source: ResumeSource::default(),
            resume: ResumeState::default(),
            job_description: String::new(),
            bullets: BulletList::default(),
            analysis: None,
            rewrites: Vec::new(),
            in_flight: None,
            error: None,
            status_message: None,
            mode: AppMode::Normal,
            focus: Field::Source,
            cursor_position: 0,
            file_path_input: String::new(),
            help_scroll: 0,
            download_dir,
        }
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Display band for the current score, if an analysis is present.
    pub fn score_band(&self) -> Option<MatchBand> {
        self.analysis
            .as_ref()
            .map(|analysis| MatchBand::from_score(analysis.score))
    }

    /// Fields in the order Tab visits them.
    pub fn focus_order(&self) -> Vec<Field> {
        let mut order = vec![
            Field::Source,
            Field::Resume,
            Field::JobDescription,
            Field::BulletCount,
        ];
        order.extend((0..self.bullets.len()).map(Field::Bullet));
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let current = order.iter().position(|field| *field == self.focus).unwrap_or(0);
        self.focus = order[(current + 1) % order.len()];
    }

    pub fn focus_previous(&mut self) {
        let order = self.focus_order();
        let current = order.iter().position(|field| *field == self.focus).unwrap_or(0);
        self.focus = order[(current + order.len() - 1) % order.len()];
    }

    /// Performs the focused field's primary action (Enter in normal mode).
    pub fn activate_focused(&mut self) {
        match self.focus {
            Field::Source => self.toggle_resume_source(),
            Field::Resume if self.resume_source == ResumeSource::Upload => self.start_file_path(),
            Field::Resume | Field::JobDescription | Field::Bullet(_) => self.start_editing(),
            Field::BulletCount => {}
        }
    }

    pub fn toggle_resume_source(&mut self) {
        self.resume_source = self.resume_source.toggle();
    }

    /// Sets the number of bullet slots, keeping existing text by position.
    ///
    /// # Arguments
    ///
    /// * `count` - Desired number of slots, clamped to 1..=15
    pub fn set_bullet_count(&mut self, count: usize) {
        let count = self.bullets.resize(count);
        if let Field::Bullet(index) = self.focus {
            if index >= count {
                self.focus = Field::Bullet(count - 1);
            }
        }
    }

    /// Grows or shrinks the bullet list by `delta` slots.
    pub fn adjust_bullet_count(&mut self, delta: isize) {
        let count = self.bullets.len().saturating_add_signed(delta);
        self.set_bullet_count(count);
    }

    /// Replaces the text of one bullet. Out-of-range indices are ignored.
    pub fn set_bullet(&mut self, index: usize, value: impl Into<String>) {
        self.bullets.set(index, value);
    }

    /// Text of the focused field, when that field accepts typing.
    pub fn focused_text(&self) -> Option<&str> {
        match self.focus {
            Field::Resume if self.resume_source == ResumeSource::Paste => Some(self.resume.text.as_str()),
            Field::JobDescription => Some(self.job_description.as_str()),
            Field::Bullet(index) => self.bullets.get(index),
            _ => None,
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Resume if self.resume_source == ResumeSource::Paste => Some(&mut self.resume.text),
            Field::JobDescription => Some(&mut self.job_description),
            Field::Bullet(index) => self.bullets.get_mut(index),
            _ => None,
        }
    }

    /// The buffer that typing goes into in the current mode.
    fn edit_buffer(&mut self) -> Option<&mut String> {
        match self.mode {
            AppMode::Editing => self.focused_text_mut(),
            AppMode::FilePath => Some(&mut self.file_path_input),
            AppMode::Normal | AppMode::Help => None,
        }
    }

    fn edit_buffer_len(&mut self) -> usize {
        self.edit_buffer().map(|text| text.chars().count()).unwrap_or(0)
    }

    /// Switches to editing mode for the focused field.
    ///
    /// Fields that do not accept text leave the mode unchanged. The cursor
    /// starts at the end of the existing text.
    pub fn start_editing(&mut self) {
        if let Some(text) = self.focused_text() {
            self.cursor_position = text.chars().count();
            self.mode = AppMode::Editing;
            self.status_message = None;
        }
    }

    /// Leaves editing mode. Edits are applied as they are typed.
    pub fn finish_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor_position;
        if let Some(buffer) = self.edit_buffer() {
            let at = byte_index(buffer, cursor);
            buffer.insert(at, c);
            self.cursor_position = cursor + 1;
        }
    }

    /// Inserts pasted text at the cursor.
    ///
    /// Line breaks are dropped when the target is a single-line buffer.
    pub fn insert_str(&mut self, text: &str) {
        let multiline = self.mode == AppMode::Editing && self.focus.is_multiline();
        let text: String = if multiline {
            text.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
        };

        let cursor = self.cursor_position;
        if let Some(buffer) = self.edit_buffer() {
            let at = byte_index(buffer, cursor);
            buffer.insert_str(at, &text);
            self.cursor_position = cursor + text.chars().count();
        }
    }

    pub fn delete_backward(&mut self) {
        let cursor = self.cursor_position;
        if cursor == 0 {
            return;
        }
        if let Some(buffer) = self.edit_buffer() {
            let at = byte_index(buffer, cursor - 1);
            if at < buffer.len() {
                buffer.remove(at);
                self.cursor_position = cursor - 1;
            }
        }
    }

    pub fn delete_forward(&mut self) {
        let cursor = self.cursor_position;
        if let Some(buffer) = self.edit_buffer() {
            let at = byte_index(buffer, cursor);
            if at < buffer.len() {
                buffer.remove(at);
            }
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.edit_buffer_len();
        if self.cursor_position < len {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.edit_buffer_len();
    }

    /// Switches to the upload prompt, keeping the last path entered.
    ///
    /// While a request is in flight the prompt stays closed and the status
    /// bar says what is still running.
    pub fn start_file_path(&mut self) {
        if let Some(current) = self.in_flight {
            self.status_message = Some(format!(
                "{} Wait for it to finish before uploading.",
                current.progress_label()
            ));
            return;
        }
        self.mode = AppMode::FilePath;
        self.cursor_position = self.file_path_input.chars().count();
        self.status_message = None;
    }

    /// Cancels the upload prompt and returns to normal mode.
    pub fn cancel_file_path(&mut self) {
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    fn busy(&self, requested: Operation) -> bool {
        match self.in_flight {
            Some(current) => {
                tracing::debug!(?requested, ?current, "ignoring trigger while a request is in flight");
                true
            }
            None => false,
        }
    }

    fn reject(&mut self, err: ValidationError) {
        tracing::debug!(error = %err, "validation failed");
        self.error = Some(err.to_string());
    }

    fn begin_request(&mut self, operation: Operation) {
        self.error = None;
        self.status_message = None;
        self.in_flight = Some(operation);
    }

    /// Validates the upload prompt and marks an upload as in flight.
    ///
    /// # Returns
    ///
    /// The request to send, or `None` if a request is already in flight or
    /// the path was rejected (in which case `error` is set).
    pub fn request_upload(&mut self) -> Option<PendingRequest> {
        if self.busy(Operation::Upload) {
            return None;
        }

        let path = match check_upload_path(&self.file_path_input) {
            Ok(path) => path.to_path_buf(),
            Err(err) => {
                self.reject(err);
                return None;
            }
        };

        self.mode = AppMode::Normal;
        self.cursor_position = 0;
        self.begin_request(Operation::Upload);
        Some(PendingRequest::Upload { path })
    }

    /// Validates the form and marks an analysis as in flight.
    ///
    /// Both the resume text and the job description must contain more than
    /// whitespace. Otherwise `error` is set and nothing is returned.
    pub fn request_analyze(&mut self) -> Option<PendingRequest> {
        if self.busy(Operation::Analyze) {
            return None;
        }

        if self.resume.text.trim().is_empty() || self.job_description.trim().is_empty() {
            self.reject(ValidationError::MissingResumeOrJob);
            return None;
        }

        self.begin_request(Operation::Analyze);
        Some(PendingRequest::Analyze(AnalyzeRequest {
            resume_text: self.resume.text.clone(),
            job_description: self.job_description.clone(),
        }))
    }

    /// Validates the bullets and marks a rewrite as in flight.
    ///
    /// Blank bullets are left out of the request.
    pub fn request_rewrite(&mut self) -> Option<PendingRequest> {
        if self.busy(Operation::Rewrite) {
            return None;
        }

        let bullets = self.bullets.non_blank();
        if bullets.is_empty() {
            self.reject(ValidationError::NoBullets);
            return None;
        }
        if self.job_description.trim().is_empty() {
            self.reject(ValidationError::MissingJobDescription);
            return None;
        }

        self.begin_request(Operation::Rewrite);
        Some(PendingRequest::Rewrite(RewriteRequest {
            bullets,
            job_description: self.job_description.clone(),
        }))
    }

    /// Applies a finished request to the form.
    ///
    /// Success replaces the matching result state. Failure only sets the
    /// error banner and leaves every previous result as it was.
    pub fn apply_outcome(&mut self, outcome: RequestOutcome) {
        self.in_flight = None;

        match outcome {
            RequestOutcome::Uploaded(Ok(upload)) => {
                self.resume.text = upload.text;
                self.resume.file_name = Some(upload.filename);
                self.bullets = BulletList::from_extracted(upload.bullets);
                self.set_bullet_count(self.bullets.len());
                self.file_path_input.clear();
                self.cursor_position = self.cursor_position.min(self.edit_buffer_len());
                self.error = None;
            }
            RequestOutcome::Analyzed(Ok(analysis)) => {
                self.analysis = Some(analysis);
            }
            RequestOutcome::Rewritten(Ok(rewrites)) => {
                self.rewrites = rewrites;
            }
            RequestOutcome::Uploaded(Err(err)) => self.fail_request(Operation::Upload, err),
            RequestOutcome::Analyzed(Err(err)) => self.fail_request(Operation::Analyze, err),
            RequestOutcome::Rewritten(Err(err)) => self.fail_request(Operation::Rewrite, err),
        }
    }

    /// Records a failed request in the error banner.
    pub fn fail_request(&mut self, operation: Operation, message: impl Display) {
        self.in_flight = None;
        self.error = Some(format!("{}: {}", operation.failure_prefix(), message));
    }

    /// Text of the download file for the current rewrite results.
    pub fn download_text(&self) -> ValidationResult<String> {
        if self.rewrites.is_empty() {
            Err(ValidationError::NothingToExport)
        } else {
            Ok(BulletExporter::render(&self.rewrites))
        }
    }

    /// Like [`App::download_text`], but reports a missing result in the error banner.
    pub fn prepare_export(&mut self) -> Option<String> {
        match self.download_text() {
            Ok(text) => Some(text),
            Err(err) => {
                self.reject(err);
                None
            }
        }
    }

    /// Processes the result of writing the download file.
    ///
    /// # Arguments
    ///
    /// * `result` - Written path or error message
    pub fn set_download_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(path) => {
                self.status_message = Some(format!("Saved rewritten bullets to {}", path));
            }
            Err(error) => {
                self.error = Some(format!("Error saving bullets: {}", error));
            }
        }
    }

    pub fn set_clipboard_result(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Copied {} rewritten bullet{} to the clipboard",
                    self.rewrites.len(),
                    if self.rewrites.len() == 1 { "" } else { "s" }
                ));
            }
            Err(error) => {
                self.error = Some(format!("Error copying bullets: {}", error));
            }
        }
    }

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }
}
