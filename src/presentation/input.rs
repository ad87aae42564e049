use crate::application::{App, AppMode, Field, PendingRequest};
use crate::domain::ResumeSource;
use crate::infrastructure::{ClipboardExporter, FileRepository};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    /// Applies a key press to the form.
    ///
    /// Returns a request when the key triggered a backend call that passed
    /// validation; the caller is responsible for sending it.
    pub fn handle_key_event(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<PendingRequest> {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key),
            AppMode::Editing => {
                Self::handle_editing_mode(app, key, modifiers);
                None
            }
            AppMode::FilePath => Self::handle_file_path_mode(app, key, modifiers),
            AppMode::Help => {
                Self::handle_help_mode(app, key);
                None
            }
        }
    }

    /// Applies bracketed-paste text to the form.
    ///
    /// Pasting while a text field is focused in normal mode starts editing it.
    pub fn handle_paste(app: &mut App, text: &str) {
        match app.mode {
            AppMode::Editing | AppMode::FilePath => app.insert_str(text),
            AppMode::Normal => {
                app.start_editing();
                if app.mode == AppMode::Editing {
                    app.insert_str(text);
                }
            }
            AppMode::Help => {}
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode) -> Option<PendingRequest> {
        app.status_message = None;

        match key {
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => app.focus_previous(),
            KeyCode::Enter | KeyCode::F(2) => app.activate_focused(),
            KeyCode::Char(' ') if app.focus == Field::Source => app.toggle_resume_source(),
            KeyCode::Left | KeyCode::Char('h') => match app.focus {
                Field::Source => app.toggle_resume_source(),
                Field::BulletCount => app.adjust_bullet_count(-1),
                _ => {}
            },
            KeyCode::Right | KeyCode::Char('l') => match app.focus {
                Field::Source => app.toggle_resume_source(),
                Field::BulletCount => app.adjust_bullet_count(1),
                _ => {}
            },
            KeyCode::Char('+') => app.adjust_bullet_count(1),
            KeyCode::Char('-') => app.adjust_bullet_count(-1),
            KeyCode::Char('u') => {
                app.resume_source = ResumeSource::Upload;
                app.focus = Field::Resume;
                app.start_file_path();
            }
            KeyCode::Char('a') => return app.request_analyze(),
            KeyCode::Char('r') => return app.request_rewrite(),
            KeyCode::Char('d') => {
                if let Some(text) = app.prepare_export() {
                    let result = FileRepository::save_download(&app.download_dir, &text);
                    app.set_download_result(result);
                }
            }
            KeyCode::Char('y') => {
                if let Some(text) = app.prepare_export() {
                    let result = ClipboardExporter::copy(&text);
                    app.set_clipboard_result(result);
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => app.open_help(),
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
        None
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => app.finish_editing(),
            KeyCode::Enter => {
                if app.focus.is_multiline() {
                    app.insert_char('\n');
                } else {
                    app.finish_editing();
                }
            }
            KeyCode::Tab => {
                app.finish_editing();
                app.focus_next();
            }
            _ => Self::handle_line_editing(app, key, modifiers),
        }
    }

    fn handle_file_path_mode(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<PendingRequest> {
        match key {
            KeyCode::Enter => return app.request_upload(),
            KeyCode::Esc => app.cancel_file_path(),
            _ => Self::handle_line_editing(app, key, modifiers),
        }
        None
    }

    fn handle_line_editing(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Backspace => app.delete_backward(),
            KeyCode::Delete => app.delete_forward(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => app.insert_char(c),
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DOWNLOAD_FILE_NAME, RewrittenBullet};
    use std::fs;

    fn press(app: &mut App, key: KeyCode) -> Option<PendingRequest> {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_a_job_description() {
        let mut app = App::default();
        app.focus = Field::JobDescription;

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Editing);

        type_text(&mut app, "Rust");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Tokio");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.job_description, "Rust\nTokio");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_enter_finishes_bullet_editing() {
        let mut app = App::default();
        app.focus = Field::Bullet(2);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Cut latency by 40%");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.bullets.get(2), Some("Cut latency by 40%"));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_control_characters_are_not_inserted() {
        let mut app = App::default();
        app.focus = Field::Bullet(0);
        press(&mut app, KeyCode::Enter);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.bullets.get(0), Some(""));
    }

    #[test]
    fn test_bullet_count_keys() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.bullets.len(), 6);

        app.focus = Field::BulletCount;
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.bullets.len(), 4);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.bullets.len(), 5);
    }

    #[test]
    fn test_source_toggle_keys() {
        let mut app = App::default();
        assert_eq!(app.focus, Field::Source);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.resume_source, ResumeSource::Paste);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.resume_source, ResumeSource::Upload);
    }

    #[test]
    fn test_analyze_key_without_job_description_returns_no_request() {
        let mut app = App::default();
        app.resume.text = "resume".to_string();

        assert!(press(&mut app, KeyCode::Char('a')).is_none());
        assert!(app.error.is_some());
        assert!(!app.is_loading());
    }

    #[test]
    fn test_analyze_key_returns_request() {
        let mut app = App::default();
        app.resume.text = "resume".to_string();
        app.job_description = "job".to_string();

        let request = press(&mut app, KeyCode::Char('a'));
        assert!(matches!(request, Some(PendingRequest::Analyze(_))));
        assert!(app.is_loading());
    }

    #[test]
    fn test_upload_prompt_flow() {
        let mut app = App::default();
        app.resume_source = ResumeSource::Paste;

        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.mode, AppMode::FilePath);
        assert_eq!(app.resume_source, ResumeSource::Upload);

        type_text(&mut app, "cv.pdfx");
        press(&mut app, KeyCode::Backspace);
        let request = press(&mut app, KeyCode::Enter);

        assert_eq!(
            request,
            Some(PendingRequest::Upload {
                path: "cv.pdf".into()
            })
        );
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_upload_prompt_escape_cancels() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('u'));
        type_text(&mut app, "cv");
        assert!(press(&mut app, KeyCode::Esc).is_none());
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.is_loading());
    }

    #[test]
    fn test_upload_key_while_analyzing_keeps_normal_mode() {
        let mut app = App::default();
        app.resume.text = "resume".to_string();
        app.job_description = "job".to_string();
        assert!(press(&mut app, KeyCode::Char('a')).is_some());

        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.as_deref().unwrap().starts_with("Analyzing..."));

        type_text(&mut app, "cv");
        assert!(app.file_path_input.is_empty());
        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_paste_in_normal_mode_starts_editing() {
        let mut app = App::default();
        app.resume_source = ResumeSource::Paste;
        app.focus = Field::Resume;

        InputHandler::handle_paste(&mut app, "Jane Doe\nEngineer");
        assert_eq!(app.mode, AppMode::Editing);
        assert_eq!(app.resume.text, "Jane Doe\nEngineer");
    }

    #[test]
    fn test_paste_on_non_text_field_is_ignored() {
        let mut app = App::default();
        app.focus = Field::BulletCount;
        InputHandler::handle_paste(&mut app, "text");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_download_key_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(dir.path().to_path_buf());
        app.rewrites = vec![RewrittenBullet {
            original: "did stuff".to_string(),
            rewritten: "Delivered measurable stuff".to_string(),
        }];

        press(&mut app, KeyCode::Char('d'));

        let contents = fs::read_to_string(dir.path().join(DOWNLOAD_FILE_NAME)).unwrap();
        assert_eq!(contents, "• Delivered measurable stuff");
        assert!(app.status_message.as_deref().unwrap().starts_with("Saved rewritten bullets to"));
    }

    #[test]
    fn test_download_key_without_results_sets_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(dir.path().to_path_buf());

        press(&mut app, KeyCode::Char('d'));

        assert!(app.error.is_some());
        assert!(!dir.path().join(DOWNLOAD_FILE_NAME).exists());
    }

    #[test]
    fn test_help_mode() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 4);

        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.mode, AppMode::Normal);
    }
}
