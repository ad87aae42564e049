use crate::application::{App, AppMode, Field};
use crate::domain::{BulletExporter, MAX_BULLETS, MIN_BULLETS, MatchBand, ResumeSource};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const CURSOR: char = '▏';

pub fn render_ui(f: &mut Frame, app: &App) {
    let banner_height = if app.error.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    if let Some(ref error) = app.error {
        render_error_banner(f, error, chunks[1]);
    }
    render_form(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let state = match app.in_flight {
        Some(operation) => operation.progress_label(),
        None => "Ready",
    };
    let header = Paragraph::new(format!("jobfit - Resume to Job Matcher | {}", state))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_error_banner(f: &mut Frame, error: &str, area: Rect) {
    let banner = Paragraph::new(error.to_string())
        .block(Block::default().borders(Borders::ALL).title("Error"))
        .style(Style::default().fg(Color::Red));
    f.render_widget(banner, area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Min(0),
        ])
        .split(area);

    let inputs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_resume(f, app, inputs[0]);
    render_job_description(f, app, inputs[1]);
    render_bullets(f, app, rows[1]);

    let results = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[2]);

    render_match_results(f, app, results[0]);
    render_rewrites(f, app, results[1]);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn is_editing(app: &App, field: Field) -> bool {
    app.mode == AppMode::Editing && app.focus == field
}

/// Inserts a cursor marker at a character position.
fn with_cursor(text: &str, cursor: usize) -> String {
    let mut marked: String = text.chars().take(cursor).collect();
    marked.push(CURSOR);
    marked.extend(text.chars().skip(cursor));
    marked
}

/// Vertical scroll that keeps the cursor line inside `height` rows.
fn scroll_for_cursor(text: &str, cursor: usize, height: u16) -> u16 {
    let cursor_line = text.chars().take(cursor).filter(|c| *c == '\n').count();
    cursor_line.saturating_sub(height.saturating_sub(1) as usize) as u16
}

fn render_text_field(
    f: &mut Frame,
    app: &App,
    field: Field,
    text: &str,
    placeholder: &str,
    area: Rect,
    block: Block,
) {
    let inner_height = area.height.saturating_sub(2);
    let (content, style, scroll) = if is_editing(app, field) {
        (
            with_cursor(text, app.cursor_position),
            Style::default().fg(Color::Green),
            scroll_for_cursor(text, app.cursor_position, inner_height),
        )
    } else if text.is_empty() {
        (placeholder.to_string(), Style::default().fg(Color::DarkGray), 0)
    } else {
        (text.to_string(), Style::default(), 0)
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .style(style)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_resume(f: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Field::Source | Field::Resume);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Your Resume")
        .border_style(border_style(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let toggle_style = if app.focus == Field::Source {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
    };
    let toggle = Line::from(
        [ResumeSource::Upload, ResumeSource::Paste]
            .into_iter()
            .map(|source| {
                let mark = if source == app.resume_source { "(•)" } else { "( )" };
                Span::styled(format!("{} {}  ", mark, source.label()), toggle_style)
            })
            .collect::<Vec<_>>(),
    );
    f.render_widget(Paragraph::new(toggle), parts[0]);

    let content_block = Block::default()
        .borders(Borders::TOP)
        .border_style(border_style(app.focus == Field::Resume));

    match app.resume_source {
        ResumeSource::Upload => {
            let mut lines = Vec::new();
            if app.mode == AppMode::FilePath {
                lines.push(Line::styled(
                    format!("File: {}", with_cursor(&app.file_path_input, app.cursor_position)),
                    Style::default().fg(Color::Green),
                ));
            } else {
                lines.push(Line::styled(
                    "Press Enter to choose a file (PDF, DOCX, TXT)",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if let Some(ref file_name) = app.resume.file_name {
                lines.push(Line::styled(
                    format!("✓ {}", file_name),
                    Style::default().fg(Color::Green),
                ));
            }
            f.render_widget(Paragraph::new(lines).block(content_block), parts[1]);
        }
        ResumeSource::Paste => {
            render_text_field(
                f,
                app,
                Field::Resume,
                &app.resume.text,
                "Paste your full resume here...",
                parts[1],
                content_block,
            );
        }
    }
}

fn render_job_description(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Job Description")
        .border_style(border_style(app.focus == Field::JobDescription));
    render_text_field(
        f,
        app,
        Field::JobDescription,
        &app.job_description,
        "Paste the job description here...",
        area,
        block,
    );
}

fn render_bullets(f: &mut Frame, app: &App, area: Rect) {
    let focused = matches!(app.focus, Field::BulletCount | Field::Bullet(_));
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Edit & Rewrite Bullet Points")
        .border_style(border_style(focused));

    let count_style = if app.focus == Field::BulletCount {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let mut lines = vec![Line::styled(
        format!(
            "Number of bullets to edit: {} ({}-{}, ←/→ or +/-)",
            app.bullets.len(),
            MIN_BULLETS,
            MAX_BULLETS
        ),
        count_style,
    )];

    for (index, bullet) in app.bullets.entries().iter().enumerate() {
        let field = Field::Bullet(index);
        let label = Span::styled(
            format!("Bullet {:>2}: ", index + 1),
            Style::default().fg(Color::Yellow),
        );
        let body = if is_editing(app, field) {
            Span::styled(
                with_cursor(bullet, app.cursor_position),
                Style::default().fg(Color::Green),
            )
        } else if bullet.is_empty() {
            Span::styled(
                "Enter a bullet point from your resume...",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            Span::raw(bullet.clone())
        };

        let mut line = Line::from(vec![label, body]);
        if app.focus == field {
            line = line.style(Style::default().add_modifier(Modifier::REVERSED));
        }
        lines.push(line);
    }

    // Keep the focused bullet on screen when the list is taller than the box.
    let visible = area.height.saturating_sub(2) as usize;
    let focused_line = match app.focus {
        Field::Bullet(index) => index + 1,
        _ => 0,
    };
    let scroll = focused_line.saturating_sub(visible.saturating_sub(1)) as u16;

    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_match_results(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Match Score");

    let lines = match app.analysis {
        Some(ref analysis) => {
            let band = MatchBand::from_score(analysis.score);
            let (r, g, b) = band.rgb();
            let band_style = Style::default().fg(Color::Rgb(r, g, b));

            let mut lines = vec![
                Line::styled(
                    format!("{}/100", analysis.score),
                    band_style.add_modifier(Modifier::BOLD),
                ),
                Line::styled(band.label(), band_style),
                Line::raw(""),
                Line::styled("Critical Gaps", Style::default().fg(Color::Yellow)),
            ];
            lines.extend(analysis.gaps.iter().map(|gap| Line::raw(format!("• {}", gap))));
            lines
        }
        None => vec![Line::styled(
            "Press 'a' to analyze match & gaps",
            Style::default().fg(Color::DarkGray),
        )],
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_rewrites(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Tailored Bullet Points");

    let lines: Vec<Line> = if app.rewrites.is_empty() {
        vec![Line::styled(
            "Press 'r' to rewrite bullets to match the job",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        let mut lines = Vec::new();
        for (index, bullet) in app.rewrites.iter().enumerate() {
            lines.push(Line::styled(
                BulletExporter::preview_title(index, bullet),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::raw(format!("  Original: {}", bullet.original)));
            lines.push(Line::styled(
                format!("  ✨ Improved: {}", bullet.rewritten),
                Style::default().fg(Color::Green),
            ));
        }
        lines.push(Line::styled(
            "d: download tailored_bullets.txt | y: copy to clipboard",
            Style::default().fg(Color::Cyan),
        ));
        lines
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else if let Some(operation) = app.in_flight {
                format!("⏳ {} (other actions are disabled until it finishes)", operation.progress_label())
            } else {
                "Tab/↑↓: move | Enter: edit | u: upload | a: analyze | r: rewrite | d: download | ?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => {
            if app.focus.is_multiline() {
                "Editing (Enter: new line, Esc: done, Tab: next field)".to_string()
            } else {
                "Editing (Enter/Esc: done, Tab: next field)".to_string()
            }
        }
        AppMode::FilePath => format!(
            "Upload file: {} (Enter to upload, Esc to cancel)",
            app.file_path_input
        ),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::FilePath => Style::default().fg(Color::Yellow),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("jobfit Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> &'static str {
    r#"JOBFIT - RESUME TO JOB MATCHER

=== WORKFLOW ===
1. Provide your resume: upload a file or paste the text
2. Paste the job description
3. Press 'a' for a match score and the critical gaps
4. Fill in the bullet points you want tailored and press 'r'
5. Press 'd' to save the rewritten bullets to tailored_bullets.txt

=== MOVING AROUND ===
Tab / ↓ / j     Next field
Shift+Tab / ↑ / k  Previous field
Enter / F2      Edit the focused field
                On "Your Resume" in upload mode: enter a file path
Space / ← / →   Switch between Upload File and Paste Text
← / → / + / -   Change the number of bullets (1 to 15)

=== EDITING ===
Typing          Edits the field in place
Enter           New line (resume, job description) or done (bullets)
Esc             Done editing
Tab             Done editing, move to the next field
Paste           Terminal paste inserts at the cursor

=== ACTIONS ===
u               Upload a resume file (PDF, DOCX, TXT)
a               Analyze match & gaps
r               Rewrite bullets to match the job
d               Download rewritten bullets (tailored_bullets.txt)
y               Copy rewritten bullets to the clipboard
q               Quit

=== MATCH SCORE ===
80 and above    Strong Match!
60 to 79        Good, but can improve
Below 60        Needs significant tailoring

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window

Note: Only one request runs at a time. Other actions are ignored until
the current one finishes."#
}
