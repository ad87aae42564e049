//! Presentation-independent helpers for scores and rewritten bullets.
//!
//! Everything here is deterministic and free of I/O so the application
//! layer and the renderer can share it.

use super::errors::{ValidationError, ValidationResult};
use super::models::{ACCEPTED_EXTENSIONS, RewrittenBullet};
use std::path::Path;

/// Name of the file produced by the download action.
pub const DOWNLOAD_FILE_NAME: &str = "tailored_bullets.txt";
/// Marker placed before each exported bullet.
pub const BULLET_MARKER: &str = "•";
/// Number of characters of a rewritten bullet shown in its title line.
pub const PREVIEW_CHARS: usize = 60;

/// Display band for a match score.
///
/// # Examples
///
/// ```
/// use jobfit::domain::MatchBand;
///
/// assert_eq!(MatchBand::from_score(85), MatchBand::Strong);
/// assert_eq!(MatchBand::from_score(60).label(), "Good, but can improve");
/// assert_eq!(MatchBand::from_score(12).hex(), "#ef4444");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchBand {
    /// 80 and above
    Strong,
    /// 60 to 79
    Good,
    /// below 60
    Weak,
}

impl MatchBand {
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            MatchBand::Strong
        } else if score >= 60 {
            MatchBand::Good
        } else {
            MatchBand::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchBand::Strong => "Strong Match!",
            MatchBand::Good => "Good, but can improve",
            MatchBand::Weak => "Needs significant tailoring",
        }
    }

    /// Color name: green, amber or red.
    pub fn color_name(self) -> &'static str {
        match self {
            MatchBand::Strong => "green",
            MatchBand::Good => "amber",
            MatchBand::Weak => "red",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            MatchBand::Strong => "#22c55e",
            MatchBand::Good => "#f59e0b",
            MatchBand::Weak => "#ef4444",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            MatchBand::Strong => (0x22, 0xc5, 0x5e),
            MatchBand::Good => (0xf5, 0x9e, 0x0b),
            MatchBand::Weak => (0xef, 0x44, 0x44),
        }
    }
}

pub struct BulletExporter;

impl BulletExporter {
    /// Formats rewritten bullets as the text of the download file.
    ///
    /// One line per bullet, each prefixed with [`BULLET_MARKER`], in result
    /// order and without a trailing newline.
    pub fn render(results: &[RewrittenBullet]) -> String {
        results
            .iter()
            .map(|bullet| format!("{} {}", BULLET_MARKER, bullet.rewritten))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Title line for a rewritten bullet: its position and a short preview.
    pub fn preview_title(index: usize, bullet: &RewrittenBullet) -> String {
        let preview: String = bullet.rewritten.chars().take(PREVIEW_CHARS).collect();
        format!("Bullet {}: {}...", index + 1, preview)
    }
}

/// Applies the upload picker's extension filter to a user-entered path.
pub fn check_upload_path(path: &str) -> ValidationResult<&Path> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingFilePath);
    }

    let path = Path::new(trimmed);
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(path)
    } else {
        Err(ValidationError::UnsupportedFileType(extension))
    }
}
