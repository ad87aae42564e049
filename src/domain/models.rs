use serde::{Deserialize, Serialize};

/// Smallest number of bullet slots the count control allows.
pub const MIN_BULLETS: usize = 1;
/// Largest number of bullet slots the count control allows.
pub const MAX_BULLETS: usize = 15;
/// Number of slots filled from an uploaded resume.
pub const UPLOAD_BULLET_SLOTS: usize = 5;
/// File extensions accepted for upload (the picker's `accept` filter).
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

/// Which input supplies the resume text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResumeSource {
    #[default]
    Upload,
    Paste,
}

impl ResumeSource {
    pub fn toggle(self) -> Self {
        match self {
            ResumeSource::Upload => ResumeSource::Paste,
            ResumeSource::Paste => ResumeSource::Upload,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResumeSource::Upload => "Upload File",
            ResumeSource::Paste => "Paste Text",
        }
    }
}

/// Resume text plus the name of the file it was extracted from, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeState {
    pub text: String,
    pub file_name: Option<String>,
}

/// The editable list of resume bullet points.
///
/// The list always holds between [`MIN_BULLETS`] and [`MAX_BULLETS`] entries.
/// Resizing keeps existing entries at their positions.
///
/// # Examples
///
/// ```
/// use jobfit::domain::BulletList;
///
/// let mut bullets = BulletList::default();
/// assert_eq!(bullets.len(), 5);
///
/// bullets.set(0, "Shipped the billing service");
/// bullets.resize(2);
/// assert_eq!(bullets.entries(), ["Shipped the billing service", ""]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BulletList {
    entries: Vec<String>,
}

impl Default for BulletList {
    fn default() -> Self {
        Self {
            entries: vec![String::new(); UPLOAD_BULLET_SLOTS],
        }
    }
}

impl BulletList {
    /// Builds the list from bullets extracted by the upload endpoint.
    ///
    /// Keeps the first [`UPLOAD_BULLET_SLOTS`] bullets and pads with empty
    /// strings so the list always has exactly that many entries.
    pub fn from_extracted(bullets: Vec<String>) -> Self {
        let mut entries: Vec<String> = bullets.into_iter().take(UPLOAD_BULLET_SLOTS).collect();
        entries.resize(UPLOAD_BULLET_SLOTS, String::new());
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut String> {
        self.entries.get_mut(index)
    }

    /// Grows or shrinks the list to `count` entries, clamped to the allowed range.
    ///
    /// Returns the resulting length.
    pub fn resize(&mut self, count: usize) -> usize {
        let count = count.clamp(MIN_BULLETS, MAX_BULLETS);
        self.entries.resize(count, String::new());
        count
    }

    /// Replaces the bullet at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                *entry = value.into();
                true
            }
            None => false,
        }
    }

    /// Bullets that contain something other than whitespace, untrimmed.
    pub fn non_blank(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|bullet| !bullet.trim().is_empty())
            .cloned()
            .collect()
    }

    pub fn has_content(&self) -> bool {
        self.entries.iter().any(|bullet| !bullet.trim().is_empty())
    }
}

/// Score and gap list returned by the analyze endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: i32,
    #[serde(default)]
    pub gaps: Vec<String>,
}

/// One bullet as returned by the rewrite endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewrittenBullet {
    pub original: String,
    pub rewritten: String,
}

/// Body of a successful `/upload-resume` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadResponse {
    pub text: String,
    pub filename: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

/// Body sent to `/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

/// Body sent to `/rewrite-bullets`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewriteRequest {
    pub bullets: Vec<String>,
    pub job_description: String,
}

/// Body of a successful `/rewrite-bullets` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RewriteResponse {
    pub bullets: Vec<RewrittenBullet>,
}
