use crate::domain::DOWNLOAD_FILE_NAME;
use std::fs;
use std::path::Path;

pub struct FileRepository;

impl FileRepository {
    /// Writes the download text to `tailored_bullets.txt` inside `dir`.
    ///
    /// Returns the written path for display.
    pub fn save_download(dir: &Path, contents: &str) -> Result<String, String> {
        if !dir.is_dir() {
            return Err(format!("{} is not a directory", dir.display()));
        }

        let path = dir.join(DOWNLOAD_FILE_NAME);
        match fs::write(&path, contents) {
            Ok(_) => Ok(path.display().to_string()),
            Err(e) => Err(e.to_string()),
        }
    }
}
