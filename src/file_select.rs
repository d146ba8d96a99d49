//! Video file selection with an extension allow-list.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Whether `path` carries one of the `allowed` extensions, ignoring case
#[must_use]
pub fn has_allowed_extension(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Check a user-chosen video path.
///
/// # Errors
///
/// - `Error::NoFileSelected` when no path was given
/// - `Error::InvalidInput` when the extension is not allowed or the file
///   does not exist
pub fn select_video_file(choice: Option<&Path>, allowed: &[String]) -> Result<PathBuf> {
    let path = choice.ok_or(Error::NoFileSelected)?;

    if !has_allowed_extension(path, allowed) {
        return Err(Error::InvalidInput(format!(
            "{} is not a supported video file (allowed: {})",
            path.display(),
            allowed.join(", ")
        )));
    }
    if !path.is_file() {
        return Err(Error::InvalidInput(format!("Video file not found: {}", path.display())));
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["mp4".to_string(), "avi".to_string()]
    }

    #[test]
    fn test_extension_allow_list() {
        assert!(has_allowed_extension(Path::new("clip.mp4"), &allowed()));
        assert!(has_allowed_extension(Path::new("CLIP.AVI"), &allowed()));
        assert!(!has_allowed_extension(Path::new("clip.mkv"), &allowed()));
        assert!(!has_allowed_extension(Path::new("clip"), &allowed()));
    }

    #[test]
    fn test_no_selection() {
        assert!(matches!(select_video_file(None, &allowed()), Err(Error::NoFileSelected)));
    }

    #[test]
    fn test_missing_file() {
        let result = select_video_file(Some(Path::new("/nonexistent/clip.mp4")), &allowed());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
