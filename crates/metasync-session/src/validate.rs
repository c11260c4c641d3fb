//! File name validation for the create-file flow

use crate::error::SessionError;

const MAX_FILE_NAME_LEN: usize = 255;

/// Validate a new file name
///
/// Rules: non-empty after trimming, no path separators, no hidden files
/// (a leading dot is allowed only for `.gitignore` and metadata files),
/// at most 255 characters, and only letters, digits, dots, hyphens, and
/// underscores.
///
/// # Errors
/// Returns `SessionError::InvalidFileName` describing the first rule hit
pub fn validate_file_name(name: &str) -> Result<(), SessionError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SessionError::InvalidFileName(
            "file name is required".to_string(),
        ));
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(SessionError::InvalidFileName(
            "file name cannot contain slashes".to_string(),
        ));
    }
    if trimmed.starts_with('.') && trimmed != ".gitignore" && !trimmed.ends_with(".seo.json") {
        return Err(SessionError::InvalidFileName(
            "hidden file names are not allowed".to_string(),
        ));
    }
    if trimmed.len() > MAX_FILE_NAME_LEN {
        return Err(SessionError::InvalidFileName(format!(
            "file name is too long (maximum {MAX_FILE_NAME_LEN} characters)"
        )));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(SessionError::InvalidFileName(
            "use only letters, numbers, dots, hyphens, and underscores".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_file_name("about.seo.json").is_ok());
        assert!(validate_file_name("readme.md").is_ok());
        assert!(validate_file_name("index_2-final.txt").is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(validate_file_name("").is_err());
        assert!(validate_file_name("   ").is_err());
    }

    #[test]
    fn rejects_path_separators() {
        assert!(validate_file_name("pages/about.json").is_err());
        assert!(validate_file_name("pages\\about.json").is_err());
    }

    #[test]
    fn hidden_files_mostly_rejected() {
        assert!(validate_file_name(".env").is_err());
        assert!(validate_file_name(".gitignore").is_ok());
        assert!(validate_file_name(".home.seo.json").is_ok());
    }

    #[test]
    fn rejects_overlong_names() {
        let name = "a".repeat(256);
        assert!(validate_file_name(&name).is_err());
        let name = "a".repeat(255);
        assert!(validate_file_name(&name).is_ok());
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(validate_file_name("about page.json").is_err());
        assert!(validate_file_name("about*.json").is_err());
    }
}
