// file: src/utils/validation.rs
// description: input validation for config values, paths and advisory requests
// reference: input validation patterns

use crate::error::{AdvisorError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_exists(path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(AdvisorError::NotFound(format!(
                "File does not exist: {}",
                path.display()
            )));
        }
        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(AdvisorError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(AdvisorError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_content_not_empty(field: &str, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(AdvisorError::Validation(format!("{} is empty", field)));
        }
        Ok(())
    }

    pub fn validate_positive(field: &str, value: f64) -> Result<()> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AdvisorError::Validation(format!(
                "{} must be a positive number, got {}",
                field, value
            )));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AdvisorError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_port(port: u16) -> Result<()> {
        if port == 0 {
            return Err(AdvisorError::Validation("Port cannot be 0".to_string()));
        }
        Ok(())
    }

    /// Cuts on a char boundary so multi-byte text (₹, –) never panics.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((idx, _)) => format!("{}...", &text[..idx]),
        }
    }
}
