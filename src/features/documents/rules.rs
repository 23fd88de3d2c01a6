//! Upload rules: extension allow-list, size limit and MIME inference.

use std::collections::{HashMap, HashSet};

use crate::core::config::DocumentsConfig;
use crate::core::error::AppError;
use crate::shared::constants::FALLBACK_MIME_TYPE;
use crate::shared::validation::DISPLAY_NAME_REGEX;

/// Known extension to MIME type mappings
const MIME_TYPES: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("text", "text/plain"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("pdf", "application/pdf"),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("zip", "application/zip"),
    ("rar", "application/vnd.rar"),
    ("mp4", "video/mp4"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
];

/// Immutable upload rules, built once from configuration
#[derive(Debug, Clone)]
pub struct DocumentRules {
    allowed_extensions: HashSet<String>,
    max_file_size: usize,
    mime_types: HashMap<&'static str, &'static str>,
}

impl DocumentRules {
    /// Matches the `documents.display_name` column width, in characters
    pub const MAX_DISPLAY_NAME_LENGTH: usize = 255;

    pub fn new(config: &DocumentsConfig) -> Self {
        Self {
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.trim().to_lowercase())
                .collect(),
            max_file_size: config.max_file_size,
            mime_types: MIME_TYPES.iter().copied().collect(),
        }
    }

    /// Validate an upload and return its trimmed display name and extension
    pub fn validate(&self, display_name: &str, size: usize) -> Result<(String, String), AppError> {
        let name = display_name.trim();

        if name.is_empty() {
            return Err(AppError::Validation("File name must not be empty".to_string()));
        }

        if name.chars().count() > Self::MAX_DISPLAY_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "File name must be at most {} characters",
                Self::MAX_DISPLAY_NAME_LENGTH
            )));
        }

        if !DISPLAY_NAME_REGEX.is_match(name) {
            return Err(AppError::Validation(
                "File name must not contain path separators or control characters".to_string(),
            ));
        }

        let extension = extension_of(name).ok_or_else(|| {
            AppError::Validation(format!("File name '{}' has no extension", name))
        })?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(AppError::Validation(format!(
                "File type '{}' is not allowed",
                extension
            )));
        }

        if size > self.max_file_size {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                self.max_file_size,
                self.max_file_size / 1024 / 1024
            )));
        }

        Ok((name.to_string(), extension))
    }

    /// MIME type for an extension; unknown extensions fall back to octet-stream
    pub fn mime_for(&self, extension: &str) -> &'static str {
        self.mime_types
            .get(extension.to_lowercase().as_str())
            .copied()
            .unwrap_or(FALLBACK_MIME_TYPE)
    }
}

impl Default for DocumentRules {
    fn default() -> Self {
        Self::new(&DocumentsConfig::default())
    }
}

/// Lower-cased suffix after the last `.`, if any
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.trim();
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}
