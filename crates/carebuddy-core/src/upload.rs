use bytes::Bytes;
use std::path::Path;

use crate::error::{ConsoleError, Result};

/// Extensions the new-buddy dialog advertises for training documents.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt"];

/// One training document staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

impl UploadFile {
    /// Build an upload from in-memory bytes, guessing the MIME type from `file_name`.
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            content: content.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConsoleError::NotAFile(path.display().to_string()));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ConsoleError::NotAFile(path.display().to_string()))?;
        let content = std::fs::read(path)?;
        Ok(Self::new(file_name, content))
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
    }

    pub fn has_accepted_extension<S: AsRef<str>>(&self, accepted: &[S]) -> bool {
        match self.extension() {
            Some(ext) => accepted
                .iter()
                .any(|a| a.as_ref().trim_start_matches('.').eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
