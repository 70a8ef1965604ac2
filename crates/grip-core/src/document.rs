//! Documents uploaded alongside a question

use crate::config::{DocumentPolicy, PDF_CONTENT_TYPE};
use crate::errors::AnalysisError;
use std::fmt;
use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

/// A named binary blob, typically a PDF contract.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = content_type_for(&filename).to_string();
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Read a document from disk; the filename is the path's final component.
    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AnalysisError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AnalysisError::IoError(format!("{} has no file name", path.display()))
            })?;

        log::debug!("Loaded document {} ({} bytes)", filename, bytes.len());
        Ok(Self::new(filename, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Human-readable size, e.g. `1.5 MB`.
    pub fn display_size(&self) -> String {
        format_file_size(self.bytes.len() as u64)
    }

    /// Check this document against the upload policy.
    pub fn check(&self, policy: &DocumentPolicy) -> Result<(), AnalysisError> {
        if !policy.allowed_content_types.is_empty()
            && !policy
                .allowed_content_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&self.content_type))
        {
            let message = if policy.allowed_content_types.len() == 1
                && policy.allowed_content_types[0] == PDF_CONTENT_TYPE
            {
                "Please upload a PDF file only.".to_string()
            } else {
                format!(
                    "Unsupported document type {}; expected one of: {}",
                    self.content_type,
                    policy.allowed_content_types.join(", ")
                )
            };
            return Err(AnalysisError::ValidationError(message));
        }

        if self.is_empty() {
            return Err(AnalysisError::ValidationError(format!(
                "Document {} is empty.",
                self.filename
            )));
        }

        if self.bytes.len() as u64 > policy.max_bytes {
            return Err(AnalysisError::ValidationError(format!(
                "File size must be less than {}.",
                size_limit_label(policy.max_bytes)
            )));
        }

        Ok(())
    }
}

// Bytes are elided; contracts can be several megabytes.
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE,
        _ => OCTET_STREAM,
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Compact label for a size limit, e.g. `10MB` or `1.5KB`.
fn size_limit_label(bytes: u64) -> String {
    let formatted = format_file_size(bytes);
    match formatted.split_once(' ') {
        Some((value, unit)) => format!("{}{}", value.trim_end_matches(".0"), unit),
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_inferred_from_extension() {
        assert_eq!(Document::new("lease.PDF", vec![1]).content_type, "application/pdf");
        assert_eq!(
            Document::new("notes.txt", vec![1]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn test_policy_rejects_non_pdf() {
        let doc = Document::new("notes.txt", b"hello".to_vec());
        let err = doc.check(&DocumentPolicy::default()).unwrap_err();
        assert_eq!(err, AnalysisError::ValidationError("Please upload a PDF file only.".into()));
    }

    #[test]
    fn test_policy_rejects_oversized() {
        let policy = DocumentPolicy::default();
        let doc = Document::new("big.pdf", vec![0u8; (policy.max_bytes + 1) as usize]);
        let err = doc.check(&policy).unwrap_err();
        assert_eq!(err.message(), "File size must be less than 10MB.");
    }

    #[test]
    fn test_policy_rejects_empty() {
        let doc = Document::new("blank.pdf", Vec::new());
        assert!(doc.check(&DocumentPolicy::default()).unwrap_err().is_validation());
    }

    #[test]
    fn test_policy_accepts_pdf() {
        let doc = Document::new("f.pdf", b"%PDF-1.4".to_vec());
        assert!(doc.check(&DocumentPolicy::default()).is_ok());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10.0 MB");
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shuttle.pdf");
        tokio::fs::write(&path, b"%PDF-1.7").await.unwrap();

        let doc = Document::from_path(&path).await.unwrap();
        assert_eq!(doc.filename, "shuttle.pdf");
        assert_eq!(doc.content_type, "application/pdf");
        assert_eq!(doc.len(), 8);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = Document::from_path("/definitely/not/here.pdf").await.unwrap_err();
        assert!(matches!(err, AnalysisError::IoError(_)));
    }
}
