//! Text extraction from uploaded files.

use crate::error::{ApiError, Result};

/// Extracts plain text from an uploaded file.
///
/// Parsing of richer formats plugs in behind this trait; the shipped
/// implementation handles plain-text formats only.
pub trait TextExtractor: Send + Sync {
    /// Extract the text content of `bytes` uploaded as `filename`.
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String>;
}

/// Extractor for `.txt` and `.md` uploads.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let extension = filename.rsplit('.').next().map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("txt") | Some("md") => {}
            _ => {
                return Err(ApiError::Validation(format!(
                    "Unsupported file type: {filename} (expected .txt or .md)"
                )))
            }
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|_| ApiError::Validation(format!("{filename} is not valid UTF-8 text")))?;
        if text.trim().is_empty() {
            return Err(ApiError::Validation(format!("No text could be extracted from {filename}")));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_files() {
        let text = PlainTextExtractor.extract("notes.txt", b"hello world").unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let text = PlainTextExtractor.extract("README.MD", b"# title").unwrap();
        assert_eq!(text, "# title");
    }

    #[test]
    fn rejects_unsupported_extensions() {
        let err = PlainTextExtractor.extract("contract.pdf", b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_empty_content() {
        let err = PlainTextExtractor.extract("empty.txt", b"  \n ").unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn rejects_binary_content() {
        let err = PlainTextExtractor.extract("data.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
