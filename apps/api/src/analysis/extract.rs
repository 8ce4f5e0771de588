//! Text Extractor — best-effort plain text from uploaded resume bytes.
//!
//! Never fails. Parser errors, panics inside the PDF parser and timeouts all
//! degrade to an empty string.

use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};

const EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Extracts text from a PDF. Returns an empty string when nothing can be read.
pub async fn extract_text(data: Bytes) -> String {
    let task = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
    });

    match tokio::time::timeout(EXTRACTION_TIMEOUT, task).await {
        Ok(Ok(Ok(text))) => text,
        Ok(Ok(Err(e))) => {
            warn!("PDF extraction error: {e}");
            String::new()
        }
        Ok(Err(e)) => {
            warn!("PDF extraction task failed: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF extraction timed out");
            String::new()
        }
    }
}

/// PDF text, or a lossy UTF-8 reading of the raw bytes when the PDF yields only whitespace.
pub async fn extract_resume_text(data: Bytes) -> String {
    let text = extract_text(data.clone()).await;
    if !text.trim().is_empty() {
        info!("Extracted {} chars from PDF", text.chars().count());
        return text;
    }
    decode_raw(&data)
}

fn decode_raw(data: &[u8]) -> String {
    String::from_utf8_lossy(data).replace(['\0', '\u{FFFD}'], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_pdf_yields_empty_string() {
        let text = extract_text(Bytes::from_static(b"definitely not a pdf")).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_string() {
        assert_eq!(extract_text(Bytes::new()).await, "");
    }

    #[tokio::test]
    async fn test_plain_text_upload_falls_back_to_raw_decode() {
        let text = extract_resume_text(Bytes::from_static(b"Jane Doe\nSkills: Rust, SQL")).await;
        assert_eq!(text, "Jane Doe\nSkills: Rust, SQL");
    }

    #[test]
    fn test_decode_raw_drops_invalid_bytes() {
        assert_eq!(decode_raw(b"ab\xff\x00cd"), "abcd");
    }
}
