//! Boundary to the text-extraction (OCR) collaborator.

use crate::models::document::ContentType;

/// Turns attachment bytes into text.
///
/// Implementations return an empty string when nothing can be read; the
/// processor treats that as a document with no extractable fields.
pub trait TextSource {
    fn extract_text(&self, content: &[u8], content_type: ContentType) -> String;
}

/// Source for attachments that are already text, e.g. saved OCR output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8TextSource;

impl TextSource for Utf8TextSource {
    fn extract_text(&self, content: &[u8], _content_type: ContentType) -> String {
        String::from_utf8_lossy(content).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_source_is_lossy() {
        let source = Utf8TextSource;

        assert_eq!(source.extract_text(b"Total $5.00", ContentType::Pdf), "Total $5.00");
        assert_eq!(source.extract_text(&[0x41, 0xff, 0x42], ContentType::Image), "A\u{fffd}B");
        assert_eq!(source.extract_text(b"", ContentType::Pdf), "");
    }
}
