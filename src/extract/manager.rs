//! Dispatching manager for upload text extraction.

use crate::error::{PortalError, Result};
use crate::extract::extractors::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::extract::file_kind::FileKind;
use crate::llm::LanguageModel;
use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

const IMAGE_PROMPT: &str = "Extract the text from this image.";

pub struct UploadExtractor {
    cache: HashMap<String, String>,
    enable_cache: bool,
    image_max_tokens: u32,
}

impl UploadExtractor {
    pub fn new(image_max_tokens: u32) -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
            image_max_tokens,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Extracts text from a file on disk, dispatching on the declared
    /// content type when given and on the extension otherwise. An
    /// unsupported type yields empty text so the calling flow can warn
    /// and continue.
    pub fn extract_file(
        &mut self,
        path: &Path,
        content_type: Option<&str>,
        vision: &dyn LanguageModel,
    ) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(PortalError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let kind = match content_type {
            Some(ct) => FileKind::from_content_type(ct),
            None => path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(FileKind::from_extension)
                .unwrap_or(FileKind::Unknown),
        };

        let bytes = std::fs::read(path)?;
        let text = self.extract_bytes(kind, &bytes, vision)?;

        if self.enable_cache && !text.is_empty() {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    pub fn extract_bytes(
        &self,
        kind: FileKind,
        bytes: &[u8],
        vision: &dyn LanguageModel,
    ) -> Result<String> {
        match kind {
            FileKind::Pdf => {
                info!("Extracting text from PDF upload");
                PdfExtractor.extract(bytes)
            }
            FileKind::Docx => {
                info!("Extracting text from DOCX upload");
                DocxExtractor.extract(bytes)
            }
            FileKind::Text => PlainTextExtractor.extract(bytes),
            FileKind::Markdown => MarkdownExtractor.extract(bytes),
            FileKind::Png | FileKind::Jpeg => {
                info!("Extracting text from image upload via vision model");
                vision.describe_image(IMAGE_PROMPT, bytes, self.image_max_tokens)
            }
            FileKind::Unknown => {
                warn!("Unsupported file type; no text extracted");
                Ok(String::new())
            }
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatOptions;

    struct FakeVision;

    impl LanguageModel for FakeVision {
        fn chat_stream(
            &self,
            _system: &str,
            _user: &str,
            _options: &ChatOptions,
            _on_fragment: &mut dyn FnMut(&str),
        ) -> Result<String> {
            unreachable!("chat is not used by extraction")
        }

        fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String> {
            unreachable!("plain completion is not used by extraction")
        }

        fn describe_image(&self, _prompt: &str, _image: &[u8], _max_tokens: u32) -> Result<String> {
            Ok("text seen in image".to_string())
        }

        fn model_name(&self) -> &str {
            "fake-vision"
        }
    }

    #[test]
    fn test_unknown_kind_yields_empty_text() {
        let extractor = UploadExtractor::new(500);
        let text = extractor
            .extract_bytes(FileKind::Unknown, b"whatever", &FakeVision)
            .unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_image_goes_through_vision_model() {
        let extractor = UploadExtractor::new(500);
        let text = extractor
            .extract_bytes(FileKind::Png, &[0x89, 0x50, 0x4e, 0x47], &FakeVision)
            .unwrap();
        assert_eq!(text, "text seen in image");
    }

    #[test]
    fn test_file_extraction_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Jane Doe, Software Engineer").unwrap();

        let mut extractor = UploadExtractor::new(500);
        let first = extractor.extract_file(&path, None, &FakeVision).unwrap();
        assert!(first.contains("Jane Doe"));
        assert_eq!(extractor.cache_size(), 1);

        let second = extractor.extract_file(&path, None, &FakeVision).unwrap();
        assert_eq!(first, second);
        assert_eq!(extractor.cache_size(), 1);
    }

    #[test]
    fn test_content_type_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.bin");
        std::fs::write(&path, "plain contents").unwrap();

        let mut extractor = UploadExtractor::new(500);
        let text = extractor
            .extract_file(&path, Some("text/plain"), &FakeVision)
            .unwrap();
        assert_eq!(text, "plain contents");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut extractor = UploadExtractor::new(500);
        assert!(extractor
            .extract_file(Path::new("/nonexistent/file.txt"), None, &FakeVision)
            .is_err());
    }
}
