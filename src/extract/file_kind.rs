//! Upload type detection.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Png,
    Jpeg,
    Text,
    Markdown,
    Unknown,
}

impl FileKind {
    /// Detection from a declared content type.
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type {
            "application/pdf" => FileKind::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                FileKind::Docx
            }
            "image/png" => FileKind::Png,
            "image/jpeg" => FileKind::Jpeg,
            "text/plain" => FileKind::Text,
            "text/markdown" => FileKind::Markdown,
            _ => FileKind::Unknown,
        }
    }

    /// Fallback detection from a file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileKind::Pdf,
            "docx" => FileKind::Docx,
            "png" => FileKind::Png,
            "jpg" | "jpeg" => FileKind::Jpeg,
            "txt" => FileKind::Text,
            "md" | "markdown" => FileKind::Markdown,
            _ => FileKind::Unknown,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, FileKind::Png | FileKind::Jpeg)
    }
}
