//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_mime(mime: &str) -> Self {
        // parameters such as "; charset=utf-8" are ignored
        let essence = mime.split(';').next().unwrap_or_default().trim().to_lowercase();
        match essence.as_str() {
            "application/pdf" => FileType::Pdf,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => FileType::Docx,
            "text/plain" => FileType::Text,
            "text/markdown" | "text/x-markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Accepts either a MIME type or a file extension.
    pub fn from_declared(declared: &str) -> Self {
        if declared.contains('/') {
            Self::from_mime(declared)
        } else {
            Self::from_extension(declared)
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    pub fn is_supported(&self) -> bool {
        *self != FileType::Unknown
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FileType::Pdf => "PDF",
            FileType::Docx => "DOCX",
            FileType::Text => "plain text",
            FileType::Markdown => "Markdown",
            FileType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_types() {
        assert_eq!(FileType::from_declared("application/pdf"), FileType::Pdf);
        assert_eq!(
            FileType::from_declared("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
            FileType::Docx
        );
        assert_eq!(FileType::from_declared("text/plain; charset=utf-8"), FileType::Text);
        assert_eq!(FileType::from_declared(".DOCX"), FileType::Docx);
        assert_eq!(FileType::from_declared("md"), FileType::Markdown);
        assert_eq!(FileType::from_declared("image/png"), FileType::Unknown);
        assert_eq!(FileType::from_declared("xyz"), FileType::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(FileType::from_path(Path::new("cv.PDF")), FileType::Pdf);
        assert_eq!(FileType::from_path(Path::new("README")), FileType::Unknown);
    }
}
