//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    Json,
    Toml,
    /// Raw model output holding a JSON object somewhere in the text
    Text,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "json" => FileType::Json,
            "toml" => FileType::Toml,
            "txt" | "md" => FileType::Text,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection() {
        assert_eq!(FileType::from_extension("JSON"), FileType::Json);
        assert_eq!(FileType::from_path(Path::new("vocab.toml")), FileType::Toml);
        assert_eq!(FileType::from_path(Path::new("reply.txt")), FileType::Text);
        assert_eq!(FileType::from_path(Path::new("skills")), FileType::Unknown);
        assert_eq!(FileType::from_path(Path::new("cv.pdf")), FileType::Unknown);
    }
}
