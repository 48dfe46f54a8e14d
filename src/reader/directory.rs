// file: src/reader/directory.rs
// description: loads every readable text file of a directory as a document
// reference: https://docs.rs/tokio/latest/tokio/task/fn.spawn_blocking.html

use crate::error::{Result, ServerError};
use crate::models::Document;
use crate::reader::{FileScanner, MarkdownParser};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct DirectoryReader {
    max_file_size_mb: usize,
}

impl DirectoryReader {
    pub fn new(max_file_size_mb: usize) -> Self {
        Self { max_file_size_mb }
    }

    /// Reads the directory on the blocking pool so request handlers never
    /// stall the runtime on disk IO.
    pub async fn load_data(&self, directory: &Path) -> Result<Vec<Document>> {
        let reader = self.clone();
        let directory: PathBuf = directory.to_path_buf();
        let join_path = directory.clone();

        tokio::task::spawn_blocking(move || reader.load_data_blocking(&directory))
            .await
            .map_err(|e| ServerError::DocumentLoad {
                path: join_path,
                message: format!("loader task failed: {}", e),
            })?
    }

    pub fn load_data_blocking(&self, directory: &Path) -> Result<Vec<Document>> {
        let scanner = FileScanner::new(self.max_file_size_mb);
        let markdown = MarkdownParser::new();
        let files = scanner.scan_directory(directory)?;

        let mut documents = Vec::with_capacity(files.len());

        for file in files {
            debug!("Reading {} ({} bytes)", file.relative_path, file.size);
            let bytes = std::fs::read(&file.path).map_err(|source| ServerError::FileOperation {
                path: file.path.clone(),
                source,
            })?;

            let content = match String::from_utf8(bytes) {
                Ok(content) => content,
                Err(_) => {
                    warn!("Skipping non UTF-8 file: {}", file.path.display());
                    continue;
                }
            };

            let text = if MarkdownParser::is_markdown(&file.path) {
                markdown.to_plain_text(&content)
            } else {
                content
            };

            if text.trim().is_empty() {
                debug!("Skipping empty file: {}", file.relative_path);
                continue;
            }

            documents.push(Document::new(file.path.display().to_string(), text));
        }

        info!(
            "Loaded {} documents from {}",
            documents.len(),
            directory.display()
        );
        Ok(documents)
    }
}

impl Default for DirectoryReader {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_data() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "Plain text document.").unwrap();
        fs::write(temp.path().join("b.md"), "# Heading\n\nMarkdown **body**.").unwrap();
        fs::write(temp.path().join("c.bin"), [0xff, 0xfe, 0x00, 0x01]).unwrap();
        fs::write(temp.path().join("d.txt"), "   \n").unwrap();

        let docs = DirectoryReader::default().load_data(temp.path()).await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].text, "Plain text document.");
        assert!(docs[1].text.contains("Markdown body."));
        assert!(docs[1].file_path.ends_with("b.md"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let result = DirectoryReader::default()
            .load_data(Path::new("/nonexistent/data"))
            .await;

        assert!(matches!(result, Err(ServerError::DocumentLoad { .. })));
    }
}
