// file: src/reader/mod.rs
// description: document loading module exports
// reference: internal module structure

pub mod directory;
pub mod markdown;
pub mod scanner;

pub use directory::DirectoryReader;
pub use markdown::MarkdownParser;
pub use scanner::{FileScanner, ScannedFile};
