//! Markdown bodies of blog posts

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A blog post's Markdown file
#[derive(Debug, Clone)]
pub struct Document {
    /// File path
    pub path: PathBuf,
    /// Raw Markdown, including any frontmatter
    pub content: String,
}

impl Document {
    /// Create a new document with the given content
    pub fn new(path: PathBuf, content: String) -> Self {
        Self { path, content }
    }

    /// Open a document from a file
    pub fn open(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            content,
        })
    }

    /// Open a document if the file exists
    pub fn open_optional(path: &Path) -> Result<Option<Self>> {
        if path.is_file() {
            Self::open(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Save the document to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, &self.content)
            .with_context(|| format!("Failed to save file: {}", self.path.display()))?;
        tracing::info!("Saved document: {}", self.path.display());
        Ok(())
    }

    /// Get content without a leading `---` frontmatter block
    pub fn content_without_frontmatter(&self) -> &str {
        if !self.content.starts_with("---") {
            return &self.content;
        }

        if let Some(end) = self.content[3..].find("\n---") {
            let after_frontmatter = 3 + end + 4;
            if after_frontmatter <= self.content.len() {
                return self.content[after_frontmatter..].trim_start();
            }
        }

        &self.content
    }

    /// Rough word count of the body, for reading-time estimates
    pub fn word_count(&self) -> usize {
        self.content_without_frontmatter().split_whitespace().count()
    }
}
