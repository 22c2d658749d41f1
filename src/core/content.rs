//! JSON content files under `src/data`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record type stored as a JSON array in one data file
pub trait Record: Serialize + DeserializeOwned {
    /// File name inside the data directory
    const FILE: &'static str;
}

/// Footer shown on every page (`footer.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Footer {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub copyright_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Testimonial {
    pub client_name: String,
    pub feedback: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub bio: String,
    /// Portrait file name under `images/team`, empty when none
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_ceo: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Blog post metadata; the body lives in `content/blog/<slug>.md`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub summary: String,
    /// Cover file name under `images/blog`, empty when none
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A portfolio category and its image folder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioCategory {
    pub folder: String,
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Testimonial {
    const FILE: &'static str = "testimonials.json";
}

impl Record for TeamMember {
    const FILE: &'static str = "team.json";
}

impl Record for BlogPost {
    const FILE: &'static str = "blog.json";
}

impl Record for PortfolioCategory {
    const FILE: &'static str = "portfolio.json";
}

const FOOTER_FILE: &str = "footer.json";

/// Reads and writes the data directory
#[derive(Debug, Clone)]
pub struct ContentStore {
    data_dir: PathBuf,
}

impl ContentStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every `*.json` file, keyed by the file name up to its first dot
    pub fn load_site_data(&self) -> Result<Map<String, Value>> {
        tracing::info!("Loading content data...");
        let mut data = Map::new();

        if !self.data_dir.is_dir() {
            return Ok(data);
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.data_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for path in files {
            let Some(file_name) = path.file_name().map(|s| s.to_string_lossy().to_string())
            else {
                continue;
            };
            let key = file_name.split('.').next().unwrap_or_default().to_string();
            let value: Value = read_json(&path)?;
            tracing::debug!("Loaded data file {} as '{}'", file_name, key);
            data.insert(key, value);
        }

        tracing::info!("Data loaded successfully.");
        Ok(data)
    }

    /// Load a record list; a missing file is an empty list
    pub fn load_list<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.data_dir.join(R::FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    pub fn save_list<R: Record>(&self, records: &[R]) -> Result<()> {
        write_json(&self.data_dir.join(R::FILE), &records)
    }

    pub fn load_footer(&self) -> Result<Footer> {
        let path = self.data_dir.join(FOOTER_FILE);
        if !path.exists() {
            return Ok(Footer::default());
        }
        read_json(&path)
    }

    pub fn save_footer(&self, footer: &Footer) -> Result<()> {
        write_json(&self.data_dir.join(FOOTER_FILE), footer)
    }
}

/// Read and parse a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// Write JSON with two-space indentation, leaving non-ASCII text unescaped
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to save file: {}", path.display()))?;
    tracing::debug!("Saved {}", path.display());
    Ok(())
}
