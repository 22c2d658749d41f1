//! Site configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the configuration file at the site root
pub const CONFIG_FILE: &str = "site.json";

/// Site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix for every link in generated pages (e.g. "/my-site.github.io")
    pub base_url: String,
    /// Source directory, relative to the site root
    pub src_dir: PathBuf,
    /// Output directory, relative to the site root
    pub output_dir: PathBuf,
    /// Minify generated HTML pages
    pub minify: bool,
    /// Image post-processing
    pub images: ImageConfig,
    /// Admin server settings
    pub admin: AdminConfig,
    /// Publishing settings
    pub deploy: DeployConfig,
}

/// Image post-processing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Downscale oversized images in the output tree
    pub optimize: bool,
    /// Images wider than this are resized
    pub max_width: u32,
    /// JPEG re-encoding quality (1-100)
    pub jpeg_quality: u8,
}

/// Admin server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in megabytes
    pub max_upload_mb: usize,
    /// Open the admin page in a browser on start
    pub open_browser: bool,
}

/// Publishing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Commit message used when none is given
    pub commit_message: String,
    /// Run `git push` after committing
    pub push: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            src_dir: PathBuf::from("src"),
            output_dir: PathBuf::from("docs"),
            minify: false,
            images: ImageConfig::default(),
            admin: AdminConfig::default(),
            deploy: DeployConfig::default(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            optimize: false,
            max_width: 1920,
            jpeg_quality: 82,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_mb: 32,
            open_browser: false,
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            commit_message: "Updated website content via CMS".to_string(),
            push: true,
        }
    }
}

impl SiteConfig {
    /// Get the config file path for a site root
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load configuration from the site root, falling back to defaults
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);

        if !path.exists() {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the site root
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::config_path(root);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Address the admin server binds to
    pub fn admin_addr(&self) -> String {
        format!("{}:{}", self.admin.host, self.admin.port)
    }

    /// Default message when the form leaves it blank
    pub fn commit_message_or_default<'a>(&'a self, message: &'a str) -> &'a str {
        let trimmed = message.trim();
        if trimmed.is_empty() {
            &self.deploy.commit_message
        } else {
            trimmed
        }
    }
}
