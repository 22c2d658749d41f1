//! Command dispatch over one site root

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::config::SiteConfig;
use crate::core::project::Project;
use crate::{admin, publish, site};

/// A site root with its loaded configuration
pub struct App {
    pub root: PathBuf,
    pub config: SiteConfig,
}

impl App {
    /// Load the configuration of the site at `root`
    pub fn open(root: &Path) -> Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Site root not found: {}", root.display()))?;
        let config = SiteConfig::load(&root)?;
        Ok(Self { root, config })
    }

    pub fn project(&self) -> Project {
        Project::new(&self.root, &self.config)
    }

    /// Write a default configuration if there is none and create the source tree
    pub fn init(&self) -> Result<()> {
        if !SiteConfig::config_path(&self.root).exists() {
            self.config.save(&self.root)?;
        }
        self.project().ensure_dirs()?;
        tracing::info!("Site ready at {}", self.root.display());
        Ok(())
    }

    pub fn build(&self) -> Result<()> {
        let report = site::build(&self.project(), &self.config)?;
        tracing::debug!("{}", report.summary());
        tracing::info!(
            "Wrote {} pages to {}",
            report.pages.len(),
            self.project().output.display()
        );
        Ok(())
    }

    pub fn watch(&self) -> Result<()> {
        site::watch(&self.project(), &self.config)
    }

    pub async fn admin(self) -> Result<()> {
        let project = self.project();
        admin::serve(project, self.config).await
    }

    /// Publish from the terminal; the transcript goes to stdout
    pub async fn deploy(&self, message: &str) -> Result<()> {
        let report = publish::deploy(&self.project(), &self.config, message).await;
        println!("{}", report.transcript);
        if report.success {
            Ok(())
        } else {
            anyhow::bail!("Deployment failed")
        }
    }
}
