//! Site root layout and project setup

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::config::SiteConfig;
use super::content::{ContentStore, PortfolioCategory};
use super::file_system::is_plain_component;

/// Resolved directories of a site
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub src: PathBuf,
    pub templates: PathBuf,
    pub data: PathBuf,
    pub assets: PathBuf,
    pub content: PathBuf,
    pub output: PathBuf,
}

impl Project {
    /// Resolve the project layout under a site root
    pub fn new(root: &Path, config: &SiteConfig) -> Self {
        let src = root.join(&config.src_dir);
        Self {
            root: root.to_path_buf(),
            templates: src.join("templates"),
            data: src.join("data"),
            assets: src.join("assets"),
            content: src.join("content"),
            output: root.join(&config.output_dir),
            src,
        }
    }

    pub fn partials(&self) -> PathBuf {
        self.templates.join("partials")
    }

    /// Markdown bodies of blog posts
    pub fn blog_posts(&self) -> PathBuf {
        self.content.join("blog")
    }

    pub fn images(&self) -> PathBuf {
        self.content.join("images")
    }

    pub fn portfolio_images(&self) -> PathBuf {
        self.images().join("portfolio")
    }

    /// Image directory of one portfolio category
    pub fn category_images(&self, folder: &str) -> PathBuf {
        self.portfolio_images().join(folder)
    }

    pub fn blog_images(&self) -> PathBuf {
        self.images().join("blog")
    }

    pub fn team_images(&self) -> PathBuf {
        self.images().join("team")
    }

    pub fn banner_images(&self) -> PathBuf {
        self.images().join("banners")
    }

    /// Markdown file for a blog slug
    pub fn post_markdown(&self, slug: &str) -> PathBuf {
        self.blog_posts().join(format!("{slug}.md"))
    }

    pub fn store(&self) -> ContentStore {
        ContentStore::new(self.data.clone())
    }

    /// Create every source directory the generator and admin expect
    pub fn ensure_dirs(&self) -> Result<()> {
        tracing::info!("Verifying project structure...");

        let mut required = vec![
            self.templates.clone(),
            self.partials(),
            self.data.clone(),
            self.assets.join("img"),
            self.portfolio_images(),
            self.blog_images(),
            self.team_images(),
            self.blog_posts(),
        ];

        let categories: Vec<PortfolioCategory> = self.store().load_list()?;
        for category in &categories {
            if is_plain_component(&category.folder) {
                required.push(self.category_images(&category.folder));
            } else {
                tracing::warn!("Skipping invalid portfolio folder '{}'", category.folder);
            }
        }

        for path in required {
            if !path.exists() {
                tracing::info!("Directory not found. Creating: {}", path.display());
                std::fs::create_dir_all(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_config() {
        let mut config = SiteConfig::default();
        config.output_dir = PathBuf::from("public");
        let project = Project::new(Path::new("/site"), &config);

        assert_eq!(project.templates, PathBuf::from("/site/src/templates"));
        assert_eq!(project.output, PathBuf::from("/site/public"));
        assert_eq!(
            project.post_markdown("hello"),
            PathBuf::from("/site/src/content/blog/hello.md")
        );
    }

    #[test]
    fn ensure_dirs_creates_category_folders() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(dir.path(), &SiteConfig::default());
        std::fs::create_dir_all(&project.data).unwrap();
        std::fs::write(
            project.data.join("portfolio.json"),
            r#"[{"folder": "kitchens", "label": "Kitchens"}, {"folder": "../bad", "label": "Bad"}]"#,
        )
        .unwrap();

        project.ensure_dirs().unwrap();

        assert!(project.partials().is_dir());
        assert!(project.team_images().is_dir());
        assert!(project.assets.join("img").is_dir());
        assert!(project.category_images("kitchens").is_dir());
        assert!(!project.portfolio_images().join("../bad").exists());
        assert!(!project.banner_images().exists());
    }
}
