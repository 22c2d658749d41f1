//! The site build: copy static files, render pages, post-process output

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tera::Tera;

use super::images::optimize_images;
use super::markdown::render_markdown;
use super::minify::minify_page;
use crate::core::config::SiteConfig;
use crate::core::content::{BlogPost, PortfolioCategory};
use crate::core::document::Document;
use crate::core::file_system::{is_plain_component, list_file_names, replace_dir, write_file};
use crate::core::project::Project;

const PORTFOLIO_TEMPLATE: &str = "partials/portfolio_category.html";
const POST_TEMPLATE: &str = "partials/post_detail.html";

/// Average reading speed used for `reading_minutes`
const WORDS_PER_MINUTE: usize = 200;

/// What a build produced
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Generated pages, relative to the output directory
    pub pages: Vec<PathBuf>,
    pub warnings: Vec<String>,
    pub images_resized: usize,
}

impl BuildReport {
    fn warn(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    /// Human-readable summary, one line per page and warning
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = self
            .pages
            .iter()
            .map(|p| format!("- Generated {}", p.display()))
            .collect();
        lines.extend(self.warnings.iter().map(|w| format!("- WARNING: {w}")));
        if self.images_resized > 0 {
            lines.push(format!("- Resized {} images", self.images_resized));
        }
        lines.push(format!("Build finished: {} pages.", self.pages.len()));
        lines.join("\n")
    }
}

/// Renders the site of one project
pub struct SiteBuilder<'a> {
    project: &'a Project,
    config: &'a SiteConfig,
    report: BuildReport,
}

/// Build the whole site
pub fn build(project: &Project, config: &SiteConfig) -> Result<BuildReport> {
    SiteBuilder::new(project, config).run()
}

impl<'a> SiteBuilder<'a> {
    pub fn new(project: &'a Project, config: &'a SiteConfig) -> Self {
        Self {
            project,
            config,
            report: BuildReport::default(),
        }
    }

    /// Run every build stage in order
    pub fn run(mut self) -> Result<BuildReport> {
        tracing::info!("Starting website build...");
        self.project.ensure_dirs()?;

        self.copy_static_files()?;

        let mut site_data = self.project.store().load_site_data()?;
        site_data.insert(
            "base_url".to_string(),
            Value::String(self.config.base_url.clone()),
        );

        let tera = self.load_templates()?;

        self.render_main_pages(&tera, &site_data)?;
        self.render_portfolio_pages(&tera, &site_data)?;
        self.render_blog_posts(&tera, &site_data)?;

        if self.config.images.optimize {
            let image_dir = self.project.output.join("content").join("images");
            let images = optimize_images(&image_dir, &self.config.images);
            self.report.images_resized = images.resized;
            self.report.warnings.extend(images.warnings);
        }

        tracing::info!(
            "Build finished: {} pages, {} warnings",
            self.report.pages.len(),
            self.report.warnings.len()
        );
        Ok(self.report)
    }

    fn copy_static_files(&self) -> Result<()> {
        tracing::info!("Copying static files...");
        let output = &self.project.output;
        std::fs::create_dir_all(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;

        let assets = replace_dir(&self.project.assets, &output.join("assets"))?;
        let content = replace_dir(&self.project.content, &output.join("content"))?;
        tracing::info!("Static files copied successfully ({} files).", assets + content);
        Ok(())
    }

    fn load_templates(&self) -> Result<Tera> {
        let pattern = format!("{}/**/*.html", self.project.templates.display());
        let mut tera = Tera::new(&pattern).with_context(|| {
            format!("Failed to load templates from {}", self.project.templates.display())
        })?;
        tera.set_escape_fn(escape_html);
        tracing::debug!("Loaded {} templates", tera.get_template_names().count());
        Ok(tera)
    }

    /// Render `template` with the site data plus `extra`, then write it
    fn render_to(
        &mut self,
        tera: &Tera,
        template: &str,
        site_data: &Map<String, Value>,
        extra: Map<String, Value>,
        relative: PathBuf,
    ) -> Result<()> {
        let mut page_data = site_data.clone();
        page_data.extend(extra);

        let context = tera::Context::from_serialize(&page_data)?;
        let mut html = tera
            .render(template, &context)
            .with_context(|| format!("Failed to render {template}"))?;

        if self.config.minify {
            html = minify_page(&html);
        }

        write_file(&self.project.output.join(&relative), html.as_bytes())?;
        tracing::info!("- Generated {}", relative.display());
        self.report.pages.push(relative);
        Ok(())
    }

    fn render_main_pages(&mut self, tera: &Tera, site_data: &Map<String, Value>) -> Result<()> {
        tracing::info!("Rendering main pages...");

        for file_name in list_file_names(&self.project.templates)? {
            if !file_name.ends_with(".html") {
                continue;
            }

            let stem = file_name.split('.').next().unwrap_or_default().to_string();
            let mut extra = Map::new();
            extra.insert("active_page".to_string(), Value::String(stem));

            if file_name == "index.html" {
                let banners = list_file_names(&self.project.banner_images())?;
                extra.insert("banners".to_string(), string_array(banners));
            }

            self.render_to(tera, &file_name, site_data, extra, PathBuf::from(&file_name))?;
        }

        Ok(())
    }

    fn render_portfolio_pages(&mut self, tera: &Tera, site_data: &Map<String, Value>) -> Result<()> {
        let categories: Vec<PortfolioCategory> = records(site_data, "portfolio")?;
        if categories.is_empty() {
            return Ok(());
        }
        tracing::info!("Rendering portfolio pages...");

        for category in categories {
            if !is_plain_component(&category.folder) {
                self.report
                    .warn(format!("Skipping portfolio category with invalid folder '{}'", category.folder));
                continue;
            }

            let image_dir = self.project.category_images(&category.folder);
            if !image_dir.is_dir() {
                self.report.warn(format!(
                    "Image folder not found for portfolio category '{}'",
                    category.folder
                ));
            }
            let images = list_file_names(&image_dir)?;

            let mut extra = Map::new();
            extra.insert("active_page".to_string(), Value::String("portfolio".to_string()));
            extra.insert("category_name".to_string(), Value::String(category.label.clone()));
            extra.insert("category_folder".to_string(), Value::String(category.folder.clone()));
            extra.insert("images".to_string(), string_array(images));

            let relative = PathBuf::from(format!("portfolio-{}.html", category.folder));
            self.render_to(tera, PORTFOLIO_TEMPLATE, site_data, extra, relative)?;
        }

        Ok(())
    }

    fn render_blog_posts(&mut self, tera: &Tera, site_data: &Map<String, Value>) -> Result<()> {
        let raw_posts = match site_data.get("blog") {
            Some(Value::Array(posts)) => posts.clone(),
            _ => Vec::new(),
        };
        tracing::info!("Rendering blog posts...");
        std::fs::create_dir_all(self.project.output.join("blog"))?;

        for raw in raw_posts {
            let post: BlogPost = serde_json::from_value(raw.clone()).context("Invalid entry in blog.json")?;

            if !is_plain_component(&post.slug) {
                self.report
                    .warn(format!("Skipping blog post with invalid slug '{}'", post.slug));
                continue;
            }

            let Some(document) = Document::open_optional(&self.project.post_markdown(&post.slug))? else {
                self.report
                    .warn(format!("Markdown file not found for slug '{}'", post.slug));
                continue;
            };

            let mut extra = Map::new();
            extra.insert("active_page".to_string(), Value::String("blog".to_string()));
            // The raw entry keeps any custom keys for templates
            extra.insert("post".to_string(), raw);
            extra.insert(
                "content".to_string(),
                Value::String(render_markdown(document.content_without_frontmatter())),
            );
            extra.insert("reading_minutes".to_string(), Value::from(reading_minutes(&document)));

            let relative = Path::new("blog").join(format!("{}.html", post.slug));
            self.render_to(tera, POST_TEMPLATE, site_data, extra, relative)?;
        }

        Ok(())
    }
}

/// Whole minutes needed to read a post body, never zero
fn reading_minutes(document: &Document) -> usize {
    document.word_count().div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Escape like Jinja does; Tera's default also rewrites `/`, which breaks
/// `base_url` prefixes in readable output.
fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn string_array(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

/// Deserialize the array stored under `key`, or an empty list
fn records<T: serde::de::DeserializeOwned>(site_data: &Map<String, Value>, key: &str) -> Result<Vec<T>> {
    match site_data.get(key) {
        Some(value) => serde_json::from_value(value.clone())
            .with_context(|| format!("Invalid entry in {key}.json")),
        None => Ok(Vec::new()),
    }
}
