//! Admin page templates, compiled into the binary

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

use super::error::AdminResult;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("templates/layout.html")),
    ("edit_footer.html", include_str!("templates/edit_footer.html")),
    ("manage_testimonials.html", include_str!("templates/manage_testimonials.html")),
    ("edit_testimonial.html", include_str!("templates/edit_testimonial.html")),
    ("manage_team.html", include_str!("templates/manage_team.html")),
    ("edit_team_member.html", include_str!("templates/edit_team_member.html")),
    ("manage_blog.html", include_str!("templates/manage_blog.html")),
    ("edit_blog_post.html", include_str!("templates/edit_blog_post.html")),
    ("manage_portfolio.html", include_str!("templates/manage_portfolio.html")),
    ("portfolio_images.html", include_str!("templates/portfolio_images.html")),
    ("manage_banners.html", include_str!("templates/manage_banners.html")),
    ("deploy.html", include_str!("templates/deploy.html")),
];

/// Renders admin pages
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        Ok(Self { tera })
    }

    /// Render `template` with `data` and the navigation key `active_page`
    pub fn render<T: Serialize>(
        &self,
        template: &str,
        active_page: &str,
        data: &T,
    ) -> AdminResult<Html<String>> {
        let mut context = Context::from_serialize(data)?;
        context.insert("active_page", active_page);
        Ok(Html(self.tera.render(template, &context)?))
    }
}
