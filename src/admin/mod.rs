//! Local content-management server
//!
//! A small form-based editor over the JSON data files and uploaded images.
//! Every change is a POST that rewrites the data file and redirects back to
//! the listing page.

mod banners;
mod blog;
mod deploy;
pub mod error;
mod footer;
mod portfolio;
mod team;
mod testimonials;
mod upload;
mod views;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use self::error::{AdminError, AdminResult};
use self::views::Views;
use crate::core::config::SiteConfig;
use crate::core::content::ContentStore;
use crate::core::project::Project;

/// State shared by all admin handlers
pub struct AdminState {
    pub project: Project,
    pub config: SiteConfig,
    views: Views,
    /// Held across each read-modify-write of a data file
    edit_lock: Mutex<()>,
    /// Held while a deployment runs
    deploy_lock: Mutex<()>,
}

impl AdminState {
    pub fn new(project: Project, config: SiteConfig) -> Result<Self> {
        Ok(Self {
            project,
            config,
            views: Views::new()?,
            edit_lock: Mutex::new(()),
            deploy_lock: Mutex::new(()),
        })
    }

    fn store(&self) -> ContentStore {
        self.project.store()
    }
}

/// Run blocking file work on the blocking thread pool
async fn blocking<T, F>(state: &Arc<AdminState>, work: F) -> AdminResult<T>
where
    T: Send + 'static,
    F: FnOnce(&AdminState) -> AdminResult<T> + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || work(&state))
        .await
        .map_err(|e| AdminError::Internal(e.into()))?
}

/// Run a read-modify-write of site files while holding the edit lock
async fn mutate<T, F>(state: &Arc<AdminState>, work: F) -> AdminResult<T>
where
    T: Send + 'static,
    F: FnOnce(&AdminState) -> AdminResult<T> + Send + 'static,
{
    let _guard = state.edit_lock.lock().await;
    blocking(state, work).await
}

/// Look up a list item by its position
fn item_mut<'a, T>(items: &'a mut [T], id: usize, kind: &str) -> AdminResult<&'a mut T> {
    items
        .get_mut(id)
        .ok_or_else(|| AdminError::missing_item(kind, id))
}

/// Remove a list item by its position
fn take_item<T>(items: &mut Vec<T>, id: usize, kind: &str) -> AdminResult<T> {
    if id < items.len() {
        Ok(items.remove(id))
    } else {
        Err(AdminError::missing_item(kind, id))
    }
}

/// Build the admin router
pub fn router(state: Arc<AdminState>) -> Router {
    let body_limit = state.config.admin.max_upload_mb * 1024 * 1024;

    Router::new()
        .route("/images/*path", get(upload::serve_image))
        .route("/", get(footer::edit_footer).post(footer::save_footer))
        .route("/testimonials", get(testimonials::manage))
        .route("/testimonials/add", post(testimonials::add))
        .route(
            "/testimonials/edit/:id",
            get(testimonials::edit_form).post(testimonials::edit),
        )
        .route("/testimonials/delete/:id", post(testimonials::delete))
        .route("/team", get(team::manage))
        .route("/team/add", post(team::add))
        .route("/team/edit/:id", get(team::edit_form).post(team::edit))
        .route("/team/delete/:id", post(team::delete))
        .route("/blog", get(blog::manage))
        .route("/blog/add", post(blog::add))
        .route("/blog/edit/:id", get(blog::edit_form).post(blog::edit))
        .route("/blog/delete/:id", post(blog::delete))
        .route("/portfolio", get(portfolio::manage))
        .route("/portfolio/add", post(portfolio::add))
        .route("/portfolio/edit/:id", post(portfolio::rename))
        .route("/portfolio/delete/:id", post(portfolio::delete))
        .route("/portfolio/:id/images", get(portfolio::images))
        .route("/portfolio/:id/images/upload", post(portfolio::upload_images))
        .route("/portfolio/:id/images/delete", post(portfolio::delete_image))
        .route("/banners", get(banners::manage))
        .route("/banners/upload", post(banners::upload))
        .route("/banners/delete", post(banners::delete))
        .route("/deploy", get(deploy::page).post(deploy::run))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Run the admin server until Ctrl-C
pub async fn serve(project: Project, config: SiteConfig) -> Result<()> {
    let addr = config.admin_addr();
    let open_browser = config.admin.open_browser;
    let state = Arc::new(AdminState::new(project, config)?);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let url = format!("http://{addr}");
    tracing::info!("Content management server running at {}", url);
    if open_browser {
        if let Err(e) = open::that(&url) {
            tracing::warn!("Could not open browser: {}", e);
        }
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down content management server");
            }
        })
        .await
        .context("Admin server failed")?;

    Ok(())
}
