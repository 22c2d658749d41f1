//! Home page banner images

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use serde_json::json;

use super::error::{AdminError, AdminResult};
use super::upload::UploadForm;
use super::{blocking, AdminState};
use crate::core::file_system::{is_plain_component, list_file_names};

const LIST: &str = "/banners";

#[derive(Debug, Deserialize)]
pub struct BannerForm {
    filename: String,
}

pub async fn manage(State(state): State<Arc<AdminState>>) -> AdminResult<Html<String>> {
    let banners = blocking(&state, |state| Ok(list_file_names(&state.project.banner_images())?)).await?;
    state
        .views
        .render("manage_banners.html", "banners", &json!({ "banners": banners }))
}

pub async fn upload(
    State(state): State<Arc<AdminState>>,
    multipart: Multipart,
) -> AdminResult<Redirect> {
    let form = UploadForm::read(multipart).await?;
    if form.files.is_empty() {
        return Err(AdminError::BadRequest("No image selected".to_string()));
    }

    blocking(&state, move |state| {
        let dir = state.project.banner_images();
        for file in &form.files {
            file.save_into(&dir)?;
        }
        Ok(())
    })
    .await?;

    Ok(Redirect::to(LIST))
}

pub async fn delete(
    State(state): State<Arc<AdminState>>,
    Form(form): Form<BannerForm>,
) -> AdminResult<Redirect> {
    if !is_plain_component(&form.filename) {
        return Err(AdminError::BadRequest(format!("Invalid file name '{}'", form.filename)));
    }

    blocking(&state, move |state| {
        let path = state.project.banner_images().join(&form.filename);
        if !path.is_file() {
            return Err(AdminError::NotFound(format!("Banner '{}'", form.filename)));
        }
        std::fs::remove_file(&path)?;
        tracing::info!("Deleted banner {}", form.filename);
        Ok(())
    })
    .await?;

    Ok(Redirect::to(LIST))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::admin::test_support::{app, get, post_form, post_multipart};

    #[tokio::test]
    async fn upload_creates_banner_folder() {
        let (_dir, project, app) = app();
        assert!(!project.banner_images().exists());

        let (status, _) =
            post_multipart(&app, "/banners/upload", &[("images", Some("summer.jpg"), "x")]).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(project.banner_images().join("summer.jpg").is_file());

        let (_, page) = get(&app, "/banners").await;
        assert!(page.contains("summer.jpg"));

        let (status, _) = post_form(&app, "/banners/delete", "filename=summer.jpg").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(!project.banner_images().join("summer.jpg").exists());
    }

    #[tokio::test]
    async fn upload_without_file_is_rejected() {
        let (_dir, _project, app) = app();
        let (status, _) = post_multipart(&app, "/banners/upload", &[("images", Some(""), "")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_missing_banner() {
        let (_dir, _project, app) = app();
        let (status, _) = post_form(&app, "/banners/delete", "filename=nope.jpg").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
