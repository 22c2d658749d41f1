//! Portfolio categories and their image folders

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use serde_json::json;

use super::error::{AdminError, AdminResult};
use super::upload::UploadForm;
use super::{blocking, item_mut, mutate, take_item, AdminState};
use crate::core::content::PortfolioCategory;
use crate::core::file_system::{self, is_plain_component, list_file_names};
use crate::core::slug::{slugify, unique_slug};

const KIND: &str = "portfolio category";
const LIST: &str = "/portfolio";

#[derive(Debug, Deserialize)]
pub struct LabelForm {
    label: String,
}

impl LabelForm {
    fn label(&self) -> AdminResult<String> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err(AdminError::BadRequest("Label is required".to_string()));
        }
        Ok(label.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct FileForm {
    filename: String,
}

pub async fn manage(State(state): State<Arc<AdminState>>) -> AdminResult<Html<String>> {
    let categories: Vec<PortfolioCategory> =
        blocking(&state, |state| Ok(state.store().load_list()?)).await?;
    state.views.render(
        "manage_portfolio.html",
        "portfolio",
        &json!({ "categories": categories }),
    )
}

pub async fn add(
    State(state): State<Arc<AdminState>>,
    Form(form): Form<LabelForm>,
) -> AdminResult<Redirect> {
    let label = form.label()?;

    mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<PortfolioCategory> = store.load_list()?;

        let folder = unique_slug(&slugify(&label), data.iter().map(|c| c.folder.as_str()));
        std::fs::create_dir_all(state.project.category_images(&folder))?;

        tracing::info!("Created portfolio category '{}'", folder);
        data.push(PortfolioCategory {
            folder,
            label,
            ..Default::default()
        });
        Ok(store.save_list(&data)?)
    })
    .await?;

    Ok(Redirect::to(LIST))
}

/// `POST /portfolio/edit/:id`: relabel a category, moving its image folder
/// when the derived folder name changes
pub async fn rename(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
    Form(form): Form<LabelForm>,
) -> AdminResult<Redirect> {
    let label = form.label()?;
    mutate(&state, move |state| relabel(state, id, label)).await?;
    Ok(Redirect::to(LIST))
}

fn relabel(state: &AdminState, id: usize, label: String) -> AdminResult<()> {
    let store = state.store();
    let mut data: Vec<PortfolioCategory> = store.load_list()?;
    if id >= data.len() {
        return Err(AdminError::missing_item(KIND, id));
    }

    let new_folder = unique_slug(
        &slugify(&label),
        data.iter()
            .enumerate()
            .filter(|(i, _)| *i != id)
            .map(|(_, c)| c.folder.as_str()),
    );

    let category = item_mut(&mut data, id, KIND)?;
    if new_folder != category.folder {
        let old_dir = state.project.category_images(&category.folder);
        let new_dir = state.project.category_images(&new_folder);
        if new_dir.exists() {
            return Err(AdminError::Conflict(format!(
                "Folder '{new_folder}' already exists"
            )));
        }

        if is_plain_component(&category.folder) && old_dir.is_dir() {
            file_system::rename(&old_dir, &new_dir)?;
        } else {
            std::fs::create_dir_all(&new_dir)?;
        }
        tracing::info!("Renamed portfolio folder '{}' to '{}'", category.folder, new_folder);
        category.folder = new_folder;
    }
    category.label = label;
    Ok(store.save_list(&data)?)
}

pub async fn delete(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
) -> AdminResult<Redirect> {
    let removed = mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<PortfolioCategory> = store.load_list()?;
        let removed = take_item(&mut data, id, KIND)?;
        let dir = state.project.category_images(&removed.folder);
        if is_plain_component(&removed.folder) && dir.exists() {
            file_system::delete(&dir)?;
        }
        store.save_list(&data)?;
        Ok(removed)
    })
    .await?;

    tracing::info!("Deleted portfolio category '{}'", removed.folder);
    Ok(Redirect::to(LIST))
}

/// Load category `id` and make sure its folder is safe to touch
fn category(state: &AdminState, id: usize) -> AdminResult<PortfolioCategory> {
    let data: Vec<PortfolioCategory> = state.store().load_list()?;
    let category = data
        .into_iter()
        .nth(id)
        .ok_or_else(|| AdminError::missing_item(KIND, id))?;
    if !is_plain_component(&category.folder) {
        return Err(AdminError::BadRequest(format!(
            "Invalid folder '{}'",
            category.folder
        )));
    }
    Ok(category)
}

pub async fn images(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
) -> AdminResult<Html<String>> {
    let (category, images) = blocking(&state, move |state| {
        let category = category(state, id)?;
        let images = list_file_names(&state.project.category_images(&category.folder))?;
        Ok((category, images))
    })
    .await?;
    state.views.render(
        "portfolio_images.html",
        "portfolio",
        &json!({ "id": id, "category": category, "images": images }),
    )
}

pub async fn upload_images(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
    multipart: Multipart,
) -> AdminResult<Redirect> {
    let form = UploadForm::read(multipart).await?;
    blocking(&state, move |state| {
        let category = category(state, id)?;
        let dir = state.project.category_images(&category.folder);
        for file in &form.files {
            file.save_into(&dir)?;
        }
        tracing::info!("Uploaded {} images to '{}'", form.files.len(), category.folder);
        Ok(())
    })
    .await?;

    Ok(Redirect::to(&format!("/portfolio/{id}/images")))
}

pub async fn delete_image(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
    Form(form): Form<FileForm>,
) -> AdminResult<Redirect> {
    if !is_plain_component(&form.filename) {
        return Err(AdminError::BadRequest(format!("Invalid file name '{}'", form.filename)));
    }

    blocking(&state, move |state| {
        let category = category(state, id)?;
        let path = state.project.category_images(&category.folder).join(&form.filename);
        if !path.is_file() {
            return Err(AdminError::NotFound(format!("Image '{}'", form.filename)));
        }
        std::fs::remove_file(&path)?;
        tracing::info!("Deleted image {}/{}", category.folder, form.filename);
        Ok(())
    })
    .await?;

    Ok(Redirect::to(&format!("/portfolio/{id}/images")))
}
