//! Multipart form handling and serving of uploaded images

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::header;
use axum::response::IntoResponse;

use super::error::{AdminError, AdminResult};
use super::AdminState;
use crate::core::file_system::{join_within, secure_filename, write_file};

/// A file part of a multipart form
#[derive(Debug)]
pub struct UploadedFile {
    pub field: String,
    /// Sanitised client file name
    pub file_name: String,
    pub bytes: Bytes,
}

/// A fully read multipart form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl UploadForm {
    /// Read every part of the request.
    ///
    /// File inputs left empty by the browser (no name or no content) are
    /// dropped, as are files whose names sanitise to nothing.
    pub async fn read(mut multipart: Multipart) -> AdminResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(client_name) => {
                    let bytes = field.bytes().await?;
                    if client_name.is_empty() || bytes.is_empty() {
                        continue;
                    }
                    match secure_filename(&client_name) {
                        Some(file_name) => form.files.push(UploadedFile {
                            field: name,
                            file_name,
                            bytes,
                        }),
                        None => tracing::warn!("Ignoring upload with unusable name '{}'", client_name),
                    }
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// A required text field
    pub fn required(&self, name: &str) -> AdminResult<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AdminError::BadRequest(format!("Missing field '{name}'")))
    }

    /// An optional text field, empty when absent
    pub fn optional(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Whether a checkbox was ticked
    pub fn checked(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// The first file sent under `field`
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }
}

impl UploadedFile {
    /// Write the file into `dir`, returning the stored file name
    pub fn save_into(&self, dir: &Path) -> AdminResult<String> {
        let path = dir.join(&self.file_name);
        write_file(&path, &self.bytes)?;
        tracing::info!("Saved upload: {}", path.display());
        Ok(self.file_name.clone())
    }
}

/// Remove a previously uploaded file; failures are logged, not returned
pub fn remove_upload(dir: &Path, file_name: &str) {
    if file_name.is_empty() {
        return;
    }
    let Some(path) = join_within(dir, file_name) else {
        tracing::warn!("Refusing to delete '{}'", file_name);
        return;
    };
    match std::fs::remove_file(&path) {
        Ok(()) => tracing::info!("Deleted image file: {}", file_name),
        Err(e) => tracing::warn!("Error deleting image file '{}': {}", file_name, e),
    }
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// `GET /images/*path`: serve a file from the source image directory
pub async fn serve_image(
    State(state): State<Arc<AdminState>>,
    UrlPath(path): UrlPath<String>,
) -> AdminResult<impl IntoResponse> {
    let file = join_within(&state.project.images(), &path)
        .ok_or_else(|| AdminError::BadRequest(format!("Invalid image path '{path}'")))?;

    let bytes = match tokio::fs::read(&file).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AdminError::NotFound(format!("Image '{path}'")))
        }
        Err(e) => return Err(e.into()),
    };

    Ok(([(header::CONTENT_TYPE, content_type(&file))], bytes))
}
