//! Errors returned by admin handlers

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    /// No item at `index` in a list of `kind`
    pub fn missing_item(kind: &str, index: usize) -> Self {
        Self::NotFound(format!("{kind} #{index}"))
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MultipartError> for AdminError {
    fn from(e: MultipartError) -> Self {
        Self::BadRequest(format!("Invalid upload: {}", e.body_text()))
    }
}

impl From<tera::Error> for AdminError {
    fn from(e: tera::Error) -> Self {
        Self::Internal(anyhow::Error::new(e).context("Failed to render admin page"))
    }
}

impl From<std::io::Error> for AdminError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!("Admin request failed: {:#}", e);
                format!("{e:#}")
            }
            other => {
                tracing::warn!("Admin request rejected: {}", other);
                other.to_string()
            }
        };

        let body = format!(
            "<!DOCTYPE html><html><head><title>{code}</title></head><body>\
             <h1>{code}</h1><p>{message}</p><p><a href=\"/\">Back to the editor</a></p>\
             </body></html>",
            code = status,
            message = tera::escape_html(&message),
        );
        (status, Html(body)).into_response()
    }
}

pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes() {
        assert_eq!(
            AdminError::missing_item("testimonial", 4)
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AdminError::Conflict("taken".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AdminError::Internal(anyhow::anyhow!("disk full"))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message() {
        assert_eq!(
            AdminError::missing_item("team member", 2).to_string(),
            "team member #2 not found"
        );
    }

    #[tokio::test]
    async fn error_page_escapes_message() {
        let response = AdminError::BadRequest("Invalid slug '<script>'".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8_lossy(&bytes);
        assert!(body.contains("Invalid slug &#x27;&lt;script&gt;&#x27;"));
        assert!(!body.contains("<script>"));
    }
}
