//! Footer editor

use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use serde_json::json;

use super::error::AdminResult;
use super::{blocking, mutate, AdminState};

#[derive(Debug, Deserialize)]
pub struct FooterForm {
    email: String,
    copyright_text: String,
}

pub async fn edit_footer(State(state): State<Arc<AdminState>>) -> AdminResult<Html<String>> {
    let data = blocking(&state, |state| Ok(state.store().load_footer()?)).await?;
    state
        .views
        .render("edit_footer.html", "footer", &json!({ "data": data }))
}

pub async fn save_footer(
    State(state): State<Arc<AdminState>>,
    Form(form): Form<FooterForm>,
) -> AdminResult<Redirect> {
    mutate(&state, move |state| {
        let store = state.store();
        let mut data = store.load_footer()?;
        data.email = form.email.trim().to_string();
        data.copyright_text = form.copyright_text;
        Ok(store.save_footer(&data)?)
    })
    .await?;

    tracing::info!("Updated footer");
    Ok(Redirect::to("/"))
}
