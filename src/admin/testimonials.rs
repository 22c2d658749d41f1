//! Testimonial list editor

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use serde_json::json;

use super::error::{AdminError, AdminResult};
use super::{blocking, item_mut, mutate, take_item, AdminState};
use crate::core::content::Testimonial;

const KIND: &str = "testimonial";
const LIST: &str = "/testimonials";

#[derive(Debug, Deserialize)]
pub struct TestimonialForm {
    client_name: String,
    feedback: String,
}

impl TestimonialForm {
    fn validate(self) -> AdminResult<(String, String)> {
        let client_name = self.client_name.trim().to_string();
        let feedback = self.feedback.trim().to_string();
        if client_name.is_empty() || feedback.is_empty() {
            return Err(AdminError::BadRequest(
                "Client name and feedback are required".to_string(),
            ));
        }
        Ok((client_name, feedback))
    }
}

pub async fn manage(State(state): State<Arc<AdminState>>) -> AdminResult<Html<String>> {
    let testimonials: Vec<Testimonial> =
        blocking(&state, |state| Ok(state.store().load_list()?)).await?;
    state.views.render(
        "manage_testimonials.html",
        "testimonials",
        &json!({ "testimonials": testimonials }),
    )
}

pub async fn add(
    State(state): State<Arc<AdminState>>,
    Form(form): Form<TestimonialForm>,
) -> AdminResult<Redirect> {
    let (client_name, feedback) = form.validate()?;
    mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<Testimonial> = store.load_list()?;
        data.push(Testimonial {
            client_name,
            feedback,
            ..Default::default()
        });
        Ok(store.save_list(&data)?)
    })
    .await?;

    Ok(Redirect::to(LIST))
}

pub async fn edit_form(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
) -> AdminResult<Html<String>> {
    let data: Vec<Testimonial> = blocking(&state, |state| Ok(state.store().load_list()?)).await?;
    let testimonial = data.get(id).ok_or_else(|| AdminError::missing_item(KIND, id))?;
    state.views.render(
        "edit_testimonial.html",
        "testimonials",
        &json!({ "id": id, "testimonial": testimonial }),
    )
}

pub async fn edit(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
    Form(form): Form<TestimonialForm>,
) -> AdminResult<Redirect> {
    let (client_name, feedback) = form.validate()?;
    mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<Testimonial> = store.load_list()?;
        let testimonial = item_mut(&mut data, id, KIND)?;
        testimonial.client_name = client_name;
        testimonial.feedback = feedback;
        Ok(store.save_list(&data)?)
    })
    .await?;

    Ok(Redirect::to(LIST))
}

pub async fn delete(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
) -> AdminResult<Redirect> {
    let removed = mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<Testimonial> = store.load_list()?;
        let removed = take_item(&mut data, id, KIND)?;
        store.save_list(&data)?;
        Ok(removed)
    })
    .await?;

    tracing::info!("Deleted testimonial from {}", removed.client_name);
    Ok(Redirect::to(LIST))
}
