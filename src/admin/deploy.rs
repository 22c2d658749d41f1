//! Publish page

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use serde_json::json;

use super::error::AdminResult;
use super::AdminState;
use crate::publish::{deploy, DeployReport};

#[derive(Debug, Default, Deserialize)]
pub struct DeployForm {
    #[serde(default)]
    commit_message: String,
}

fn render(state: &AdminState, report: &DeployReport) -> AdminResult<Html<String>> {
    state.views.render(
        "deploy.html",
        "deploy",
        &json!({
            "output": report.transcript,
            "success": report.success,
            "default_message": state.config.deploy.commit_message,
        }),
    )
}

pub async fn page(State(state): State<Arc<AdminState>>) -> AdminResult<Html<String>> {
    render(&state, &DeployReport::default())
}

pub async fn run(
    State(state): State<Arc<AdminState>>,
    Form(form): Form<DeployForm>,
) -> AdminResult<Html<String>> {
    let Ok(_guard) = state.deploy_lock.try_lock() else {
        let busy = DeployReport {
            transcript: "A deployment is already running. Wait for it to finish.".to_string(),
            success: false,
        };
        return render(&state, &busy);
    };

    let report = deploy(&state.project, &state.config, &form.commit_message).await;
    render(&state, &report)
}
