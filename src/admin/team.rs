//! Team member editor with portrait uploads

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::{Html, Redirect};
use serde_json::json;

use super::error::{AdminError, AdminResult};
use super::upload::{remove_upload, UploadForm};
use super::{blocking, item_mut, mutate, take_item, AdminState};
use crate::core::content::TeamMember;

const KIND: &str = "team member";
const LIST: &str = "/team";

pub async fn manage(State(state): State<Arc<AdminState>>) -> AdminResult<Html<String>> {
    let team: Vec<TeamMember> = blocking(&state, |state| Ok(state.store().load_list()?)).await?;
    state
        .views
        .render("manage_team.html", "team", &json!({ "team": team }))
}

pub async fn add(
    State(state): State<Arc<AdminState>>,
    multipart: Multipart,
) -> AdminResult<Redirect> {
    let form = UploadForm::read(multipart).await?;
    let name = form.required("name")?;
    let title = form.required("title")?;

    mutate(&state, move |state| {
        let store = state.store();
        let image = match form.file("image") {
            Some(file) => file.save_into(&state.project.team_images())?,
            None => String::new(),
        };

        let mut data: Vec<TeamMember> = store.load_list()?;
        data.push(TeamMember {
            name,
            title,
            bio: form.optional("bio"),
            image,
            is_ceo: form.checked("is_ceo"),
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
    let data: Vec<TeamMember> = blocking(&state, |state| Ok(state.store().load_list()?)).await?;
    let member = data.get(id).ok_or_else(|| AdminError::missing_item(KIND, id))?;
    state.views.render(
        "edit_team_member.html",
        "team",
        &json!({ "id": id, "member": member }),
    )
}

pub async fn edit(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
    multipart: Multipart,
) -> AdminResult<Redirect> {
    let form = UploadForm::read(multipart).await?;
    let name = form.required("name")?;
    let title = form.required("title")?;

    mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<TeamMember> = store.load_list()?;
        let member = item_mut(&mut data, id, KIND)?;

        if let Some(file) = form.file("image") {
            member.image = file.save_into(&state.project.team_images())?;
        }
        member.name = name;
        member.title = title;
        member.bio = form.optional("bio");
        member.is_ceo = form.checked("is_ceo");
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
        let mut data: Vec<TeamMember> = store.load_list()?;
        let removed = take_item(&mut data, id, KIND)?;
        remove_upload(&state.project.team_images(), &removed.image);
        store.save_list(&data)?;
        Ok(removed)
    })
    .await?;

    tracing::info!("Deleted team member {}", removed.name);
    Ok(Redirect::to(LIST))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::admin::test_support::{app, get, post_form, post_multipart};
    use crate::core::content::TeamMember;

    #[tokio::test]
    async fn add_member_with_portrait() {
        let (_dir, project, app) = app();

        let (status, _) = post_multipart(
            &app,
            "/team/add",
            &[
                ("name", None, "Ada Lovelace"),
                ("title", None, "Founder"),
                ("bio", None, "Counts things."),
                ("is_ceo", None, "on"),
                ("image", Some("my portrait.png"), "png-bytes"),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let team: Vec<TeamMember> = project.store().load_list().unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].image, "my_portrait.png");
        assert!(team[0].is_ceo);
        assert_eq!(
            std::fs::read(project.team_images().join("my_portrait.png")).unwrap(),
            b"png-bytes"
        );

        let (_, page) = get(&app, "/team").await;
        assert!(page.contains("Ada Lovelace"));
        assert!(page.contains("(CEO)"));
    }

    #[tokio::test]
    async fn edit_without_new_image_keeps_portrait() {
        let (_dir, project, app) = app();
        post_multipart(
            &app,
            "/team/add",
            &[
                ("name", None, "Ada"),
                ("title", None, "Founder"),
                ("is_ceo", None, "on"),
                ("image", Some("ada.png"), "x"),
            ],
        )
        .await;

        // Browsers send an empty file part when nothing is chosen
        let (status, _) = post_multipart(
            &app,
            "/team/edit/0",
            &[
                ("name", None, "Ada L."),
                ("title", None, "Advisor"),
                ("image", Some(""), ""),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let team: Vec<TeamMember> = project.store().load_list().unwrap();
        assert_eq!(team[0].name, "Ada L.");
        assert_eq!(team[0].image, "ada.png");
        assert!(!team[0].is_ceo);
    }

    #[tokio::test]
    async fn delete_removes_portrait() {
        let (_dir, project, app) = app();
        post_multipart(
            &app,
            "/team/add",
            &[
                ("name", None, "Ada"),
                ("title", None, "Founder"),
                ("image", Some("ada.png"), "x"),
            ],
        )
        .await;

        let (status, _) = post_form(&app, "/team/delete/0", "").await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        assert!(!project.team_images().join("ada.png").exists());
        let team: Vec<TeamMember> = project.store().load_list().unwrap();
        assert!(team.is_empty());
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let (_dir, _project, app) = app();
        let (status, _) = post_multipart(&app, "/team/add", &[("title", None, "Founder")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
