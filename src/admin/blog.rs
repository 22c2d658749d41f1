//! Blog post editor: metadata in `blog.json`, bodies as Markdown files

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::{Html, Redirect};
use serde_json::json;

use super::error::{AdminError, AdminResult};
use super::upload::{remove_upload, UploadForm};
use super::{blocking, item_mut, mutate, take_item, AdminState};
use crate::core::content::BlogPost;
use crate::core::document::Document;
use crate::core::file_system::is_plain_component;
use crate::core::slug::{slugify, unique_slug};

const KIND: &str = "blog post";
const LIST: &str = "/blog";

/// The Markdown file of a post; refuses slugs that leave the posts folder
fn markdown_path(state: &AdminState, slug: &str) -> AdminResult<PathBuf> {
    if !is_plain_component(slug) {
        return Err(AdminError::BadRequest(format!("Invalid slug '{slug}'")));
    }
    Ok(state.project.post_markdown(slug))
}

/// Remove a post body; failures are logged, not returned
fn remove_markdown(path: &FsPath) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::info!("Deleted post body: {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Error deleting post body '{}': {}", path.display(), e),
    }
}

pub async fn manage(State(state): State<Arc<AdminState>>) -> AdminResult<Html<String>> {
    let posts: Vec<BlogPost> = blocking(&state, |state| Ok(state.store().load_list()?)).await?;
    state
        .views
        .render("manage_blog.html", "blog", &json!({ "posts": posts }))
}

/// `POST /blog/add`: the slug comes from the title and never changes after
pub async fn add(
    State(state): State<Arc<AdminState>>,
    multipart: Multipart,
) -> AdminResult<Redirect> {
    let form = UploadForm::read(multipart).await?;
    let title = form.required("title")?;

    mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<BlogPost> = store.load_list()?;

        let slug = unique_slug(&slugify(&title), data.iter().map(|p| p.slug.as_str()));
        let markdown = markdown_path(state, &slug)?;
        if markdown.exists() {
            return Err(AdminError::Conflict(format!(
                "A Markdown file for '{slug}' already exists"
            )));
        }

        let image = match form.file("image") {
            Some(file) => file.save_into(&state.project.blog_images())?,
            None => String::new(),
        };
        Document::new(markdown, form.optional("content")).save()?;

        tracing::info!("Created blog post '{}'", slug);
        data.push(BlogPost {
            slug,
            title,
            date: form.optional("date"),
            summary: form.optional("summary"),
            image,
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
    let (post, content) = blocking(&state, move |state| {
        let data: Vec<BlogPost> = state.store().load_list()?;
        let post = data
            .into_iter()
            .nth(id)
            .ok_or_else(|| AdminError::missing_item(KIND, id))?;
        let content = Document::open_optional(&markdown_path(state, &post.slug)?)?
            .map(|doc| doc.content)
            .unwrap_or_default();
        Ok((post, content))
    })
    .await?;

    state.views.render(
        "edit_blog_post.html",
        "blog",
        &json!({ "id": id, "post": post, "content": content }),
    )
}

pub async fn edit(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
    multipart: Multipart,
) -> AdminResult<Redirect> {
    let form = UploadForm::read(multipart).await?;
    let title = form.required("title")?;

    mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<BlogPost> = store.load_list()?;
        let post = item_mut(&mut data, id, KIND)?;
        let markdown = markdown_path(state, &post.slug)?;

        if let Some(file) = form.file("image") {
            post.image = file.save_into(&state.project.blog_images())?;
        }
        post.title = title;
        post.date = form.optional("date");
        post.summary = form.optional("summary");
        Document::new(markdown, form.optional("content")).save()?;
        Ok(store.save_list(&data)?)
    })
    .await?;

    Ok(Redirect::to(LIST))
}

/// `POST /blog/delete/:id`: entries with an unusable slug are dropped
/// without touching any Markdown file
pub async fn delete(
    State(state): State<Arc<AdminState>>,
    Path(id): Path<usize>,
) -> AdminResult<Redirect> {
    let removed = mutate(&state, move |state| {
        let store = state.store();
        let mut data: Vec<BlogPost> = store.load_list()?;
        let removed = take_item(&mut data, id, KIND)?;
        match markdown_path(state, &removed.slug) {
            Ok(markdown) => remove_markdown(&markdown),
            Err(e) => tracing::warn!("Keeping Markdown of '{}': {}", removed.slug, e),
        }
        remove_upload(&state.project.blog_images(), &removed.image);
        store.save_list(&data)?;
        Ok(removed)
    })
    .await?;

    tracing::info!("Deleted blog post '{}'", removed.slug);
    Ok(Redirect::to(LIST))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::admin::test_support::{app, get, post_form, post_multipart};
    use crate::core::content::BlogPost;

    #[tokio::test]
    async fn duplicate_titles_get_numbered_slugs() {
        let (_dir, project, app) = app();

        for body in ["First", "Second"] {
            let (status, _) = post_multipart(
                &app,
                "/blog/add",
                &[("title", None, "Spring Sale!"), ("content", None, body)],
            )
            .await;
            assert_eq!(status, StatusCode::SEE_OTHER);
        }

        let posts: Vec<BlogPost> = project.store().load_list().unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["spring-sale", "spring-sale-1"]);
        assert_eq!(
            std::fs::read_to_string(project.post_markdown("spring-sale-1")).unwrap(),
            "Second"
        );
    }

    #[tokio::test]
    async fn edit_keeps_slug_and_rewrites_body() {
        let (_dir, project, app) = app();
        post_multipart(
            &app,
            "/blog/add",
            &[
                ("title", None, "Hello"),
                ("date", None, "2024-05-01"),
                ("content", None, "Old body"),
                ("image", Some("cover.jpg"), "jpg"),
            ],
        )
        .await;

        let (_, form) = get(&app, "/blog/edit/0").await;
        assert!(form.contains("Old body"));

        post_multipart(
            &app,
            "/blog/edit/0",
            &[
                ("title", None, "Hello again"),
                ("date", None, "2024-05-02"),
                ("content", None, "# New body"),
            ],
        )
        .await;

        let posts: Vec<BlogPost> = project.store().load_list().unwrap();
        assert_eq!(posts[0].slug, "hello");
        assert_eq!(posts[0].title, "Hello again");
        assert_eq!(posts[0].image, "cover.jpg");
        assert_eq!(
            std::fs::read_to_string(project.post_markdown("hello")).unwrap(),
            "# New body"
        );
    }

    #[tokio::test]
    async fn delete_removes_markdown_and_cover() {
        let (_dir, project, app) = app();
        post_multipart(
            &app,
            "/blog/add",
            &[
                ("title", None, "Hello"),
                ("content", None, "Body"),
                ("image", Some("cover.jpg"), "jpg"),
            ],
        )
        .await;

        let (status, _) = post_form(&app, "/blog/delete/0", "").await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        assert!(!project.post_markdown("hello").exists());
        assert!(!project.blog_images().join("cover.jpg").exists());
    }

    fn write_escaping_post(project: &crate::core::project::Project) {
        std::fs::write(
            project.data.join("blog.json"),
            r#"[{"slug": "../../../escaped", "title": "Bad", "date": "", "summary": "", "image": ""}]"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn slug_outside_posts_folder_is_rejected() {
        let (dir, project, app) = app();
        write_escaping_post(&project);

        let (status, _) = get(&app, "/blog/edit/0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_multipart(
            &app,
            "/blog/edit/0",
            &[("title", None, "Bad"), ("content", None, "overwritten")],
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("escaped.md").exists());

        let posts: Vec<BlogPost> = project.store().load_list().unwrap();
        assert_eq!(posts[0].title, "Bad");
    }

    #[tokio::test]
    async fn delete_drops_entry_with_bad_slug() {
        let (dir, project, app) = app();
        write_escaping_post(&project);
        std::fs::write(dir.path().join("escaped.md"), "keep").unwrap();

        let (status, _) = post_form(&app, "/blog/delete/0", "").await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        assert!(dir.path().join("escaped.md").exists());
        let posts: Vec<BlogPost> = project.store().load_list().unwrap();
        assert!(posts.is_empty());
    }
}
