//! # Request Handlers
//!
//! One handler per route. Each follows the same arc: build a typed storage
//! request, dispatch it over the bridge, suspend until the reply arrives,
//! then either render a template, issue a redirect, or surface the failure
//! as an HTTP error. A request never re-dispatches after reaching a
//! terminal state.
//!
//! Failure policy: storage and render failures become a generic 500 with
//! the cause logged server-side only; malformed client input (a garbage id,
//! an empty title) is a 400. A page that does not exist is not a failure at
//! all; it renders the editor with the empty-page placeholder.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{error, instrument};

use wiki_bridge::{NewPage, Storage, StorageError, UpdatePage};

use crate::render::{
    markdown_to_html, render_timestamp, IndexContext, PageContext, PageRenderer, RenderError,
    EMPTY_PAGE_MARKDOWN,
};

/// Shared per-process state handed to every handler. Read-only after
/// startup; each request only clones the two `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, renderer: PageRenderer) -> Self {
        Self {
            storage,
            renderer: Arc::new(renderer),
        }
    }
}

/// Errors a handler can surface to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("storage dispatch failed: {0}")]
    Storage(#[from] StorageError),
    #[error("page rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            failure => {
                // The client gets a generic body; the cause stays in the log.
                error!(error = %failure, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

/// Fields posted by the editor and new-page forms.
#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub title: String,
    pub markdown: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "newPage")]
    pub new_page: Option<String>,
}

/// GET `/`: the page index.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let reply = state.storage.all_pages().await?;
    let context = IndexContext {
        title: "Wiki home".to_string(),
        pages: reply.pages,
    };
    let body = state.renderer.render("index", &context)?;
    Ok(Html(body))
}

/// GET `/wiki/{page}`: render one page, or the editor for a page that does
/// not exist yet.
#[instrument(skip_all)]
pub async fn view_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<Html<String>, AppError> {
    let reply = state.storage.get_page(&page).await?;

    let raw_content = reply
        .raw_content
        .unwrap_or_else(|| EMPTY_PAGE_MARKDOWN.to_string());
    let context = PageContext {
        title: page,
        id: reply.id.unwrap_or(-1),
        new_page: if reply.found { "no" } else { "yes" }.to_string(),
        content: markdown_to_html(&raw_content),
        raw_content,
        timestamp: render_timestamp(),
    };

    let body = state.renderer.render("page", &context)?;
    Ok(Html(body))
}

/// POST `/wiki`: create a page from the index form.
#[instrument(skip_all)]
pub async fn create_page(
    State(state): State<AppState>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, AppError> {
    if form.title.trim().is_empty() {
        return Err(AppError::BadRequest("page title must not be empty".to_string()));
    }

    let title = form.title;
    state
        .storage
        .create_page(NewPage {
            title: title.clone(),
            markdown: form.markdown,
        })
        .await?;

    Ok(Redirect::to(&format!("/wiki/{title}")))
}

/// POST `/wiki/{page}`: save a page from the editor form. The `newPage`
/// flag decides between creating and saving; either way the browser lands
/// back on the page it edited.
#[instrument(skip_all)]
pub async fn update_page(
    State(state): State<AppState>,
    Path(_page): Path<String>,
    Form(form): Form<PageForm>,
) -> Result<Redirect, AppError> {
    let title = form.title;

    if form.new_page.as_deref() == Some("yes") {
        state
            .storage
            .create_page(NewPage {
                title: title.clone(),
                markdown: form.markdown,
            })
            .await?;
    } else {
        let id = parse_form_id(form.id.as_deref())?;
        state
            .storage
            .save_page(UpdatePage {
                id,
                title: title.clone(),
                markdown: form.markdown,
            })
            .await?;
    }

    Ok(Redirect::to(&format!("/wiki/{title}")))
}

/// POST `/delete/{id}`: delete a page and go back to the index.
#[instrument(skip_all)]
pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.storage.delete_page(id).await?;
    Ok(Redirect::to("/"))
}

fn parse_form_id(raw: Option<&str>) -> Result<i64, AppError> {
    raw.and_then(|value| value.parse().ok())
        .ok_or_else(|| AppError::BadRequest("page id must be an integer".to_string()))
}
