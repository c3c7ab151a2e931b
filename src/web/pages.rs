use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Deserializer};

use super::api::AppState;
use crate::pipeline::detail::{DETAIL_FAILED, DETAIL_NOT_FOUND};
use crate::recipe::RecipeId;
use crate::surface::{html, Content, Notice};
use crate::{Error, Result};

/// Deserialize optional string, treating empty strings as None
fn deserialize_optional_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(s.to_string())),
    }
}

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    q: Option<String>,
}

/// Search page template
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    query: String,
    results: String,
    debounce_ms: u64,
}

/// Recipe page template
#[derive(Template)]
#[template(path = "recipe.html")]
struct RecipePageTemplate {
    title: String,
    body: String,
}

/// GET / - Search page
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse> {
    let (pipeline, surfaces) = state.pipeline();

    if let Some(query) = params.q.as_deref() {
        pipeline.set_query(query);
        pipeline.submit().await;
    }

    let template = IndexTemplate {
        query: pipeline.query(),
        results: html::render_html(&surfaces.results.content())?,
        debounce_ms: state.settings.pipeline.debounce_ms,
    };

    Ok(Html(template.render()?))
}

/// GET /recipes/:id - Recipe page with generated instructions
pub async fn recipe_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let (pipeline, surfaces) = state.pipeline();

    if let Some(generation) = pipeline.open_recipe(&RecipeId::new(id)).await {
        generation
            .await
            .map_err(|e| Error::Internal(format!("Instruction task failed: {e}")))?;
    }

    let modal = surfaces.modal.content();
    let status = match &modal {
        Content::Notice(notice) if *notice == Notice::new(DETAIL_NOT_FOUND) => {
            StatusCode::NOT_FOUND
        }
        Content::Notice(notice) if *notice == Notice::new(DETAIL_FAILED) => {
            StatusCode::BAD_GATEWAY
        }
        _ => StatusCode::OK,
    };
    let title = match &modal {
        Content::Recipe(recipe) => recipe.name.clone(),
        _ => "Recipe".to_string(),
    };

    let template = RecipePageTemplate {
        title,
        body: html::render_modal(&modal, &surfaces.instructions.content())?,
    };

    Ok((status, Html(template.render()?)))
}
