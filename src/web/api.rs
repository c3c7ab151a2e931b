use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::config::Settings;
use crate::generator::{models::ProxyResponse, InstructionSource};
use crate::mealdb::RecipeSource;
use crate::pipeline::SearchPipeline;
use crate::recipe::{
    InstructionRequest, RecipeDetail, RecipeId, RecipeSummary, SearchQuery, Suggestion,
    SuggestionQuery,
};
use crate::surface::MemorySurfaces;
use crate::{Error, Result};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub recipes: Arc<dyn RecipeSource>,
    pub generator: Arc<dyn InstructionSource>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        recipes: Arc<dyn RecipeSource>,
        generator: Arc<dyn InstructionSource>,
    ) -> Self {
        Self {
            settings,
            recipes,
            generator,
        }
    }

    /// A fresh pipeline rendering into memory, one per request
    pub fn pipeline(&self) -> (SearchPipeline, MemorySurfaces) {
        let surfaces = MemorySurfaces::new();
        let pipeline = SearchPipeline::new(
            self.recipes.clone(),
            self.generator.clone(),
            surfaces.surfaces(),
            &self.settings.pipeline,
        );
        (pipeline, surfaces)
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub i: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /api/suggestions - Name matches for the query field
pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<Suggestion>>> {
    let Some(query) = SuggestionQuery::parse(&params.q) else {
        return Ok(Json(Vec::new()));
    };

    debug!("Suggestion request: {}", query.as_str());

    let (pipeline, _) = state.pipeline();
    let suggestions = pipeline.suggestions().lookup(&query).await?;

    Ok(Json(suggestions))
}

/// GET /api/search - Recipes containing an ingredient
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<RecipeSummary>>> {
    let query = SearchQuery::parse(&params.i)
        .ok_or_else(|| Error::Validation("Please enter an ingredient to search.".to_string()))?;

    debug!("Search request: {}", query);

    Ok(Json(state.recipes.filter_by_ingredient(&query).await?))
}

/// GET /api/recipes/:id - Full recipe record
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeDetail>> {
    debug!("Get recipe request: {}", id);

    let id = RecipeId::new(id);
    let recipe = state
        .recipes
        .lookup(&id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe {id} not found")))?;

    Ok(Json(recipe))
}

/// POST /api/instructions - Generate instructions with the server's credential
pub async fn generate_instructions(
    State(state): State<AppState>,
    Json(request): Json<InstructionRequest>,
) -> Result<Json<ProxyResponse>> {
    if request.recipe_name.trim().is_empty() {
        return Err(Error::Validation("Recipe name is required".to_string()));
    }

    debug!("Instruction request for '{}'", request.recipe_name);

    let text = state.generator.generate(&request).await?;

    Ok(Json(ProxyResponse {
        text: text.to_string(),
    }))
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
