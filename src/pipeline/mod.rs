//! The suggestion / search / detail pipeline behind the search page.
//!
//! Each fetcher owns one surface and replaces its content wholesale per
//! request cycle. Out-of-order completions are dropped using
//! [`RequestSequence`] (suggestions, results) and [`ModalGuard`] (detail,
//! instructions).

pub mod debounce;
pub mod detail;
pub mod instructions;
pub mod results;
pub mod sequence;
pub mod suggestions;

use crate::config::PipelineConfig;
use crate::generator::InstructionSource;
use crate::mealdb::RecipeSource;
use crate::recipe::RecipeId;
use crate::surface::{Content, RenderSurface, Surfaces};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

pub use debounce::Debouncer;
pub use detail::DetailFetcher;
pub use instructions::InstructionGenerator;
pub use results::ResultsFetcher;
pub use sequence::{ModalGuard, RequestSequence};
pub use suggestions::SuggestionFetcher;

/// Where a pointer click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Input,
    Suggestions,
    ModalBackdrop,
    ModalContent,
    CloseButton,
    Elsewhere,
}

#[derive(Clone)]
pub struct SearchPipeline {
    input: Arc<dyn RenderSurface>,
    query: Arc<Mutex<String>>,
    suggestions: SuggestionFetcher,
    results: ResultsFetcher,
    detail: DetailFetcher,
}

impl SearchPipeline {
    pub fn new(
        recipes: Arc<dyn RecipeSource>,
        generator: Arc<dyn InstructionSource>,
        surfaces: Surfaces,
        config: &PipelineConfig,
    ) -> Self {
        let guard = Arc::new(ModalGuard::new());
        let instructions = InstructionGenerator::new(
            generator,
            surfaces.instructions.clone(),
            guard.clone(),
        );

        Self {
            input: surfaces.input,
            query: Arc::new(Mutex::new(String::new())),
            suggestions: SuggestionFetcher::new(
                recipes.clone(),
                surfaces.suggestions,
                config.debounce(),
                config.max_suggestions,
            ),
            results: ResultsFetcher::new(recipes.clone(), surfaces.results, config.reveal_step()),
            detail: DetailFetcher::new(
                recipes,
                surfaces.modal,
                surfaces.instructions,
                guard,
                instructions,
            ),
        }
    }

    pub fn query(&self) -> String {
        self.query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set the field value programmatically (no suggestion lookup)
    pub fn set_query(&self, value: &str) {
        *self.query.lock().unwrap_or_else(PoisonError::into_inner) = value.to_string();
        self.input.set_content(Content::Text(value.to_string()));
    }

    /// A keystroke changed the field to `raw`
    pub fn input(&self, raw: &str) {
        *self.query.lock().unwrap_or_else(PoisonError::into_inner) = raw.to_string();
        self.suggestions.on_input(raw);
    }

    /// Enter pressed in the query field
    pub async fn submit(&self) {
        self.suggestions.cancel();
        let query = self.query();
        self.results.search(&query).await;
    }

    /// Pick a suggestion: copy its name into the field and search.
    /// Returns false when nothing is shown at `index`.
    pub async fn select_suggestion(&self, index: usize) -> bool {
        let Some(suggestion) = self.suggestions.get(index) else {
            return false;
        };

        self.set_query(&suggestion.name);
        self.submit().await;
        true
    }

    /// Open the recipe behind the result card at `index`
    pub async fn select_card(&self, index: usize) -> Option<JoinHandle<()>> {
        let card = self.results.card(index)?;
        self.open_recipe(&card.id).await
    }

    pub async fn open_recipe(&self, id: &RecipeId) -> Option<JoinHandle<()>> {
        self.detail.open(id).await
    }

    pub fn click(&self, target: ClickTarget) {
        if !matches!(target, ClickTarget::Input | ClickTarget::Suggestions) {
            self.suggestions.dismiss();
        }

        if matches!(target, ClickTarget::ModalBackdrop | ClickTarget::CloseButton) {
            self.detail.close();
        }
    }

    pub fn suggestions(&self) -> &SuggestionFetcher {
        &self.suggestions
    }

    pub fn results(&self) -> &ResultsFetcher {
        &self.results
    }
}
