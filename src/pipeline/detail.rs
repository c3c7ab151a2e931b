use super::instructions::{InstructionGenerator, INSTRUCTIONS_PLACEHOLDER};
use super::sequence::ModalGuard;
use crate::mealdb::RecipeSource;
use crate::recipe::RecipeId;
use crate::surface::{Content, Notice, RenderSurface};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

pub const DETAIL_LOADING: &str = "Loading recipe details...";
pub const DETAIL_NOT_FOUND: &str = "Recipe details not found.";
pub const DETAIL_FAILED: &str = "Failed to load details.";

/// Full-recipe lookup rendering into the modal
#[derive(Clone)]
pub struct DetailFetcher {
    source: Arc<dyn RecipeSource>,
    modal: Arc<dyn RenderSurface>,
    instructions: Arc<dyn RenderSurface>,
    guard: Arc<ModalGuard>,
    generator: InstructionGenerator,
}

impl DetailFetcher {
    pub fn new(
        source: Arc<dyn RecipeSource>,
        modal: Arc<dyn RenderSurface>,
        instructions: Arc<dyn RenderSurface>,
        guard: Arc<ModalGuard>,
        generator: InstructionGenerator,
    ) -> Self {
        Self {
            source,
            modal,
            instructions,
            guard,
            generator,
        }
    }

    /// Open the modal on `id`.
    ///
    /// Returns the instruction generation task when one was started.
    pub async fn open(&self, id: &RecipeId) -> Option<JoinHandle<()>> {
        let token = self.guard.open();

        self.instructions.set_content(Content::Empty);
        self.instructions.hide();
        self.modal
            .set_content(Content::Loading(DETAIL_LOADING.to_string()));
        self.modal.show();

        let outcome = self.source.lookup(id).await;

        if !self.guard.is_current(token) {
            debug!("Dropping detail response for {}: modal moved on", id);
            return None;
        }

        match outcome {
            Ok(Some(recipe)) => {
                debug!(
                    "Loaded recipe {} with {} ingredients",
                    id,
                    recipe.ingredients.len()
                );
                self.modal.set_content(Content::Recipe(recipe.clone()));
                self.instructions
                    .set_content(Content::Loading(INSTRUCTIONS_PLACEHOLDER.to_string()));
                self.instructions.show();

                Some(self.generator.spawn(recipe, token))
            }
            Ok(None) => {
                self.modal
                    .set_content(Content::Notice(Notice::new(DETAIL_NOT_FOUND)));
                None
            }
            Err(e) => {
                error!("Error fetching details for {}: {}", id, e.log_safe());
                self.modal
                    .set_content(Content::Notice(Notice::new(DETAIL_FAILED)));
                None
            }
        }
    }

    /// Hide the modal; late responses for it are discarded
    pub fn close(&self) {
        self.guard.close();
        self.modal.hide();
    }
}
