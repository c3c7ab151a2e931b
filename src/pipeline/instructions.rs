use super::sequence::ModalGuard;
use crate::generator::InstructionSource;
use crate::recipe::RecipeDetail;
use crate::surface::{Content, RenderSurface};
use crate::Error;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const INSTRUCTIONS_PLACEHOLDER: &str = "Asking the chef for the best steps...";
pub const INSTRUCTIONS_UNAVAILABLE: &str = "Could not reach the chef.";

/// Best-effort enrichment of an open recipe with generated instructions
#[derive(Clone)]
pub struct InstructionGenerator {
    source: Arc<dyn InstructionSource>,
    surface: Arc<dyn RenderSurface>,
    guard: Arc<ModalGuard>,
}

impl InstructionGenerator {
    pub fn new(
        source: Arc<dyn InstructionSource>,
        surface: Arc<dyn RenderSurface>,
        guard: Arc<ModalGuard>,
    ) -> Self {
        Self {
            source,
            surface,
            guard,
        }
    }

    /// Generate in the background; the handle may be ignored
    pub fn spawn(&self, recipe: RecipeDetail, token: u64) -> JoinHandle<()> {
        let generator = self.clone();
        tokio::spawn(async move { generator.generate(&recipe, token).await })
    }

    pub async fn generate(&self, recipe: &RecipeDetail, token: u64) {
        let request = recipe.instruction_request();

        let outcome = match self.source.generate(&request).await {
            Ok(text) if text.is_empty() => Err(Error::UnexpectedResponse(
                "Generated instructions are empty".to_string(),
            )),
            other => other,
        };

        let content = match outcome {
            Ok(text) => Content::Instructions(text),
            Err(e) => {
                warn!("AI generation error for '{}': {}", recipe.name, e.log_safe());
                Content::InstructionsUnavailable {
                    notice: INSTRUCTIONS_UNAVAILABLE.to_string(),
                    standard: recipe.instructions.clone(),
                }
            }
        };

        if !self.guard.is_current(token) {
            debug!("Discarding instructions for '{}': modal moved on", recipe.name);
            return;
        }

        self.surface.set_content(content);
    }
}
