//! Render surfaces: the UI regions the pipeline writes into.
//!
//! Every write replaces the region's whole content; nothing is appended or patched.

pub mod console;
pub mod html;
pub mod memory;

use crate::recipe::{InstructionText, RecipeDetail, RecipeSummary, Suggestion};
use std::sync::Arc;
use std::time::Duration;

pub use console::ConsoleSurface;
pub use memory::MemorySurface;

/// A UI region the pipeline renders into
pub trait RenderSurface: Send + Sync {
    fn set_content(&self, content: Content);
    fn show(&self);
    fn hide(&self);
}

/// Message block with an optional secondary hint line
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub headline: String,
    pub hint: Option<String>,
}

impl Notice {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Result card with its staggered reveal delay
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeCard {
    pub summary: RecipeSummary,
    pub reveal_delay: Duration,
}

impl RecipeCard {
    /// Delay formatted for a CSS `animation-delay`, e.g. "0.3s"
    pub fn reveal_delay_css(&self) -> String {
        format!("{:.1}s", self.reveal_delay.as_secs_f64())
    }
}

/// Declarative content of a surface
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Content {
    #[default]
    Empty,
    /// Value of a text field
    Text(String),
    Loading(String),
    Notice(Notice),
    Suggestions(Vec<Suggestion>),
    Cards(Vec<RecipeCard>),
    Recipe(RecipeDetail),
    Instructions(InstructionText),
    InstructionsUnavailable {
        notice: String,
        standard: Option<InstructionText>,
    },
}

/// The five regions of the page
#[derive(Clone)]
pub struct Surfaces {
    pub input: Arc<dyn RenderSurface>,
    pub suggestions: Arc<dyn RenderSurface>,
    pub results: Arc<dyn RenderSurface>,
    pub modal: Arc<dyn RenderSurface>,
    /// Placeholder region inside the modal that receives generated instructions
    pub instructions: Arc<dyn RenderSurface>,
}

/// In-memory surfaces, keeping typed handles for inspection
#[derive(Clone, Default)]
pub struct MemorySurfaces {
    pub input: MemorySurface,
    pub suggestions: MemorySurface,
    pub results: MemorySurface,
    pub modal: MemorySurface,
    pub instructions: MemorySurface,
}

impl MemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surfaces(&self) -> Surfaces {
        Surfaces {
            input: Arc::new(self.input.clone()),
            suggestions: Arc::new(self.suggestions.clone()),
            results: Arc::new(self.results.clone()),
            modal: Arc::new(self.modal.clone()),
            instructions: Arc::new(self.instructions.clone()),
        }
    }
}

impl Surfaces {
    /// Labelled terminal surfaces
    pub fn console() -> Self {
        Self {
            input: Arc::new(ConsoleSurface::new("query")),
            suggestions: Arc::new(ConsoleSurface::new("suggestions")),
            results: Arc::new(ConsoleSurface::new("results")),
            modal: Arc::new(ConsoleSurface::new("recipe")),
            instructions: Arc::new(ConsoleSurface::new("instructions")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_delay_css() {
        let card = |ms| RecipeCard {
            summary: RecipeSummary {
                id: crate::recipe::RecipeId::new("1"),
                name: "x".to_string(),
                thumbnail: String::new(),
            },
            reveal_delay: Duration::from_millis(ms),
        };

        assert_eq!(card(0).reveal_delay_css(), "0.0s");
        assert_eq!(card(300).reveal_delay_css(), "0.3s");
        assert_eq!(card(1100).reveal_delay_css(), "1.1s");
    }
}
