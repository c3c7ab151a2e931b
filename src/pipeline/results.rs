use super::sequence::RequestSequence;
use crate::mealdb::RecipeSource;
use crate::recipe::{RecipeSummary, SearchQuery};
use crate::surface::{Content, Notice, RecipeCard, RenderSurface};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, error};

pub const SEARCH_PROMPT: &str = "Please enter an ingredient to search.";
pub const SEARCH_LOADING: &str = "Searching for delicious recipes...";
pub const SEARCH_HINT: &str = r#"Try generic ingredients like "chicken", "beef", or "potato"."#;
pub const SEARCH_FAILED: &str = "Something went wrong. Please try again later.";

/// Not-found notice naming the query
pub fn no_results(query: &SearchQuery) -> Notice {
    Notice::new(format!(r#"No recipes found for "{query}""#)).with_hint(SEARCH_HINT)
}

/// One card per summary, in order, each revealed `step × index` later
pub fn cards(records: &[RecipeSummary], step: Duration) -> Vec<RecipeCard> {
    records
        .iter()
        .enumerate()
        .map(|(index, summary)| RecipeCard {
            summary: summary.clone(),
            reveal_delay: step * index as u32,
        })
        .collect()
}

/// On-demand ingredient search rendering into the results area
#[derive(Clone)]
pub struct ResultsFetcher {
    source: Arc<dyn RecipeSource>,
    surface: Arc<dyn RenderSurface>,
    sequence: Arc<RequestSequence>,
    shown: Arc<Mutex<Vec<RecipeSummary>>>,
    reveal_step: Duration,
}

impl ResultsFetcher {
    pub fn new(
        source: Arc<dyn RecipeSource>,
        surface: Arc<dyn RenderSurface>,
        reveal_step: Duration,
    ) -> Self {
        Self {
            source,
            surface,
            sequence: Arc::new(RequestSequence::new()),
            shown: Arc::new(Mutex::new(Vec::new())),
            reveal_step,
        }
    }

    fn shown(&self) -> MutexGuard<'_, Vec<RecipeSummary>> {
        self.shown.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record behind the card at `index`
    pub fn card(&self, index: usize) -> Option<RecipeSummary> {
        self.shown().get(index).cloned()
    }

    pub async fn search(&self, raw: &str) {
        let Some(query) = SearchQuery::parse(raw) else {
            self.sequence.invalidate();
            self.render(Content::Notice(Notice::new(SEARCH_PROMPT)), Vec::new());
            return;
        };

        let seq = self.sequence.next();
        self.render(Content::Loading(SEARCH_LOADING.to_string()), Vec::new());

        let outcome = self.source.filter_by_ingredient(&query).await;

        if !self.sequence.is_latest(seq) {
            debug!("Dropping stale search response for '{}'", query);
            return;
        }

        match outcome {
            Ok(records) if !records.is_empty() => {
                debug!("Search '{}' returned {} recipes", query, records.len());
                let cards = cards(&records, self.reveal_step);
                self.render(Content::Cards(cards), records);
            }
            Ok(_) => self.render(Content::Notice(no_results(&query)), Vec::new()),
            Err(e) => {
                error!("Error fetching data: {}", e.log_safe());
                self.render(Content::Notice(Notice::new(SEARCH_FAILED)), Vec::new());
            }
        }
    }

    fn render(&self, content: Content, records: Vec<RecipeSummary>) {
        *self.shown() = records;
        self.surface.set_content(content);
        self.surface.show();
    }
}
