use super::debounce::Debouncer;
use super::sequence::RequestSequence;
use crate::mealdb::RecipeSource;
use crate::recipe::{Suggestion, SuggestionQuery};
use crate::surface::{Content, RenderSurface};
use crate::Result;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Debounced as-you-type lookup feeding the suggestion list
#[derive(Clone)]
pub struct SuggestionFetcher {
    source: Arc<dyn RecipeSource>,
    surface: Arc<dyn RenderSurface>,
    debouncer: Arc<Debouncer>,
    sequence: Arc<RequestSequence>,
    current: Arc<Mutex<Vec<Suggestion>>>,
    limit: usize,
}

impl SuggestionFetcher {
    pub fn new(
        source: Arc<dyn RecipeSource>,
        surface: Arc<dyn RenderSurface>,
        debounce: Duration,
        limit: usize,
    ) -> Self {
        Self {
            source,
            surface,
            debouncer: Arc::new(Debouncer::new(debounce)),
            sequence: Arc::new(RequestSequence::new()),
            current: Arc::new(Mutex::new(Vec::new())),
            limit,
        }
    }

    fn current(&self) -> MutexGuard<'_, Vec<Suggestion>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle a keystroke: hide immediately for short queries, otherwise
    /// (re)schedule the lookup
    pub fn on_input(&self, raw: &str) {
        let Some(query) = SuggestionQuery::parse(raw) else {
            self.cancel();
            return;
        };

        let fetcher = self.clone();
        self.debouncer.schedule(async move {
            fetcher.dispatch(query).await;
        });
    }

    /// Drop any pending or in-flight lookup and hide the list
    pub fn cancel(&self) {
        self.debouncer.cancel();
        self.sequence.invalidate();
        self.clear();
    }

    /// Hide the list without touching pending lookups
    pub fn dismiss(&self) {
        self.surface.hide();
    }

    /// Suggestion currently shown at `index`
    pub fn get(&self, index: usize) -> Option<Suggestion> {
        self.current().get(index).cloned()
    }

    /// Fetch at most `limit` suggestions, in upstream order
    pub async fn lookup(&self, query: &SuggestionQuery) -> Result<Vec<Suggestion>> {
        let records = self.source.search_by_name(query).await?;
        Ok(records
            .into_iter()
            .take(self.limit)
            .map(Suggestion::from)
            .collect())
    }

    async fn dispatch(&self, query: SuggestionQuery) {
        let seq = self.sequence.next();
        debug!("Suggestion request #{} for '{}'", seq, query.as_str());

        // rows from the previous query must not stay selectable
        self.clear();

        let outcome = self.lookup(&query).await;

        if !self.sequence.is_latest(seq) {
            debug!("Dropping stale suggestion response #{}", seq);
            return;
        }

        match outcome {
            Ok(suggestions) if !suggestions.is_empty() => self.render(suggestions),
            Ok(_) => self.clear(),
            Err(e) => {
                warn!("Error fetching suggestions: {}", e.log_safe());
                self.clear();
            }
        }
    }

    fn render(&self, suggestions: Vec<Suggestion>) {
        *self.current() = suggestions.clone();
        self.surface.set_content(Content::Suggestions(suggestions));
        self.surface.show();
    }

    fn clear(&self) {
        self.current().clear();
        self.surface.set_content(Content::Empty);
        self.surface.hide();
    }
}
