use super::{Content, RenderSurface};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Snapshot of an in-memory surface
#[derive(Debug, Clone, Default)]
pub struct SurfaceState {
    pub content: Content,
    pub visible: bool,
    /// Every content write, oldest first
    pub history: Vec<Content>,
}

/// Surface that records what was rendered into it.
///
/// Used as the test double for the pipeline and by the web server to capture
/// pipeline output before turning it into HTML.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn content(&self) -> Content {
        self.lock().content.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    pub fn history(&self) -> Vec<Content> {
        self.lock().history.clone()
    }

    pub fn snapshot(&self) -> SurfaceState {
        self.lock().clone()
    }
}

impl RenderSurface for MemorySurface {
    fn set_content(&self, content: Content) {
        let mut state = self.lock();
        state.history.push(content.clone());
        state.content = content;
    }

    fn show(&self) {
        self.lock().visible = true;
    }

    fn hide(&self) {
        self.lock().visible = false;
    }
}
