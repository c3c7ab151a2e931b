use super::{Content, RenderSurface};
use std::fmt::Write as _;
use std::sync::{Mutex, PoisonError};

/// Plain-text rendering of a surface's content
pub fn render_text(content: &Content) -> String {
    let mut out = String::new();

    match content {
        Content::Empty => {}
        Content::Text(text) => out.push_str(text),
        Content::Loading(message) => {
            let _ = write!(out, "{message}");
        }
        Content::Notice(notice) => {
            out.push_str(&notice.headline);
            if let Some(hint) = &notice.hint {
                let _ = write!(out, "\n  {hint}");
            }
        }
        Content::Suggestions(suggestions) => {
            for (index, suggestion) in suggestions.iter().enumerate() {
                let _ = writeln!(out, "  [{index}] {}", suggestion.name);
            }
        }
        Content::Cards(cards) => {
            for (index, card) in cards.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  [{index}] {} (#{})",
                    card.summary.name, card.summary.id
                );
            }
        }
        Content::Recipe(recipe) => {
            let _ = writeln!(out, "{}", recipe.name);
            let labels = recipe.labels();
            if !labels.is_empty() {
                let _ = writeln!(out, "{labels}");
            }
            out.push_str("\nIngredients\n");
            for ingredient in &recipe.ingredients {
                let _ = writeln!(out, "  - {ingredient}");
            }
            if let Some(video) = &recipe.video_url {
                let _ = writeln!(out, "\nVideo: {video}");
            }
        }
        Content::Instructions(text) => out.push_str(&text.to_string()),
        Content::InstructionsUnavailable { notice, standard } => {
            out.push_str(notice);
            if let Some(text) = standard {
                let _ = write!(out, "\n\n{text}");
            }
        }
    }

    out.trim_end().to_string()
}

struct ConsoleState {
    content: Content,
    visible: bool,
}

/// Surface that prints to stdout whenever visible content changes
pub struct ConsoleSurface {
    label: String,
    state: Mutex<ConsoleState>,
}

impl ConsoleSurface {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: Mutex::new(ConsoleState {
                content: Content::Empty,
                visible: false,
            }),
        }
    }

    fn print(&self, content: &Content) {
        let text = render_text(content);
        if !text.is_empty() {
            println!("── {} ──\n{}\n", self.label, text);
        }
    }
}

impl RenderSurface for ConsoleSurface {
    fn set_content(&self, content: Content) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.visible && state.content != content {
            self.print(&content);
        }
        state.content = content;
    }

    fn show(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.visible {
            state.visible = true;
            self.print(&state.content);
        }
    }

    fn hide(&self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .visible = false;
    }
}
