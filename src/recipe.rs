//! Domain types shared by the upstream clients, the pipeline and the renderers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of characters before suggestions are fetched
pub const MIN_SUGGESTION_LEN: usize = 2;

/// Trimmed query used for as-you-type suggestions (at least two characters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionQuery(String);

impl SuggestionQuery {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < MIN_SUGGESTION_LEN {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Trimmed, non-empty ingredient query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub thumbnail: String,
}

/// A suggestion row: the display name plus the record it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub record: RecipeSummary,
}

impl From<RecipeSummary> for Suggestion {
    fn from(record: RecipeSummary) -> Self {
        Self {
            name: record.name.clone(),
            record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub measure: Option<String>,
    pub name: String,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.measure {
            Some(measure) => write!(f, "{} {}", measure, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub name: String,
    pub thumbnail: String,
    pub area: Option<String>,
    pub category: Option<String>,
    pub video_url: Option<String>,
    pub ingredients: Vec<Ingredient>,
    /// Instructions stored in the recipe database itself
    pub instructions: Option<InstructionText>,
}

impl RecipeDetail {
    /// Ingredients joined as "measure name" pairs, comma separated
    pub fn flattened_ingredients(&self) -> String {
        self.ingredients
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Origin and category label, e.g. "Italian Pasta"
    pub fn labels(&self) -> String {
        [self.area.as_deref(), self.category.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn instruction_request(&self) -> InstructionRequest {
        InstructionRequest {
            recipe_name: self.name.clone(),
            ingredients: self.flattened_ingredients(),
        }
    }
}

/// Block of cooking instructions, kept line by line so line breaks survive rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct InstructionText {
    lines: Vec<String>,
}

impl InstructionText {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

impl From<&str> for InstructionText {
    fn from(raw: &str) -> Self {
        let lines = raw
            .trim()
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }
}

impl From<String> for InstructionText {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<InstructionText> for String {
    fn from(text: InstructionText) -> Self {
        text.lines.join("\n")
    }
}

impl fmt::Display for InstructionText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Input to the instruction generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructionRequest {
    pub recipe_name: String,
    pub ingredients: String,
}
