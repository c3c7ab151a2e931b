use crate::recipe::{Ingredient, InstructionText, RecipeDetail, RecipeId, RecipeSummary};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Number of numbered ingredient/measure slots in a meal record
pub const INGREDIENT_SLOTS: usize = 20;

/// Envelope shared by every recipe endpoint; `meals` is null when nothing matched
#[derive(Debug, Clone, Deserialize)]
pub struct MealsResponse {
    #[serde(default)]
    pub meals: Option<Vec<MealRecord>>,
}

impl MealsResponse {
    pub fn into_meals(self) -> Vec<MealRecord> {
        self.meals.unwrap_or_default()
    }
}

/// Meal record as returned by the recipe database
#[derive(Debug, Clone, Deserialize)]
pub struct MealRecord {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    /// Numbered `strIngredientN` / `strMeasureN` slots and anything else
    #[serde(flatten)]
    pub slots: HashMap<String, Value>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

impl MealRecord {
    fn slot(&self, prefix: &str, index: usize) -> Option<String> {
        non_blank(
            self.slots
                .get(&format!("{prefix}{index}"))
                .and_then(Value::as_str),
        )
    }

    /// Walk the ingredient slots in order, stopping at the first empty one.
    ///
    /// Later slots are never inspected once a gap is found.
    pub fn ingredients(&self) -> Vec<Ingredient> {
        let mut ingredients = Vec::new();

        for index in 1..=INGREDIENT_SLOTS {
            let Some(name) = self.slot("strIngredient", index) else {
                break;
            };
            ingredients.push(Ingredient {
                measure: self.slot("strMeasure", index),
                name,
            });
        }

        ingredients
    }

    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: RecipeId::new(self.id.clone()),
            name: self.name.clone(),
            thumbnail: self.thumbnail.clone().unwrap_or_default(),
        }
    }

    pub fn into_detail(self) -> RecipeDetail {
        let ingredients = self.ingredients();
        let instructions = non_blank(self.instructions.as_deref())
            .map(InstructionText::from);

        RecipeDetail {
            id: RecipeId::new(self.id),
            name: self.name,
            thumbnail: self.thumbnail.unwrap_or_default(),
            area: non_blank(self.area.as_deref()),
            category: non_blank(self.category.as_deref()),
            video_url: non_blank(self.youtube.as_deref()),
            ingredients,
            instructions,
        }
    }
}
