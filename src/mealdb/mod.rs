pub mod client;
pub mod models;

pub use client::{MealDbClient, RecipeSource};
pub use models::{MealRecord, MealsResponse, INGREDIENT_SLOTS};
