pub mod config;
pub mod error;
pub mod recipe;

// Upstream clients
pub mod generator;
pub mod mealdb;

// Rendering and the search pipeline
pub mod pipeline;
pub mod surface;

// Outer surfaces
pub mod cli;
pub mod web;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
