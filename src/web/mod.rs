//! HTTP server: HTML pages, JSON API and the instruction proxy

pub mod api;
pub mod pages;
pub mod routes;

pub use api::AppState;
pub use routes::create_router;
