use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

#[cfg(not(test))]
use {
    crate::Error,
    axum::extract::ConnectInfo,
    std::net::{IpAddr, SocketAddr},
    std::sync::Arc,
    tower_governor::{governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorLayer},
};

use super::api::{self, AppState};
use super::pages;
use crate::Result;

/// Create the router with all endpoints (API + pages)
pub fn create_router(state: AppState) -> Result<Router> {
    let settings = state.settings.clone();

    #[cfg_attr(test, allow(unused_mut))]
    let mut api_routes = Router::new()
        .route("/suggestions", get(api::suggestions))
        .route("/search", get(api::search))
        .route("/recipes/:id", get(api::get_recipe))
        .route("/instructions", post(api::generate_instructions))
        .with_state(state.clone());

    // Rate limiting is per client IP and only applies to non-test builds.
    // Behind a reverse proxy every request shares the proxy's address.
    #[cfg(not(test))]
    {
        #[derive(Clone, Copy, Debug)]
        struct FallbackIpKeyExtractor;

        impl KeyExtractor for FallbackIpKeyExtractor {
            type Key = IpAddr;

            fn extract<B>(
                &self,
                req: &axum::http::Request<B>,
            ) -> std::result::Result<Self::Key, tower_governor::GovernorError> {
                if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>()
                {
                    return Ok(addr.ip());
                }

                Ok(IpAddr::V4(std::net::Ipv4Addr::LOCALHOST))
            }
        }

        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(FallbackIpKeyExtractor)
                .per_second(settings.server.api_rate_limit)
                .burst_size(settings.server.api_rate_limit as u32 * 2)
                .finish()
                .ok_or_else(|| Error::Config("Invalid API rate limit".to_string()))?,
        );
        api_routes = api_routes.layer(GovernorLayer {
            config: governor_conf,
        });
    }

    let api_routes = api_routes;

    let page_routes = Router::new()
        .route("/", get(pages::index))
        .route("/recipes/:id", get(pages::recipe_page))
        .with_state(state);

    let health_routes = Router::new().route("/health", get(api::health_check));

    Ok(Router::new()
        .merge(page_routes)
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(RequestBodyLimitLayer::new(
            settings.server.max_request_body_size,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; connect-src 'self'; object-src 'none'; base-uri 'self'",
            ),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::InstructionSource;
    use crate::mealdb::RecipeSource;
    use crate::pipeline::testing::{detail, summary, FakeGenerator, FakeRecipes};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(recipes: FakeRecipes, generator: FakeGenerator) -> Router {
        let recipes: Arc<dyn RecipeSource> = Arc::new(recipes);
        let generator: Arc<dyn InstructionSource> = Arc::new(generator);
        let settings = crate::config::test_settings("http://localhost:1", "http://localhost:2");

        create_router(AppState::new(settings, recipes, generator)).unwrap()
    }

    fn sample_recipes() -> FakeRecipes {
        let mut recipes = FakeRecipes::default();
        recipes.by_name.insert(
            "chicken".to_string(),
            (0..7)
                .map(|i| summary(&i.to_string(), &format!("Chicken {i}")))
                .collect(),
        );
        recipes.by_ingredient.insert(
            "chicken".to_string(),
            vec![summary("52795", "Chicken Handi"), summary("52956", "Chicken Congee")],
        );
        recipes.details.insert(
            "52795".to_string(),
            detail("52795", "Chicken Handi", &[("1.2 kg", "Chicken")]),
        );
        recipes
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_route() {
        let (status, body) = get(app(FakeRecipes::default(), FakeGenerator::default()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"ok\""));
    }

    #[tokio::test]
    async fn test_suggestions_are_capped_and_short_queries_empty() {
        let (status, body) = get(
            app(sample_recipes(), FakeGenerator::default()),
            "/api/suggestions?q=chicken",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let suggestions: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(suggestions.as_array().unwrap().len(), 5);
        assert_eq!(suggestions[0]["name"], "Chicken 0");

        let (_, body) = get(
            app(sample_recipes(), FakeGenerator::default()),
            "/api/suggestions?q=c",
        )
        .await;
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_search_api() {
        let (status, body) = get(
            app(sample_recipes(), FakeGenerator::default()),
            "/api/search?i=chicken",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let results: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(results[1]["name"], "Chicken Congee");

        let (status, _) = get(
            app(sample_recipes(), FakeGenerator::default()),
            "/api/search?i=%20",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recipe_api_not_found() {
        let (status, body) = get(
            app(sample_recipes(), FakeGenerator::default()),
            "/api/recipes/1",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("error"));
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_bad_gateway() {
        let failing = FakeRecipes {
            fail: true,
            ..Default::default()
        };
        let (status, _) = get(app(failing, FakeGenerator::default()), "/api/search?i=beef").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_instruction_proxy() {
        let request = |body: Value| {
            Request::builder()
                .method("POST")
                .uri("/api/instructions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap()
        };

        let response = app(FakeRecipes::default(), FakeGenerator::answering("1. Boil"))
            .oneshot(request(json!({
                "recipe_name": "Eggs",
                "ingredients": "2 Eggs"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["text"], "1. Boil (Eggs)");

        let response = app(FakeRecipes::default(), FakeGenerator::answering("x"))
            .oneshot(request(json!({ "recipe_name": " ", "ingredients": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_index_page_renders_results() {
        let (status, body) = get(app(sample_recipes(), FakeGenerator::default()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("View Recipe"));

        let (status, body) = get(
            app(sample_recipes(), FakeGenerator::default()),
            "/?q=chicken",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Chicken Handi"));
        assert!(body.contains("/recipes/52956"));

        let (_, body) = get(app(sample_recipes(), FakeGenerator::default()), "/?q=tofu").await;
        assert!(body.contains("No recipes found for"));
    }

    #[tokio::test]
    async fn test_recipe_page() {
        let (status, body) = get(
            app(sample_recipes(), FakeGenerator::answering("1. Simmer")),
            "/recipes/52795",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("1.2 kg Chicken"));
        assert!(body.contains("1. Simmer (Chicken Handi)"));

        let (status, body) = get(
            app(sample_recipes(), FakeGenerator::default()),
            "/recipes/52795",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Could not reach the chef."));

        let (status, _) = get(
            app(sample_recipes(), FakeGenerator::default()),
            "/recipes/404",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let failing = FakeRecipes {
            fail: true,
            ..Default::default()
        };
        let (status, body) = get(app(failing, FakeGenerator::default()), "/recipes/52795").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Failed to load details."));
    }

    #[tokio::test]
    async fn test_security_headers() {
        let response = app(FakeRecipes::default(), FakeGenerator::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }
}
