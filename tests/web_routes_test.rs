use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mockito::{Matcher, Server, ServerGuard};
use recipe_finder::config::{
    GeneratorConfig, MealDbConfig, PipelineConfig, ServerConfig, Settings,
    StaticCredentialProvider,
};
use recipe_finder::generator::{GeminiClient, InstructionSource, ProxyInstructionClient};
use recipe_finder::mealdb::MealDbClient;
use recipe_finder::recipe::InstructionRequest;
use recipe_finder::web::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn settings(server: &ServerGuard) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_rate_limit: 50,
            max_request_body_size: 4096,
        },
        mealdb: MealDbConfig {
            base_url: format!("{}/api/json/v1/1", server.url()),
            timeout_seconds: 5,
            user_agent: "recipe-finder-test".to_string(),
        },
        generator: GeneratorConfig {
            base_url: format!("{}/v1beta", server.url()),
            model: "gemini-1.5-flash".to_string(),
            api_key_var: "UNUSED".to_string(),
            timeout_seconds: 5,
        },
        pipeline: PipelineConfig::default(),
    }
}

fn app(server: &ServerGuard) -> Router {
    let settings = settings(server);
    let recipes = MealDbClient::new(&settings.mealdb).unwrap();
    let generator = GeminiClient::new(
        &settings.generator,
        Arc::new(StaticCredentialProvider::new("server-side-key")),
    )
    .unwrap();

    create_router(AppState::new(
        settings,
        Arc::new(recipes),
        Arc::new(generator),
    ))
    .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_recipe_page_renders_generated_instructions() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/json/v1/1/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "52795".into()))
        .with_status(200)
        .with_body(include_str!("fixtures/lookup_52795.json"))
        .create_async()
        .await;
    server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_header("x-goog-api-key", "server-side-key")
        .with_status(200)
        .with_body(include_str!("fixtures/generate_ok.json"))
        .create_async()
        .await;

    let response = app(&server)
        .oneshot(
            Request::builder()
                .uri("/recipes/52795")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("<title>Chicken Handi | Recipe Finder</title>"));
    assert!(html.contains("1.2 kg Chicken"));
    assert!(!html.contains("Ginger"));
    assert!(html.contains("1. Brown the chicken in hot oil.<br>"));
    assert!(!html.contains("server-side-key"));
}

#[tokio::test]
async fn test_search_page_and_api_agree() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/json/v1/1/filter.php")
        .match_query(Matcher::UrlEncoded("i".into(), "chicken".into()))
        .with_status(200)
        .with_body(include_str!("fixtures/filter_chicken.json"))
        .expect(2)
        .create_async()
        .await;

    let page = app(&server)
        .oneshot(
            Request::builder()
                .uri("/?q=chicken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let page = body_text(page).await;
    assert!(page.contains("value=\"chicken\""));
    assert!(page.contains("href=\"/recipes/52940\""));

    let api = app(&server)
        .oneshot(
            Request::builder()
                .uri("/api/search?i=chicken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(api.status(), StatusCode::OK);
    let results: serde_json::Value = serde_json::from_str(&body_text(api).await).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 3);
    assert_eq!(results[0]["id"], "52940");
}

#[tokio::test]
async fn test_oversized_instruction_request_is_rejected() {
    let server = Server::new_async().await;
    let body = serde_json::json!({
        "recipe_name": "Soup",
        "ingredients": "salt, ".repeat(2000),
    });

    let response = app(&server)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/instructions")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_proxy_client_never_needs_the_key() {
    let mut server = Server::new_async().await;
    let generate = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_header("x-goog-api-key", "server-side-key")
        .match_body(Matcher::Regex("Omelette".to_string()))
        .with_status(200)
        .with_body(include_str!("fixtures/generate_ok.json"))
        .create_async()
        .await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(&server);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client =
        ProxyInstructionClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    let text = client
        .generate(&InstructionRequest {
            recipe_name: "Omelette".to_string(),
            ingredients: "3 Eggs, 1 knob Butter".to_string(),
        })
        .await
        .unwrap();

    generate.assert_async().await;
    assert_eq!(text.lines()[2], "Tip: finish with fresh coriander.");
}
