use crate::config::{CredentialProvider, GeneratorConfig};
use crate::generator::models::{GenerateRequest, GenerateResponse, ProxyResponse};
use crate::generator::prompt::build_prompt;
use crate::recipe::{InstructionRequest, InstructionText};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Produces cooking instructions for a recipe
#[async_trait]
pub trait InstructionSource: Send + Sync {
    async fn generate(&self, request: &InstructionRequest) -> Result<InstructionText>;
}

/// Direct client for the Gemini `generateContent` endpoint.
///
/// Holds a credential provider, so it belongs on the server side only.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl GeminiClient {
    pub fn new(config: &GeneratorConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(Error::Http)?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            endpoint,
            credentials,
        })
    }
}

#[async_trait]
impl InstructionSource for GeminiClient {
    async fn generate(&self, request: &InstructionRequest) -> Result<InstructionText> {
        let key = self.credentials.api_key()?;
        let body = GenerateRequest::from_prompt(build_prompt(request));

        debug!("Requesting instructions for '{}'", request.recipe_name);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, key.expose())
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                service: "instruction generator".to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes).map_err(|e| {
            Error::UnexpectedResponse(format!("Failed to parse generator response: {e}"))
        })?;

        Ok(InstructionText::from(parsed.first_text()?))
    }
}

/// Client for this crate's own `/api/instructions` proxy, which keeps the
/// credential on the server
#[derive(Clone)]
pub struct ProxyInstructionClient {
    client: Client,
    endpoint: String,
}

impl ProxyInstructionClient {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/instructions", server_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl InstructionSource for ProxyInstructionClient {
    async fn generate(&self, request: &InstructionRequest) -> Result<InstructionText> {
        debug!("Requesting instructions via proxy: {}", self.endpoint);

        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                service: "instruction proxy".to_string(),
                status: status.as_u16(),
            });
        }

        let body: ProxyResponse = response
            .json()
            .await
            .map_err(|e| Error::UnexpectedResponse(format!("Invalid proxy response: {e}")))?;

        Ok(InstructionText::from(body.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticCredentialProvider;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn config(base_url: String) -> GeneratorConfig {
        GeneratorConfig {
            base_url,
            model: "gemini-1.5-flash".to_string(),
            api_key_var: "UNUSED".to_string(),
            timeout_seconds: 5,
        }
    }

    fn request() -> InstructionRequest {
        InstructionRequest {
            recipe_name: "Pancakes".to_string(),
            ingredients: "2 Eggs, 100g Flour".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_sends_key_in_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_header(API_KEY_HEADER, "secret-key")
            .match_body(Matcher::Regex("Recipe name: Pancakes".to_string()))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{"content": {"parts": [{"text": "1. Whisk\n2. Fry\n💡 Tip: rest the batter"}]}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GeminiClient::new(
            &config(format!("{}/v1beta", server.url())),
            Arc::new(StaticCredentialProvider::new("secret-key")),
        )
        .unwrap();

        let text = client.generate(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text.lines().len(), 3);
        assert_eq!(text.lines()[1], "2. Fry");
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_candidates() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(
            &config(format!("{}/v1beta", server.url())),
            Arc::new(StaticCredentialProvider::new("k")),
        )
        .unwrap();

        let err = tokio_test::assert_err!(client.generate(&request()).await);
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_without_credential_fails_before_request() {
        let server = Server::new_async().await;
        let client = GeminiClient::new(
            &config(server.url()),
            Arc::new(crate::config::EnvCredentialProvider::new(
                "RECIPE_FINDER_MISSING_KEY_FOR_TEST",
            )),
        )
        .unwrap();

        let err = tokio_test::assert_err!(client.generate(&request()).await);
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_proxy_client() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/instructions")
            .match_body(Matcher::Json(json!({
                "recipe_name": "Pancakes",
                "ingredients": "2 Eggs, 100g Flour"
            })))
            .with_status(200)
            .with_body(r#"{"text": "1. Mix\n2. Cook"}"#)
            .create_async()
            .await;

        let client = ProxyInstructionClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let text = client.generate(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(text.to_string(), "1. Mix\n2. Cook");
    }
}
