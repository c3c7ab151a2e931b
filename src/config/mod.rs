pub mod credentials;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub use credentials::{ApiKey, CredentialProvider, EnvCredentialProvider, StaticCredentialProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub mealdb: MealDbConfig,
    pub generator: GeneratorConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_rate_limit: u64,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealDbConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key, never the key itself
    pub api_key_var: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub debounce_ms: u64,
    pub max_suggestions: usize,
    pub reveal_step_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            max_suggestions: 5,
            reveal_step_ms: 100,
        }
    }
}

impl PipelineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn reveal_step(&self) -> Duration {
        Duration::from_millis(self.reveal_step_ms)
    }
}

impl MealDbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Credential provider reading the configured environment variable
    pub fn credentials(&self) -> EnvCredentialProvider {
        EnvCredentialProvider::new(&self.api_key_var)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &str, default: &str) -> Result<T> {
    env_or(name, default)
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {name} value")))
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env_or("HOST", "0.0.0.0");
        let port = parse_env("PORT", "3000")?;
        let api_rate_limit = parse_env("API_RATE_LIMIT", "10")?;
        let max_request_body_size = parse_env("MAX_REQUEST_BODY_SIZE", "65536")?;

        let timeout_seconds = parse_env("HTTP_TIMEOUT_SECONDS", "30")?;

        let mealdb_base_url = env_or(
            "MEALDB_BASE_URL",
            "https://www.themealdb.com/api/json/v1/1",
        );

        let generator_base_url = env_or(
            "GENERATOR_BASE_URL",
            "https://generativelanguage.googleapis.com/v1beta",
        );
        let generator_model = env_or("GENERATOR_MODEL", "gemini-1.5-flash");
        let api_key_var = env_or("GENERATOR_API_KEY_VAR", "GEMINI_API_KEY");

        let debounce_ms = parse_env("SUGGESTION_DEBOUNCE_MS", "300")?;
        let max_suggestions = parse_env("MAX_SUGGESTIONS", "5")?;
        let reveal_step_ms = parse_env("REVEAL_STEP_MS", "100")?;

        Ok(Settings {
            server: ServerConfig {
                host,
                port,
                api_rate_limit,
                max_request_body_size,
            },
            mealdb: MealDbConfig {
                base_url: mealdb_base_url,
                timeout_seconds,
                user_agent: format!("recipe-finder/{}", env!("CARGO_PKG_VERSION")),
            },
            generator: GeneratorConfig {
                base_url: generator_base_url,
                model: generator_model,
                api_key_var,
                timeout_seconds,
            },
            pipeline: PipelineConfig {
                debounce_ms,
                max_suggestions,
                reveal_step_ms,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("Port must be non-zero".to_string()));
        }

        if self.server.api_rate_limit == 0 {
            return Err(Error::Config("API rate limit must be non-zero".to_string()));
        }

        if self.pipeline.max_suggestions == 0 {
            return Err(Error::Config(
                "Suggestion limit must be non-zero".to_string(),
            ));
        }

        if self.generator.model.trim().is_empty() {
            return Err(Error::Config("Generator model must be set".to_string()));
        }

        Url::parse(&self.mealdb.base_url)
            .map_err(|e| Error::Config(format!("Invalid MEALDB_BASE_URL: {e}")))?;
        Url::parse(&self.generator.base_url)
            .map_err(|e| Error::Config(format!("Invalid GENERATOR_BASE_URL: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_settings(mealdb_base_url: &str, generator_base_url: &str) -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_rate_limit: 10,
            max_request_body_size: 65536,
        },
        mealdb: MealDbConfig {
            base_url: mealdb_base_url.to_string(),
            timeout_seconds: 5,
            user_agent: "test".to_string(),
        },
        generator: GeneratorConfig {
            base_url: generator_base_url.to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_var: "RECIPE_FINDER_TEST_KEY".to_string(),
            timeout_seconds: 5,
        },
        pipeline: PipelineConfig::default(),
    }
}
