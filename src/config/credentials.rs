use crate::error::{Error, Result};
use std::fmt;

/// Secret API key for the generative-text service.
///
/// Both `Debug` and `Display` are redacted so the key cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key material, only for building the outgoing request
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Supplies the generator credential at call time
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Result<ApiKey>;
}

/// Reads the key from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn api_key(&self) -> Result<ApiKey> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(ApiKey::new(value.trim())),
            _ => Err(Error::Config(format!(
                "Generator credential {} is not set",
                self.var
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaticCredentialProvider(ApiKey);

impl StaticCredentialProvider {
    pub fn new(key: impl Into<String>) -> Self {
        Self(ApiKey::new(key))
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn api_key(&self) -> Result<ApiKey> {
        Ok(self.0.clone())
    }
}
