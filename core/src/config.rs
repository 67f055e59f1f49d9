//! Client configuration: base URL and default headers.

use std::collections::HashMap;

use envconfig::Envconfig;

use crate::error::RequestFailure;

/// Base URL used when `CLINIC_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Envconfig)]
struct EnvConfig {
    #[envconfig(from = "CLINIC_API_URL", default = "http://localhost:8080/api")]
    api_url: String,
}

/// Settings shared by every request issued through one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub default_headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers: vec![("content-type".to_string(), "application/json".to_string())],
        }
    }

    /// Resolve the base URL from `CLINIC_API_URL`, else the local default.
    pub fn from_env() -> Result<Self, RequestFailure> {
        let env = EnvConfig::init_from_env().map_err(|e| RequestFailure::invalid_input(e.to_string()))?;
        Ok(Self::from_base_url(&env.api_url))
    }

    /// Same resolution as `from_env`, reading from an explicit map.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, RequestFailure> {
        let env = EnvConfig::init_from_hashmap(vars).map_err(|e| RequestFailure::invalid_input(e.to_string()))?;
        Ok(Self::from_base_url(&env.api_url))
    }

    fn from_base_url(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() {
            Self::new(DEFAULT_BASE_URL)
        } else {
            Self::new(url)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
