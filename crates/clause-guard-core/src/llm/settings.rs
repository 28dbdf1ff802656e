use anyhow::{Context, Result};
use std::collections::HashMap;

/// Environment-driven configuration for the hosted-model bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub api_key: String,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ModelSettings {
    const API_KEY_ENV: &'static str = "CLAUSE_GUARD_API_KEY";
    const MODEL_ENV: &'static str = "CLAUSE_GUARD_MODEL";
    const ENDPOINT_ENV: &'static str = "CLAUSE_GUARD_ENDPOINT";
    const TIMEOUT_ENV: &'static str = "CLAUSE_GUARD_TIMEOUT_SECS";

    /// Load settings from environment variables.
    ///
    /// * `CLAUSE_GUARD_API_KEY`      — API token (required).
    /// * `CLAUSE_GUARD_MODEL`        — Optional hosted model identifier.
    /// * `CLAUSE_GUARD_ENDPOINT`     — Optional custom inference base URL.
    /// * `CLAUSE_GUARD_TIMEOUT_SECS` — Optional request timeout (default 30).
    pub fn from_env() -> Result<Self> {
        Self::from_map(std::env::vars().collect())
    }

    fn from_map(vars: HashMap<String, String>) -> Result<Self> {
        let api_key = vars
            .get(Self::API_KEY_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .with_context(|| {
                format!(
                    "environment variable {} must be set to enable the hosted model",
                    Self::API_KEY_ENV
                )
            })?;
        let model = vars
            .get(Self::MODEL_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let endpoint = vars
            .get(Self::ENDPOINT_ENV)
            .cloned()
            .filter(|v| !v.trim().is_empty());
        let timeout_secs = vars
            .get(Self::TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok());

        Ok(Self {
            api_key,
            model,
            endpoint,
            timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn key_alone_is_sufficient() {
        let settings =
            ModelSettings::from_map(vars(&[("CLAUSE_GUARD_API_KEY", "secret")])).unwrap();
        assert_eq!(settings.api_key, "secret");
        assert!(settings.model.is_none());
        assert!(settings.endpoint.is_none());
        assert!(settings.timeout_secs.is_none());
    }

    #[test]
    fn missing_key_errors() {
        let err = ModelSettings::from_map(HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("CLAUSE_GUARD_API_KEY"));
    }

    #[test]
    fn blank_key_is_treated_as_missing() {
        let err = ModelSettings::from_map(vars(&[("CLAUSE_GUARD_API_KEY", "  ")])).unwrap_err();
        assert!(err.to_string().contains("CLAUSE_GUARD_API_KEY"));
    }

    #[test]
    fn optional_fields_parse() {
        let settings = ModelSettings::from_map(vars(&[
            ("CLAUSE_GUARD_API_KEY", "secret"),
            ("CLAUSE_GUARD_MODEL", "some/model"),
            ("CLAUSE_GUARD_ENDPOINT", "http://localhost:9000"),
            ("CLAUSE_GUARD_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();
        assert_eq!(settings.model.as_deref(), Some("some/model"));
        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(settings.timeout_secs, Some(45));
    }

    #[test]
    fn malformed_timeout_is_ignored() {
        let settings = ModelSettings::from_map(vars(&[
            ("CLAUSE_GUARD_API_KEY", "secret"),
            ("CLAUSE_GUARD_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap();
        assert_eq!(settings.timeout_secs, None);
    }
}
