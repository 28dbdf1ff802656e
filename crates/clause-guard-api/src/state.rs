use std::sync::Arc;

use clause_guard_core::{HuggingFaceClient, ModelSettings, RiskModelClient};
use tracing::{info, warn};

/// Shared, immutable service state: at most one hosted-model client, built
/// from the environment at startup. Analysis itself is stateless.
pub struct AppState {
    pub model: Option<Arc<dyn RiskModelClient>>,
}

impl AppState {
    pub fn from_env() -> Self {
        let model = match ModelSettings::from_env() {
            Ok(settings) => match HuggingFaceClient::new(&settings) {
                Ok(client) => {
                    info!("hosted model enabled");
                    Some(Arc::new(client) as Arc<dyn RiskModelClient>)
                }
                Err(err) => {
                    warn!("hosted model misconfigured, running pattern-only: {err:#}");
                    None
                }
            },
            Err(err) => {
                info!("hosted model disabled: {err:#}");
                None
            }
        };
        Self { model }
    }

    /// Pattern-only state with no hosted model configured.
    #[cfg(test)]
    pub fn pattern_only() -> Self {
        Self { model: None }
    }
}
