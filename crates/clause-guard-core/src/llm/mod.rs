mod settings;

pub mod hugging_face;

use anyhow::Result;
use async_trait::async_trait;

use crate::scanner::Finding;

pub use settings::ModelSettings;

/// Risk assessment produced by a hosted model, or recovered from its
/// free-form answer via the local pattern catalog.
#[derive(Debug, Clone)]
pub struct ModelAssessment {
    pub findings: Vec<Finding>,
    pub risk_score: u32,
    /// Synthesized trust in the assessment, always below 1.0.
    pub confidence: f32,
}

/// Client abstraction over the hosted model used for prose risk assessment.
///
/// Any error from `assess` is absorbed by the analysis pipeline, which falls
/// back to the deterministic pattern scan.
#[async_trait]
pub trait RiskModelClient: Send + Sync {
    async fn assess(&self, text: &str) -> Result<ModelAssessment>;
}
