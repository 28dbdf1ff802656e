use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::llm::RiskModelClient;
use crate::scanner::{scan_compliance, scan_risks, ComplianceFinding, Finding};
use crate::score::{risk_score, RiskLevel};
use crate::summary::narrative;

/// Complete outcome of one document analysis. Computed once per request,
/// never mutated, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub findings: Vec<Finding>,
    pub compliance_findings: Vec<ComplianceFinding>,
    pub summary: String,
}

/// An [`AnalysisResult`] wrapped with request metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub analysis_id: String,
    pub filename: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl AnalysisRecord {
    pub fn new(filename: &str, result: AnalysisResult) -> Self {
        Self {
            analysis_id: uuid::Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            result,
        }
    }
}

/// Deterministic local pipeline: scan, score, summarize.
#[instrument(name = "analyze", skip(text), fields(text_len = text.len()))]
pub fn analyze(text: &str) -> AnalysisResult {
    let findings = scan_risks(text);
    let compliance_findings = scan_compliance(text);
    let score = risk_score(&findings);
    build_result(findings, compliance_findings, score)
}

/// Model-first pipeline. Any bridge error is absorbed here and the
/// deterministic pattern scan runs instead, so a misconfigured or
/// unreachable model yields exactly the [`analyze`] result.
#[instrument(name = "analyze_with_model", skip(text, model), fields(text_len = text.len()))]
pub async fn analyze_with_model(
    text: &str,
    model: Option<&dyn RiskModelClient>,
) -> AnalysisResult {
    if let Some(client) = model {
        match client.assess(text).await {
            Ok(assessment) => {
                debug!(
                    findings = assessment.findings.len(),
                    confidence = assessment.confidence,
                    "model assessment accepted"
                );
                let compliance_findings = scan_compliance(text);
                return build_result(
                    assessment.findings,
                    compliance_findings,
                    assessment.risk_score,
                );
            }
            Err(err) => {
                debug!(error = %format!("{err:#}"), "model assessment failed; using pattern scan");
            }
        }
    }
    analyze(text)
}

fn build_result(
    findings: Vec<Finding>,
    compliance_findings: Vec<ComplianceFinding>,
    score: u32,
) -> AnalysisResult {
    let summary = narrative(&findings, &compliance_findings, score);
    AnalysisResult {
        risk_level: RiskLevel::from_score(score),
        risk_score: score,
        findings,
        compliance_findings,
        summary,
    }
}
