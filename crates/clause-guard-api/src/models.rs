//! Wire types for the analysis endpoints.

use serde::{Deserialize, Serialize};

use clause_guard_core::{AnalysisRecord, RiskLevel, Severity};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub content: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct RiskItem {
    pub category: String,
    pub severity: Severity,
    pub description: String,
    pub clause: String,
    pub recommendation: String,
}

#[derive(Debug, Serialize)]
pub struct ComplianceItem {
    pub regulation: String,
    pub status: String,
    pub description: String,
    pub clause: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: String,
    pub filename: String,
    pub risk_level: RiskLevel,
    pub risk_score: u32,
    pub risks: Vec<RiskItem>,
    pub compliance: Vec<ComplianceItem>,
    pub summary: String,
    pub timestamp: String,
}

impl From<AnalysisRecord> for AnalyzeResponse {
    fn from(record: AnalysisRecord) -> Self {
        let result = record.result;
        Self {
            analysis_id: record.analysis_id,
            filename: record.filename,
            risk_level: result.risk_level,
            risk_score: result.risk_score,
            risks: result
                .findings
                .into_iter()
                .map(|f| RiskItem {
                    category: f.category,
                    severity: f.severity,
                    description: f.description,
                    clause: f.clause,
                    recommendation: f.recommendation,
                })
                .collect(),
            compliance: result
                .compliance_findings
                .into_iter()
                .map(|f| ComplianceItem {
                    regulation: f.regulation,
                    status: f.status,
                    description: f.description,
                    clause: f.clause,
                })
                .collect(),
            summary: result.summary,
            timestamp: record.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clause_guard_core::analyze;

    #[test]
    fn response_flattens_findings_to_wire_items() {
        let record = AnalysisRecord::new(
            "deal.txt",
            analyze("Total liability shall not exceed $50,000."),
        );
        let response = AnalyzeResponse::from(record);
        assert!(!response.risks.is_empty());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["risks"][0]["severity"], "high");
        assert!(value["risks"][0].get("monetary_value").is_none());
        assert!(value.get("analysis_id").is_some());
    }
}
