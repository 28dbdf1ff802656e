use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::catalog::{
    compliance_catalog, risk_catalog, ComplianceCatalog, RiskCatalog, Severity,
};
use crate::recommend::recommendation;

/// Characters of surrounding text captured on each side of a match.
const CONTEXT_WINDOW: usize = 100;

static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[\d,]+").unwrap_or_else(|err| panic!("money regex: {err}")));

/// One risk-rule match enriched with category, severity, and context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: String,
    pub severity: Severity,
    pub description: String,
    /// Bounded window of source text around the match, trimmed.
    pub clause: String,
    pub pattern_matched: String,
    pub monetary_value: Option<String>,
    #[serde(rename = "risk_score")]
    pub score_contribution: u32,
    pub recommendation: String,
}

/// One compliance-rule match, tagged with a regulation instead of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceFinding {
    pub regulation: String,
    pub status: String,
    pub description: String,
    pub clause: String,
    pub pattern_matched: String,
    pub recommendation: String,
}

/// Scan text against the builtin risk catalog.
///
/// Every rule is applied in catalog order, every pattern in rule order, and
/// every non-overlapping match emits one finding. A rule triggering twice
/// produces two findings; overlapping matches from different rules are all
/// kept.
#[instrument(name = "scan_risks", skip(text), fields(text_len = text.len()))]
pub fn scan_risks(text: &str) -> Vec<Finding> {
    scan_risks_with(risk_catalog(), text)
}

pub(crate) fn scan_risks_with(catalog: &RiskCatalog, text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in catalog.rules() {
        for pattern in rule.patterns() {
            for matched in pattern.find_iter(text) {
                findings.push(Finding {
                    category: rule.category.to_string(),
                    severity: rule.severity,
                    description: format!(
                        "Potential {} risk detected",
                        rule.category.to_lowercase()
                    ),
                    clause: clause_window(text, matched.start(), matched.end()),
                    pattern_matched: matched.as_str().to_string(),
                    monetary_value: monetary_annotation(matched.as_str()),
                    score_contribution: rule.score_contribution(),
                    recommendation: recommendation(rule.category, rule.severity).to_string(),
                });
            }
        }
    }
    debug!(findings = findings.len(), "risk scan completed");
    findings
}

/// Scan text against the builtin compliance catalog.
#[instrument(name = "scan_compliance", skip(text), fields(text_len = text.len()))]
pub fn scan_compliance(text: &str) -> Vec<ComplianceFinding> {
    scan_compliance_with(compliance_catalog(), text)
}

pub(crate) fn scan_compliance_with(
    catalog: &ComplianceCatalog,
    text: &str,
) -> Vec<ComplianceFinding> {
    let mut findings = Vec::new();
    for rule in catalog.rules() {
        for pattern in rule.patterns() {
            for matched in pattern.find_iter(text) {
                findings.push(ComplianceFinding {
                    regulation: rule.regulation.to_string(),
                    status: rule.status.to_string(),
                    description: format!(
                        "Potential {} compliance requirement",
                        rule.regulation
                    ),
                    clause: clause_window(text, matched.start(), matched.end()),
                    pattern_matched: matched.as_str().to_string(),
                    recommendation: format!(
                        "Review {} compliance requirements with legal counsel",
                        rule.regulation
                    ),
                });
            }
        }
    }
    debug!(findings = findings.len(), "compliance scan completed");
    findings
}

/// Dollar-amount substring of a matched span, if one is present.
pub(crate) fn monetary_annotation(matched: &str) -> Option<String> {
    MONEY_RE.find(matched).map(|m| m.as_str().to_string())
}

fn clause_window(text: &str, start: usize, end: usize) -> String {
    let from = saturating_char_boundary(text, start.saturating_sub(CONTEXT_WINDOW));
    let to = saturating_char_boundary_forward(text, end.saturating_add(CONTEXT_WINDOW));
    text[from..to].trim().to_string()
}

fn saturating_char_boundary(text: &str, idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    let mut cursor = idx;
    while cursor > 0 && !text.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}

fn saturating_char_boundary_forward(text: &str, idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    let mut cursor = idx;
    while cursor < text.len() && !text.is_char_boundary(cursor) {
        cursor += 1;
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Severity;

    const SAMPLE: &str = "Payment is due within 30 days. Late payment incurs a 5% penalty. \
                          Total liability shall not exceed $50,000.";

    #[test]
    fn sample_contract_yields_payment_and_liability_findings() {
        let findings = scan_risks(SAMPLE);
        assert!(findings.iter().any(|f| f.category == "Payment Terms"));
        let liability = findings
            .iter()
            .find(|f| f.category == "Liability Limitations")
            .expect("liability finding");
        assert_eq!(liability.monetary_value.as_deref(), Some("$50,000"));
        assert_eq!(liability.severity, Severity::High);
        assert_eq!(liability.score_contribution, 9);
    }

    #[test]
    fn findings_follow_catalog_order_not_document_order() {
        // Liability text placed before payment text: catalog order still wins.
        let text = "Total liability shall not exceed $10,000. Payment is due within 10 days.";
        let categories: Vec<_> = scan_risks(text).iter().map(|f| f.category.clone()).collect();
        assert_eq!(
            categories,
            vec!["Payment Terms".to_string(), "Liability Limitations".to_string()]
        );
    }

    #[test]
    fn each_match_emits_its_own_finding() {
        // Patterns do not match across newlines, so each line triggers once.
        let text = "Force majeure applies.\nA second force majeure clause follows.";
        let findings = scan_risks(text);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.category == "Force Majeure"));
    }

    #[test]
    fn plain_conversation_produces_no_findings() {
        let findings = scan_risks("This is a plain conversation with no legal terms.");
        assert!(findings.is_empty());
    }

    #[test]
    fn scanning_is_deterministic() {
        assert_eq!(scan_risks(SAMPLE), scan_risks(SAMPLE));
        assert_eq!(scan_compliance(SAMPLE), scan_compliance(SAMPLE));
    }

    #[test]
    fn compliance_scan_tags_regulation() {
        let findings =
            scan_compliance("All personal data processing shall comply with data subject rights.");
        assert!(findings.iter().any(|f| f.regulation == "GDPR"));
        assert!(findings
            .iter()
            .all(|f| f.recommendation.contains("legal counsel")));
    }

    #[test]
    fn clause_window_clips_at_text_boundaries() {
        let text = "force majeure";
        let findings = scan_risks(text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].clause, text);
    }

    #[test]
    fn clause_window_respects_char_boundaries() {
        let text = format!("{}force majeure{}", "é".repeat(120), "ü".repeat(120));
        let findings = scan_risks(&text);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].clause.contains("force majeure"));
    }

    #[test]
    fn monetary_annotation_extracts_first_amount() {
        assert_eq!(
            monetary_annotation("damages limited to $1,250,000 total"),
            Some("$1,250,000".to_string())
        );
        assert_eq!(monetary_annotation("no amounts here"), None);
    }

    #[test]
    fn finding_serializes_contribution_as_risk_score() {
        let finding = &scan_risks(SAMPLE)[0];
        let value = serde_json::to_value(finding).unwrap();
        assert!(value.get("risk_score").is_some());
        assert!(value.get("score_contribution").is_none());
    }
}
