use std::collections::HashMap;

use crate::catalog::Severity;
use crate::scanner::{ComplianceFinding, Finding};
use crate::score::{RiskLevel, RISK_SCORE_DENOMINATOR};

/// How many category names the narrative calls out at most.
const TOP_CATEGORY_LIMIT: usize = 3;

/// Compose the analysis narrative: overall level and score, severity counts,
/// the most frequent categories, regulations encountered, and a strategic
/// recommendation keyed by risk-level bucket.
pub fn narrative(
    findings: &[Finding],
    compliance_findings: &[ComplianceFinding],
    risk_score: u32,
) -> String {
    let level = RiskLevel::from_score(risk_score);
    let mut out = format!(
        "Contract analysis completed. Overall risk level: {level}. Risk score: {risk_score}/{RISK_SCORE_DENOMINATOR}. "
    );

    if findings.is_empty() {
        out.push_str("No significant risks detected. ");
    } else {
        let high = count_severity(findings, Severity::High);
        let medium = count_severity(findings, Severity::Medium);
        out.push_str(&format!(
            "Found {} risk items ({high} high, {medium} medium). ",
            findings.len()
        ));
        let top = top_categories(findings);
        if !top.is_empty() {
            out.push_str(&format!("Top risk categories: {}. ", top.join(", ")));
        }
    }

    if !compliance_findings.is_empty() {
        let regulations = regulations_encountered(compliance_findings);
        out.push_str(&format!(
            "Identified {} compliance considerations ({}). ",
            compliance_findings.len(),
            regulations.join(", ")
        ));
    }

    out.push_str(strategic_recommendation(level));
    out
}

fn strategic_recommendation(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical | RiskLevel::High => {
            "RECOMMENDATION: Legal review required before signing."
        }
        RiskLevel::Medium => "RECOMMENDATION: Consider legal review for high-risk terms.",
        RiskLevel::Low | RiskLevel::Minimal => "Contract appears to have standard terms.",
    }
}

fn count_severity(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

/// Categories by match frequency. Findings arrive in catalog iteration order,
/// so the stable sort breaks frequency ties in catalog order.
fn top_categories(findings: &[Finding]) -> Vec<String> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for finding in findings {
        let category = finding.category.as_str();
        if !counts.contains_key(category) {
            first_seen.push(category);
        }
        *counts.entry(category).or_insert(0) += 1;
    }
    let mut ranked = first_seen;
    ranked.sort_by_key(|category| std::cmp::Reverse(counts[category]));
    ranked
        .into_iter()
        .take(TOP_CATEGORY_LIMIT)
        .map(String::from)
        .collect()
}

fn regulations_encountered(compliance_findings: &[ComplianceFinding]) -> Vec<String> {
    let mut regulations: Vec<String> = Vec::new();
    for finding in compliance_findings {
        if !regulations.contains(&finding.regulation) {
            regulations.push(finding.regulation.clone());
        }
    }
    regulations
}
