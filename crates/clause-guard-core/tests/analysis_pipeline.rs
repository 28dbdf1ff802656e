use anyhow::anyhow;
use async_trait::async_trait;
use clause_guard_core::{
    analyze, analyze_with_model, extract_text, narrative, risk_score, scan_compliance,
    scan_risks, AnalysisRecord, ModelAssessment, RiskLevel, RiskModelClient,
};
use pretty_assertions::assert_eq;

const RISKY_CONTRACT: &str =
    "Payment is due within 30 days. Late payment incurs a 5% penalty. \
     Total liability shall not exceed $50,000.";

const SMALL_TALK: &str = "This is a plain conversation with no legal terms.";

#[test]
fn clean_text_scores_zero_and_minimal() {
    let result = analyze(SMALL_TALK);
    assert_eq!(result.risk_score, 0);
    assert_eq!(result.risk_level, RiskLevel::Minimal);
    assert!(result.findings.is_empty());
    assert!(result
        .summary
        .to_lowercase()
        .contains("no significant risks"));
}

#[test]
fn risky_contract_flags_payment_liability_and_money() {
    let result = analyze(RISKY_CONTRACT);
    assert!(result.risk_score > 0);
    assert!(result
        .findings
        .iter()
        .any(|f| f.category == "Payment Terms"));
    let liability = result
        .findings
        .iter()
        .find(|f| f.category == "Liability Limitations")
        .expect("liability finding expected");
    assert_eq!(liability.monetary_value.as_deref(), Some("$50,000"));
}

#[test]
fn contributions_sum_to_the_aggregate_score() {
    let findings = scan_risks(RISKY_CONTRACT);
    let total: u32 = findings.iter().map(|f| f.score_contribution).sum();
    assert_eq!(risk_score(&findings), total);
    for finding in &findings {
        assert_eq!(
            finding.score_contribution,
            finding.severity.value()
                * clause_guard_core::risk_catalog()
                    .by_category(&finding.category)
                    .expect("finding category must exist in catalog")
                    .weight
        );
    }
}

#[test]
fn scanning_twice_yields_identical_ordered_findings() {
    assert_eq!(scan_risks(RISKY_CONTRACT), scan_risks(RISKY_CONTRACT));
    assert_eq!(scan_compliance(RISKY_CONTRACT), scan_compliance(RISKY_CONTRACT));
    assert_eq!(analyze(RISKY_CONTRACT), analyze(RISKY_CONTRACT));
}

#[test]
fn latin1_bytes_decode_through_the_fallback() {
    // Valid Latin-1, invalid UTF-8.
    let bytes = b"clause de r\xE9siliation".to_vec();
    let text = extract_text(&bytes, "text/plain");
    assert_eq!(text, "clause de résiliation");
}

#[test]
fn narrative_reports_score_over_fixed_denominator() {
    let findings = scan_risks(RISKY_CONTRACT);
    let score = risk_score(&findings);
    let summary = narrative(&findings, &[], score);
    assert!(summary.contains(&format!("Risk score: {score}/30")));
}

struct UnreachableModel;

#[async_trait]
impl RiskModelClient for UnreachableModel {
    async fn assess(&self, _text: &str) -> anyhow::Result<ModelAssessment> {
        Err(anyhow!("connection refused"))
    }
}

#[tokio::test]
async fn unreachable_model_falls_back_to_the_local_path() {
    let local = analyze(RISKY_CONTRACT);
    let client = UnreachableModel;
    assert_eq!(analyze_with_model(RISKY_CONTRACT, Some(&client)).await, local);
    assert_eq!(analyze_with_model(RISKY_CONTRACT, None).await, local);
}

#[test]
fn full_record_renders_to_pdf() {
    let record = AnalysisRecord::new("contract.txt", analyze(RISKY_CONTRACT));
    let report = clause_guard_core::build_report(&record);
    assert_eq!(report.sections.len(), 9);
    let bytes = clause_guard_core::render_pdf(&report).expect("pdf render");
    assert!(bytes.starts_with(b"%PDF"));
}
