pub mod analysis;
pub mod catalog;
pub mod extract;
pub mod llm;
pub mod recommend;
pub mod report;
pub mod scanner;
pub mod score;
pub mod summary;

pub use analysis::{analyze, analyze_with_model, AnalysisRecord, AnalysisResult};
pub use catalog::{
    compliance_catalog, risk_catalog, CatalogError, ComplianceCatalog, ComplianceRule,
    RiskCatalog, RiskRule, Severity,
};
pub use extract::{extract_text, try_extract_text, ContentKind, ExtractError};
pub use llm::{hugging_face::HuggingFaceClient, ModelAssessment, ModelSettings, RiskModelClient};
pub use report::{build_report, pdf::render_pdf, Block, Report, Section};
pub use scanner::{scan_compliance, scan_risks, ComplianceFinding, Finding};
pub use score::{risk_score, RiskLevel, RISK_SCORE_DENOMINATOR};
pub use summary::narrative;
