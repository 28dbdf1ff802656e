pub mod guidance;
pub mod pdf;

use serde::Serialize;

use crate::analysis::AnalysisRecord;
use crate::catalog::Severity;
use crate::scanner::{ComplianceFinding, Finding};
use crate::score::{RiskLevel, RISK_SCORE_DENOMINATOR};

/// Presentation-ready report: a fixed sequence of titled sections.
#[derive(Debug, Serialize)]
pub struct Report {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Serialize)]
pub struct Section {
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph { text: String },
    Subheading { text: String },
    Bullets { items: Vec<String> },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

impl Block {
    fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    fn subheading(text: impl Into<String>) -> Self {
        Block::Subheading { text: text.into() }
    }
}

/// Build the nine report sections in their fixed order.
pub fn build_report(record: &AnalysisRecord) -> Report {
    Report {
        title: "Contract Risk Analysis & Negotiation Report".to_string(),
        sections: vec![
            title_section(record),
            table_of_contents(),
            executive_summary(record),
            contract_overview(record),
            detailed_risk_analysis(record),
            compliance_analysis(record),
            negotiation_strategy(record),
            strategic_recommendations(record),
            technical_details(record),
        ],
    }
}

const SECTION_TITLES: [&str; 7] = [
    "Executive Summary",
    "Contract Overview",
    "Detailed Risk Analysis",
    "Compliance Analysis",
    "Negotiation Strategy",
    "Strategic Recommendations",
    "Technical Details",
];

fn title_section(record: &AnalysisRecord) -> Section {
    let result = &record.result;
    Section {
        title: "Document Information".to_string(),
        blocks: vec![
            Block::paragraph("Comprehensive Legal Analysis & Strategic Recommendations"),
            Block::Table {
                header: vec!["Field".into(), "Value".into()],
                rows: vec![
                    vec!["Document Analyzed".into(), record.filename.clone()],
                    vec!["Analysis Date".into(), record.timestamp.clone()],
                    vec!["Analysis ID".into(), record.analysis_id.clone()],
                    vec!["Risk Level".into(), result.risk_level.to_string()],
                    vec![
                        "Risk Score".into(),
                        format!("{}/{}", result.risk_score, RISK_SCORE_DENOMINATOR),
                    ],
                    vec![
                        "Total Risks Found".into(),
                        result.findings.len().to_string(),
                    ],
                    vec![
                        "Compliance Issues".into(),
                        result.compliance_findings.len().to_string(),
                    ],
                ],
            },
            Block::paragraph(format!(
                "Overall Risk Assessment: {}. {}",
                result.risk_level,
                level_description(result.risk_level)
            )),
        ],
    }
}

fn table_of_contents() -> Section {
    Section {
        title: "Table of Contents".to_string(),
        blocks: vec![Block::Bullets {
            items: SECTION_TITLES
                .iter()
                .enumerate()
                .map(|(i, title)| format!("{}. {title}", i + 1))
                .collect(),
        }],
    }
}

fn executive_summary(record: &AnalysisRecord) -> Section {
    let result = &record.result;
    let high = count_severity(&result.findings, Severity::High);
    let medium = count_severity(&result.findings, Severity::Medium);
    let low = count_severity(&result.findings, Severity::Low);

    let mut blocks = vec![
        Block::paragraph(format!(
            "This comprehensive contract analysis reveals a {} risk profile with a risk score of {}/{}. \
             The analysis identified {} risk factors and {} compliance considerations.",
            result.risk_level.as_str().to_lowercase(),
            result.risk_score,
            RISK_SCORE_DENOMINATOR,
            result.findings.len(),
            result.compliance_findings.len(),
        )),
        Block::subheading("Key Findings"),
        Block::Table {
            header: vec![
                "Risk Category".into(),
                "Count".into(),
                "Priority".into(),
                "Action Required".into(),
            ],
            rows: vec![
                vec!["High Risk Items".into(), high.to_string(), "Critical".into(), "Immediate Review".into()],
                vec!["Medium Risk Items".into(), medium.to_string(), "Moderate".into(), "Negotiate".into()],
                vec!["Low Risk Items".into(), low.to_string(), "Minor".into(), "Monitor".into()],
                vec![
                    "Compliance Issues".into(),
                    result.compliance_findings.len().to_string(),
                    "Review".into(),
                    "Verify".into(),
                ],
            ],
        },
        Block::subheading("Top Recommendations"),
    ];

    let mut recommendations = Vec::new();
    if high > 0 {
        recommendations.push(format!(
            "Critical: Address {high} high-risk items before signing"
        ));
    }
    if medium > 0 {
        recommendations.push(format!("Negotiate: Review {medium} medium-risk terms"));
    }
    if result.risk_score < 10 {
        recommendations.push("Positive: Contract appears to have reasonable terms".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("No immediate actions required".to_string());
    }
    blocks.push(Block::Bullets {
        items: recommendations,
    });

    Section {
        title: "Executive Summary".to_string(),
        blocks,
    }
}

fn contract_overview(record: &AnalysisRecord) -> Section {
    let result = &record.result;
    let mut blocks = vec![Block::paragraph(format!(
        "Document: {}. Analysis date: {}. Risk profile: {} ({}/{}). \
         Analysis scope: legal risk assessment, compliance review, and negotiation strategy.",
        record.filename,
        record.timestamp,
        result.risk_level,
        result.risk_score,
        RISK_SCORE_DENOMINATOR,
    ))];

    blocks.push(Block::subheading("Risk Distribution"));
    let grouped = group_by_category(&result.findings);
    if grouped.is_empty() {
        blocks.push(Block::paragraph("No risk findings to distribute."));
    } else {
        let rows = grouped
            .iter()
            .map(|(category, findings)| {
                let high = count_severity_refs(findings, Severity::High);
                let medium = count_severity_refs(findings, Severity::Medium);
                let low = count_severity_refs(findings, Severity::Low);
                vec![
                    category.clone(),
                    high.to_string(),
                    medium.to_string(),
                    low.to_string(),
                    findings.len().to_string(),
                ]
            })
            .collect();
        blocks.push(Block::Table {
            header: vec![
                "Category".into(),
                "High".into(),
                "Medium".into(),
                "Low".into(),
                "Total".into(),
            ],
            rows,
        });
    }

    Section {
        title: "Contract Overview".to_string(),
        blocks,
    }
}

fn detailed_risk_analysis(record: &AnalysisRecord) -> Section {
    let result = &record.result;
    let mut blocks = Vec::new();

    if result.findings.is_empty() {
        blocks.push(Block::paragraph(
            "No significant risks detected in this contract.",
        ));
        return Section {
            title: "Detailed Risk Analysis".to_string(),
            blocks,
        };
    }

    for (category, findings) in group_by_category(&result.findings) {
        blocks.push(Block::subheading(format!("{category} Analysis")));
        let category_guidance = guidance::for_category(&category);
        if let Some(g) = category_guidance {
            blocks.push(Block::paragraph(format!(
                "What this means: {}",
                g.explanation
            )));
        }

        for (i, finding) in findings.iter().enumerate() {
            blocks.push(Block::paragraph(format!(
                "{}. {} ({}). Issue: {}. Location: {}. Recommendation: {}",
                i + 1,
                finding.category,
                finding.severity.as_str().to_uppercase(),
                finding.description,
                finding.clause,
                finding.recommendation,
            )));

            if let Some(g) = category_guidance {
                let red_flags: Vec<String> = g
                    .red_flags
                    .iter()
                    .filter(|flag| {
                        finding
                            .clause
                            .to_lowercase()
                            .contains(&flag.to_lowercase())
                    })
                    .map(|flag| format!("Red flag: {flag}"))
                    .collect();
                if !red_flags.is_empty() {
                    blocks.push(Block::Bullets { items: red_flags });
                }
            }
        }

        if let Some(g) = category_guidance {
            blocks.push(Block::Bullets {
                items: g
                    .negotiation_points
                    .iter()
                    .take(3)
                    .map(|point| format!("Negotiation point: {point}"))
                    .collect(),
            });
            blocks.push(Block::paragraph(format!(
                "Market standard: {}",
                g.market_standard
            )));
        }
    }

    Section {
        title: "Detailed Risk Analysis".to_string(),
        blocks,
    }
}

fn compliance_analysis(record: &AnalysisRecord) -> Section {
    let compliance = &record.result.compliance_findings;
    let mut blocks = Vec::new();

    if compliance.is_empty() {
        blocks.push(Block::paragraph("No specific compliance issues identified."));
    } else {
        for (regulation, findings) in group_by_regulation(compliance) {
            blocks.push(Block::subheading(format!("{regulation} Compliance")));
            for (i, finding) in findings.iter().enumerate() {
                blocks.push(Block::paragraph(format!(
                    "{}. {}. Status: {}. Location: {}. Action: {}",
                    i + 1,
                    finding.description,
                    finding.status.to_uppercase(),
                    finding.clause,
                    finding.recommendation,
                )));
            }
        }
    }

    Section {
        title: "Compliance Analysis".to_string(),
        blocks,
    }
}

fn negotiation_strategy(record: &AnalysisRecord) -> Section {
    let result = &record.result;
    let strategy = match result.risk_level {
        RiskLevel::Critical | RiskLevel::High => {
            "High-Risk Contract - Aggressive Negotiation Required. This contract contains \
             significant risks that require immediate attention. Consider requesting substantial \
             modifications or walking away if terms cannot be improved."
        }
        RiskLevel::Medium => {
            "Medium-Risk Contract - Balanced Negotiation Approach. This contract has some \
             concerning terms but is generally negotiable. Focus on the highest-risk items while \
             accepting reasonable terms on others."
        }
        RiskLevel::Low | RiskLevel::Minimal => {
            "Low-Risk Contract - Standard Negotiation. This contract appears to have reasonable \
             terms. Focus on minor improvements and ensuring all terms are clearly understood."
        }
    };
    let mut blocks = vec![Block::paragraph(strategy)];

    let high: Vec<&Finding> = result
        .findings
        .iter()
        .filter(|f| f.severity == Severity::High)
        .collect();
    if !high.is_empty() {
        blocks.push(Block::subheading("High Priority Negotiation Items"));
        blocks.push(Block::Bullets {
            items: high
                .iter()
                .map(|f| format!("{}: {}", f.category, f.recommendation))
                .collect(),
        });
    }

    let medium: Vec<&Finding> = result
        .findings
        .iter()
        .filter(|f| f.severity == Severity::Medium)
        .collect();
    if !medium.is_empty() {
        blocks.push(Block::subheading("Medium Priority Negotiation Items"));
        blocks.push(Block::Bullets {
            items: medium
                .iter()
                .map(|f| format!("{}: {}", f.category, f.recommendation))
                .collect(),
        });
    }

    Section {
        title: "Negotiation Strategy".to_string(),
        blocks,
    }
}

fn strategic_recommendations(record: &AnalysisRecord) -> Section {
    let level = record.result.risk_level;
    let overall = match level {
        RiskLevel::Critical | RiskLevel::High => {
            "IMMEDIATE ACTION REQUIRED. This contract presents significant legal and financial \
             risks. We strongly recommend extensive negotiations or reconsideration of the \
             agreement."
        }
        RiskLevel::Medium => {
            "NEGOTIATION RECOMMENDED. This contract has some concerning terms that should be \
             addressed before signing. Focus on the highest-risk items."
        }
        RiskLevel::Low | RiskLevel::Minimal => {
            "GENERALLY ACCEPTABLE. This contract appears to have reasonable terms. Minor \
             negotiations may be beneficial but are not critical."
        }
    };

    let next_steps: &[&str] = match level {
        RiskLevel::Critical | RiskLevel::High => &[
            "Schedule immediate legal review",
            "Prepare negotiation strategy",
            "Identify deal-breaker terms",
            "Consider alternative suppliers/vendors",
        ],
        RiskLevel::Medium => &[
            "Prioritize high-risk items for negotiation",
            "Prepare counter-proposals",
            "Set negotiation timeline",
            "Identify acceptable compromises",
        ],
        RiskLevel::Low | RiskLevel::Minimal => &[
            "Review terms with stakeholders",
            "Prepare minor negotiation requests",
            "Set signing timeline",
            "Plan implementation",
        ],
    };

    Section {
        title: "Strategic Recommendations".to_string(),
        blocks: vec![
            Block::paragraph(overall),
            Block::subheading("Specific Actions"),
            Block::Bullets {
                items: [
                    "Review all high-risk items with legal counsel",
                    "Negotiate liability caps and indemnification terms",
                    "Ensure payment terms are reasonable and achievable",
                    "Verify compliance with applicable regulations",
                    "Request clarification on ambiguous terms",
                    "Consider insurance requirements for high-risk contracts",
                    "Document all negotiations and changes",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            },
            Block::subheading("Next Steps"),
            Block::Bullets {
                items: next_steps.iter().map(|s| s.to_string()).collect(),
            },
        ],
    }
}

fn technical_details(record: &AnalysisRecord) -> Section {
    Section {
        title: "Technical Details".to_string(),
        blocks: vec![
            Block::Table {
                header: vec!["Field".into(), "Value".into()],
                rows: vec![
                    vec!["Analysis ID".into(), record.analysis_id.clone()],
                    vec!["Analysis Date".into(), record.timestamp.clone()],
                    vec!["Risk Algorithm Version".into(), "2.0".into()],
                    vec![
                        "Analysis Method".into(),
                        "Hosted model + pattern matching".into(),
                    ],
                    vec![
                        "Analysis Scope".into(),
                        "Legal Risk + Compliance + Negotiation Strategy".into(),
                    ],
                ],
            },
            Block::paragraph(
                "Disclaimer: This analysis is provided for informational purposes only and does \
                 not constitute legal advice. Always consult with qualified legal counsel before \
                 making decisions based on this analysis. The analysis is based on automated \
                 review and may not capture all nuances of complex legal documents.",
            ),
        ],
    }
}

fn level_description(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Critical => "Immediate legal review required. Significant risks present.",
        RiskLevel::High => "Extensive negotiations recommended. Multiple concerning terms.",
        RiskLevel::Medium => "Some negotiation needed. Standard contract with risks.",
        RiskLevel::Low => "Generally acceptable terms. Minor improvements possible.",
        RiskLevel::Minimal => "Very low risk. Standard contract terms.",
    }
}

fn count_severity(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

fn count_severity_refs(findings: &[&Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

/// Group findings by category, preserving first-seen (catalog) order.
fn group_by_category(findings: &[Finding]) -> Vec<(String, Vec<&Finding>)> {
    let mut groups: Vec<(String, Vec<&Finding>)> = Vec::new();
    for finding in findings {
        match groups.iter_mut().find(|(c, _)| *c == finding.category) {
            Some((_, members)) => members.push(finding),
            None => groups.push((finding.category.clone(), vec![finding])),
        }
    }
    groups
}

fn group_by_regulation(
    findings: &[ComplianceFinding],
) -> Vec<(String, Vec<&ComplianceFinding>)> {
    let mut groups: Vec<(String, Vec<&ComplianceFinding>)> = Vec::new();
    for finding in findings {
        match groups.iter_mut().find(|(r, _)| *r == finding.regulation) {
            Some((_, members)) => members.push(finding),
            None => groups.push((finding.regulation.clone(), vec![finding])),
        }
    }
    groups
}
