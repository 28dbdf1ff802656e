//! The builtin rule tables. Pattern literals express loose natural-language
//! phrasings of contract clauses; all are matched case-insensitively.

use super::{CatalogError, ComplianceRule, RiskRule, Severity};

pub(super) fn risk_rules() -> Result<Vec<RiskRule>, CatalogError> {
    Ok(vec![
        RiskRule::new(
            "payment_terms",
            "Payment Terms",
            Severity::Medium,
            2,
            &[
                r"payment.*due.*(\d+).*days",
                r"late.*payment.*(\d+%)",
                r"interest.*charge.*(\d+%)",
                r"penalty.*(\d+%)",
                r"default.*rate.*(\d+%)",
            ],
        )?,
        RiskRule::new(
            "liability",
            "Liability Limitations",
            Severity::High,
            3,
            &[
                r"limitation.*liability",
                r"total.*liability.*not.*exceed.*(\$[\d,]+)",
                r"damages.*limited.*(\$[\d,]+)",
                r"exclude.*consequential.*damages",
                r"indemnification.*unlimited",
            ],
        )?,
        RiskRule::new(
            "termination",
            "Termination Clauses",
            Severity::Medium,
            2,
            &[
                r"terminate.*(\d+).*days.*notice",
                r"termination.*without.*cause",
                r"immediate.*termination",
                r"breach.*(\d+).*days.*cure",
                r"material.*breach",
            ],
        )?,
        RiskRule::new(
            "confidentiality",
            "Confidentiality",
            Severity::Low,
            1,
            &[
                r"confidential.*information",
                r"non-disclosure.*(\d+).*years",
                r"trade.*secrets",
                r"proprietary.*information",
                r"return.*confidential.*information",
            ],
        )?,
        RiskRule::new(
            "intellectual_property",
            "Intellectual Property",
            Severity::High,
            3,
            &[
                r"intellectual.*property",
                r"copyright.*assignment",
                r"patent.*rights",
                r"trademark.*usage",
                r"work.*for.*hire",
            ],
        )?,
        RiskRule::new(
            "data_protection",
            "Data Protection",
            Severity::High,
            3,
            &[
                r"personal.*data",
                r"data.*protection",
                r"privacy.*policy",
                r"gdpr.*compliance",
                r"data.*breach.*notification",
            ],
        )?,
        RiskRule::new(
            "force_majeure",
            "Force Majeure",
            Severity::Low,
            1,
            &[
                r"force.*majeure",
                r"act.*of.*god",
                r"unforeseen.*circumstances",
                r"beyond.*reasonable.*control",
            ],
        )?,
        RiskRule::new(
            "governing_law",
            "Governing Law",
            Severity::Medium,
            2,
            &[
                r"governing.*law.*([A-Za-z\s]+)",
                r"jurisdiction.*([A-Za-z\s]+)",
                r"venue.*([A-Za-z\s]+)",
                r"dispute.*resolution",
            ],
        )?,
    ])
}

pub(super) fn compliance_rules() -> Result<Vec<ComplianceRule>, CatalogError> {
    Ok(vec![
        ComplianceRule::new(
            "gdpr",
            "GDPR",
            "check",
            3,
            &[
                r"personal.*data.*processing",
                r"data.*subject.*rights",
                r"data.*protection.*officer",
                r"privacy.*impact.*assessment",
                r"right.*to.*erasure",
            ],
        )?,
        ComplianceRule::new(
            "sox",
            "SOX",
            "check",
            3,
            &[
                r"financial.*reporting",
                r"internal.*controls",
                r"audit.*committee",
                r"material.*weakness",
                r"disclosure.*controls",
            ],
        )?,
        ComplianceRule::new(
            "hipaa",
            "HIPAA",
            "check",
            3,
            &[
                r"health.*information",
                r"medical.*records",
                r"phi.*protected.*health",
                r"privacy.*rule",
                r"security.*rule",
            ],
        )?,
        ComplianceRule::new(
            "ccpa",
            "CCPA",
            "check",
            2,
            &[
                r"california.*privacy",
                r"consumer.*privacy.*act",
                r"right.*to.*know",
                r"right.*to.*delete",
                r"opt.*out.*sale",
            ],
        )?,
    ])
}
