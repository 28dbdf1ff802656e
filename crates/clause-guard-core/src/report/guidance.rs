//! Fixed negotiation guidance shown in the detailed risk analysis and
//! negotiation strategy sections.

/// Human-authored guidance for one contract category.
#[derive(Debug)]
pub struct NegotiationGuidance {
    pub explanation: &'static str,
    pub red_flags: &'static [&'static str],
    pub negotiation_points: &'static [&'static str],
    pub market_standard: &'static str,
}

pub fn for_category(category: &str) -> Option<&'static NegotiationGuidance> {
    match category {
        "Payment Terms" => Some(&PAYMENT_TERMS),
        "Liability Limitations" => Some(&LIABILITY),
        "Termination Clauses" => Some(&TERMINATION),
        "Confidentiality" => Some(&CONFIDENTIALITY),
        "Intellectual Property" => Some(&INTELLECTUAL_PROPERTY),
        "Data Protection" => Some(&DATA_PROTECTION),
        _ => None,
    }
}

static PAYMENT_TERMS: NegotiationGuidance = NegotiationGuidance {
    explanation: "Payment terms define when and how payments are made, including late fees and penalties.",
    red_flags: &[
        "Payment due immediately upon signing",
        "Late fees exceeding 2% per month",
        "No grace period for payments",
        "Unreasonable payment schedules",
    ],
    negotiation_points: &[
        "Request 30-60 day payment terms",
        "Negotiate late fees to 1-2% per month",
        "Include grace period of 5-10 days",
        "Request milestone-based payments for large contracts",
    ],
    market_standard: "Standard payment terms are typically 30-60 days with 1-2% late fees.",
};

static LIABILITY: NegotiationGuidance = NegotiationGuidance {
    explanation: "Liability clauses limit the amount of damages one party can claim from the other.",
    red_flags: &[
        "Unlimited liability exposure",
        "No liability caps",
        "Exclusion of consequential damages",
        "One-sided indemnification",
    ],
    negotiation_points: &[
        "Request liability caps (e.g., 12 months of fees)",
        "Include mutual indemnification",
        "Limit consequential damages",
        "Request insurance requirements",
    ],
    market_standard: "Typical liability caps are 12-24 months of contract value.",
};

static TERMINATION: NegotiationGuidance = NegotiationGuidance {
    explanation: "Termination clauses define how and when the contract can be ended.",
    red_flags: &[
        "Immediate termination without cause",
        "No cure period for breaches",
        "Unilateral termination rights",
        "Excessive notice periods",
    ],
    negotiation_points: &[
        "Request 30-60 day notice period",
        "Include cure periods for breaches",
        "Request mutual termination rights",
        "Define material breach clearly",
    ],
    market_standard: "Standard notice periods are 30-60 days with cure periods for breaches.",
};

static CONFIDENTIALITY: NegotiationGuidance = NegotiationGuidance {
    explanation: "Confidentiality clauses protect sensitive information shared during the contract.",
    red_flags: &[
        "Unlimited confidentiality period",
        "No exceptions for public information",
        "Overly broad definition of confidential information",
        "No return/destruction requirements",
    ],
    negotiation_points: &[
        "Limit confidentiality period to 3-5 years",
        "Include exceptions for public information",
        "Define confidential information narrowly",
        "Request return/destruction of materials",
    ],
    market_standard: "Standard confidentiality periods are 3-5 years after contract termination.",
};

static INTELLECTUAL_PROPERTY: NegotiationGuidance = NegotiationGuidance {
    explanation: "IP clauses define ownership and usage rights for intellectual property.",
    red_flags: &[
        "Assignment of all IP to one party",
        "No license to use background IP",
        "Unlimited use of deliverables",
        "No protection of existing IP",
    ],
    negotiation_points: &[
        "Retain ownership of background IP",
        "Request license to use deliverables",
        "Limit use of deliverables",
        "Protect existing IP rights",
    ],
    market_standard: "Each party typically retains ownership of their background IP.",
};

static DATA_PROTECTION: NegotiationGuidance = NegotiationGuidance {
    explanation: "Data protection clauses ensure compliance with privacy regulations.",
    red_flags: &[
        "No data protection requirements",
        "Unlimited data usage rights",
        "No data breach notification",
        "No data retention limits",
    ],
    negotiation_points: &[
        "Include GDPR/CCPA compliance",
        "Limit data usage to contract purposes",
        "Request data breach notification",
        "Set data retention limits",
    ],
    market_standard: "Data should be used only for contract purposes and retained for limited periods.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guidance_covers_the_six_negotiable_categories() {
        for category in [
            "Payment Terms",
            "Liability Limitations",
            "Termination Clauses",
            "Confidentiality",
            "Intellectual Property",
            "Data Protection",
        ] {
            let guidance = for_category(category)
                .unwrap_or_else(|| panic!("guidance missing for {category}"));
            assert!(!guidance.red_flags.is_empty());
            assert!(!guidance.negotiation_points.is_empty());
        }
    }

    #[test]
    fn uncovered_categories_have_no_guidance() {
        assert!(for_category("Force Majeure").is_none());
        assert!(for_category("Governing Law").is_none());
    }
}
