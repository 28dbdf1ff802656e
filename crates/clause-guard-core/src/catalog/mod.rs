use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod builtin;

/// Severity attached to a risk rule and carried into every finding it emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Numeric multiplier used by the scorer: low=1, medium=2, high=3.
    pub fn value(self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Parse the lowercase wire form; anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors emitted while compiling rule definitions into a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule `{rule}` must declare at least one pattern")]
    EmptyPatterns { rule: String },
    #[error("rule `{rule}` weight must be at least 1 (got {weight})")]
    InvalidWeight { rule: String, weight: u32 },
    #[error("rule `{rule}` pattern `{pattern}` is not a valid regex: {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled risk-detection rule: one contract category with a severity, a
/// score weight, and the case-insensitive patterns that trigger it.
#[derive(Debug, Clone)]
pub struct RiskRule {
    pub key: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub weight: u32,
    patterns: Vec<Regex>,
}

impl RiskRule {
    pub fn new(
        key: &'static str,
        category: &'static str,
        severity: Severity,
        weight: u32,
        patterns: &[&str],
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            key,
            category,
            severity,
            weight,
            patterns: compile_patterns(key, weight, patterns)?,
        })
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Score contributed by a single match of this rule.
    pub fn score_contribution(&self) -> u32 {
        self.weight * self.severity.value()
    }
}

/// A compiled compliance rule. Same shape as [`RiskRule`] but tagged with a
/// regulation name and a review status instead of a risk category.
#[derive(Debug, Clone)]
pub struct ComplianceRule {
    pub key: &'static str,
    pub regulation: &'static str,
    pub status: &'static str,
    pub weight: u32,
    patterns: Vec<Regex>,
}

impl ComplianceRule {
    pub fn new(
        key: &'static str,
        regulation: &'static str,
        status: &'static str,
        weight: u32,
        patterns: &[&str],
    ) -> Result<Self, CatalogError> {
        Ok(Self {
            key,
            regulation,
            status,
            weight,
            patterns: compile_patterns(key, weight, patterns)?,
        })
    }

    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }
}

fn compile_patterns(
    rule: &'static str,
    weight: u32,
    patterns: &[&str],
) -> Result<Vec<Regex>, CatalogError> {
    if patterns.is_empty() {
        return Err(CatalogError::EmptyPatterns { rule: rule.into() });
    }
    if weight == 0 {
        return Err(CatalogError::InvalidWeight {
            rule: rule.into(),
            weight,
        });
    }
    patterns
        .iter()
        .map(|pattern| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| CatalogError::InvalidPattern {
                    rule: rule.into(),
                    pattern: (*pattern).into(),
                    source,
                })
        })
        .collect()
}

/// Immutable set of risk rules, iterated in declaration order. Finding order
/// follows this order, not document order.
#[derive(Debug)]
pub struct RiskCatalog {
    rules: Vec<RiskRule>,
}

impl RiskCatalog {
    pub fn rules(&self) -> &[RiskRule] {
        &self.rules
    }

    pub fn by_category(&self, category: &str) -> Option<&RiskRule> {
        self.rules.iter().find(|rule| rule.category == category)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Immutable set of compliance rules, iterated in declaration order.
#[derive(Debug)]
pub struct ComplianceCatalog {
    rules: Vec<ComplianceRule>,
}

impl ComplianceCatalog {
    pub fn rules(&self) -> &[ComplianceRule] {
        &self.rules
    }

    pub fn by_regulation(&self, regulation: &str) -> Option<&ComplianceRule> {
        self.rules
            .iter()
            .find(|rule| rule.regulation == regulation)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

static RISK_CATALOG: Lazy<RiskCatalog> = Lazy::new(|| RiskCatalog {
    rules: builtin::risk_rules()
        .unwrap_or_else(|err| panic!("builtin risk catalog failed to compile: {err}")),
});

static COMPLIANCE_CATALOG: Lazy<ComplianceCatalog> = Lazy::new(|| ComplianceCatalog {
    rules: builtin::compliance_rules()
        .unwrap_or_else(|err| panic!("builtin compliance catalog failed to compile: {err}")),
});

/// The builtin contract-risk catalog, compiled once per process.
pub fn risk_catalog() -> &'static RiskCatalog {
    &RISK_CATALOG
}

/// The builtin regulatory-compliance catalog, compiled once per process.
pub fn compliance_catalog() -> &'static ComplianceCatalog {
    &COMPLIANCE_CATALOG
}
