use serde::{Deserialize, Serialize};

use crate::scanner::Finding;

/// Fixed denominator shown next to the aggregate score ("17/30"). Not derived
/// from the catalog's total possible weight.
pub const RISK_SCORE_DENOMINATOR: u32 = 30;

pub const LOW_THRESHOLD: u32 = 5;
pub const MEDIUM_THRESHOLD: u32 = 10;
pub const HIGH_THRESHOLD: u32 = 15;
pub const CRITICAL_THRESHOLD: u32 = 20;

/// Discrete risk label derived from the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Step function over the aggregate score with fixed thresholds at
    /// 5, 10, 15, and 20.
    pub fn from_score(score: u32) -> Self {
        if score >= CRITICAL_THRESHOLD {
            RiskLevel::Critical
        } else if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else if score >= LOW_THRESHOLD {
            RiskLevel::Low
        } else {
            RiskLevel::Minimal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Minimal => "MINIMAL",
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate risk score: the sum of every finding's contribution
/// (rule weight × severity value).
pub fn risk_score(findings: &[Finding]) -> u32 {
    findings.iter().map(|f| f.score_contribution).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_risks;
    use proptest::prelude::*;

    #[test]
    fn no_findings_scores_zero_and_minimal() {
        assert_eq!(risk_score(&[]), 0);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Minimal);
    }

    #[test]
    fn level_boundaries_are_literal() {
        assert_eq!(RiskLevel::from_score(4), RiskLevel::Minimal);
        assert_eq!(RiskLevel::from_score(5), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(10), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(14), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(15), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(19), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(20), RiskLevel::Critical);
    }

    #[test]
    fn score_is_sum_of_contributions() {
        let findings = scan_risks(
            "Payment is due within 30 days. Total liability shall not exceed $50,000.",
        );
        let expected: u32 = findings.iter().map(|f| f.score_contribution).sum();
        assert!(expected > 0);
        assert_eq!(risk_score(&findings), expected);
    }

    #[test]
    fn level_serializes_uppercase() {
        let json = serde_json::to_string(&RiskLevel::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }

    proptest! {
        // Every non-negative score maps to exactly one level, and the mapping
        // is monotone in the score.
        #[test]
        fn levels_are_exhaustive_and_monotone(score in 0u32..500) {
            let level = RiskLevel::from_score(score);
            let next = RiskLevel::from_score(score + 1);
            prop_assert!(rank(next) >= rank(level));
            let expected = match score {
                0..=4 => RiskLevel::Minimal,
                5..=9 => RiskLevel::Low,
                10..=14 => RiskLevel::Medium,
                15..=19 => RiskLevel::High,
                _ => RiskLevel::Critical,
            };
            prop_assert_eq!(level, expected);
        }
    }

    fn rank(level: RiskLevel) -> u8 {
        match level {
            RiskLevel::Minimal => 0,
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Critical => 4,
        }
    }
}
