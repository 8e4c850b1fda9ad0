// argus-core/src/domain/pii/patterns.rs

use crate::domain::error::DomainError;
use crate::domain::pii::masking::MaskRule;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Declarative shape of one detection pattern, before compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSpec {
    pub name: String,
    pub regex: String,
    pub criticality: Criticality,
    pub compliance_standards: Vec<String>,
    #[serde(default)]
    pub mask: MaskRule,
}

/// Runtime form of a pattern: the regex is compiled exactly once at
/// registry construction.
pub struct CompiledPattern {
    pub name: String,
    pub regex: Regex,
    pub criticality: Criticality,
    pub compliance_standards: Vec<String>,
    pub mask: MaskRule,
}

/// Immutable, process-lifetime registry of PII detection patterns.
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// The built-in catalog: 18 categories covering contact, financial,
    /// government-id and network identifiers.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_specs(builtin_specs())
    }

    /// A malformed detection pattern is a policy error: registry
    /// construction fails rather than silently dropping the pattern.
    pub fn from_specs(specs: Vec<PatternSpec>) -> Result<Self, DomainError> {
        let mut patterns = Vec::with_capacity(specs.len());
        for spec in specs {
            let regex = Regex::new(&spec.regex).map_err(|e| DomainError::InvalidPattern {
                name: spec.name.clone(),
                reason: e.to_string(),
            })?;
            patterns.push(CompiledPattern {
                name: spec.name,
                regex,
                criticality: spec.criticality,
                compliance_standards: spec.compliance_standards,
                mask: spec.mask,
            });
        }
        Ok(Self { patterns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|p| p.name == name)
    }
}

fn spec(
    name: &str,
    regex: &str,
    criticality: Criticality,
    standards: &[&str],
    mask: MaskRule,
) -> PatternSpec {
    PatternSpec {
        name: name.to_string(),
        regex: regex.to_string(),
        criticality,
        compliance_standards: standards.iter().map(|s| s.to_string()).collect(),
        mask,
    }
}

fn builtin_specs() -> Vec<PatternSpec> {
    use Criticality::*;
    vec![
        spec(
            "Email Address",
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            Medium,
            &["GDPR", "CCPA"],
            MaskRule::Email,
        ),
        spec(
            "Phone Number",
            r"\b(?:\+?(\d{1,3})[-.\s]?)?\(?(\d{2,4})\)?[-.\s]?(\d{3,4})[-.\s]?(\d{3,4})\b",
            Medium,
            &["GDPR", "CCPA"],
            MaskRule::KeepLastTwo,
        ),
        spec(
            "Credit Card Number",
            r"\b(?:\d[ -]*?){13,19}\b",
            Critical,
            &["PCI DSS"],
            MaskRule::KeepLastFour,
        ),
        spec(
            "SSN",
            r"\b\d{3}-\d{2}-\d{4}\b",
            Critical,
            &["HIPAA", "GLBA"],
            MaskRule::Ssn,
        ),
        spec(
            "Date of Birth",
            r"\b(?:0[1-9]|1[0-2])[/.-](?:0[1-9]|[12][0-9]|3[01])[/.-](?:19|20)\d{2}\b",
            High,
            &["GDPR", "CCPA"],
            MaskRule::Default,
        ),
        spec(
            "IP Address (IPv4)",
            r"\b(?:\d{1,3}\.){3}\d{1,3}\b",
            Low,
            &["GDPR"],
            MaskRule::Default,
        ),
        spec(
            "IP Address (IPv6)",
            r"\b([a-fA-F0-9:]+:+)+[a-fA-F0-9]+\b",
            Low,
            &["GDPR"],
            MaskRule::Default,
        ),
        spec(
            "Passport Number",
            r"\b[A-Z]{1,2}\d{6,9}\b",
            High,
            &["GDPR"],
            MaskRule::Default,
        ),
        spec(
            "Bank Account Number",
            r"\b\d{9,18}\b",
            High,
            &["GLBA", "GDPR"],
            MaskRule::KeepLastFour,
        ),
        spec(
            "Aadhaar Number (India)",
            r"\b\d{4} \d{4} \d{4}\b",
            Critical,
            &["Aadhaar Act", "GDPR"],
            MaskRule::Default,
        ),
        spec(
            "PAN Card (India)",
            r"\b[A-Z]{5}\d{4}[A-Z]\b",
            High,
            &["GDPR", "CCPA"],
            MaskRule::Default,
        ),
        spec(
            "Driving License (India)",
            r"\b[A-Z]{2}\d{2} ?\d{11}\b",
            High,
            &["GDPR", "CCPA"],
            MaskRule::Default,
        ),
        spec(
            "National Insurance Number (UK)",
            r"\b[A-Z]{2}\d{6}[A-Z]\b",
            High,
            &["GDPR"],
            MaskRule::Default,
        ),
        spec(
            "NHS Number (UK)",
            r"\b\d{3} \d{3} \d{4}\b",
            High,
            &["GDPR", "HIPAA"],
            MaskRule::Default,
        ),
        spec(
            "Vehicle Registration Number (India)",
            r"\b[A-Z]{2}[ -]?\d{2}[ -]?[A-Z]?[ -]?\d{4}\b",
            Medium,
            &["GDPR"],
            MaskRule::Default,
        ),
        spec(
            "MAC Address",
            r"\b([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})\b",
            Low,
            &["N/A"],
            MaskRule::Default,
        ),
        spec(
            "Bitcoin Address",
            r"\b[13][a-km-zA-HJ-NP-Z1-9]{25,34}\b",
            Medium,
            &["N/A"],
            MaskRule::Default,
        ),
        spec(
            "Routing Number (US)",
            r"\b\d{9}\b",
            High,
            &["GLBA"],
            MaskRule::Default,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_compiles() {
        let registry = PatternRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 18);
        assert!(registry.get("Email Address").is_some());
        assert!(registry.get("SSN").is_some());
    }

    #[test]
    fn test_invalid_regex_fails_construction() {
        let specs = vec![spec(
            "Bad Pattern",
            r"[unclosed-bracket",
            Criticality::Low,
            &[],
            MaskRule::Default,
        )];
        let result = PatternRegistry::from_specs(specs);
        assert!(result.is_err(), "registry must reject invalid regex");
    }

    #[test]
    fn test_criticality_ordering() {
        assert!(Criticality::Low < Criticality::Critical);
        assert!(Criticality::High > Criticality::Medium);
    }

    #[test]
    fn test_email_pattern_matches() {
        let registry = PatternRegistry::builtin().unwrap();
        let email = registry.get("Email Address").unwrap();
        assert!(email.regex.is_match("john.doe@example.com"));
        assert!(!email.regex.is_match("not an email"));
    }

    #[test]
    fn test_ssn_pattern_matches() {
        let registry = PatternRegistry::builtin().unwrap();
        let ssn = registry.get("SSN").unwrap();
        assert!(ssn.regex.is_match("entry 123-45-6789 here"));
        assert!(!ssn.regex.is_match("123456789"));
    }
}
