// argus-core/src/domain/pii/masking.rs

use serde::{Deserialize, Serialize};

/// Per-category masking rule applied when a detected value is included in
/// sample output. No rule ever returns the verbatim input for values
/// longer than 4 characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaskRule {
    /// Keep the first character of the local part and the domain.
    Email,
    /// Keep the last 4 characters (cards, bank accounts).
    KeepLastFour,
    /// Keep the last 2 characters (phone numbers).
    KeepLastTwo,
    /// Fixed `***-**-####` shape keeping the last 4 digits.
    Ssn,
    /// Length-tiered: <=4 fully masked, <=8 keep first+last,
    /// otherwise keep first 2 and last 2.
    #[default]
    Default,
}

/// Masks `value` according to `rule`. Empty input stays empty; the masked
/// output of the default rule always has the same length as the input.
pub fn mask_value(value: &str, rule: MaskRule) -> String {
    if value.is_empty() {
        return String::new();
    }

    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    match rule {
        MaskRule::Email => {
            if let Some((local, domain)) = value.split_once('@') {
                let mut local_chars = local.chars();
                if let Some(first) = local_chars.next() {
                    let hidden: String = "*".repeat(local.chars().count() - 1);
                    return format!("{}{}@{}", first, hidden, domain);
                }
            }
            mask_default(&chars)
        }
        MaskRule::KeepLastFour => {
            if len >= 4 {
                let tail: String = chars[len - 4..].iter().collect();
                format!("{}{}", "*".repeat(len - 4), tail)
            } else {
                mask_default(&chars)
            }
        }
        MaskRule::KeepLastTwo => {
            if len >= 2 {
                let tail: String = chars[len - 2..].iter().collect();
                format!("{}{}", "*".repeat(len - 2), tail)
            } else {
                mask_default(&chars)
            }
        }
        MaskRule::Ssn => {
            if len >= 4 {
                let tail: String = chars[len - 4..].iter().collect();
                format!("***-**-{}", tail)
            } else {
                mask_default(&chars)
            }
        }
        MaskRule::Default => mask_default(&chars),
    }
}

fn mask_default(chars: &[char]) -> String {
    let len = chars.len();
    if len <= 4 {
        "*".repeat(len)
    } else if len <= 8 {
        format!("{}{}{}", chars[0], "*".repeat(len - 2), chars[len - 1])
    } else {
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[len - 2..].iter().collect();
        format!("{}{}{}", head, "*".repeat(len - 4), tail)
    }
}

/// Column/field names that force masking of context values in sample rows
/// even when the field itself did not trigger a pattern match.
pub const SENSITIVE_KEYWORDS: [&str; 18] = [
    "password", "secret", "key", "token", "ssn", "social", "credit", "card", "cvv", "account",
    "routing", "license", "passport", "phone", "address", "email", "birth", "dob",
];

/// True when a column name suggests sensitive content.
pub fn is_sensitive_name(column_name: &str) -> bool {
    let lower = column_name.to_lowercase();
    SENSITIVE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_masking() {
        assert_eq!(
            mask_value("john.doe@example.com", MaskRule::Email),
            "j*******@example.com"
        );
    }

    #[test]
    fn test_credit_card_masking() {
        assert_eq!(
            mask_value("4111111111111111", MaskRule::KeepLastFour),
            "************1111"
        );
    }

    #[test]
    fn test_phone_masking() {
        assert_eq!(mask_value("9876543210", MaskRule::KeepLastTwo), "********10");
    }

    #[test]
    fn test_ssn_masking() {
        assert_eq!(mask_value("123-45-6789", MaskRule::Ssn), "***-**-6789");
    }

    #[test]
    fn test_default_rule_length_invariance() {
        for input in ["ab", "abcd", "abcdef", "abcdefgh", "abcdefghijkl"] {
            let masked = mask_value(input, MaskRule::Default);
            assert_eq!(masked.chars().count(), input.chars().count());
        }
    }

    #[test]
    fn test_default_tiers() {
        assert_eq!(mask_value("abcd", MaskRule::Default), "****");
        assert_eq!(mask_value("abcdef", MaskRule::Default), "a****f");
        assert_eq!(mask_value("abcdefghij", MaskRule::Default), "ab******ij");
    }

    #[test]
    fn test_never_verbatim_above_four_chars() {
        let input = "sensitive-value-123";
        for rule in [
            MaskRule::Email,
            MaskRule::KeepLastFour,
            MaskRule::KeepLastTwo,
            MaskRule::Ssn,
            MaskRule::Default,
        ] {
            assert_ne!(mask_value(input, rule), input, "rule {:?} leaked input", rule);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(mask_value("", MaskRule::Email), "");
    }

    #[test]
    fn test_sensitive_column_names() {
        assert!(is_sensitive_name("user_password"));
        assert!(is_sensitive_name("CreditCard"));
        assert!(is_sensitive_name("date_of_birth"));
        assert!(!is_sensitive_name("username"));
    }
}
