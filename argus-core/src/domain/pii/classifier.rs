// argus-core/src/domain/pii/classifier.rs

use crate::domain::pii::masking::{MaskRule, is_sensitive_name, mask_value};
use crate::domain::pii::patterns::{Criticality, PatternRegistry};
use std::collections::BTreeMap;

/// How many sample row numbers a finding keeps.
pub const SAMPLE_ROW_REFS: usize = 10;
/// How many masked sample values / rows a finding keeps.
pub const SAMPLE_VALUES: usize = 5;

/// One (column, category) finding over a row sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFinding {
    pub column: String,
    pub pii_type: String,
    pub criticality: Criticality,
    pub compliance_standards: Vec<String>,
    /// 1-based row numbers of every matching row.
    pub row_numbers: Vec<usize>,
    /// Full row context for the first matching rows, masked.
    pub sample_rows: Vec<BTreeMap<String, String>>,
}

/// One (object, category) finding over a decoded text blob.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFinding {
    pub pii_type: String,
    pub criticality: Criticality,
    pub compliance_standards: Vec<String>,
    /// Distinct matched values.
    pub match_count: usize,
    /// Masked form of the first distinct matches.
    pub masked_samples: Vec<String>,
}

/// Classifies a bounded row sample column by column.
///
/// Every pattern is tested against every row's string form of the column;
/// matches are grouped per (column, category). Sample rows carry all
/// columns, with the matched column masked under the category's rule and
/// any other sensitive-named column masked under the default rule.
pub fn classify_columns(
    registry: &PatternRegistry,
    columns: &[String],
    rows: &[Vec<Option<String>>],
) -> Vec<ColumnFinding> {
    let mut findings = Vec::new();

    for (col_idx, column) in columns.iter().enumerate() {
        for pattern in registry.iter() {
            let mut row_numbers = Vec::new();
            for (row_idx, row) in rows.iter().enumerate() {
                let cell = row
                    .get(col_idx)
                    .and_then(|c| c.as_deref())
                    .unwrap_or("");
                if pattern.regex.is_match(cell) {
                    row_numbers.push(row_idx + 1);
                }
            }
            if row_numbers.is_empty() {
                continue;
            }

            let sample_rows = row_numbers
                .iter()
                .take(SAMPLE_VALUES)
                .map(|row_no| masked_row(columns, &rows[row_no - 1], column, pattern.mask))
                .collect();

            findings.push(ColumnFinding {
                column: column.clone(),
                pii_type: pattern.name.clone(),
                criticality: pattern.criticality,
                compliance_standards: pattern.compliance_standards.clone(),
                row_numbers,
                sample_rows,
            });
        }
    }

    findings
}

fn masked_row(
    columns: &[String],
    row: &[Option<String>],
    matched_column: &str,
    rule: MaskRule,
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for (idx, name) in columns.iter().enumerate() {
        let raw = row.get(idx).and_then(|c| c.clone()).unwrap_or_default();
        let value = if name == matched_column {
            mask_value(&raw, rule)
        } else if is_sensitive_name(name) {
            // Context columns did not match the category; their rule
            // must not leak trailing characters.
            mask_value(&raw, MaskRule::Default)
        } else {
            raw
        };
        out.insert(name.clone(), value);
    }
    out
}

/// Classifies a whole decoded text blob.
///
/// All matches per pattern are collected, deduplicated (first-seen order)
/// and masked for the sample output.
pub fn classify_text(registry: &PatternRegistry, text: &str) -> Vec<TextFinding> {
    let mut findings = Vec::new();

    for pattern in registry.iter() {
        let mut seen = Vec::new();
        for m in pattern.regex.find_iter(text) {
            let value = m.as_str();
            if !seen.iter().any(|s: &String| s == value) {
                seen.push(value.to_string());
            }
        }
        if seen.is_empty() {
            continue;
        }

        let masked_samples = seen
            .iter()
            .take(SAMPLE_VALUES)
            .map(|v| mask_value(v, pattern.mask))
            .collect();

        findings.push(TextFinding {
            pii_type: pattern.name.clone(),
            criticality: pattern.criticality,
            compliance_standards: pattern.compliance_standards.clone(),
            match_count: seen.len(),
            masked_samples,
        });
    }

    findings
}
