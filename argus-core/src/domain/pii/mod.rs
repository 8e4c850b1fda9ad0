// argus-core/src/domain/pii/mod.rs

pub mod classifier;
pub mod masking;
pub mod patterns;

// Re-exports
pub use classifier::{ColumnFinding, TextFinding, classify_columns, classify_text};
pub use masking::{MaskRule, SENSITIVE_KEYWORDS, is_sensitive_name, mask_value};
pub use patterns::{CompiledPattern, Criticality, PatternRegistry, PatternSpec};
