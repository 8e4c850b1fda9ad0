// argus-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("{kind} '{name}' not found")]
    #[diagnostic(
        code(argus::domain::not_found),
        help("Check the name and that the entity was registered before use.")
    )]
    NotFound { kind: String, name: String },

    #[error("Malformed input: {0}")]
    #[diagnostic(code(argus::domain::malformed_input))]
    MalformedInput(String),

    #[error("Nothing to scan for target '{0}'")]
    #[diagnostic(
        code(argus::domain::empty_target),
        help("The target exposed no tables or objects. Verify the credential scope.")
    )]
    EmptyTarget(String),

    #[error("Invalid PII pattern '{name}': {reason}")]
    #[diagnostic(
        code(argus::domain::invalid_pattern),
        help("A malformed detection pattern is a policy error and aborts registry construction.")
    )]
    InvalidPattern { name: String, reason: String },

    #[error("Projection for family '{family}' was interrupted mid-rebuild")]
    #[diagnostic(
        code(argus::domain::consistency_gap),
        help("Rebuild is full-replace and idempotent: re-trigger rebuild for this family.")
    )]
    ConsistencyGap { family: String },
}

impl DomainError {
    pub fn not_found(kind: &str, name: &str) -> Self {
        DomainError::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }
}
