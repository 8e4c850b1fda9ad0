// argus-core/src/domain/mod.rs

pub mod canonical;
pub mod correlation;
pub mod error;
pub mod graph;
pub mod kev;
pub mod pii;

// Convenient re-exports
pub use error::DomainError;
