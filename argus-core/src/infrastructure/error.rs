// argus-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(argus::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDb(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(argus::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(argus::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(argus::infra::json))]
    Json(#[from] serde_json::Error),

    #[error("Configuration not found at '{0}'")]
    #[diagnostic(code(argus::infra::config_missing))]
    ConfigNotFound(String),

    // --- STORES (document / graph) ---
    #[error("Store unavailable ({store}): {reason}")]
    #[diagnostic(
        code(argus::infra::store_unavailable),
        help("The backing store is unreachable. Retry policy belongs to the caller.")
    )]
    StoreUnavailable { store: String, reason: String },
}

// Shortcut so `?` works directly on duckdb calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDb(err))
    }
}
