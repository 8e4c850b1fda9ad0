// argus-core/src/infrastructure/config.rs
//
// Engine configuration (argus.yaml). Secrets never live in the file:
// each connection names the environment variable holding its password.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::error::ArgusError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::credentials::{Credential, CredentialResolver};

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the JSON document collections.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Optional relationship statement batch executed by `relate`.
    pub statements_path: Option<String>,

    /// Named scan connections, keyed by logical name.
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionConfig {
    #[serde(rename = "type")]
    pub db_type: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub database: Option<String>,
    /// Name of the environment variable holding the decrypted password.
    pub password_env: Option<String>,
}

fn default_data_dir() -> String {
    "data".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            statements_path: None,
            connections: HashMap::new(),
        }
    }
}

#[instrument(skip(root))]
pub fn load_config(root: &Path) -> Result<EngineConfig, InfrastructureError> {
    let config_path = find_main_config(root)?;
    info!(path = ?config_path, "Loading engine configuration");

    let content = fs::read_to_string(&config_path)?;
    let mut config: EngineConfig = serde_yaml::from_str(&content)?;

    apply_env_overrides(&mut config);
    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    let candidates = ["argus.yaml", "argus.yml"];
    for filename in candidates {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, candidates
    )))
}

fn apply_env_overrides(config: &mut EngineConfig) {
    if let Ok(val) = std::env::var("ARGUS_DATA_DIR") {
        info!(old = ?config.data_dir, new = ?val, "Overriding data dir via ENV");
        config.data_dir = val;
    }
    if let Ok(val) = std::env::var("ARGUS_STATEMENTS_PATH") {
        config.statements_path = Some(val);
    }
}

/// Resolver backed by the config's connection table. Passwords come from
/// the environment at resolve time, so they never transit the config
/// struct or its Debug output.
pub struct ConfigCredentialResolver {
    connections: HashMap<String, ConnectionConfig>,
}

impl ConfigCredentialResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            connections: config.connections.clone(),
        }
    }
}

impl CredentialResolver for ConfigCredentialResolver {
    fn resolve(&self, name: &str) -> Result<Credential, ArgusError> {
        let conn = self.connections.get(name).ok_or_else(|| {
            ArgusError::Domain(crate::domain::error::DomainError::not_found(
                "connection", name,
            ))
        })?;

        let password = conn
            .password_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());

        Ok(Credential::new(
            name,
            &conn.db_type,
            &conn.host,
            conn.port,
            &conn.username,
            conn.database.clone(),
            password,
        ))
    }
}
