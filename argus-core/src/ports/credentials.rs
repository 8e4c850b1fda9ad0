// argus-core/src/ports/credentials.rs

use crate::domain::error::DomainError;
use crate::error::ArgusError;

/// A resolved connection credential. Encryption/decryption of the secret
/// happens behind the resolver; the core only reads the decrypted value
/// through [`Credential::password`].
#[derive(Clone)]
pub struct Credential {
    pub name: String,
    pub db_type: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub database: Option<String>,
    password: Option<String>,
}

impl Credential {
    pub fn new(
        name: impl Into<String>,
        db_type: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        database: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            db_type: db_type.into(),
            host: host.into(),
            port,
            username: username.into(),
            database,
            password,
        }
    }

    /// The decrypted password. Missing/undecryptable secrets abort the
    /// caller's run before any scanning begins.
    pub fn password(&self) -> Result<&str, ArgusError> {
        self.password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                ArgusError::Domain(DomainError::not_found("credential password", &self.name))
            })
    }
}

// The secret must never leak through Debug output or error payloads.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("db_type", &self.db_type)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("database", &self.database)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Resolves decrypted credentials by logical name.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<Credential, ArgusError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let cred = Credential::new(
            "prod-db",
            "postgresql",
            "localhost",
            5432,
            "scanner",
            None,
            Some("s3cret".to_string()),
        );
        let dump = format!("{:?}", cred);
        assert!(!dump.contains("s3cret"));
        assert!(dump.contains("<redacted>"));
    }

    #[test]
    fn test_missing_password_is_not_found() {
        let cred = Credential::new("dev-db", "mysql", "h", 3306, "u", None, None);
        assert!(cred.password().is_err());
    }
}
