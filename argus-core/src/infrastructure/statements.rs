// argus-core/src/infrastructure/statements.rs
//
// Loader for relationship statement batches. A batch file is a YAML list
// of declarative statements executed in file order by the builder.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::domain::graph::RelationshipStatement;
use crate::infrastructure::error::InfrastructureError;

pub fn load_statements(path: &Path) -> Result<Vec<RelationshipStatement>, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(
            path.display().to_string(),
        ));
    }

    let content = fs::read_to_string(path)?;

    let statements: Vec<RelationshipStatement> = serde_yaml::from_str(&content)?;
    info!(path = ?path, count = statements.len(), "Relationship statements loaded");

    Ok(statements)
}

/// Statements shipped with the engine: the KEV-to-container join used by
/// the correlation views.
pub fn builtin_statements() -> Vec<RelationshipStatement> {
    use crate::domain::graph::NodeSelector;

    vec![RelationshipStatement {
        relationship_type: "exploits".to_string(),
        source: NodeSelector {
            label: "knownexploitedvulnerability".to_string(),
            property: "cveid".to_string(),
        },
        target: NodeSelector {
            label: "vulnerability".to_string(),
            property: "vulnerabilityid".to_string(),
        },
        merge: true,
    }]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_statement_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statements.yaml");
        std::fs::write(
            &path,
            r#"
- relationship_type: exploits
  source:
    label: knownexploitedvulnerability
    property: cveid
  target:
    label: vulnerability
    property: vulnerabilityid
  merge: true
- relationship_type: has_vulnerability
  source:
    label: dockerimage
    property: id
  target:
    label: vulnerability
    property: image_id
"#,
        )
        .unwrap();

        let statements = load_statements(&path).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].relationship_type, "exploits");
        assert!(statements[0].merge);
        assert!(!statements[1].merge);
    }

    #[test]
    fn test_missing_batch_is_config_not_found() {
        let err = load_statements(Path::new("/nonexistent/statements.yaml")).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
    }
}
