// argus-core/src/domain/graph/family.rs

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Logical document-store collections the engine reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    CloudAssets,
    ContainerVulnerabilities,
    KevCatalog,
    BlobScanRuns,
    TabularScanRuns,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CloudAssets => "cloud_assets",
            Self::ContainerVulnerabilities => "container_image_vulnerability",
            Self::KevCatalog => "known_exploited_vulnerabilities_catalog",
            Self::BlobScanRuns => "blob_compliance_security",
            Self::TabularScanRuns => "database_compliance_security",
        }
    }
}

/// The fixed registry of projectable entity families.
///
/// Each family maps to a source collection and a labeling rule; families
/// with known substructure (container images nesting vulnerability
/// records) additionally project child nodes and edges. Unknown
/// discriminator strings inside a family fall back to the `unknown`
/// label rather than failing the rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFamily {
    /// One node per cloud asset document; label derived from the
    /// document's `resource_type` discriminator.
    CloudAsset,
    /// One `dockerimage` node per scan document, one `vulnerability`
    /// node per nested finding, linked by `has_vulnerability` edges.
    ContainerVulnerability,
    /// One `knownexploitedvulnerability` node per catalog entry, linked
    /// to matching `vulnerability` nodes by `exploits` edges.
    KevCatalog,
    /// Single aggregate node summarising blob-store compliance findings.
    BlobCompliance,
    /// Single aggregate node summarising tabular compliance findings.
    DatabaseCompliance,
}

impl EntityFamily {
    pub const ALL: [EntityFamily; 5] = [
        EntityFamily::CloudAsset,
        EntityFamily::ContainerVulnerability,
        EntityFamily::KevCatalog,
        EntityFamily::BlobCompliance,
        EntityFamily::DatabaseCompliance,
    ];

    /// Collection this family is rebuilt from.
    pub fn collection(&self) -> Collection {
        match self {
            Self::CloudAsset => Collection::CloudAssets,
            Self::ContainerVulnerability => Collection::ContainerVulnerabilities,
            Self::KevCatalog => Collection::KevCatalog,
            Self::BlobCompliance => Collection::BlobScanRuns,
            Self::DatabaseCompliance => Collection::TabularScanRuns,
        }
    }

    /// Fixed labels owned by this family. CloudAsset labels are dynamic
    /// (one per sanitized `resource_type` value) and resolved at rebuild
    /// time against the live collection instead.
    pub fn fixed_labels(&self) -> &'static [&'static str] {
        match self {
            Self::CloudAsset => &[],
            Self::ContainerVulnerability => &["dockerimage", "vulnerability"],
            Self::KevCatalog => &["knownexploitedvulnerability"],
            Self::BlobCompliance => &["blobcompliancesummary"],
            Self::DatabaseCompliance => &["databasecompliancesummary"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CloudAsset => "cloud_asset",
            Self::ContainerVulnerability => "container_vulnerability",
            Self::KevCatalog => "kev_catalog",
            Self::BlobCompliance => "blob_compliance",
            Self::DatabaseCompliance => "database_compliance",
        }
    }
}

impl FromStr for EntityFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "cloud_asset" | "assets" => Ok(Self::CloudAsset),
            "container_vulnerability" | "docker" => Ok(Self::ContainerVulnerability),
            "kev_catalog" | "kev" => Ok(Self::KevCatalog),
            "blob_compliance" => Ok(Self::BlobCompliance),
            "database_compliance" => Ok(Self::DatabaseCompliance),
            other => Err(format!("Unknown entity family: {}", other)),
        }
    }
}

impl std::fmt::Display for EntityFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
