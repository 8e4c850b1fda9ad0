// argus-core/src/domain/correlation.rs

use crate::domain::kev::KevEntry;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const UNKNOWN: &str = "Unknown";

/// One container-scan finding enriched with its KEV catalog entry.
/// Derived per request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedFinding {
    #[serde(rename = "cveID")]
    pub cve_id: String,
    pub severity: String,
    #[serde(rename = "packageName")]
    pub package_name: String,
    #[serde(rename = "installedVersion")]
    pub installed_version: String,
    #[serde(rename = "layerID")]
    pub layer_id: String,
    #[serde(rename = "imageName")]
    pub image_name: String,
    #[serde(rename = "imageID")]
    pub image_id: String,
    pub repository: String,

    // KEV enrichment
    #[serde(rename = "vendorProject")]
    pub vendor_project: String,
    pub product: String,
    #[serde(rename = "vulnerabilityName")]
    pub vulnerability_name: String,
    #[serde(rename = "dateAdded")]
    pub date_added: String,
    #[serde(rename = "dueDate")]
    pub due_date: String,
    #[serde(rename = "shortDescription")]
    pub short_description: String,
    #[serde(rename = "requiredAction")]
    pub required_action: String,
    #[serde(rename = "knownRansomwareCampaignUse")]
    pub known_ransomware_campaign_use: String,
    pub notes: String,
    pub cwes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    pub total_kev_vulnerabilities: usize,
    pub total_matched_in_docker: usize,
    /// Matched findings as a fraction of the KEV catalog ("what share of
    /// known exploits have we seen in our environment"), rounded to two
    /// decimals; 0 when the catalog is empty.
    pub percentage_matched: f64,
    pub affected_images: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub summary: CorrelationSummary,
    pub correlated_vulnerabilities: Vec<CorrelatedFinding>,
}

/// Joins the KEV catalog against nested container-scan documents.
///
/// The match key is the vulnerability identifier alone: one KEV entry may
/// correlate with many findings across images and every occurrence is
/// reported, never deduplicated per CVE. Documents with missing or
/// non-array substructure are skipped; findings without an identifier are
/// skipped.
pub fn correlate(kev_entries: &[KevEntry], docker_docs: &[serde_json::Value]) -> CorrelationResult {
    let kev_by_cve: HashMap<&str, &KevEntry> = kev_entries
        .iter()
        .filter(|e| !e.cve_id.is_empty())
        .map(|e| (e.cve_id.as_str(), e))
        .collect();

    let mut findings = Vec::new();

    for doc in docker_docs {
        let Some(result_sets) = doc.get("vulnerabilities").and_then(|v| v.as_array()) else {
            continue;
        };
        for result_set in result_sets {
            let Some(records) = result_set.get("Vulnerabilities").and_then(|v| v.as_array())
            else {
                continue;
            };
            for record in records {
                let Some(cve_id) = record.get("VulnerabilityID").and_then(|v| v.as_str()) else {
                    continue;
                };
                let Some(kev) = kev_by_cve.get(cve_id) else {
                    continue;
                };
                findings.push(enrich(record, result_set, doc, kev));
            }
        }
    }

    let affected_images: HashSet<&str> =
        findings.iter().map(|f| f.image_name.as_str()).collect();

    // Every catalog entry carrying an identifier counts, duplicates
    // included; the lookup map only drives the join.
    let total_kev = kev_entries.iter().filter(|e| !e.cve_id.is_empty()).count();
    let percentage = if total_kev > 0 {
        round2(findings.len() as f64 / total_kev as f64 * 100.0)
    } else {
        0.0
    };

    CorrelationResult {
        summary: CorrelationSummary {
            total_kev_vulnerabilities: total_kev,
            total_matched_in_docker: findings.len(),
            percentage_matched: percentage,
            affected_images: affected_images.len(),
        },
        correlated_vulnerabilities: findings,
    }
}

fn enrich(
    record: &serde_json::Value,
    result_set: &serde_json::Value,
    doc: &serde_json::Value,
    kev: &KevEntry,
) -> CorrelatedFinding {
    // PkgIdentifier.InstalledVersion wins over the top-level field.
    let installed_version = record
        .get("PkgIdentifier")
        .and_then(|p| p.get("InstalledVersion"))
        .and_then(|v| v.as_str())
        .or_else(|| record.get("InstalledVersion").and_then(|v| v.as_str()))
        .unwrap_or(UNKNOWN);

    let layer_id = record
        .get("Layer")
        .and_then(|l| l.get("DiffID"))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN);

    CorrelatedFinding {
        cve_id: str_field(record, "VulnerabilityID"),
        severity: str_field(record, "Severity"),
        package_name: str_field(record, "PkgName"),
        installed_version: installed_version.to_string(),
        layer_id: layer_id.to_string(),
        image_name: str_field(result_set, "Target"),
        image_id: str_field(doc, "image_uri"),
        repository: str_field(doc, "repository"),
        vendor_project: kev.vendor_project.clone(),
        product: kev.product.clone(),
        vulnerability_name: kev.vulnerability_name.clone(),
        date_added: kev.date_added.clone(),
        due_date: kev.due_date.clone(),
        short_description: kev.short_description.clone(),
        required_action: kev.required_action.clone(),
        known_ransomware_campaign_use: kev.known_ransomware_campaign_use.clone(),
        notes: kev.notes.clone(),
        cwes: kev.cwes.clone(),
    }
}

fn str_field(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
