// argus-core/src/domain/kev.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The catalog keeps only the most recent entries by `dateAdded`.
pub const CATALOG_CAP: usize = 100;

/// One Known Exploited Vulnerability catalog entry, using the upstream
/// feed's field names on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct KevEntry {
    #[serde(rename = "cveID", default)]
    pub cve_id: String,
    #[serde(rename = "vendorProject", default)]
    pub vendor_project: String,
    #[serde(default)]
    pub product: String,
    #[serde(rename = "vulnerabilityName", default)]
    pub vulnerability_name: String,
    #[serde(rename = "dateAdded", default)]
    pub date_added: String,
    #[serde(rename = "shortDescription", default)]
    pub short_description: String,
    #[serde(rename = "requiredAction", default)]
    pub required_action: String,
    #[serde(rename = "dueDate", default)]
    pub due_date: String,
    #[serde(rename = "knownRansomwareCampaignUse", default)]
    pub known_ransomware_campaign_use: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub cwes: Vec<String>,
    /// Stamped at catalog refresh time, absent on the upstream feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported_at: Option<DateTime<Utc>>,
}

/// The upstream feed document: a wrapper with a `vulnerabilities` array.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KevFeed {
    #[serde(default)]
    pub vulnerabilities: Vec<KevEntry>,
}

/// Sorts by `dateAdded` descending and keeps the newest [`CATALOG_CAP`]
/// entries, stamping `imported_at` on each.
pub fn cap_catalog(mut entries: Vec<KevEntry>, imported_at: DateTime<Utc>) -> Vec<KevEntry> {
    entries.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    entries.truncate(CATALOG_CAP);
    for entry in &mut entries {
        entry.imported_at = Some(imported_at);
    }
    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(cve: &str, date: &str) -> KevEntry {
        KevEntry {
            cve_id: cve.to_string(),
            date_added: date.to_string(),
            ..KevEntry::default()
        }
    }

    #[test]
    fn test_cap_keeps_newest_hundred() {
        let entries: Vec<KevEntry> = (0..150)
            .map(|i| entry(&format!("CVE-2025-{:04}", i), &format!("2025-01-{:02}", (i % 28) + 1)))
            .collect();
        let capped = cap_catalog(entries, Utc::now());
        assert_eq!(capped.len(), CATALOG_CAP);
        // Descending by dateAdded.
        for pair in capped.windows(2) {
            assert!(pair[0].date_added >= pair[1].date_added);
        }
        assert!(capped.iter().all(|e| e.imported_at.is_some()));
    }

    #[test]
    fn test_feed_field_names() {
        let json = r#"{
            "vulnerabilities": [{
                "cveID": "CVE-2025-30154",
                "vendorProject": "reviewdog",
                "product": "action-setup",
                "vulnerabilityName": "Embedded Malicious Code Vulnerability",
                "dateAdded": "2025-03-24",
                "shortDescription": "desc",
                "requiredAction": "act",
                "dueDate": "2025-04-14",
                "knownRansomwareCampaignUse": "Unknown",
                "notes": "",
                "cwes": ["CWE-506"]
            }]
        }"#;
        let feed: KevFeed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.vulnerabilities[0].cve_id, "CVE-2025-30154");
        assert_eq!(feed.vulnerabilities[0].cwes, vec!["CWE-506"]);
    }
}
