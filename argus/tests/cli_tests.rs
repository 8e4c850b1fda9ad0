use anyhow::Result;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

/// Abstraction for managing the argus test environment: a temp working
/// directory acting as config dir and data dir.
struct ArgusTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl ArgusTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        Ok(Self { _tmp: tmp, root })
    }

    fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn argus(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("argus"));
        cmd.current_dir(&self.root);
        cmd
    }

    /// Seeds the container scan collection with one image carrying one
    /// critical CVE known to the KEV feed below.
    fn seed_container_scans(&self) -> Result<()> {
        self.write(
            "data/container_image_vulnerability.json",
            r#"[{
                "id": "img-1",
                "artifact_name": "registry/app:1.0",
                "vulnerabilities": [{
                    "Target": "app (alpine 3.19)",
                    "Vulnerabilities": [{
                        "VulnerabilityID": "CVE-2025-30154",
                        "Severity": "CRITICAL",
                        "PkgName": "action-setup",
                        "PkgIdentifier": {"InstalledVersion": "1.0.7"}
                    }]
                }]
            }]"#,
        )
    }

    fn seed_kev_feed(&self) -> Result<()> {
        self.write(
            "feed.json",
            r#"{"vulnerabilities": [
                {"cveID": "CVE-2025-30154", "vendorProject": "reviewdog",
                 "product": "action-setup", "dateAdded": "2025-03-24"},
                {"cveID": "CVE-2021-44228", "vendorProject": "Apache",
                 "product": "Log4j", "dateAdded": "2021-12-10"}
            ]}"#,
        )
    }
}

#[test]
fn test_kev_sync_imports_feed() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    env.seed_kev_feed()?;

    env.argus()
        .args(["kev-sync", "--feed", "feed.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 imported"));

    let catalog = std::fs::read_to_string(
        env.root.join("data/known_exploited_vulnerabilities_catalog.json"),
    )?;
    assert!(catalog.contains("CVE-2025-30154"));
    assert!(catalog.contains("imported_at"));
    Ok(())
}

#[test]
fn test_correlate_reports_match_share() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    env.seed_kev_feed()?;
    env.seed_container_scans()?;

    env.argus()
        .args(["kev-sync", "--feed", "feed.json"])
        .assert()
        .success();

    env.argus()
        .arg("correlate")
        .assert()
        .success()
        .stdout(predicate::str::contains("50.00"))
        .stdout(predicate::str::contains("CVE-2025-30154"))
        .stdout(predicate::str::contains("1.0.7"));
    Ok(())
}

#[test]
fn test_project_then_summary() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    env.seed_kev_feed()?;
    env.seed_container_scans()?;

    env.argus()
        .args(["kev-sync", "--feed", "feed.json"])
        .assert()
        .success();

    env.argus()
        .args(["project", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("container_vulnerability"));

    // The graph snapshot persists between invocations.
    env.argus()
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("dockerimage"))
        .stdout(predicate::str::contains("has_vulnerability"))
        .stdout(predicate::str::contains("exploits"));
    Ok(())
}

#[test]
fn test_relate_runs_statement_batch() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    env.seed_kev_feed()?;
    env.seed_container_scans()?;
    env.write(
        "statements.yaml",
        r#"
- relationship_type: exploits
  source:
    label: knownexploitedvulnerability
    property: cveid
  target:
    label: vulnerability
    property: vulnerabilityid
  merge: true
"#,
    )?;

    env.argus()
        .args(["kev-sync", "--feed", "feed.json"])
        .assert()
        .success();
    env.argus().args(["project", "all"]).assert().success();

    env.argus()
        .args(["relate", "--statements", "statements.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exploits"));
    Ok(())
}

#[test]
fn test_scan_blob_masks_samples() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    env.write(
        "blobs/exports/users.csv",
        "name,email\nAlice,john.doe@example.com\n",
    )?;

    env.argus()
        .args(["scan-blob", "--root", "blobs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Email Address"))
        .stdout(predicate::str::contains("j*******@example.com"))
        .stdout(predicate::str::contains("john.doe@example.com").not());

    assert!(env.root.join("data/blob_compliance_security.json").exists());
    Ok(())
}

#[test]
fn test_scan_blob_empty_root_fails() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    std::fs::create_dir_all(env.root.join("empty"))?;

    env.argus()
        .args(["scan-blob", "--root", "empty"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_scan_db_requires_password() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    env.write(
        "argus.yaml",
        r#"
connections:
  test-db:
    type: duckdb
    host: localhost
    port: 0
    username: scanner
    database: test.duckdb
    password_env: ARGUS_TEST_DB_PASSWORD
"#,
    )?;

    let conn = duckdb::Connection::open(env.root.join("test.duckdb"))?;
    conn.execute_batch(
        "CREATE TABLE customers (email VARCHAR);
         INSERT INTO customers VALUES ('john.doe@example.com');",
    )?;
    drop(conn);

    // Missing password: refused before any table is read.
    env.argus()
        .args(["scan-db", "--credential", "test-db"])
        .env_remove("ARGUS_TEST_DB_PASSWORD")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    env.argus()
        .args(["scan-db", "--credential", "test-db"])
        .env("ARGUS_TEST_DB_PASSWORD", "s3cret-value")
        .assert()
        .success()
        .stdout(predicate::str::contains("Email Address"))
        .stdout(predicate::str::contains("s3cret-value").not());
    Ok(())
}

#[test]
fn test_query_rejects_writes() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    let conn = duckdb::Connection::open(env.root.join("argus_db.duckdb"))?;
    conn.execute_batch("CREATE TABLE t (v INTEGER); INSERT INTO t VALUES (7);")?;
    drop(conn);

    env.argus()
        .args(["query", "SELECT v FROM t"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7"));

    env.argus()
        .args(["query", "DELETE FROM t"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_unknown_family_fails() -> Result<()> {
    let env = ArgusTestEnv::new()?;
    env.argus()
        .args(["project", "nonsense"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown entity family"));
    Ok(())
}
