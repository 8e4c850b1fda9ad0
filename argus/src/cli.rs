// argus/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "argus")]
#[command(about = "Asset graph projection, PII scanning and KEV correlation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding argus.yaml (falls back to built-in defaults
    /// when the file is absent)
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔄 Rebuilds the graph projection of one entity family (or all)
    Project {
        /// Family: cloud_asset | container_vulnerability | kev_catalog |
        /// blob_compliance | database_compliance | all
        #[arg(default_value = "all")]
        family: String,
    },

    /// 🔗 Executes a relationship statement batch against the graph
    Relate {
        /// YAML statement batch (defaults to the configured file, then
        /// the built-in statements)
        #[arg(long)]
        statements: Option<PathBuf>,
    },

    /// 🎯 Correlates the KEV catalog against container scan findings
    Correlate {
        /// Emit the full JSON result instead of the summary table
        #[arg(long)]
        json: bool,
    },

    /// 🕵️ Scans a relational database for PII
    ScanDb {
        /// Named connection from argus.yaml
        #[arg(long)]
        credential: String,
    },

    /// 🗂️ Scans an object store directory for PII
    ScanBlob {
        /// Root directory to scan
        #[arg(long)]
        root: PathBuf,
    },

    /// 📥 Refreshes the KEV catalog from a feed document
    KevSync {
        /// JSON feed file (CISA catalog shape)
        #[arg(long)]
        feed: PathBuf,
    },

    /// 📊 Prints node/edge counts and the vulnerability histogram
    Summary,

    /// ⚡ Runs an ad-hoc read-only SQL query against a DuckDB file
    Query {
        query: String,
        #[arg(long, default_value = "argus_db.duckdb")]
        db_path: String,
    },
}
