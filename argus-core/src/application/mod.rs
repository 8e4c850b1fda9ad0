// argus-core/src/application/mod.rs

pub mod blob_scan;
pub mod correlate;
pub mod kev_sync;
pub mod projector;
pub mod relationships;
pub mod summary;
pub mod tabular_scan;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI import the services without knowing the file layout.

pub use blob_scan::{BlobScanReport, BlobScanner};
pub use correlate::CorrelationService;
pub use kev_sync::{KevCatalogService, KevFilter, KevSyncReport};
pub use projector::{GraphProjector, ProjectionReport};
pub use relationships::{RelationshipBuilder, RelationshipReport};
pub use summary::{GraphSummary, SummaryService, VulnerabilitySummary};
pub use tabular_scan::{TabularScanReport, TabularScanner};
