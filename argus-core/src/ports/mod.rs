// argus-core/src/ports/mod.rs

// Contracts the application layer needs from the outside world, without
// knowing how they are fulfilled. Adapters live in `infrastructure`.

pub mod blob;
pub mod credentials;
pub mod document_store;
pub mod graph_store;
pub mod tabular;

// Re-exports
pub use blob::{BlobSource, ObjectMeta};
pub use credentials::{Credential, CredentialResolver};
pub use document_store::DocumentStore;
pub use graph_store::{GraphSession, GraphStore};
pub use tabular::{TableRef, TableSample, TabularSource};
