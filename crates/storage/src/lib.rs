//! Document persistence for study records.
//!
//! Each record type lives in its own collection. Postgres stores documents as
//! JSONB; an in-memory backend serves tests and demos; an offline backend
//! stands in when no database is reachable.

pub mod collection;
pub mod error;
pub mod memory;
mod postgres;
pub mod query;
pub mod store;

pub use collection::{Collection, Record, RecordId, Stored};
pub use error::StorageError;
pub use memory::MemoryStore;
pub use query::{ListQuery, SortDirection};
pub use store::{prepare_document, DocumentStore, StoreBackend};
