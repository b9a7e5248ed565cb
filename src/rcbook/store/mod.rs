//! # Storage Layer
//!
//! Vehicle records are kept by a [`VehicleStore`], which owns serialization and the
//! record-set semantics (ordering, timestamps, merge-on-update, search). The raw bytes
//! live behind a [`StorageBackend`], a small key-value interface in the spirit of a
//! browser's local storage.
//!
//! ## Split of Responsibilities
//!
//! - **Backend** (`backend.rs`): the "how". Read, write, remove and list string values
//!   by key. Knows nothing about vehicles.
//! - **Store** (`vehicle_store.rs`): the "what". Loads the single JSON array kept under
//!   the records key, applies an operation, and writes the whole array back in one call.
//!
//! ## Failure Model
//!
//! - Reads **fail closed**: an unreadable or corrupt record set lists as empty and is
//!   logged, never raised.
//! - Writes propagate: a backend that cannot persist returns `Err` from
//!   create/update/delete, and the previous record set stays in place.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key, atomic tmp+rename writes.
//! - [`mem_backend::MemBackend`]: `RefCell<HashMap>` for tests, with write-error simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── store/
//! │   └── vehicles.json   # JSON array of all vehicle records, insertion order
//! └── config.json         # RcbookConfig
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod vehicle_store;

pub use backend::StorageBackend;
pub use vehicle_store::{VehicleStore, DEFAULT_RECORDS_KEY};
