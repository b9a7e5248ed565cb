use crate::error::Result;

/// Abstract interface for raw key-value storage.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while VehicleStore handles the "what" (records, timestamps, search).
///
/// All methods take `&self`; implementations that need mutation use
/// interior mutability or are stateless I/O.
pub trait StorageBackend {
    /// Read the value stored under `key`.
    /// Returns Ok(None) if nothing is stored there.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    /// MUST be atomic: readers see either the old or the new value, never a mix.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;

    /// List all keys that currently hold a value.
    fn keys(&self) -> Result<Vec<String>>;
}
