use super::backend::StorageBackend;
use crate::error::{RcbookError, Result};
use crate::model::{Vehicle, VehicleFields};
use crate::search::matches_query;
use chrono::Utc;
use log::{debug, warn};
use uuid::Uuid;

/// Storage key holding the serialized record set.
pub const DEFAULT_RECORDS_KEY: &str = "vehicles";

pub struct VehicleStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    key: String,
}

impl<B: StorageBackend> VehicleStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            key: DEFAULT_RECORDS_KEY.to_string(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// All records in insertion order.
    ///
    /// Fails closed: unreadable or corrupt storage lists as empty.
    pub fn list(&self) -> Vec<Vehicle> {
        match self.load() {
            Ok(vehicles) => vehicles,
            Err(e) => {
                warn!("Error loading vehicles from '{}': {}", self.key, e);
                Vec::new()
            }
        }
    }

    pub fn get_by_id(&self, id: &Uuid) -> Option<Vehicle> {
        self.list().into_iter().find(|v| &v.id == id)
    }

    /// Appends a new record with a fresh id and both timestamps set to now.
    pub fn create(&mut self, data: VehicleFields) -> Result<Vehicle> {
        let mut vehicles = self.list();

        let mut vehicle = Vehicle::new(data);
        while vehicles.iter().any(|v| v.id == vehicle.id) {
            vehicle.id = Uuid::new_v4();
        }

        vehicles.push(vehicle.clone());
        self.persist(&vehicles)?;
        debug!("Created vehicle {}", vehicle.id);
        Ok(vehicle)
    }

    /// Merges `data` onto the record and refreshes its update timestamp.
    /// Returns Ok(None) when no record has this id.
    pub fn update(&mut self, id: &Uuid, data: &VehicleFields) -> Result<Option<Vehicle>> {
        let mut vehicles = self.list();
        let Some(vehicle) = vehicles.iter_mut().find(|v| &v.id == id) else {
            return Ok(None);
        };

        data.merge_onto(&mut vehicle.fields);
        vehicle.updated_at = Utc::now().max(vehicle.created_at);
        let updated = vehicle.clone();

        self.persist(&vehicles)?;
        debug!("Updated vehicle {}", id);
        Ok(Some(updated))
    }

    /// Removes the record if present. Returns whether a removal occurred.
    pub fn delete(&mut self, id: &Uuid) -> Result<bool> {
        let vehicles = self.list();
        let before = vehicles.len();
        let remaining: Vec<Vehicle> = vehicles.into_iter().filter(|v| &v.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }

        self.persist(&remaining)?;
        debug!("Deleted vehicle {}", id);
        Ok(true)
    }

    /// Case-insensitive substring match against every attribute, store order kept.
    /// An empty query matches everything; callers wanting "no filter" short-circuit it.
    pub fn search(&self, query: &str) -> Vec<Vehicle> {
        let query_lower = query.to_lowercase();
        self.list()
            .into_iter()
            .filter(|v| matches_query(v, &query_lower))
            .collect()
    }

    fn load(&self) -> Result<Vec<Vehicle>> {
        match self.backend.read(&self.key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(RcbookError::Serialization),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, vehicles: &[Vehicle]) -> Result<()> {
        let content = serde_json::to_string_pretty(vehicles).map_err(RcbookError::Serialization)?;
        self.backend.write(&self.key, &content)?;
        debug!("Persisted {} vehicles to '{}'", vehicles.len(), self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleField;
    use crate::store::mem_backend::MemBackend;

    fn store() -> VehicleStore<MemBackend> {
        VehicleStore::with_backend(MemBackend::new())
    }

    fn fields(number: &str, owner: &str) -> VehicleFields {
        VehicleFields::new()
            .with(VehicleField::VehicleNumber, number)
            .with(VehicleField::OwnerName, owner)
    }

    #[test]
    fn create_then_get_returns_submitted_data() {
        let mut store = store();
        let data = fields("TN 01 AB 1234", "RAJESH KUMAR")
            .with(VehicleField::RegistrationDate, "2023-01-15");
        let created = store.create(data.clone()).unwrap();

        let fetched = store.get_by_id(&created.id).unwrap();
        assert_eq!(fetched.fields, data);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut store = store();
        let a = store.create(fields("A", "one")).unwrap();
        let b = store.create(fields("B", "two")).unwrap();
        let c = store.create(fields("C", "three")).unwrap();

        let ids: Vec<Uuid> = store.list().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn update_changes_only_supplied_field() {
        let mut store = store();
        let created = store
            .create(fields("KA 05 MN 9876", "PRIYA").with(VehicleField::FuelType, "DIESEL"))
            .unwrap();

        let patch = VehicleFields::new().with(VehicleField::OwnerName, "PRIYA SHARMA");
        let updated = store.update(&created.id, &patch).unwrap().unwrap();
        assert_eq!(updated.get(VehicleField::OwnerName), Some("PRIYA SHARMA"));

        let fetched = store.get_by_id(&created.id).unwrap();
        assert_eq!(fetched.get(VehicleField::OwnerName), Some("PRIYA SHARMA"));
        assert_eq!(fetched.get(VehicleField::VehicleNumber), Some("KA 05 MN 9876"));
        assert_eq!(fetched.get(VehicleField::FuelType), Some("DIESEL"));
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at >= fetched.created_at);
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let mut store = store();
        store.create(fields("A", "one")).unwrap();
        let patch = VehicleFields::new().with(VehicleField::Model, "X");
        assert!(store.update(&Uuid::new_v4(), &patch).unwrap().is_none());
    }

    #[test]
    fn delete_existing_and_missing() {
        let mut store = store();
        let a = store.create(fields("A", "one")).unwrap();
        let b = store.create(fields("B", "two")).unwrap();

        assert!(store.delete(&a.id).unwrap());
        assert!(store.get_by_id(&a.id).is_none());

        let before = store.list();
        assert!(!store.delete(&Uuid::new_v4()).unwrap());
        assert_eq!(store.list(), before);
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].id, b.id);
    }

    #[test]
    fn corrupt_storage_lists_empty() {
        let store = store();
        store.backend().put_raw(DEFAULT_RECORDS_KEY, "{not json");
        assert!(store.list().is_empty());
        assert!(store.get_by_id(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn write_failure_leaves_previous_state() {
        let mut store = store();
        store.create(fields("A", "one")).unwrap();

        store.backend().set_simulate_write_error(true);
        assert!(store.create(fields("B", "two")).is_err());
        store.backend().set_simulate_write_error(false);

        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let mut store = store();
        store.create(fields("TN 01 AB 1234", "Rajesh Kumar")).unwrap();
        store.create(fields("KA 05 MN 9876", "Priya Sharma")).unwrap();
        store.create(fields("MH 12 CD 5678", "Raj Patel")).unwrap();

        let hits = store.search("rAJ");
        let numbers: Vec<&str> = hits.iter().map(|v| v.display_number()).collect();
        assert_eq!(numbers, vec!["TN 01 AB 1234", "MH 12 CD 5678"]);

        assert!(store.search("nowhere").is_empty());
    }

    #[test]
    fn search_matches_identifier() {
        let mut store = store();
        let v = store.create(fields("A", "one")).unwrap();
        store.create(fields("B", "two")).unwrap();

        let prefix = &v.id.to_string()[..8];
        let hits = store.search(&prefix.to_uppercase());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, v.id);
    }

    #[test]
    fn custom_key_isolates_record_sets() {
        let mut store = store().with_key("fleet");
        store.create(fields("A", "one")).unwrap();
        assert_eq!(store.backend().keys().unwrap(), vec!["fleet".to_string()]);
    }
}
