//! Record list with filtering, selection, deletion and export.
//!
//! The dashboard keeps a snapshot of the record set (`vehicles`), the filtered view
//! derived from the current query, and a [`Selection`] over record ids. The store is
//! passed into each operation that needs it rather than held.
//!
//! Bulk export renders selected records one at a time, in store order, into an
//! in-memory zip. The archive reaches disk only if every document rendered; on any
//! failure the selection is kept so the export can be retried.

use crate::commands::export;
use crate::commands::selection::{Selection, SelectionState};
use crate::commands::{CmdMessage, CmdResult, VehicleStats};
use crate::model::{Vehicle, VehicleField};
use crate::render::DocumentRenderer;
use crate::search::filter_vehicles;
use crate::store::{StorageBackend, VehicleStore};
use chrono::NaiveDate;
use log::{error, info};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    vehicles: Vec<Vehicle>,
    filtered: Vec<Vehicle>,
    query: String,
    selection: Selection,
}

impl Dashboard {
    pub fn load<B: StorageBackend>(store: &VehicleStore<B>) -> Self {
        let mut dashboard = Self::default();
        dashboard.reload(store);
        dashboard
    }

    /// Re-reads the record set and re-applies the current query.
    pub fn reload<B: StorageBackend>(&mut self, store: &VehicleStore<B>) {
        self.vehicles = store.list();
        self.apply_filter(store);
    }

    pub fn set_query<B: StorageBackend>(&mut self, store: &VehicleStore<B>, query: &str) {
        self.query = query.to_string();
        self.apply_filter(store);
    }

    fn apply_filter<B: StorageBackend>(&mut self, store: &VehicleStore<B>) {
        self.filtered = filter_vehicles(store, &self.vehicles, &self.query);
        self.selection
            .set_visible(self.filtered.iter().map(|v| v.id).collect());
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn filtered(&self) -> &[Vehicle] {
        &self.filtered
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn toggle(&mut self, id: Uuid) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all();
    }

    pub fn select_none(&mut self) {
        self.selection.select_none();
    }

    /// Selected records that still exist, in store order.
    pub fn selected_vehicles(&self) -> Vec<Vehicle> {
        self.vehicles
            .iter()
            .filter(|v| self.selection.contains(&v.id))
            .cloned()
            .collect()
    }

    /// Deletes a record and drops it from the selection. A missing id is a no-op.
    pub fn delete<B: StorageBackend>(
        &mut self,
        store: &mut VehicleStore<B>,
        id: &Uuid,
    ) -> CmdResult {
        let existing = store.get_by_id(id);
        match store.delete(id) {
            Ok(true) => {
                self.reload(store);
                self.selection.remove(id);
                info!("Deleted vehicle {}", id);
                CmdResult::default()
                    .with_affected_vehicles(existing.into_iter().collect())
                    .with_message(CmdMessage::success("Vehicle has been removed successfully"))
            }
            Ok(false) => CmdResult::default(),
            Err(e) => {
                error!("Error deleting vehicle {}: {}", id, e);
                CmdResult::default()
                    .with_message(CmdMessage::error("Failed to delete vehicle. Please try again."))
            }
        }
    }

    /// Zips a certificate for every selected record into `out_dir`.
    pub fn bulk_export<R: DocumentRenderer>(
        &mut self,
        renderer: &R,
        out_dir: &Path,
        date: NaiveDate,
    ) -> CmdResult {
        if self.selection.is_empty() {
            return CmdResult::default().with_message(CmdMessage::warning(
                "Please select vehicles to generate PDFs",
            ));
        }

        let selected = self.selected_vehicles();
        match export::export_archive(renderer, &selected, out_dir, date) {
            Ok(path) => {
                info!("Exported {} certificates to {}", selected.len(), path.display());
                self.selection.select_none();
                let message =
                    CmdMessage::success(format!("Generated {} PDF(s) in ZIP file", selected.len()));
                CmdResult::default()
                    .with_affected_vehicles(selected)
                    .with_files(vec![path])
                    .with_message(message)
            }
            Err(e) => {
                error!("Error generating bulk PDFs: {}", e);
                CmdResult::default().with_message(CmdMessage::error(
                    "Failed to generate bulk PDFs. Please try again.",
                ))
            }
        }
    }

    /// Writes one certificate into `out_dir`.
    pub fn export_one<R: DocumentRenderer>(
        &self,
        renderer: &R,
        id: &Uuid,
        out_dir: &Path,
    ) -> CmdResult {
        let Some(vehicle) = self.vehicles.iter().find(|v| &v.id == id) else {
            return CmdResult::default()
                .with_message(CmdMessage::error(format!("Vehicle not found: {}", id)));
        };

        match export::write_pdf(renderer, vehicle, out_dir) {
            Ok(path) => {
                info!("Exported certificate to {}", path.display());
                let message = CmdMessage::success(format!("Generated {}", path.display()));
                CmdResult::default()
                    .with_affected_vehicles(vec![vehicle.clone()])
                    .with_files(vec![path])
                    .with_message(message)
            }
            Err(e) => {
                error!("Error generating PDF for {}: {}", id, e);
                CmdResult::default().with_message(CmdMessage::error(
                    "Failed to generate PDF. Please try again.",
                ))
            }
        }
    }

    pub fn stats(&self) -> VehicleStats {
        VehicleStats {
            total: self.vehicles.len(),
            selected: self.selection.len(),
            light_vehicles: self
                .vehicles
                .iter()
                .filter(|v| {
                    v.get(VehicleField::VehicleClass)
                        .is_some_and(|c| c.contains("LMV"))
                })
                .count(),
            electric: self
                .vehicles
                .iter()
                .filter(|v| v.get(VehicleField::FuelType) == Some("ELECTRIC"))
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::{RcbookError, Result};
    use crate::model::VehicleFields;
    use crate::store::mem_backend::MemBackend;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    struct StubRenderer {
        fail: bool,
    }

    impl DocumentRenderer for StubRenderer {
        fn render(&self, vehicle: &Vehicle) -> Result<Vec<u8>> {
            if self.fail {
                return Err(RcbookError::Render("template missing".to_string()));
            }
            Ok(format!("%PDF {}", vehicle.display_number()).into_bytes())
        }
    }

    fn seeded() -> VehicleStore<MemBackend> {
        let mut store = VehicleStore::with_backend(MemBackend::new());
        for (number, class, fuel) in [
            ("TN 01 AB 1234", "MCWG (Motor Cycle With Gear)", "PETROL"),
            ("KA 05 MN 9876", "LMV (Light Motor Vehicle)", "ELECTRIC"),
            ("MH 12 CD 5678", "LMV (Light Motor Vehicle)", "DIESEL"),
        ] {
            store
                .create(
                    VehicleFields::new()
                        .with(VehicleField::VehicleNumber, number)
                        .with(VehicleField::VehicleClass, class)
                        .with(VehicleField::FuelType, fuel),
                )
                .unwrap();
        }
        store
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn query_narrows_the_view() {
        let store = seeded();
        let mut dash = Dashboard::load(&store);
        assert_eq!(dash.filtered().len(), 3);

        dash.set_query(&store, "lmv");
        assert_eq!(dash.filtered().len(), 2);

        dash.set_query(&store, "  ");
        assert_eq!(dash.filtered().len(), 3);
    }

    #[test]
    fn delete_removes_record_and_selection_only() {
        let mut store = seeded();
        let mut dash = Dashboard::load(&store);
        dash.select_all();
        let victim = dash.filtered()[1].id;

        let result = dash.delete(&mut store, &victim);
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert!(store.get_by_id(&victim).is_none());
        assert!(!dash.selection().contains(&victim));
        assert_eq!(dash.selection().len(), 2);
        assert_eq!(dash.vehicles().len(), 2);
        assert_eq!(dash.selection_state(), SelectionState::All);
    }

    #[test]
    fn deleting_missing_id_is_silent() {
        let mut store = seeded();
        let mut dash = Dashboard::load(&store);
        let result = dash.delete(&mut store, &Uuid::new_v4());
        assert!(result.messages.is_empty());
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn empty_selection_is_rejected() {
        let store = seeded();
        let dir = tempdir().unwrap();
        let mut dash = Dashboard::load(&store);

        let result = dash.bulk_export(&StubRenderer { fail: false }, dir.path(), today());
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(result.messages[0].content, "Please select vehicles to generate PDFs");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn bulk_export_writes_one_archive_and_clears_selection() {
        let store = seeded();
        let dir = tempdir().unwrap();
        let mut dash = Dashboard::load(&store);
        let ids: Vec<Uuid> = dash.filtered().iter().map(|v| v.id).collect();
        dash.toggle(ids[2]);
        dash.toggle(ids[0]);

        let result = dash.bulk_export(&StubRenderer { fail: false }, dir.path(), today());
        assert!(!result.has_errors());
        assert_eq!(result.messages[0].content, "Generated 2 PDF(s) in ZIP file");
        assert!(dash.selection().is_empty());

        let path = dir.path().join("vehicle_pdfs_2024-06-01.zip");
        assert_eq!(result.files, vec![path.clone()]);
        let archive = zip::ZipArchive::new(Cursor::new(fs::read(path).unwrap())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"TN01AB1234_RC.pdf"));
        assert!(names.contains(&"MH12CD5678_RC.pdf"));
    }

    #[test]
    fn failed_bulk_export_keeps_selection_and_writes_nothing() {
        let store = seeded();
        let dir = tempdir().unwrap();
        let mut dash = Dashboard::load(&store);
        dash.select_all();

        let result = dash.bulk_export(&StubRenderer { fail: true }, dir.path(), today());
        assert!(result.has_errors());
        assert_eq!(result.messages.len(), 1);
        assert_eq!(dash.selection().len(), 3);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn hidden_selections_are_still_exported() {
        let store = seeded();
        let dir = tempdir().unwrap();
        let mut dash = Dashboard::load(&store);
        dash.select_all();
        dash.set_query(&store, "TN 01");
        assert_eq!(dash.filtered().len(), 1);

        let result = dash.bulk_export(&StubRenderer { fail: false }, dir.path(), today());
        assert_eq!(result.affected_vehicles.len(), 3);
    }

    #[test]
    fn export_one_names_file_after_vehicle() {
        let store = seeded();
        let dir = tempdir().unwrap();
        let dash = Dashboard::load(&store);
        let id = dash.vehicles()[1].id;

        let result = dash.export_one(&StubRenderer { fail: false }, &id, dir.path());
        assert_eq!(result.files, vec![dir.path().join("KA05MN9876_RC.pdf")]);

        let missing = dash.export_one(&StubRenderer { fail: false }, &Uuid::new_v4(), dir.path());
        assert!(missing.has_errors());
    }

    #[test]
    fn stats_count_classes_and_fuel() {
        let store = seeded();
        let mut dash = Dashboard::load(&store);
        let first = dash.vehicles()[0].id;
        dash.toggle(first);

        let stats = dash.stats();
        assert_eq!(
            stats,
            VehicleStats {
                total: 3,
                selected: 1,
                light_vehicles: 2,
                electric: 1,
            }
        );
    }
}
