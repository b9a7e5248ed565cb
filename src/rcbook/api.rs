//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single entry
//! point for every rcbook operation, whatever the client.
//!
//! The facade:
//! - **Dispatches** to the form, dashboard and command modules
//! - **Normalizes inputs**: record references typed by a user ([`RecordRef`]) are
//!   resolved to ids here
//! - **Returns structured types** (`Result<CmdResult>`), never strings for display
//!
//! `RcbookApi<B, R>` is generic over the storage backend and the renderer:
//! production uses `FsBackend` + `PdfRenderer`, tests use `MemBackend` and a stub
//! renderer.
//!
//! ## Record References
//!
//! A reference is either a 1-based position in the listed view (`2`) or a prefix of
//! the record id, at least four hex characters (`6f1c`). Positions are resolved
//! against the view for the query in effect, so `list --search diesel` followed by
//! `export --search diesel 1` addresses the same row.

use crate::commands;
use crate::commands::dashboard::Dashboard;
use crate::commands::form::VehicleForm;
use crate::error::{RcbookError, Result};
use crate::model::{Vehicle, VehicleFields};
use crate::render::DocumentRenderer;
use crate::store::{StorageBackend, VehicleStore};
use chrono::NaiveDate;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

const MIN_ID_PREFIX: usize = 4;

/// A user-facing reference to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Index(usize),
    IdPrefix(String),
}

impl FromStr for RecordRef {
    type Err = RcbookError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            return match s.parse::<usize>() {
                Ok(n) if n > 0 => Ok(RecordRef::Index(n)),
                _ => Err(RcbookError::Api(format!("Invalid index: {}", s))),
            };
        }
        let hex_digits = s.chars().filter(|c| *c != '-').count();
        if hex_digits >= MIN_ID_PREFIX && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Ok(RecordRef::IdPrefix(s.to_ascii_lowercase()));
        }
        Err(RcbookError::Api(format!(
            "Invalid reference '{}': use a list index or at least {} characters of the id",
            s, MIN_ID_PREFIX
        )))
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Index(i) => write!(f, "{}", i),
            RecordRef::IdPrefix(p) => write!(f, "{}", p),
        }
    }
}

impl RecordRef {
    /// Resolves against `view` (for indexes) and `all` (for id prefixes).
    pub fn resolve(&self, view: &[Vehicle], all: &[Vehicle]) -> Result<Uuid> {
        match self {
            RecordRef::Index(i) => view
                .get(i - 1)
                .map(|v| v.id)
                .ok_or_else(|| RcbookError::Api(format!("No vehicle at index {}", i))),
            RecordRef::IdPrefix(prefix) => {
                let mut hits = all
                    .iter()
                    .filter(|v| v.id.to_string().starts_with(prefix.as_str()));
                match (hits.next(), hits.next()) {
                    (Some(v), None) => Ok(v.id),
                    (None, _) => Err(RcbookError::Api(format!("No vehicle with id {}", prefix))),
                    (Some(_), Some(_)) => {
                        Err(RcbookError::Api(format!("Id prefix {} is ambiguous", prefix)))
                    }
                }
            }
        }
    }
}

/// Which records a bulk export covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    /// Every record in the view.
    All,
    /// Specific records.
    Refs(Vec<RecordRef>),
}

pub struct RcbookApi<B: StorageBackend, R: DocumentRenderer> {
    store: VehicleStore<B>,
    renderer: R,
    paths: RcbookPaths,
}

impl<B: StorageBackend, R: DocumentRenderer> RcbookApi<B, R> {
    pub fn new(store: VehicleStore<B>, renderer: R, paths: RcbookPaths) -> Self {
        Self {
            store,
            renderer,
            paths,
        }
    }

    pub fn paths(&self) -> &RcbookPaths {
        &self.paths
    }

    pub fn store(&self) -> &VehicleStore<B> {
        &self.store
    }

    fn dashboard(&self, query: Option<&str>) -> Dashboard {
        let mut dashboard = Dashboard::load(&self.store);
        if let Some(q) = query {
            dashboard.set_query(&self.store, q);
        }
        dashboard
    }

    fn resolve_all(&self, dashboard: &Dashboard, refs: &[RecordRef]) -> Result<Vec<Uuid>> {
        refs.iter()
            .map(|r| r.resolve(dashboard.filtered(), dashboard.vehicles()))
            .collect()
    }

    pub fn list(&self, query: Option<&str>) -> Result<CmdResult> {
        let dashboard = self.dashboard(query);
        let mut result = CmdResult::default()
            .with_listed_vehicles(dashboard.filtered().to_vec())
            .with_stats(dashboard.stats());
        if dashboard.vehicles().is_empty() {
            result.add_message(CmdMessage::info("No vehicles yet."));
        } else if dashboard.filtered().is_empty() {
            result.add_message(CmdMessage::info("No vehicles match your search."));
        }
        Ok(result)
    }

    pub fn view(&self, refs: &[RecordRef]) -> Result<CmdResult> {
        let dashboard = self.dashboard(None);
        let ids = self.resolve_all(&dashboard, refs)?;
        let vehicles = ids
            .iter()
            .filter_map(|id| dashboard.vehicles().iter().find(|v| &v.id == id).cloned())
            .collect();
        Ok(CmdResult::default().with_listed_vehicles(vehicles))
    }

    pub fn create(&mut self, fields: &VehicleFields) -> Result<CmdResult> {
        let mut form = VehicleForm::new();
        for (field, value) in fields.present() {
            form.set(field, value);
        }
        Ok(form.submit(&mut self.store))
    }

    /// Applies `fields` on top of the record's current values.
    pub fn update(&mut self, target: &RecordRef, fields: &VehicleFields) -> Result<CmdResult> {
        let dashboard = self.dashboard(None);
        let id = target.resolve(dashboard.filtered(), dashboard.vehicles())?;
        let vehicle = self
            .store
            .get_by_id(&id)
            .ok_or(RcbookError::VehicleNotFound(id))?;

        let mut form = VehicleForm::edit(&vehicle);
        for (field, value) in fields.present() {
            form.set(field, value);
        }
        Ok(form.submit(&mut self.store))
    }

    pub fn delete(&mut self, refs: &[RecordRef]) -> Result<CmdResult> {
        let mut dashboard = self.dashboard(None);
        let ids = self.resolve_all(&dashboard, refs)?;

        let mut result = CmdResult::default();
        for id in ids {
            let step = dashboard.delete(&mut self.store, &id);
            result.affected_vehicles.extend(step.affected_vehicles);
            result.messages.extend(step.messages);
        }
        Ok(result)
    }

    /// One PDF per referenced record, written to `out_dir`.
    pub fn export_one(&self, refs: &[RecordRef], out_dir: &Path) -> Result<CmdResult> {
        let dashboard = self.dashboard(None);
        let ids = self.resolve_all(&dashboard, refs)?;

        let mut result = CmdResult::default();
        for id in ids {
            let step = dashboard.export_one(&self.renderer, &id, out_dir);
            result.affected_vehicles.extend(step.affected_vehicles);
            result.files.extend(step.files);
            result.messages.extend(step.messages);
        }
        Ok(result)
    }

    /// One zip of certificates for the selected records.
    pub fn export_bulk(
        &self,
        query: Option<&str>,
        scope: &ExportScope,
        out_dir: &Path,
        date: NaiveDate,
    ) -> Result<CmdResult> {
        let mut dashboard = self.dashboard(query);
        match scope {
            ExportScope::All => dashboard.select_all(),
            ExportScope::Refs(refs) => {
                for id in self.resolve_all(&dashboard, refs)? {
                    if !dashboard.selection().contains(&id) {
                        dashboard.toggle(id);
                    }
                }
            }
        }
        Ok(dashboard.bulk_export(&self.renderer, out_dir, date))
    }

    pub fn seed_samples(&mut self) -> Result<CmdResult> {
        commands::sample::run(&mut self.store)
    }

    pub fn stats(&self) -> Result<CmdResult> {
        Ok(CmdResult::default().with_stats(self.dashboard(None).stats()))
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.paths, action)
    }
}

/// Parses every input as a [`RecordRef`], failing on the first bad one.
pub fn parse_refs<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<RecordRef>> {
    inputs.iter().map(|s| s.as_ref().parse()).collect()
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, RcbookPaths, VehicleStats};
