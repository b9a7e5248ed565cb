//! Create/edit form for a single vehicle.
//!
//! The form holds a full snapshot of every field as entered. Submitting either creates
//! a record or, when the form was opened on an existing record, overwrites that
//! record's fields with the snapshot. Only the vehicle number is required.

use crate::commands::{CmdMessage, CmdResult};
use crate::model::{Vehicle, VehicleField, VehicleFields};
use crate::store::{StorageBackend, VehicleStore};
use log::{error, info};
use uuid::Uuid;

/// Characters kept after the three two-character groups.
const NUMBER_TAIL_LEN: usize = 4;

pub const VEHICLE_CLASSES: &[&str] = &[
    "MCWG (Motor Cycle With Gear)",
    "MCWOG (Motor Cycle Without Gear)",
    "LMV (Light Motor Vehicle)",
    "HMV (Heavy Motor Vehicle)",
    "TRANS (Transport Vehicle)",
    "TRACTOR",
    "TRAILER",
];

pub const FUEL_TYPES: &[&str] = &["PETROL", "DIESEL", "CNG", "LPG", "ELECTRIC", "HYBRID"];

pub const MANUFACTURERS: &[&str] = &[
    "BAJAJ AUTO LTD",
    "HERO MOTOCORP LTD",
    "HONDA MOTORCYCLE & SCOOTER INDIA PVT LTD",
    "MARUTI SUZUKI INDIA LTD",
    "HYUNDAI MOTOR INDIA LTD",
    "TATA MOTORS LTD",
    "MAHINDRA & MAHINDRA LTD",
    "TOYOTA KIRLOSKAR MOTOR PVT LTD",
    "FORD INDIA PVT LTD",
    "VOLKSWAGEN INDIA PVT LTD",
];

pub const RTO_OFFICES: &[&str] = &[
    "RTO CHENNAI CENTRAL",
    "RTO CHENNAI NORTH",
    "RTO CHENNAI SOUTH",
    "RTO BANGALORE EAST",
    "RTO BANGALORE WEST",
    "RTO MUMBAI CENTRAL",
    "RTO DELHI",
    "RTO PUNE",
    "RTO HYDERABAD",
    "RTO KOLKATA",
];

/// Suggested values per field. Free text is still accepted everywhere.
pub fn choices() -> [(VehicleField, &'static [&'static str]); 4] {
    [
        (VehicleField::VehicleClass, VEHICLE_CLASSES),
        (VehicleField::FuelType, FUEL_TYPES),
        (VehicleField::Manufacturer, MANUFACTURERS),
        (VehicleField::RtoOffice, RTO_OFFICES),
    ]
}

/// Formats a registration number as `TN 01 AB 1234`.
///
/// Drops everything but ASCII letters and digits, uppercases, then groups as 2-2-2
/// followed by at most four more characters. Anything past ten characters is lost.
pub fn normalize_vehicle_number(raw: &str) -> String {
    let cleaned: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let mut groups: Vec<String> = cleaned
        .chunks(2)
        .take(3)
        .map(|chunk| chunk.iter().collect())
        .collect();
    if cleaned.len() > 6 {
        groups.push(cleaned[6..].iter().take(NUMBER_TAIL_LEN).collect());
    }
    groups.join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingVehicleNumber,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingVehicleNumber => write!(f, "Please enter a vehicle number"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VehicleForm {
    editing: Option<Uuid>,
    fields: VehicleFields,
}

impl VehicleForm {
    /// Blank form for a new record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing record.
    pub fn edit(vehicle: &Vehicle) -> Self {
        Self {
            editing: Some(vehicle.id),
            fields: vehicle.fields.clone(),
        }
    }

    pub fn editing(&self) -> Option<Uuid> {
        self.editing
    }

    pub fn fields(&self) -> &VehicleFields {
        &self.fields
    }

    pub fn get(&self, field: VehicleField) -> Option<&str> {
        self.fields.get(field)
    }

    /// Sets one field. The vehicle number is normalized on every change.
    pub fn set(&mut self, field: VehicleField, value: &str) {
        let value = if field == VehicleField::VehicleNumber {
            normalize_vehicle_number(value)
        } else {
            value.to_string()
        };
        self.fields.set(field, Some(value));
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.fields.get(VehicleField::VehicleNumber) {
            Some(number) if !number.trim().is_empty() => Ok(()),
            _ => Err(ValidationError::MissingVehicleNumber),
        }
    }

    /// Saves the form. Failures come back as notices; the form is left untouched
    /// so it can be corrected and submitted again.
    pub fn submit<B: StorageBackend>(&self, store: &mut VehicleStore<B>) -> CmdResult {
        if let Err(e) = self.validate() {
            return CmdResult::default().with_message(CmdMessage::error(e.to_string()));
        }

        let snapshot = self.snapshot();
        match self.editing {
            Some(id) => match store.update(&id, &snapshot) {
                Ok(Some(vehicle)) => {
                    info!("Updated vehicle {}", vehicle.display_number());
                    CmdResult::default()
                        .with_affected_vehicles(vec![vehicle])
                        .with_message(CmdMessage::success(
                            "Vehicle information has been updated successfully",
                        ))
                }
                Ok(None) => CmdResult::default()
                    .with_message(CmdMessage::error(format!("Vehicle not found: {}", id))),
                Err(e) => save_failed(e),
            },
            None => match store.create(snapshot) {
                Ok(vehicle) => {
                    info!("Created vehicle {}", vehicle.display_number());
                    CmdResult::default()
                        .with_affected_vehicles(vec![vehicle])
                        .with_message(CmdMessage::success(
                            "New vehicle has been added successfully",
                        ))
                }
                Err(e) => save_failed(e),
            },
        }
    }

    /// Every field, with untouched ones as empty strings so an update writes the
    /// whole form (and clears what was emptied).
    fn snapshot(&self) -> VehicleFields {
        let mut snapshot = VehicleFields::new();
        for field in VehicleField::ALL {
            let value = self.fields.get(field).unwrap_or_default();
            snapshot.set(field, Some(value.to_string()));
        }
        snapshot
    }
}

fn save_failed(e: crate::error::RcbookError) -> CmdResult {
    error!("Error saving vehicle: {}", e);
    CmdResult::default().with_message(CmdMessage::error(
        "Failed to save vehicle. Please try again.",
    ))
}
