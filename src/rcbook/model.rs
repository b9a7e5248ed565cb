//! # Domain Model
//!
//! A [`Vehicle`] is an identifier, two timestamps, and twelve optional free-text
//! attributes carried in [`VehicleFields`]. The same `VehicleFields` shape doubles as
//! form data for create and as a partial patch for update: `None` means "leave alone",
//! an empty string means "clear".
//!
//! [`VehicleField`] names each attribute. Its `key()` is the camelCase name used both in
//! the persisted JSON and in the field layout table.
//!
//! ## Persisted Shape
//!
//! ```text
//! {
//!   "id": "6f1c…",
//!   "vehicleNumber": "TN 01 AB 1234",
//!   "ownerName": "RAJESH KUMAR",
//!   …
//!   "createdAt": "2024-05-01T10:00:00.000Z",
//!   "updatedAt": "2024-05-01T10:00:00.000Z"
//! }
//! ```
//!
//! Absent attributes are omitted from the JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VehicleField {
    VehicleNumber,
    OwnerName,
    VehicleClass,
    FuelType,
    ChassisNumber,
    EngineNumber,
    Manufacturer,
    Model,
    RegistrationDate,
    InsuranceValidTill,
    RtoOffice,
    OwnerAddress,
}

impl VehicleField {
    /// All fields, in certificate order.
    pub const ALL: [VehicleField; 12] = [
        VehicleField::VehicleNumber,
        VehicleField::OwnerName,
        VehicleField::VehicleClass,
        VehicleField::FuelType,
        VehicleField::ChassisNumber,
        VehicleField::EngineNumber,
        VehicleField::Manufacturer,
        VehicleField::Model,
        VehicleField::RegistrationDate,
        VehicleField::InsuranceValidTill,
        VehicleField::RtoOffice,
        VehicleField::OwnerAddress,
    ];

    pub fn key(self) -> &'static str {
        match self {
            VehicleField::VehicleNumber => "vehicleNumber",
            VehicleField::OwnerName => "ownerName",
            VehicleField::VehicleClass => "vehicleClass",
            VehicleField::FuelType => "fuelType",
            VehicleField::ChassisNumber => "chassisNumber",
            VehicleField::EngineNumber => "engineNumber",
            VehicleField::Manufacturer => "manufacturer",
            VehicleField::Model => "model",
            VehicleField::RegistrationDate => "registrationDate",
            VehicleField::InsuranceValidTill => "insuranceValidTill",
            VehicleField::RtoOffice => "rtoOffice",
            VehicleField::OwnerAddress => "ownerAddress",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VehicleField::VehicleNumber => "Vehicle Number",
            VehicleField::OwnerName => "Owner Name",
            VehicleField::VehicleClass => "Vehicle Class",
            VehicleField::FuelType => "Fuel Type",
            VehicleField::ChassisNumber => "Chassis Number",
            VehicleField::EngineNumber => "Engine Number",
            VehicleField::Manufacturer => "Manufacturer",
            VehicleField::Model => "Model",
            VehicleField::RegistrationDate => "Registration Date",
            VehicleField::InsuranceValidTill => "Insurance Valid Till",
            VehicleField::RtoOffice => "RTO Office",
            VehicleField::OwnerAddress => "Owner Address",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Date-valued fields are reformatted before they are placed on a certificate.
    pub fn is_date(self) -> bool {
        matches!(
            self,
            VehicleField::RegistrationDate | VehicleField::InsuranceValidTill
        )
    }
}

impl fmt::Display for VehicleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_valid_till: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rto_office: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
}

impl VehicleFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: VehicleField, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    pub fn get(&self, field: VehicleField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: VehicleField, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// Iterate over the attributes that are present, in certificate order.
    pub fn present(&self) -> impl Iterator<Item = (VehicleField, &str)> + '_ {
        VehicleField::ALL
            .into_iter()
            .filter_map(move |f| self.get(f).map(|v| (f, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }

    /// Applies every supplied field of `self` onto `target`.
    /// Blank values clear the target field.
    pub fn merge_onto(&self, target: &mut VehicleFields) {
        for field in VehicleField::ALL {
            if let Some(value) = self.get(field) {
                target.set(field, non_blank(value));
            }
        }
    }

    /// Drops blank values so they are stored as absent.
    pub fn normalized(mut self) -> Self {
        for field in VehicleField::ALL {
            let slot = self.slot_mut(field);
            if slot.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *slot = None;
            }
        }
        self
    }

    fn slot(&self, field: VehicleField) -> &Option<String> {
        match field {
            VehicleField::VehicleNumber => &self.vehicle_number,
            VehicleField::OwnerName => &self.owner_name,
            VehicleField::VehicleClass => &self.vehicle_class,
            VehicleField::FuelType => &self.fuel_type,
            VehicleField::ChassisNumber => &self.chassis_number,
            VehicleField::EngineNumber => &self.engine_number,
            VehicleField::Manufacturer => &self.manufacturer,
            VehicleField::Model => &self.model,
            VehicleField::RegistrationDate => &self.registration_date,
            VehicleField::InsuranceValidTill => &self.insurance_valid_till,
            VehicleField::RtoOffice => &self.rto_office,
            VehicleField::OwnerAddress => &self.owner_address,
        }
    }

    fn slot_mut(&mut self, field: VehicleField) -> &mut Option<String> {
        match field {
            VehicleField::VehicleNumber => &mut self.vehicle_number,
            VehicleField::OwnerName => &mut self.owner_name,
            VehicleField::VehicleClass => &mut self.vehicle_class,
            VehicleField::FuelType => &mut self.fuel_type,
            VehicleField::ChassisNumber => &mut self.chassis_number,
            VehicleField::EngineNumber => &mut self.engine_number,
            VehicleField::Manufacturer => &mut self.manufacturer,
            VehicleField::Model => &mut self.model,
            VehicleField::RegistrationDate => &mut self.registration_date,
            VehicleField::InsuranceValidTill => &mut self.insurance_valid_till,
            VehicleField::RtoOffice => &mut self.rto_office,
            VehicleField::OwnerAddress => &mut self.owner_address,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: VehicleFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(fields: VehicleFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            fields: fields.normalized(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get(&self, field: VehicleField) -> Option<&str> {
        self.fields.get(field)
    }

    /// Vehicle number for list views, `N/A` when missing.
    pub fn display_number(&self) -> &str {
        self.fields.vehicle_number.as_deref().unwrap_or("N/A")
    }

    /// String form of every attribute, identifier and timestamps included.
    pub fn attribute_strings(&self) -> Vec<String> {
        let mut values = Vec::with_capacity(VehicleField::ALL.len() + 3);
        values.push(self.id.to_string());
        values.extend(self.fields.present().map(|(_, v)| v.to_string()));
        values.push(self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true));
        values.push(self.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true));
        values
    }
}
