use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{VehicleField, VehicleFields};
use crate::store::{StorageBackend, VehicleStore};
use log::info;

use VehicleField::*;

const SAMPLES: [[(VehicleField, &str); 12]; 3] = [
    [
        (VehicleNumber, "TN01AB1234"),
        (OwnerName, "RAJESH KUMAR"),
        (VehicleClass, "MCWG (Motor Cycle With Gear)"),
        (FuelType, "PETROL"),
        (ChassisNumber, "ME4JF48DXJK123456"),
        (EngineNumber, "JF48DFH123456"),
        (Manufacturer, "BAJAJ AUTO LTD"),
        (Model, "PULSAR 150"),
        (RegistrationDate, "2023-01-15"),
        (InsuranceValidTill, "2024-12-31"),
        (RtoOffice, "RTO CHENNAI CENTRAL"),
        (
            OwnerAddress,
            "No.45, Gandhi Street, T.Nagar, Chennai - 600017, Tamil Nadu",
        ),
    ],
    [
        (VehicleNumber, "KA05MN9876"),
        (OwnerName, "PRIYA SHARMA"),
        (VehicleClass, "LMV (Light Motor Vehicle)"),
        (FuelType, "DIESEL"),
        (ChassisNumber, "MA3ERLF3S00123456"),
        (EngineNumber, "K9K792123456"),
        (Manufacturer, "MARUTI SUZUKI INDIA LTD"),
        (Model, "SWIFT DZIRE"),
        (RegistrationDate, "2022-08-20"),
        (InsuranceValidTill, "2025-08-19"),
        (RtoOffice, "RTO BANGALORE EAST"),
        (
            OwnerAddress,
            "Flat 302, Green Valley Apartments, Koramangala, Bangalore - 560034, Karnataka",
        ),
    ],
    [
        (VehicleNumber, "MH12CD5678"),
        (OwnerName, "AMIT PATEL"),
        (VehicleClass, "HMV (Heavy Motor Vehicle)"),
        (FuelType, "DIESEL"),
        (ChassisNumber, "MAT634567890123456"),
        (EngineNumber, "BS6D567890"),
        (Manufacturer, "TATA MOTORS LTD"),
        (Model, "ACE GOLD"),
        (RegistrationDate, "2023-03-10"),
        (InsuranceValidTill, "2024-03-09"),
        (RtoOffice, "RTO PUNE"),
        (
            OwnerAddress,
            "Shop No. 15, Industrial Estate, Pimpri-Chinchwad, Pune - 411018, Maharashtra",
        ),
    ],
];

/// Field values for the demonstration records.
pub fn sample_fields() -> Vec<VehicleFields> {
    SAMPLES
        .iter()
        .map(|sample| {
            sample
                .iter()
                .fold(VehicleFields::new(), |acc, (field, value)| acc.with(*field, *value))
        })
        .collect()
}

/// Adds the demonstration records. Existing records are kept; running twice adds
/// a second copy.
pub fn run<B: StorageBackend>(store: &mut VehicleStore<B>) -> Result<CmdResult> {
    let mut created = Vec::new();
    for fields in sample_fields() {
        created.push(store.create(fields)?);
    }
    info!("Added {} sample vehicles", created.len());

    Ok(CmdResult::default()
        .with_affected_vehicles(created)
        .with_message(CmdMessage::success("Added sample vehicle records for testing")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn seeds_three_complete_records() {
        let mut store = VehicleStore::with_backend(MemBackend::new());
        let result = run(&mut store).unwrap();
        assert_eq!(result.affected_vehicles.len(), 3);

        let all = store.list();
        let owners: Vec<_> = all
            .iter()
            .map(|v| v.get(VehicleField::OwnerName).unwrap_or_default())
            .collect();
        assert_eq!(owners, vec!["RAJESH KUMAR", "PRIYA SHARMA", "AMIT PATEL"]);
        for v in &all {
            assert_eq!(v.fields.present().count(), 12);
        }
    }

    #[test]
    fn seeding_appends() {
        let mut store = VehicleStore::with_backend(MemBackend::new());
        run(&mut store).unwrap();
        run(&mut store).unwrap();
        assert_eq!(store.list().len(), 6);
    }
}
