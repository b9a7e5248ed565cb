use crate::error::{RcbookError, Result};
use crate::model::Vehicle;
use crate::render::DocumentRenderer;
use chrono::NaiveDate;
use log::debug;
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// `TN01AB1234_RC.pdf`, or the record id when there is no vehicle number.
pub fn pdf_filename(vehicle: &Vehicle) -> String {
    let stem: String = match vehicle.fields.vehicle_number.as_deref() {
        Some(number) if !number.trim().is_empty() => {
            number.chars().filter(|c| !c.is_whitespace()).collect()
        }
        _ => vehicle.id.to_string(),
    };
    format!("{}_RC.pdf", stem)
}

pub fn archive_filename(date: NaiveDate) -> String {
    format!("vehicle_pdfs_{}.zip", date.format("%Y-%m-%d"))
}

/// Renders one certificate into `out_dir`.
pub fn write_pdf<R: DocumentRenderer>(
    renderer: &R,
    vehicle: &Vehicle,
    out_dir: &Path,
) -> Result<PathBuf> {
    let bytes = renderer.render(vehicle)?;
    let path = out_dir.join(pdf_filename(vehicle));
    write_file(&path, &bytes)?;
    Ok(path)
}

/// Renders `vehicles` in order into a zip, stopping at the first failure.
pub fn write_bulk_archive<R, W>(renderer: &R, vehicles: &[Vehicle], writer: W) -> Result<W>
where
    R: DocumentRenderer,
    W: Write + Seek,
{
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for vehicle in vehicles {
        let bytes = renderer.render(vehicle)?;
        let name = pdf_filename(vehicle);
        debug!("Adding {} ({} bytes) to archive", name, bytes.len());
        zip.start_file(name, options)?;
        zip.write_all(&bytes).map_err(RcbookError::Io)?;
    }

    Ok(zip.finish()?)
}

/// Builds the whole archive in memory, then writes it to `out_dir`. Nothing touches
/// the disk unless every document rendered.
pub fn export_archive<R: DocumentRenderer>(
    renderer: &R,
    vehicles: &[Vehicle],
    out_dir: &Path,
    date: NaiveDate,
) -> Result<PathBuf> {
    let buffer = write_bulk_archive(renderer, vehicles, Cursor::new(Vec::new()))?;
    let path = out_dir.join(archive_filename(date));
    write_file(&path, buffer.get_ref())?;
    Ok(path)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(RcbookError::Io)?;
        }
    }
    fs::write(path, bytes).map_err(RcbookError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{VehicleField, VehicleFields};
    use std::cell::Cell;
    use std::io::Read;
    use tempfile::tempdir;

    /// Emits the vehicle number as the document; fails on the `fail_on`th call.
    struct EchoRenderer {
        calls: Cell<usize>,
        fail_on: Option<usize>,
    }

    impl EchoRenderer {
        fn new(fail_on: Option<usize>) -> Self {
            Self {
                calls: Cell::new(0),
                fail_on,
            }
        }
    }

    impl DocumentRenderer for EchoRenderer {
        fn render(&self, vehicle: &Vehicle) -> Result<Vec<u8>> {
            let call = self.calls.get() + 1;
            self.calls.set(call);
            if self.fail_on == Some(call) {
                return Err(RcbookError::Render("boom".to_string()));
            }
            Ok(vehicle.display_number().as_bytes().to_vec())
        }
    }

    fn vehicle(number: Option<&str>) -> Vehicle {
        let mut fields = VehicleFields::new();
        if let Some(n) = number {
            fields = fields.with(VehicleField::VehicleNumber, n);
        }
        Vehicle::new(fields)
    }

    #[test]
    fn file_names() {
        assert_eq!(pdf_filename(&vehicle(Some("TN 01 AB 1234"))), "TN01AB1234_RC.pdf");
        let anonymous = vehicle(None);
        assert_eq!(pdf_filename(&anonymous), format!("{}_RC.pdf", anonymous.id));

        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(archive_filename(date), "vehicle_pdfs_2024-03-09.zip");
    }

    #[test]
    fn archive_has_one_entry_per_vehicle_in_order() {
        let vehicles = vec![vehicle(Some("KA 05")), vehicle(Some("MH 12"))];
        let cursor = write_bulk_archive(&EchoRenderer::new(None), &vehicles, Cursor::new(Vec::new()))
            .unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        assert_eq!(archive.len(), 2);
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "KA05_RC.pdf");
        let mut body = String::new();
        first.read_to_string(&mut body).unwrap();
        assert_eq!(body, "KA 05");
    }

    #[test]
    fn failure_stops_rendering_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let renderer = EchoRenderer::new(Some(2));
        let vehicles = vec![vehicle(Some("A")), vehicle(Some("B")), vehicle(Some("C"))];
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(export_archive(&renderer, &vehicles, dir.path(), date).is_err());
        assert_eq!(renderer.calls.get(), 2);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn single_pdf_lands_in_out_dir() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested");
        let path = write_pdf(&EchoRenderer::new(None), &vehicle(Some("TN 01")), &out).unwrap();
        assert_eq!(path, out.join("TN01_RC.pdf"));
        assert_eq!(fs::read(path).unwrap(), b"TN 01");
    }
}
