//! # Certificate Rendering
//!
//! Rendering is split in two steps:
//!
//! 1. **Planning** ([`plan_overlays`]): decide which fields appear, with what text, where.
//!    Pure data, no PDF involved. A field is planned only if it has both a non-empty
//!    value and a layout entry; dates are reformatted here.
//! 2. **Encoding** ([`pdf::PdfRenderer`]): turn the plan into a one-page PDF with the
//!    template image stretched underneath.
//!
//! Controllers depend on the [`DocumentRenderer`] trait, not on the PDF encoder, so the
//! export pipeline can be driven with any renderer.

use crate::error::Result;
use crate::layout::{FieldPosition, LayoutTable};
use crate::model::{Vehicle, VehicleField};
use chrono::{DateTime, NaiveDate};

pub mod pdf;

pub use pdf::{BackgroundImage, PdfRenderer};

/// Line height, as a multiple of font size, for multi-line fields.
pub const MULTILINE_LINE_HEIGHT: f32 = 1.2;

/// Produces a certificate document for one vehicle.
pub trait DocumentRenderer {
    fn render(&self, vehicle: &Vehicle) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFlow {
    SingleLine,
    MultiLine,
}

/// One positioned piece of text on the certificate.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub field: VehicleField,
    pub text: String,
    pub position: FieldPosition,
    pub flow: TextFlow,
}

/// Plans the overlays for `vehicle`, in certificate order.
pub fn plan_overlays(vehicle: &Vehicle, layout: &LayoutTable) -> Vec<Overlay> {
    VehicleField::ALL
        .into_iter()
        .filter_map(|field| {
            let position = layout.get(field)?;
            let raw = vehicle.get(field)?;
            let text = if field.is_date() {
                format_date(raw)
            } else {
                raw.to_string()
            };
            if text.is_empty() {
                return None;
            }

            let flow = if field == VehicleField::OwnerAddress {
                TextFlow::MultiLine
            } else {
                TextFlow::SingleLine
            };

            Some(Overlay {
                field,
                text,
                position: position.clone(),
                flow,
            })
        })
        .collect()
}

/// Formats a date as `15 Jan 2023`.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 date-times; anything else is returned verbatim.
pub fn format_date(raw: &str) -> String {
    const DISPLAY: &str = "%d %b %Y";

    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format(DISPLAY).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.date_naive().format(DISPLAY).to_string();
    }
    raw.to_string()
}
