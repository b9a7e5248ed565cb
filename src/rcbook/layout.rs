//! # Certificate Field Layout
//!
//! A static table mapping each [`VehicleField`] to where and how its value is drawn on
//! the certificate page. Coordinates are PDF points (1/72 inch) measured from the
//! **top-left** corner of the page, the way the template artwork is measured; the
//! renderer flips them into PDF's bottom-left space.
//!
//! Fields without an entry are never drawn. The table is read-only at runtime.

use crate::model::VehicleField;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width: 595.28,
        height: 841.89,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| f32::from(v) / 255.0)
        };
        Some(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// Position and style of one field on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPosition {
    pub top: f32,
    pub left: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub font_size: Option<f32>,
    pub font_weight: Option<FontWeight>,
    pub color: Option<String>,
}

impl FieldPosition {
    pub const DEFAULT_FONT_SIZE: f32 = 12.0;

    pub fn at(top: f32, left: f32) -> Self {
        Self {
            top,
            left,
            width: None,
            height: None,
            font_size: None,
            font_weight: None,
            color: None,
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn font(mut self, size: f32, weight: FontWeight) -> Self {
        self.font_size = Some(size);
        self.font_weight = Some(weight);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn effective_font_size(&self) -> f32 {
        self.font_size.unwrap_or(Self::DEFAULT_FONT_SIZE)
    }

    pub fn effective_font_weight(&self) -> FontWeight {
        self.font_weight.unwrap_or_default()
    }

    /// Unparsable or missing colors render black.
    pub fn effective_color(&self) -> Rgb {
        self.color
            .as_deref()
            .and_then(Rgb::from_hex)
            .unwrap_or(Rgb::BLACK)
    }
}

static STANDARD_LAYOUT: Lazy<LayoutTable> = Lazy::new(|| {
    use FontWeight::{Bold, Normal};
    use VehicleField::*;

    let row = |top: f32, width: f32, size: f32, weight: FontWeight| {
        FieldPosition::at(top, 200.0)
            .width(width)
            .font(size, weight)
            .color("#000000")
    };

    LayoutTable::from_entries([
        (VehicleNumber, row(180.0, 200.0, 14.0, Bold)),
        (OwnerName, row(220.0, 300.0, 12.0, Normal)),
        (VehicleClass, row(260.0, 250.0, 11.0, Normal)),
        (FuelType, row(300.0, 150.0, 11.0, Normal)),
        (ChassisNumber, row(340.0, 250.0, 10.0, Normal)),
        (EngineNumber, row(380.0, 250.0, 10.0, Normal)),
        (Manufacturer, row(420.0, 200.0, 11.0, Normal)),
        (Model, row(460.0, 200.0, 11.0, Normal)),
        (RegistrationDate, row(500.0, 150.0, 11.0, Normal)),
        (InsuranceValidTill, row(540.0, 150.0, 11.0, Normal)),
        (RtoOffice, row(580.0, 250.0, 11.0, Normal)),
        (OwnerAddress, row(620.0, 300.0, 10.0, Normal).height(60.0)),
    ])
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutTable {
    entries: HashMap<VehicleField, FieldPosition>,
}

impl LayoutTable {
    /// The registration certificate layout.
    pub fn standard() -> Self {
        STANDARD_LAYOUT.clone()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (VehicleField, FieldPosition)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, field: VehicleField) -> Option<&FieldPosition> {
        self.entries.get(&field)
    }

    /// Lookup by persisted field name, e.g. `"ownerName"`.
    pub fn get_by_name(&self, name: &str) -> Option<&FieldPosition> {
        VehicleField::from_key(name).and_then(|f| self.get(f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
