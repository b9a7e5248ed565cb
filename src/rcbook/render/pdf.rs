//! PDF encoding of a certificate plan with `lopdf`.
//!
//! Each document is a single page: the template image drawn across the full page,
//! then one text object per overlay. Text uses the standard Helvetica faces, so no
//! fonts are embedded. Nothing time-dependent is written (no `/Info` dictionary, no
//! document ID), which keeps output byte-identical for identical input.

use super::{plan_overlays, DocumentRenderer, Overlay, TextFlow, MULTILINE_LINE_HEIGHT};
use crate::error::{RcbookError, Result};
use crate::layout::{FontWeight, LayoutTable, PageGeometry};
use crate::model::Vehicle;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use once_cell::unsync::OnceCell;
use std::io::Write;
use std::path::{Path, PathBuf};

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const BACKGROUND_XOBJECT: &str = "Bg";

/// Average Helvetica glyph width as a fraction of font size, used for wrapping.
const AVG_GLYPH_WIDTH: f32 = 0.5;

/// A decoded template image, stored as Flate-compressed 8-bit RGB.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    width: u32,
    height: u32,
    compressed: Vec<u8>,
}

impl BackgroundImage {
    /// Decodes a PNG or JPEG template from disk.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading certificate template {}", path.display());
        let rgb = image::open(path)?.to_rgb8();
        Self::from_rgb(rgb.width(), rgb.height(), rgb.as_raw())
    }

    /// Builds a background from raw RGB pixels, row-major, 3 bytes per pixel.
    pub fn from_rgb(width: u32, height: u32, pixels: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(RcbookError::Render(format!(
                "Background is {}x{} but has {} bytes of pixel data",
                width,
                height,
                pixels.len()
            )));
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(pixels).map_err(RcbookError::Io)?;
        let compressed = encoder.finish().map_err(RcbookError::Io)?;

        Ok(Self {
            width,
            height,
            compressed,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn to_stream(&self) -> Stream {
        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(i64::from(self.width)),
                "Height" => Object::Integer(i64::from(self.height)),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "FlateDecode",
            },
            self.compressed.clone(),
        );
        stream.allows_compression = false;
        stream
    }
}

/// Renders certificates as single-page PDFs.
pub struct PdfRenderer {
    layout: LayoutTable,
    page: PageGeometry,
    background_path: Option<PathBuf>,
    background: OnceCell<BackgroundImage>,
}

impl PdfRenderer {
    pub fn new(layout: LayoutTable) -> Self {
        Self {
            layout,
            page: PageGeometry::A4,
            background_path: None,
            background: OnceCell::new(),
        }
    }

    /// Uses an already decoded template image.
    pub fn with_background(self, image: BackgroundImage) -> Self {
        let background = OnceCell::new();
        let _ = background.set(image);
        Self {
            background,
            background_path: None,
            ..self
        }
    }

    /// Uses the template image at `path`, decoded on first render.
    /// A missing or unreadable file makes every render fail.
    pub fn with_background_file(self, path: impl Into<PathBuf>) -> Self {
        Self {
            background: OnceCell::new(),
            background_path: Some(path.into()),
            ..self
        }
    }

    pub fn layout(&self) -> &LayoutTable {
        &self.layout
    }

    fn background(&self) -> Result<Option<&BackgroundImage>> {
        if let Some(image) = self.background.get() {
            return Ok(Some(image));
        }
        match &self.background_path {
            Some(path) => Ok(Some(
                self.background
                    .get_or_try_init(|| BackgroundImage::load(path))?,
            )),
            None => Ok(None),
        }
    }

    fn background_operations(&self) -> Vec<Operation> {
        vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(self.page.width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(self.page.height),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(BACKGROUND_XOBJECT.into())]),
            Operation::new("Q", vec![]),
        ]
    }

    fn text_operations(&self, overlay: &Overlay) -> Vec<Operation> {
        let pos = &overlay.position;
        let size = pos.effective_font_size();
        let color = pos.effective_color();
        let font = match pos.effective_font_weight() {
            FontWeight::Normal => FONT_REGULAR,
            FontWeight::Bold => FONT_BOLD,
        };

        // Layout is top-left based; the first baseline sits one font size below `top`.
        let x = pos.left;
        let y = self.page.height - pos.top - size;

        let lines = match overlay.flow {
            TextFlow::SingleLine => vec![overlay.text.replace(['\r', '\n'], " ")],
            TextFlow::MultiLine => wrap_lines(&overlay.text, pos.width, size),
        };

        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.into()), Object::Real(size)]),
            Operation::new(
                "rg",
                vec![
                    Object::Real(color.r),
                    Object::Real(color.g),
                    Object::Real(color.b),
                ],
            ),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        ];
        if overlay.flow == TextFlow::MultiLine {
            ops.push(Operation::new(
                "TL",
                vec![Object::Real(size * MULTILINE_LINE_HEIGHT)],
            ));
        }
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                ops.push(Operation::new("T*", vec![]));
            }
            ops.push(Operation::new("Tj", vec![pdf_text(line)]));
        }
        ops.push(Operation::new("ET", vec![]));
        ops
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, vehicle: &Vehicle) -> Result<Vec<u8>> {
        let overlays = plan_overlays(vehicle, &self.layout);
        debug!(
            "Rendering certificate for {} ({} fields)",
            vehicle.id,
            overlays.len()
        );
        let background = self.background()?;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(standard_font("Helvetica"));
        let bold_id = doc.add_object(standard_font("Helvetica-Bold"));

        let mut operations = Vec::new();
        let mut xobjects = Dictionary::new();
        if let Some(image) = background {
            let image_id = doc.add_object(image.to_stream());
            xobjects.set(BACKGROUND_XOBJECT, Object::Reference(image_id));
            operations.extend(self.background_operations());
        }
        for overlay in &overlays {
            operations.extend(self.text_operations(overlay));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => Object::Reference(regular_id),
                FONT_BOLD => Object::Reference(bold_id),
            },
            "XObject" => xobjects,
        });

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
        });

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.page.width),
                Object::Real(self.page.height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        Ok(out)
    }
}

fn standard_font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Word-wraps `text` to the box width; explicit line breaks are kept.
fn wrap_lines(text: &str, box_width: Option<f32>, font_size: f32) -> Vec<String> {
    let max_chars = box_width
        .map(|w| ((w / (font_size * AVG_GLYPH_WIDTH)).floor() as usize).max(1))
        .unwrap_or(usize::MAX);

    text.lines()
        .flat_map(|line| {
            if max_chars == usize::MAX {
                vec![line.to_string()]
            } else {
                textwrap::wrap(line, max_chars)
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            }
        })
        .collect()
}

/// Literal string in WinAnsi; characters outside Latin-1 become `?`.
fn pdf_text(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| match u8::try_from(u32::from(c)) {
            Ok(b) if !c.is_control() => b,
            _ => b'?',
        })
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{VehicleField, VehicleFields};

    fn sample_vehicle() -> Vehicle {
        Vehicle::new(
            VehicleFields::new()
                .with(VehicleField::VehicleNumber, "TN 01 AB 1234")
                .with(VehicleField::OwnerName, "RAJESH KUMAR")
                .with(VehicleField::RegistrationDate, "2023-01-15")
                .with(
                    VehicleField::OwnerAddress,
                    "No.45, Gandhi Street, T.Nagar, Chennai - 600017, Tamil Nadu",
                ),
        )
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn renders_a_pdf_with_field_text() {
        let pdf = PdfRenderer::new(LayoutTable::standard())
            .render(&sample_vehicle())
            .unwrap();

        assert!(pdf.starts_with(b"%PDF-1.5"));
        assert!(contains(&pdf, b"(TN 01 AB 1234) Tj"));
        assert!(contains(&pdf, b"(15 Jan 2023) Tj"));
        assert!(contains(&pdf, b"/Helvetica-Bold"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = PdfRenderer::new(LayoutTable::standard())
            .with_background(BackgroundImage::from_rgb(2, 2, &[255; 12]).unwrap());
        let vehicle = sample_vehicle();
        assert_eq!(
            renderer.render(&vehicle).unwrap(),
            renderer.render(&vehicle).unwrap()
        );
    }

    #[test]
    fn background_is_embedded_as_image() {
        let renderer = PdfRenderer::new(LayoutTable::standard())
            .with_background(BackgroundImage::from_rgb(1, 1, &[10, 20, 30]).unwrap());
        let pdf = renderer.render(&sample_vehicle()).unwrap();
        assert!(contains(&pdf, b"/DeviceRGB"));
        assert!(contains(&pdf, b"/Bg Do"));
    }

    #[test]
    fn missing_background_file_is_a_render_error() {
        let renderer = PdfRenderer::new(LayoutTable::standard())
            .with_background_file("/definitely/not/here/template.png");
        assert!(renderer.render(&sample_vehicle()).is_err());
    }

    #[test]
    fn rejects_mismatched_pixel_data() {
        assert!(BackgroundImage::from_rgb(2, 2, &[0; 5]).is_err());
        assert!(BackgroundImage::from_rgb(0, 0, &[]).is_err());
    }

    #[test]
    fn address_wraps_to_box_width() {
        // 300pt box at 10pt => 60 chars per line.
        let text = "No.45, Gandhi Street, T.Nagar, Chennai - 600017, Tamil Nadu, India";
        let lines = wrap_lines(text, Some(300.0), 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 60));
    }

    #[test]
    fn non_latin_characters_are_replaced() {
        match pdf_text("Chennai – 600017") {
            Object::String(bytes, _) => assert_eq!(bytes, b"Chennai ? 600017".to_vec()),
            other => panic!("unexpected object {:?}", other),
        }
    }
}
