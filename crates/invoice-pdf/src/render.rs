//! # PDF Rendering
//!
//! ```text
//! InvoiceView ──► paint (per theme) ──► pages of operations + glyphs used
//!                                              │
//!      logo data URL ──► RGB XObject "Im1" ────┤
//!      FontSet ──► Type0 fonts F1/F2 ──────────┤  (Identity-H, ToUnicode)
//!                                              ▼
//!                  lopdf Document (Pages, Page*, Catalog)
//!                                              │
//!                                              ▼
//!                                        PdfDocument
//! ```
//!
//! Rendering is synchronous and CPU-bound; [`crate::export`] moves it off
//! the async runtime.

use std::fmt::Write as _;

use image::GenericImageView;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, warn};

use invoice_core::LogoImage;

use crate::document::PdfDocument;
use crate::error::{ExportError, ExportResult};
use crate::layout::LayoutOptions;
use crate::paint::{paint, Canvas, LogoPlacement};
use crate::text::{Font, FontProgram, FontSet, GlyphUsage, TextShaper};
use crate::view::InvoiceView;

/// Longest edge of the embedded logo, in pixels.
const LOGO_MAX_EDGE: u32 = 256;

/// Turns an invoice snapshot into a document.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, view: &InvoiceView, layout: &LayoutOptions) -> ExportResult<PdfDocument>;
}

/// Renderer backed by lopdf with embedded TrueType faces.
#[derive(Debug, Clone, Default)]
pub struct LopdfRenderer {
    fonts: FontSet,
}

impl LopdfRenderer {
    /// Renders with the bundled DejaVu faces.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fonts(fonts: FontSet) -> Self {
        LopdfRenderer { fonts }
    }
}

impl PdfRenderer for LopdfRenderer {
    fn render(&self, view: &InvoiceView, layout: &LayoutOptions) -> ExportResult<PdfDocument> {
        let mut doc = Document::with_version("1.5");
        let shaper = TextShaper::new(&self.fonts)?;

        let logo = view
            .logo
            .as_ref()
            .and_then(|logo| match embed_logo(&mut doc, logo) {
                Ok(embedded) => Some(embedded),
                Err(reason) => {
                    warn!(%reason, "Logo could not be embedded, rendering without it");
                    None
                }
            });

        let mut canvas = Canvas::new(layout, &shaper);
        paint(view, logo.as_ref().map(|(placement, _)| placement), &mut canvas);
        let painted = canvas.finish();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let usage = &painted.usage[font.index()];
            let id = embed_font(&mut doc, self.fonts.program(font), &shaper, font, usage)?;
            fonts.set(font.resource_name(), Object::Reference(id));
        }
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        if let Some((placement, id)) = &logo {
            let mut xobjects = Dictionary::new();
            xobjects.set(placement.name.as_str(), Object::Reference(*id));
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        let resources_id = doc.add_object(resources);

        let pages_id = doc.new_object_id();
        let mut kids = Vec::with_capacity(painted.pages.len());
        for operations in painted.pages {
            let content = Content { operations }.encode().map_err(render_error)?;
            let mut stream = Stream::new(Dictionary::new(), content);
            stream.compress().map_err(render_error)?;
            let content_id = doc.add_object(stream);

            let mut page = Dictionary::new();
            page.set("Type", Object::Name(b"Page".to_vec()));
            page.set("Parent", Object::Reference(pages_id));
            page.set("Contents", Object::Reference(content_id));
            page.set("Resources", Object::Reference(resources_id));
            page.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(layout.page.width),
                    Object::Real(layout.page.height),
                ]),
            );
            kids.push(Object::Reference(doc.add_object(page)));
        }
        let page_count = kids.len();

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", Object::Integer(page_count as i64));
        pages_dict.set("Kids", Object::Array(kids));
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(render_error)?;

        debug!(
            invoice_number = %view.invoice_number,
            pages = page_count,
            bytes = bytes.len(),
            "Rendered invoice"
        );
        Ok(PdfDocument::new(bytes, page_count))
    }
}

fn render_error(err: impl std::fmt::Display) -> ExportError {
    ExportError::Render(err.to_string())
}

// =============================================================================
// Fonts
// =============================================================================

/// Adds `program` as a Type0 font over a CIDFontType2 descendant.
///
/// ```text
/// Type0 (Identity-H, ToUnicode)
///   └── CIDFontType2 (W = advances of used glyphs, CIDToGIDMap Identity)
///         └── FontDescriptor ──► FontFile2 (whole .ttf, Flate)
/// ```
fn embed_font(
    doc: &mut Document,
    program: &FontProgram,
    shaper: &TextShaper<'_>,
    font: Font,
    usage: &GlyphUsage,
) -> ExportResult<ObjectId> {
    let metrics = shaper.metrics(font);
    // Glyph space is 1000 units per em.
    let scale = |units: i32| (units as f32 * 1000.0 / metrics.units_per_em).round() as i64;

    let mut file_dict = Dictionary::new();
    file_dict.set("Length1", Object::Integer(program.data().len() as i64));
    let mut font_file = Stream::new(file_dict, program.data().to_vec());
    font_file.compress().map_err(render_error)?;
    let font_file_id = doc.add_object(font_file);

    let mut descriptor = Dictionary::new();
    descriptor.set("Type", Object::Name(b"FontDescriptor".to_vec()));
    descriptor.set("FontName", Object::Name(program.name().as_bytes().to_vec()));
    descriptor.set("Flags", Object::Integer(32));
    descriptor.set(
        "FontBBox",
        Object::Array(metrics.bbox.iter().map(|v| Object::Integer(scale(*v))).collect()),
    );
    descriptor.set("ItalicAngle", Object::Integer(0));
    descriptor.set("Ascent", Object::Integer(scale(metrics.ascender)));
    descriptor.set("Descent", Object::Integer(scale(metrics.descender)));
    descriptor.set("CapHeight", Object::Integer(scale(metrics.cap_height)));
    descriptor.set("StemV", Object::Integer(80));
    descriptor.set("FontFile2", Object::Reference(font_file_id));
    let descriptor_id = doc.add_object(descriptor);

    let mut widths = Vec::new();
    for glyph in usage.glyphs() {
        widths.push(Object::Integer(glyph.id as i64));
        widths.push(Object::Array(vec![Object::Integer(scale(glyph.advance as i32))]));
    }

    let mut cid_system_info = Dictionary::new();
    cid_system_info.set("Registry", Object::string_literal("Adobe"));
    cid_system_info.set("Ordering", Object::string_literal("Identity"));
    cid_system_info.set("Supplement", Object::Integer(0));

    let mut descendant = Dictionary::new();
    descendant.set("Type", Object::Name(b"Font".to_vec()));
    descendant.set("Subtype", Object::Name(b"CIDFontType2".to_vec()));
    descendant.set("BaseFont", Object::Name(program.name().as_bytes().to_vec()));
    descendant.set("CIDSystemInfo", Object::Dictionary(cid_system_info));
    descendant.set("FontDescriptor", Object::Reference(descriptor_id));
    descendant.set("DW", Object::Integer(scale(metrics.missing_advance as i32)));
    descendant.set("W", Object::Array(widths));
    descendant.set("CIDToGIDMap", Object::Name(b"Identity".to_vec()));
    let descendant_id = doc.add_object(descendant);

    let to_unicode = Stream::new(Dictionary::new(), to_unicode_cmap(usage).into_bytes());
    let to_unicode_id = doc.add_object(to_unicode);

    let mut type0 = Dictionary::new();
    type0.set("Type", Object::Name(b"Font".to_vec()));
    type0.set("Subtype", Object::Name(b"Type0".to_vec()));
    type0.set("BaseFont", Object::Name(program.name().as_bytes().to_vec()));
    type0.set("Encoding", Object::Name(b"Identity-H".to_vec()));
    type0.set("DescendantFonts", Object::Array(vec![Object::Reference(descendant_id)]));
    type0.set("ToUnicode", Object::Reference(to_unicode_id));
    Ok(doc.add_object(type0))
}

/// ToUnicode CMap mapping each drawn glyph id back to its character.
///
/// Glyph 0 always maps to U+FFFD; `bfchar` blocks hold at most 100 entries.
fn to_unicode_cmap(usage: &GlyphUsage) -> String {
    let mut entries = vec![(0u16, vec![0xFFFDu16])];
    for glyph in usage.glyphs().filter(|g| g.id != 0) {
        let mut units = [0u16; 2];
        entries.push((glyph.id, glyph.ch.encode_utf16(&mut units).to_vec()));
    }

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo\n\
         << /Registry (Adobe)\n\
         /Ordering (UCS)\n\
         /Supplement 0\n\
         >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    for block in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", block.len());
        for (id, units) in block {
            let target: String = units.iter().map(|u| format!("{:04X}", u)).collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", id, target);
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

/// Decodes the logo and adds it as an RGB image XObject.
///
/// Transparent pixels are composited over white, matching how the logo
/// shows on the white invoice background.
fn embed_logo(doc: &mut Document, logo: &LogoImage) -> Result<(LogoPlacement, ObjectId), String> {
    let bytes = logo.to_bytes().map_err(|e| e.to_string())?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| e.to_string())?;

    let decoded = if decoded.width() > LOGO_MAX_EDGE || decoded.height() > LOGO_MAX_EDGE {
        decoded.thumbnail(LOGO_MAX_EDGE, LOGO_MAX_EDGE)
    } else {
        decoded
    };
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err("image has no pixels".to_string());
    }

    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        for channel in [r, g, b] {
            rgb.push(over_white(channel, a));
        }
    }

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    let id = doc.add_object(Stream::new(dict, rgb));

    let placement = LogoPlacement {
        name: "Im1".to_string(),
        width,
        height,
    };
    Ok((placement, id))
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (channel as u32, alpha as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}
