//! # Fonts & Text Metrics
//!
//! Text is drawn with embedded TrueType faces. Every character is looked up
//! in the face's cmap and written as a two-byte glyph id (Identity-H), so
//! anything the face covers prints as typed, `₹` included.
//!
//! ```text
//! "₹ 12.00" ──► cmap ──► [gid, gid, ...] ──► Tj <0DB50003...>
//!                 │
//!                 └──► hmtx advances ──► widths for alignment and clipping
//! ```
//!
//! The bundled faces are DejaVu Sans and DejaVu Sans Bold (see
//! `assets/DejaVu-LICENSE`). Scripts they do not cover, such as Devanagari,
//! need a face loaded with [`FontProgram::load`]. A character missing from
//! the face is drawn as glyph 0.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ttf_parser::{Face, GlyphId};

use crate::error::{ExportError, ExportResult};

static DEJAVU_SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

/// Font faces used on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    pub const ALL: [Font; 2] = [Font::Regular, Font::Bold];

    /// Resource name inside the page's font dictionary.
    pub const fn resource_name(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    pub(crate) const fn index(&self) -> usize {
        match self {
            Font::Regular => 0,
            Font::Bold => 1,
        }
    }
}

// =============================================================================
// Font Programs
// =============================================================================

/// A TrueType font file to embed, with the name it is embedded under.
#[derive(Clone)]
pub struct FontProgram {
    name: String,
    data: Arc<[u8]>,
}

impl fmt::Debug for FontProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontProgram")
            .field("name", &self.name)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FontProgram {
    /// Wraps TrueType bytes, rejecting anything ttf-parser cannot read.
    pub fn from_bytes(name: &str, data: impl Into<Arc<[u8]>>) -> ExportResult<Self> {
        let data = data.into();
        Face::parse(&data, 0).map_err(|e| ExportError::Font(format!("{}: {}", name, e)))?;
        Ok(FontProgram {
            name: pdf_font_name(name),
            data,
        })
    }

    /// Reads a `.ttf` file. The file stem becomes the embedded font name.
    pub fn load(path: &Path) -> ExportResult<Self> {
        let data = std::fs::read(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("EmbeddedFont");
        Self::from_bytes(name, data)
    }

    fn bundled(name: &str, data: &'static [u8]) -> Self {
        FontProgram {
            name: name.to_string(),
            data: Arc::from(data),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn face(&self) -> ExportResult<Face<'_>> {
        Face::parse(&self.data, 0).map_err(|e| ExportError::Font(format!("{}: {}", self.name, e)))
    }
}

/// PDF names may not carry whitespace or delimiters.
fn pdf_font_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        cleaned
    }
}

/// The regular and bold faces of one rendering.
#[derive(Debug, Clone)]
pub struct FontSet {
    regular: FontProgram,
    bold: FontProgram,
}

impl Default for FontSet {
    fn default() -> Self {
        FontSet {
            regular: FontProgram::bundled("DejaVuSans", DEJAVU_SANS),
            bold: FontProgram::bundled("DejaVuSans-Bold", DEJAVU_SANS_BOLD),
        }
    }
}

impl FontSet {
    pub fn new(regular: FontProgram, bold: FontProgram) -> Self {
        FontSet { regular, bold }
    }

    pub fn program(&self, font: Font) -> &FontProgram {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
        }
    }
}

// =============================================================================
// Shaping & Metrics
// =============================================================================

/// One glyph as drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub id: u16,
    /// Horizontal advance in font units
    pub advance: u16,
    /// Character the glyph stands for, used for text extraction
    pub ch: char,
}

/// Face-wide metrics in font units, for the font descriptor.
#[derive(Debug, Clone, Copy)]
pub struct FaceMetrics {
    pub units_per_em: f32,
    pub ascender: i32,
    pub descender: i32,
    pub cap_height: i32,
    /// `[x_min, y_min, x_max, y_max]`
    pub bbox: [i32; 4],
    /// Advance of glyph 0
    pub missing_advance: u16,
}

/// Parsed faces of a [`FontSet`], used while painting one document.
pub struct TextShaper<'f> {
    faces: [Face<'f>; 2],
}

impl<'f> TextShaper<'f> {
    pub fn new(fonts: &'f FontSet) -> ExportResult<Self> {
        Ok(TextShaper {
            faces: [fonts.regular.face()?, fonts.bold.face()?],
        })
    }

    fn face(&self, font: Font) -> &Face<'f> {
        &self.faces[font.index()]
    }

    /// Units per em of `font`, never zero.
    pub fn units_per_em(&self, font: Font) -> f32 {
        self.face(font).units_per_em().max(1) as f32
    }

    pub fn metrics(&self, font: Font) -> FaceMetrics {
        let face = self.face(font);
        let bbox = face.global_bounding_box();
        FaceMetrics {
            units_per_em: self.units_per_em(font),
            ascender: face.ascender() as i32,
            descender: face.descender() as i32,
            cap_height: face.capital_height().unwrap_or(face.ascender()) as i32,
            bbox: [
                bbox.x_min as i32,
                bbox.y_min as i32,
                bbox.x_max as i32,
                bbox.y_max as i32,
            ],
            missing_advance: face.glyph_hor_advance(GlyphId(0)).unwrap_or(0),
        }
    }

    /// Maps characters to glyphs one to one. Tabs draw as spaces.
    pub fn shape(&self, text: &str, font: Font) -> Vec<Glyph> {
        let face = self.face(font);
        text.chars()
            .map(|c| {
                let c = if c == '\t' { ' ' } else { c };
                match face.glyph_index(c) {
                    Some(id) => Glyph {
                        id: id.0,
                        advance: face.glyph_hor_advance(id).unwrap_or(0),
                        ch: c,
                    },
                    None => Glyph {
                        id: 0,
                        advance: face.glyph_hor_advance(GlyphId(0)).unwrap_or(0),
                        ch: char::REPLACEMENT_CHARACTER,
                    },
                }
            })
            .collect()
    }

    /// Width of `glyphs` at `size` (same unit as `size`).
    pub fn width(&self, glyphs: &[Glyph], font: Font, size: f32) -> f32 {
        let units: u32 = glyphs.iter().map(|g| g.advance as u32).sum();
        units as f32 * size / self.units_per_em(font)
    }

    /// Distance from the top of the em box to the baseline.
    pub fn ascent(&self, font: Font, size: f32) -> f32 {
        let ascender = self.face(font).ascender();
        if ascender <= 0 {
            return size * 0.8;
        }
        ascender as f32 / self.units_per_em(font) * size
    }

    /// Shapes `text` and cuts it with a trailing `...` so it fits `max_width`.
    pub fn fit(&self, text: &str, font: Font, size: f32, max_width: f32) -> Vec<Glyph> {
        self.truncate(self.shape(text, font), font, size, max_width)
    }

    fn truncate(
        &self,
        mut glyphs: Vec<Glyph>,
        font: Font,
        size: f32,
        max_width: f32,
    ) -> Vec<Glyph> {
        if self.width(&glyphs, font, size) <= max_width {
            return glyphs;
        }

        let ellipsis = self.shape("...", font);
        let ellipsis_width = self.width(&ellipsis, font, size);
        while !glyphs.is_empty() && self.width(&glyphs, font, size) + ellipsis_width > max_width {
            glyphs.pop();
        }
        glyphs.extend(ellipsis);
        glyphs
    }

    /// Greedy word wrap into lines no wider than `max_width`.
    ///
    /// A single word wider than the line is cut with a trailing `...`.
    pub fn wrap(&self, text: &str, font: Font, size: f32, max_width: f32) -> Vec<Vec<Glyph>> {
        let space = self.shape(" ", font);
        let space_width = self.width(&space, font, size);
        let mut lines = Vec::new();
        let mut current: Vec<Glyph> = Vec::new();

        for word in text.split_whitespace() {
            let word = self.shape(word, font);
            let word_width = self.width(&word, font, size);
            let candidate_width = if current.is_empty() {
                word_width
            } else {
                self.width(&current, font, size) + space_width + word_width
            };

            if candidate_width <= max_width {
                if !current.is_empty() {
                    current.extend_from_slice(&space);
                }
                current.extend(word);
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if word_width <= max_width {
                current = word;
            } else {
                lines.push(self.truncate(word, font, size, max_width));
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Glyph ids as the big-endian two-byte codes Identity-H expects.
pub fn glyph_codes(glyphs: &[Glyph]) -> Vec<u8> {
    glyphs.iter().flat_map(|g| g.id.to_be_bytes()).collect()
}

/// Glyphs drawn with one face, for the font's width table and ToUnicode map.
#[derive(Debug, Clone, Default)]
pub struct GlyphUsage {
    glyphs: BTreeMap<u16, Glyph>,
}

impl GlyphUsage {
    pub fn record(&mut self, glyphs: &[Glyph]) {
        for glyph in glyphs {
            self.glyphs.entry(glyph.id).or_insert(*glyph);
        }
    }

    /// Used glyphs in id order.
    pub fn glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.glyphs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(glyphs: &[Glyph]) -> String {
        glyphs.iter().map(|g| g.ch).collect()
    }

    #[test]
    fn test_rupee_and_latin_have_glyphs() {
        let fonts = FontSet::default();
        let shaper = TextShaper::new(&fonts).unwrap();

        let glyphs = shaper.shape("₹ 20.00 é Ж", Font::Regular);
        assert!(glyphs.iter().all(|g| g.id != 0));
        assert_eq!(text_of(&glyphs), "₹ 20.00 é Ж");
    }

    #[test]
    fn test_uncovered_script_falls_back_to_glyph_zero() {
        let fonts = FontSet::default();
        let shaper = TextShaper::new(&fonts).unwrap();

        let glyphs = shaper.shape("日本", Font::Regular);
        assert_eq!(glyphs.iter().map(|g| g.id).collect::<Vec<_>>(), vec![0, 0]);
        assert_eq!(text_of(&glyphs), "\u{FFFD}\u{FFFD}");
    }

    #[test]
    fn test_widths_come_from_the_face() {
        let fonts = FontSet::default();
        let shaper = TextShaper::new(&fonts).unwrap();

        let regular = shaper.shape("Hi", Font::Regular);
        let bold = shaper.shape("Hi", Font::Bold);
        let width = shaper.width(&regular, Font::Regular, 10.0);
        assert!(width > 5.0 && width < 20.0);
        assert!(shaper.width(&bold, Font::Bold, 10.0) > width);
        assert_eq!(shaper.width(&[], Font::Regular, 10.0), 0.0);
    }

    #[test]
    fn test_wrap_splits_on_words() {
        let fonts = FontSet::default();
        let shaper = TextShaper::new(&fonts).unwrap();

        let lines = shaper.wrap("one two three four", Font::Regular, 10.0, 45.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(shaper.width(line, Font::Regular, 10.0) <= 45.0);
        }
        let rejoined: Vec<String> = lines.iter().map(|l| text_of(l)).collect();
        assert_eq!(rejoined.join(" "), "one two three four");
    }

    #[test]
    fn test_wrap_empty_text() {
        let fonts = FontSet::default();
        let shaper = TextShaper::new(&fonts).unwrap();
        assert!(shaper.wrap("   ", Font::Regular, 10.0, 50.0).is_empty());
    }

    #[test]
    fn test_fit_truncates_with_ellipsis() {
        let fonts = FontSet::default();
        let shaper = TextShaper::new(&fonts).unwrap();

        let long = "A very long item description that cannot fit";
        let fitted = shaper.fit(long, Font::Regular, 14.0, 100.0);
        assert!(text_of(&fitted).ends_with("..."));
        assert!(shaper.width(&fitted, Font::Regular, 14.0) <= 100.0);

        let short = shaper.fit("Mug", Font::Regular, 14.0, 100.0);
        assert_eq!(text_of(&short), "Mug");
    }

    #[test]
    fn test_glyph_codes_are_big_endian() {
        let glyphs = [
            Glyph { id: 0x0102, advance: 0, ch: 'a' },
            Glyph { id: 0x0003, advance: 0, ch: 'b' },
        ];
        assert_eq!(glyph_codes(&glyphs), vec![0x01, 0x02, 0x00, 0x03]);
    }

    #[test]
    fn test_usage_keeps_first_character_per_glyph() {
        let mut usage = GlyphUsage::default();
        usage.record(&[Glyph { id: 5, advance: 10, ch: 'a' }]);
        usage.record(&[
            Glyph { id: 5, advance: 10, ch: 'b' },
            Glyph { id: 2, advance: 7, ch: 'c' },
        ]);

        let chars: Vec<char> = usage.glyphs().map(|g| g.ch).collect();
        assert_eq!(chars, vec!['c', 'a']);
    }

    #[test]
    fn test_garbage_bytes_are_not_a_font() {
        let err = FontProgram::from_bytes("Broken", vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, ExportError::Font(_)));
    }

    #[test]
    fn test_load_missing_font_file() {
        let path = std::env::temp_dir().join(format!("missing-{}.ttf", uuid::Uuid::new_v4()));
        let err = FontProgram::load(&path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_loaded_font_is_named_after_file() {
        let dir = std::env::temp_dir().join(format!("invoice-font-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("Noto Sans.ttf");
        std::fs::write(&path, DEJAVU_SANS).unwrap();

        let program = FontProgram::load(&path).unwrap();
        assert_eq!(program.name(), "NotoSans");
        assert_eq!(program.data().len(), DEJAVU_SANS.len());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
