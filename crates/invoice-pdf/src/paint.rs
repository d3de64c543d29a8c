//! Drawing the invoice snapshot onto pages.
//!
//! Both themes are laid out in CSS pixels across a 900px-wide window and
//! emitted block by block. A block that does not fit on the remaining page
//! moves whole onto a new page; blocks are never split.

use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

use crate::layout::LayoutOptions;
use crate::text::{glyph_codes, Font, Glyph, GlyphUsage, TextShaper};
use crate::view::{InvoiceView, RowView, Theme};

// =============================================================================
// Colors
// =============================================================================

#[derive(Debug, Clone, Copy)]
pub(crate) struct Rgb(f32, f32, f32);

const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
const GRAY_500: Rgb = Rgb(0.420, 0.447, 0.502);
const GRAY_700: Rgb = Rgb(0.216, 0.255, 0.318);
const BORDER: Rgb = Rgb(0.898, 0.906, 0.922);
const YELLOW_400: Rgb = Rgb(0.980, 0.800, 0.082);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Align {
    Left,
    Center,
    Right,
}

/// How a run of text is set: face, size in layout pixels, and color.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Style {
    pub font: Font,
    pub size: f32,
    pub color: Rgb,
}

impl Style {
    const fn new(font: Font, size: f32, color: Rgb) -> Self {
        Style { font, size, color }
    }
}

/// An embedded logo image, addressed by its XObject resource name.
#[derive(Debug, Clone)]
pub(crate) struct LogoPlacement {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// Pages of operations plus the glyphs each face drew.
pub(crate) struct Painted {
    pub pages: Vec<Vec<Operation>>,
    pub usage: [GlyphUsage; 2],
}

// =============================================================================
// Canvas
// =============================================================================

/// Accumulates content-stream operations per page.
///
/// Coordinates passed in are layout pixels; `top` is measured from the
/// start of the current block.
pub(crate) struct Canvas<'a, 'f> {
    layout: &'a LayoutOptions,
    shaper: &'a TextShaper<'f>,
    pages: Vec<Vec<Operation>>,
    usage: [GlyphUsage; 2],
    cursor: f32,
}

impl<'a, 'f> Canvas<'a, 'f> {
    pub fn new(layout: &'a LayoutOptions, shaper: &'a TextShaper<'f>) -> Self {
        Canvas {
            layout,
            shaper,
            pages: vec![Vec::new()],
            usage: Default::default(),
            cursor: 0.0,
        }
    }

    /// Starts a new page if a block of `height` does not fit on this one.
    pub fn reserve(&mut self, height: f32) {
        if self.cursor > 0.0 && self.cursor + height > self.layout.page_capacity_px() {
            self.pages.push(Vec::new());
            self.cursor = 0.0;
        }
    }

    pub fn advance(&mut self, height: f32) {
        self.cursor += height;
    }

    pub fn finish(self) -> Painted {
        Painted {
            pages: self.pages,
            usage: self.usage,
        }
    }

    pub fn shaper(&self) -> &'a TextShaper<'f> {
        self.shaper
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        // `pages` starts non-empty and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn pt(&self, px: f32) -> f32 {
        px * self.layout.scale()
    }

    /// Draws shaped glyphs with the top of the em box at `top`.
    pub fn glyphs(&mut self, glyphs: &[Glyph], x: f32, top: f32, style: Style, align: Align) {
        if glyphs.is_empty() {
            return;
        }
        let width = self.shaper.width(glyphs, style.font, style.size);
        let left = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        let baseline = self.cursor + top + self.shaper.ascent(style.font, style.size);
        let page_x = self.layout.page_x(left);
        let page_y = self.layout.page_y(baseline);
        let size_pt = self.pt(style.size);

        self.usage[style.font.index()].record(glyphs);
        let name = style.font.resource_name().as_bytes().to_vec();
        let ops = self.ops();
        ops.push(Operation::new("BT", vec![]));
        ops.push(fill_color(style.color));
        ops.push(Operation::new("Tf", vec![Object::Name(name), real(size_pt)]));
        ops.push(Operation::new("Td", vec![real(page_x), real(page_y)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(glyph_codes(glyphs), StringFormat::Hexadecimal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    /// Draws text clipped to `max_width`.
    pub fn text(
        &mut self,
        text: &str,
        x: f32,
        top: f32,
        style: Style,
        align: Align,
        max_width: f32,
    ) {
        let glyphs = self.shaper.fit(text, style.font, style.size, max_width);
        self.glyphs(&glyphs, x, top, style, align);
    }

    pub fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Rgb) {
        let page_x = self.layout.page_x(x);
        let page_y = self.layout.page_y(self.cursor + top + height);
        let (w, h) = (self.pt(width), self.pt(height));

        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(fill_color(color));
        ops.push(Operation::new("re", vec![real(page_x), real(page_y), real(w), real(h)]));
        ops.push(Operation::new("f", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    pub fn hline(&mut self, x1: f32, x2: f32, top: f32, color: Rgb) {
        let y = self.layout.page_y(self.cursor + top);
        let (px1, px2) = (self.layout.page_x(x1), self.layout.page_x(x2));
        let width = self.pt(1.0);

        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "RG",
            vec![real(color.0), real(color.1), real(color.2)],
        ));
        ops.push(Operation::new("w", vec![real(width)]));
        ops.push(Operation::new("m", vec![real(px1), real(y)]));
        ops.push(Operation::new("l", vec![real(px2), real(y)]));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    pub fn image(&mut self, name: &str, x: f32, top: f32, width: f32, height: f32) {
        let page_x = self.layout.page_x(x);
        let page_y = self.layout.page_y(self.cursor + top + height);
        let (w, h) = (self.pt(width), self.pt(height));

        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![real(w), real(0.0), real(0.0), real(h), real(page_x), real(page_y)],
        ));
        ops.push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
        ops.push(Operation::new("Q", vec![]));
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn fill_color(color: Rgb) -> Operation {
    Operation::new("rg", vec![real(color.0), real(color.1), real(color.2)])
}

// =============================================================================
// Themes
// =============================================================================

const WINDOW: f32 = 900.0;

/// Paints the whole snapshot in its theme.
pub(crate) fn paint(view: &InvoiceView, logo: Option<&LogoPlacement>, canvas: &mut Canvas<'_, '_>) {
    match view.theme {
        Theme::Plain => paint_plain(view, canvas),
        Theme::Styled => paint_styled(view, logo, canvas),
    }
}

/// Heading, labelled fields, bare rows, one total line.
fn paint_plain(view: &InvoiceView, canvas: &mut Canvas<'_, '_>) {
    const PAD: f32 = 25.0;
    const INNER: f32 = WINDOW - 2.0 * PAD;
    const BODY: Style = Style::new(Font::Regular, 16.0, BLACK);

    canvas.reserve(PAD + 60.0);
    canvas.advance(PAD);
    let brand = Style::new(Font::Bold, 32.0, BLACK);
    canvas.text(&view.brand_name, PAD, 21.0, brand, Align::Left, INNER);
    canvas.advance(60.0);

    canvas.reserve(44.0);
    let heading = Style::new(Font::Bold, 24.0, BLACK);
    canvas.text("INVOICE", PAD, 10.0, heading, Align::Left, INNER);
    canvas.advance(44.0);

    let fields = [
        ("Customer:", view.customer_name.as_str()),
        ("Invoice No:", view.invoice_number.as_str()),
        ("Date:", view.invoice_date.as_str()),
    ];
    for (label, value) in fields {
        canvas.reserve(30.0);
        canvas.text(label, PAD, 7.0, BODY, Align::Left, 120.0);
        canvas.text(value, PAD + 120.0, 7.0, BODY, Align::Left, INNER - 120.0);
        canvas.advance(30.0);
    }

    canvas.reserve(16.0);
    canvas.hline(PAD, WINDOW - PAD, 8.0, GRAY_500);
    canvas.advance(16.0);

    let columns = [PAD, PAD + 200.0, PAD + 400.0, PAD + 600.0];
    for row in &view.rows {
        canvas.reserve(34.0);
        let cells = [&row.name, &row.price, &row.quantity, &row.total];
        for (x, cell) in columns.iter().zip(cells) {
            canvas.text(cell, *x, 9.0, BODY, Align::Left, 190.0);
        }
        canvas.advance(34.0);
    }

    canvas.reserve(44.0 + PAD);
    let total = format!("Total: {}", view.total);
    let total_style = Style::new(Font::Bold, 18.72, BLACK);
    canvas.text(&total, PAD, 18.0, total_style, Align::Left, INNER);
    canvas.advance(44.0 + PAD);
}

/// Logo header, accent bar, dark table header, totals box, footer strip.
fn paint_styled(view: &InvoiceView, logo: Option<&LogoPlacement>, canvas: &mut Canvas<'_, '_>) {
    const PAD: f32 = 24.0;
    const RIGHT: f32 = WINDOW - PAD;
    const HALF: f32 = (WINDOW - 3.0 * PAD) / 2.0;
    const LABEL: Style = Style::new(Font::Bold, 14.0, BLACK);
    const BODY: Style = Style::new(Font::Regular, 14.0, BLACK);
    const MUTED: Style = Style::new(Font::Regular, 14.0, GRAY_500);
    const SMALL: Style = Style::new(Font::Regular, 12.0, GRAY_500);
    const TOTAL: Style = Style::new(Font::Bold, 18.0, BLACK);

    // Header: logo + brand on the left, INVOICE on the right, accent bar.
    canvas.reserve(136.0);
    let mut brand_x = PAD;
    if let Some(logo) = logo {
        let height = 48.0;
        let width = height * logo.width as f32 / logo.height.max(1) as f32;
        let width = width.min(240.0);
        canvas.image(&logo.name, PAD, PAD, width, height);
        brand_x += width + 12.0;
    }
    let brand = Style::new(Font::Bold, 20.0, BLACK);
    let title = Style::new(Font::Bold, 36.0, BLACK);
    canvas.text(&view.brand_name, brand_x, PAD + 2.0, brand, Align::Left, 420.0);
    canvas.text(&view.tagline, brand_x, PAD + 28.0, MUTED, Align::Left, 420.0);
    canvas.text("INVOICE", RIGHT, PAD + 4.0, title, Align::Right, 300.0);
    canvas.fill_rect(PAD, PAD + 64.0, WINDOW - 2.0 * PAD, 8.0, YELLOW_400);
    canvas.hline(0.0, WINDOW, 136.0, BORDER);
    canvas.advance(136.0);

    // Invoice info: customer left, number and date right.
    canvas.reserve(104.0);
    canvas.text("Invoice to:", PAD, PAD, LABEL, Align::Left, HALF);
    canvas.text(&view.customer_name, PAD, PAD + 28.0, BODY, Align::Left, HALF);
    let info = [
        ("Invoice #:", view.invoice_number.as_str()),
        ("Date:", view.invoice_date.as_str()),
    ];
    for (i, (label, value)) in info.into_iter().enumerate() {
        let top = PAD + i as f32 * 28.0;
        canvas.text(value, RIGHT, top, BODY, Align::Right, 240.0);
        canvas.text(label, RIGHT - 250.0, top, LABEL, Align::Right, 150.0);
    }
    canvas.advance(104.0);

    // Table header.
    let col_width = (WINDOW - 2.0 * PAD) / 4.0;
    canvas.reserve(44.0 + 52.0);
    canvas.fill_rect(PAD, 0.0, WINDOW - 2.0 * PAD, 44.0, GRAY_700);
    let header = Style::new(Font::Bold, 14.0, WHITE);
    let labels = ["Item Description", "Price", "Qty", "Total"];
    styled_cells(canvas, labels, 14.0, header, col_width);
    canvas.advance(44.0);

    for row in &view.rows {
        canvas.reserve(52.0);
        styled_row(canvas, row, col_width);
        canvas.hline(PAD, RIGHT, 52.0, BORDER);
        canvas.advance(52.0);
    }
    canvas.advance(16.0);

    // Terms on the left, subtotal and total box on the right.
    let term_lines = canvas.shaper().wrap(&view.terms, MUTED.font, MUTED.size, HALF);
    let terms_height = 28.0 + term_lines.len() as f32 * 20.0;
    let block = PAD + terms_height.max(92.0) + PAD;
    canvas.reserve(block);
    canvas.text("Terms & Conditions", PAD, PAD, LABEL, Align::Left, HALF);
    for (i, line) in term_lines.iter().enumerate() {
        let top = PAD + 28.0 + i as f32 * 20.0;
        canvas.glyphs(line, PAD, top, MUTED, Align::Left);
    }
    let totals_x = PAD * 2.0 + HALF;
    canvas.text("Sub Total:", totals_x, PAD, BODY, Align::Left, 120.0);
    canvas.text(&view.subtotal, RIGHT, PAD, BODY, Align::Right, HALF - 130.0);
    canvas.fill_rect(totals_x, PAD + 32.0, HALF, 52.0, YELLOW_400);
    canvas.text("Total:", totals_x + 12.0, PAD + 47.0, TOTAL, Align::Left, 100.0);
    canvas.text(&view.total, RIGHT - 12.0, PAD + 47.0, TOTAL, Align::Right, HALF - 130.0);
    canvas.advance(block);

    // Bottom bar.
    canvas.reserve(64.0);
    canvas.hline(0.0, WINDOW, 0.0, BORDER);
    canvas.text(&view.footer, PAD, PAD, SMALL, Align::Left, 600.0);
    canvas.text(&view.signature_label, RIGHT, PAD, SMALL, Align::Right, 200.0);
    canvas.advance(64.0);
}

fn styled_cells(
    canvas: &mut Canvas<'_, '_>,
    cells: [&str; 4],
    top: f32,
    style: Style,
    col_width: f32,
) {
    const PAD: f32 = 24.0;
    const CELL_PAD: f32 = 12.0;
    let max = col_width - 2.0 * CELL_PAD;

    canvas.text(cells[0], PAD + CELL_PAD, top, style, Align::Left, max);
    canvas.text(cells[1], PAD + col_width * 1.5, top, style, Align::Center, max);
    canvas.text(cells[2], PAD + col_width * 2.5, top, style, Align::Center, max);
    canvas.text(cells[3], PAD + col_width * 4.0 - CELL_PAD, top, style, Align::Right, max);
}

fn styled_row(canvas: &mut Canvas<'_, '_>, row: &RowView, col_width: f32) {
    let cells = [
        row.name.as_str(),
        row.price.as_str(),
        row.quantity.as_str(),
        row.total.as_str(),
    ];
    styled_cells(canvas, cells, 19.0, Style::new(Font::Regular, 14.0, BLACK), col_width);
}
