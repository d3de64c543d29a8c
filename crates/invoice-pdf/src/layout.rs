//! # Page Layout
//!
//! The invoice is laid out in CSS pixels on a virtual window, then scaled
//! onto the page.
//!
//! ```text
//! ┌──────────────── A4 page (595.28 × 841.89 pt) ────────────────┐
//! │ ← x=20 →┌──────────── width = 555 pt ────────────┐           │
//! │  y=20   │                                         │           │
//! │         │  invoice laid out at window_width=900px │           │
//! │         │  scale = 555 / 900 ≈ 0.617 pt per px    │           │
//! │         └─────────────────────────────────────────┘           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Physical page size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Where and how large the invoice is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Left offset of the content box, in points.
    pub x: f32,
    /// Top offset of the content box, in points. Also used as bottom margin.
    pub y: f32,
    /// Content box width, in points.
    pub width: f32,
    /// Width of the virtual window the invoice is laid out in, in pixels.
    pub window_width: f32,
    pub page: PageSize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            x: 20.0,
            y: 20.0,
            width: 555.0,
            window_width: 900.0,
            page: PageSize::A4,
        }
    }
}

impl LayoutOptions {
    /// Points per layout pixel.
    pub fn scale(&self) -> f32 {
        if self.window_width > 0.0 {
            self.width / self.window_width
        } else {
            1.0
        }
    }

    /// Vertical space available on one page, in layout pixels.
    pub fn page_capacity_px(&self) -> f32 {
        ((self.page.height - 2.0 * self.y) / self.scale()).max(1.0)
    }

    /// Page x coordinate of a layout pixel column.
    pub fn page_x(&self, px: f32) -> f32 {
        self.x + px * self.scale()
    }

    /// Page y coordinate (origin bottom-left) of a layout pixel row,
    /// measured from the top of the current page's content box.
    pub fn page_y(&self, px_from_top: f32) -> f32 {
        self.page.height - (self.y + px_from_top * self.scale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale() {
        let layout = LayoutOptions::default();
        assert!((layout.scale() - 555.0 / 900.0).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_mapping() {
        let layout = LayoutOptions::default();
        assert_eq!(layout.page_x(0.0), 20.0);
        assert!((layout.page_x(900.0) - 575.0).abs() < 1e-3);
        assert!((layout.page_y(0.0) - (841.89 - 20.0)).abs() < 1e-3);
    }

    #[test]
    fn test_page_capacity() {
        let layout = LayoutOptions::default();
        let expected = (841.89 - 40.0) / (555.0 / 900.0);
        assert!((layout.page_capacity_px() - expected).abs() < 1e-2);
    }

    #[test]
    fn test_zero_window_width_does_not_divide_by_zero() {
        let layout = LayoutOptions {
            window_width: 0.0,
            ..LayoutOptions::default()
        };
        assert_eq!(layout.scale(), 1.0);
    }
}
