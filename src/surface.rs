//! Drawing surfaces.
//!
//! [`CardSurface`] is everything the card renderer needs from a page
//! description backend. [`crate::pdf::PdfSurface`] writes a real document;
//! [`RecordingSurface`] keeps a list of operations for dry runs and tests.

use crate::barcode::BarcodeDrawing;
use ::image::DynamicImage;
use serde::Serialize;
use std::ops::{Deref, DerefMut};

/// Page-drawing capability. All coordinates are mm from the bottom-left of
/// the current page.
pub trait CardSurface {
    fn font_size(&self) -> f32;
    fn set_font_size(&mut self, size: f32);
    /// Draws `text` with its baseline at `y`, using the current font size.
    fn draw_text(&mut self, text: &str, x: f32, y: f32);
    /// Draws a raster image scaled to `width` × `height`, bottom-left at (x, y).
    fn draw_image(&mut self, image: &DynamicImage, x: f32, y: f32, width: f32, height: f32);
    /// Draws a barcode with the bottom-left of its bounding box at (x, y).
    fn draw_barcode(&mut self, barcode: &BarcodeDrawing, x: f32, y: f32);
    /// Closes the current page and starts a fresh one.
    fn next_page(&mut self);
}

/// Applies a font size for the lifetime of the guard and restores the
/// previous size when dropped.
pub struct FontScope<'a, S: CardSurface + ?Sized> {
    surface: &'a mut S,
    restore: f32,
}

impl<'a, S: CardSurface + ?Sized> FontScope<'a, S> {
    pub fn new(surface: &'a mut S, size: f32) -> Self {
        let restore = surface.font_size();
        surface.set_font_size(size);
        FontScope { surface, restore }
    }
}

impl<S: CardSurface + ?Sized> Deref for FontScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: CardSurface + ?Sized> DerefMut for FontScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: CardSurface + ?Sized> Drop for FontScope<'_, S> {
    fn drop(&mut self) {
        self.surface.set_font_size(self.restore);
    }
}

/// A single recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Barcode {
        digits: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    PageBreak,
}

/// In-memory surface that records what would have been drawn.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    font_size: f32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        1 + self.ops.iter().filter(|op| **op == DrawOp::PageBreak).count()
    }

    /// Operations grouped per page.
    pub fn pages(&self) -> Vec<&[DrawOp]> {
        self.ops.split(|op| *op == DrawOp::PageBreak).collect()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl CardSurface for RecordingSurface {
    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            size: self.font_size,
        });
    }

    fn draw_image(&mut self, _image: &DynamicImage, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Image { x, y, width, height });
    }

    fn draw_barcode(&mut self, barcode: &BarcodeDrawing, x: f32, y: f32) {
        self.ops.push(DrawOp::Barcode {
            digits: barcode.digits.clone(),
            x,
            y,
            width: barcode.width_mm(),
            height: barcode.height_mm(),
        });
    }

    fn next_page(&mut self) {
        self.ops.push(DrawOp::PageBreak);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_scope_restores_on_drop() {
        let mut surface = RecordingSurface::new();
        surface.set_font_size(8.0);
        {
            let mut scoped = FontScope::new(&mut surface, 14.0);
            scoped.draw_text("big", 0.0, 0.0);
            assert_eq!(scoped.font_size(), 14.0);
        }
        assert_eq!(surface.font_size(), 8.0);
        assert_eq!(
            surface.ops[0],
            DrawOp::Text { text: "big".to_string(), x: 0.0, y: 0.0, size: 14.0 }
        );
    }

    #[test]
    fn test_font_scope_restores_on_early_return() {
        fn draw_then_bail(surface: &mut RecordingSurface) -> Result<(), &'static str> {
            let mut scoped = FontScope::new(surface, 10.0);
            scoped.draw_text("partial", 0.0, 0.0);
            Err("bail")
        }

        let mut surface = RecordingSurface::new();
        surface.set_font_size(8.0);
        assert!(draw_then_bail(&mut surface).is_err());
        assert_eq!(surface.font_size(), 8.0);
    }

    #[test]
    fn test_pages() {
        let mut surface = RecordingSurface::new();
        assert_eq!(surface.page_count(), 1);
        surface.draw_text("a", 0.0, 0.0);
        surface.next_page();
        surface.draw_text("b", 0.0, 0.0);
        surface.draw_text("c", 0.0, 0.0);
        assert_eq!(surface.page_count(), 2);
        let pages = surface.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].len(), 2);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
