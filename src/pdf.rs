//! printpdf-backed [`CardSurface`] producing an A4 document in memory.

use crate::barcode::{BarcodeDrawing, DIGIT_BAND_MM, DIGIT_FONT_SIZE};
use crate::error::AppError;
use crate::layout::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::surface::CardSurface;
use ::image::DynamicImage;
use printpdf::*;

pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_size: f32,
    pages: u32,
}

impl PdfSurface {
    /// Starts a document with one empty page. `font_data` is a TrueType or
    /// OpenType font; without it the built-in Helvetica is used, which
    /// cannot show Japanese text.
    pub fn new(title: &str, font_data: Option<&[u8]>) -> Result<Self, AppError> {
        let (doc, page1, layer1) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);

        let font = match font_data {
            Some(bytes) => doc
                .add_external_font(bytes)
                .map_err(|e| AppError::FontError(e.to_string()))?,
            None => doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| AppError::PdfError(e.to_string()))?,
        };

        Ok(PdfSurface {
            doc,
            layer,
            font,
            font_size: 0.0,
            pages: 1,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.pages
    }

    /// Serialises the finished document.
    pub fn finish(self) -> Result<Vec<u8>, AppError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| AppError::PdfError(e.to_string()))
    }
}

impl CardSurface for PdfSurface {
    fn font_size(&self) -> f32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        if text.is_empty() {
            return;
        }
        self.layer
            .use_text(text, self.font_size, Mm(x), Mm(y), &self.font);
    }

    fn draw_image(&mut self, image: &DynamicImage, x: f32, y: f32, width: f32, height: f32) {
        let rgb_image = image.to_rgb8();
        let (width_px, height_px) = rgb_image.dimensions();
        if width_px == 0 || height_px == 0 {
            return;
        }

        let image = Image::from(ImageXObject {
            width: Px(width_px as usize),
            height: Px(height_px as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: rgb_image.into_raw(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        });

        // DPI = pixels / (mm / 25.4) fixes the width; height is scaled from there
        let dpi = (width_px as f32) / (width / 25.4);
        let natural_height = height_px as f32 * 25.4 / dpi;

        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(y)),
                scale_y: Some(height / natural_height),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    fn draw_barcode(&mut self, barcode: &BarcodeDrawing, x: f32, y: f32) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));

        let bar_bottom = y + DIGIT_BAND_MM;
        let bar_top = bar_bottom + barcode.bar_height_mm;
        for bar in &barcode.bars {
            let left = x + bar.x_mm;
            self.layer.add_rect(Rect::new(
                Mm(left),
                Mm(bar_bottom),
                Mm(left + bar.width_mm),
                Mm(bar_top),
            ));
        }

        self.layer.use_text(
            &barcode.digits,
            DIGIT_FONT_SIZE,
            Mm(x + 1.0),
            Mm(y + 0.6),
            &self.font,
        );
    }

    fn next_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
    }
}
