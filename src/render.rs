//! Card rendering: draws one normalised card into one grid cell.
//!
//! Layout inside a cell, measured from its top-left corner:
//! QR code in a 15 mm square, a text column to its right, the price block
//! below the text lines, and the JAN barcode anchored bottom-right.

use crate::barcode::BarcodeDrawing;
use crate::layout::{CellOrigin, GridGeometry};
use crate::normalize::NormalizedCard;
use crate::surface::{CardSurface, FontScope};
use crate::template::Template;
use ::image::{DynamicImage, Luma};
use qrcode::QrCode;

// ============================================================================
// Constants
// ============================================================================

/// QR code side length
pub const QR_SIZE_MM: f32 = 15.0;

/// Inset from the cell edges for the QR code, text top and barcode
pub const CARD_INSET_MM: f32 = 2.0;

/// Left edge of the text column, measured from the cell's left edge
pub const TEXT_LEFT_MM: f32 = CARD_INSET_MM + QR_SIZE_MM + CARD_INSET_MM;

/// Baseline pitch of the label / name / code lines, in points
pub const LINE_PITCH_PT: f32 = 10.0;

const MM_PER_PT: f32 = 25.4 / 72.0;

/// QR pixels per module
const QR_MODULE_PX: u32 = 2;

// ============================================================================
// QR Code Generation
// ============================================================================

pub fn generate_qr_image(payload: &str) -> Result<DynamicImage, qrcode::types::QrError> {
    let code = QrCode::new(payload.as_bytes())?;
    let image = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(QR_MODULE_PX, QR_MODULE_PX)
        .build();
    Ok(DynamicImage::ImageLuma8(image))
}

// ============================================================================
// Card
// ============================================================================

/// Draws `card` into the cell whose bottom-left corner is `origin`.
///
/// Leaves the surface's font size as it found it.
pub fn render_card<S: CardSurface + ?Sized>(
    surface: &mut S,
    origin: CellOrigin,
    geometry: &GridGeometry,
    card: &NormalizedCard,
    template: &Template,
) {
    let cell_top = origin.y + geometry.cell_height_mm;

    if let Some(identifier) = &card.identifier {
        match generate_qr_image(identifier) {
            Ok(qr_image) => surface.draw_image(
                &qr_image,
                origin.x + CARD_INSET_MM,
                cell_top - QR_SIZE_MM - CARD_INSET_MM,
                QR_SIZE_MM,
                QR_SIZE_MM,
            ),
            Err(e) => log::warn!("Skipping QR code for '{}': {}", identifier, e),
        }
    }

    let text_left = origin.x + TEXT_LEFT_MM;
    let text_top = cell_top - CARD_INSET_MM;

    let fixed_lines = [
        truncate(&card.label, template.label_max_chars),
        truncate(&card.name, template.name_max_chars),
        truncate(&card.code, template.code_max_chars),
    ];
    for (i, text) in fixed_lines.iter().enumerate() {
        let y = text_top - pt_to_mm(i as f32 * LINE_PITCH_PT);
        surface.draw_text(text, text_left, y);
    }

    {
        let block = &template.price_block;
        let size = block.font_size.unwrap_or(template.default_font_size);
        let mut scoped = FontScope::new(surface, size);
        for (line, text) in block.lines.iter().zip(&card.price_lines) {
            scoped.draw_text(text, text_left, text_top - pt_to_mm(line.offset_pt));
        }
    }

    if let Some(payload) = &card.barcode {
        match BarcodeDrawing::new(payload, geometry.cell_height_mm / 3.0) {
            Ok(barcode) => {
                let x = origin.x + geometry.cell_width_mm - barcode.width_mm() - CARD_INSET_MM;
                let y = origin.y + CARD_INSET_MM;
                surface.draw_barcode(&barcode, x, y);
            }
            Err(e) => log::warn!("Skipping barcode {}: {}", payload.as_str(), e),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}
