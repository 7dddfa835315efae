//! JAN / EAN-13 payload normalisation and bar layout.
//!
//! Uses the barcoders crate for the symbol encoding; this module only turns
//! loose spreadsheet cells into a 13-digit payload and the module pattern
//! into positioned bars.

use crate::record::CellValue;
use barcoders::sym::ean13::EAN13;

/// Nominal EAN-13 X-dimension (100% magnification)
pub const MODULE_WIDTH_MM: f32 = 0.33;

/// Band under the bars reserved for the human-readable digits
pub const DIGIT_BAND_MM: f32 = 2.8;

/// Font size of the human-readable digits (pt)
pub const DIGIT_FONT_SIZE: f32 = 6.0;

/// A 13-digit numeric payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ean13(String);

impl Ean13 {
    /// Reads integers, whole-number floats and digit strings. Anything else
    /// (signs, decimals, letters, blanks) yields no barcode.
    pub fn from_cell(value: &CellValue) -> Option<Self> {
        match value {
            CellValue::Int(i) if *i >= 0 => Self::from_digits(&i.to_string()),
            CellValue::Float(f) if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 => {
                Self::from_digits(&format!("{:.0}", f))
            }
            CellValue::Text(s) => Self::from_digits(s.trim()),
            _ => None,
        }
    }

    /// Zero-pads short payloads and keeps the first 13 digits of long ones.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let payload = if digits.len() < 13 {
            format!("{:0>13}", digits)
        } else {
            digits[..13].to_string()
        };
        Some(Ean13(payload))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits actually printed: the first 12 plus a freshly computed check
    /// digit. Matches the payload whenever its own check digit is valid.
    pub fn printed_digits(&self) -> String {
        let body = &self.0[..12];
        format!("{}{}", body, check_digit(body))
    }
}

fn check_digit(body: &str) -> u32 {
    let sum: u32 = body
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum();
    (10 - sum % 10) % 10
}

/// One dark bar, offset from the drawing's left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x_mm: f32,
    pub width_mm: f32,
}

/// Vector barcode with a queryable bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeDrawing {
    pub digits: String,
    pub bars: Vec<Bar>,
    pub bar_height_mm: f32,
    modules: usize,
}

impl BarcodeDrawing {
    pub fn new(payload: &Ean13, bar_height_mm: f32) -> Result<Self, barcoders::error::Error> {
        let symbol = EAN13::new(&payload.as_str()[..12])?;
        let modules = symbol.encode();
        Ok(BarcodeDrawing {
            digits: payload.printed_digits(),
            bars: bar_runs(&modules),
            bar_height_mm,
            modules: modules.len(),
        })
    }

    pub fn width_mm(&self) -> f32 {
        self.modules as f32 * MODULE_WIDTH_MM
    }

    pub fn height_mm(&self) -> f32 {
        self.bar_height_mm + DIGIT_BAND_MM
    }
}

/// Collapses consecutive dark modules into single bars.
fn bar_runs(modules: &[u8]) -> Vec<Bar> {
    let mut bars = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &module) in modules.iter().chain(std::iter::once(&0)).enumerate() {
        match (module == 1, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                bars.push(Bar {
                    x_mm: s as f32 * MODULE_WIDTH_MM,
                    width_mm: (i - s) as f32 * MODULE_WIDTH_MM,
                });
                start = None;
            }
            _ => {}
        }
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_thirteen_digits_unchanged() {
        let payload = Ean13::from_digits("4901234567894").unwrap();
        assert_eq!(payload.as_str(), "4901234567894");
        let again = Ean13::from_digits(payload.as_str()).unwrap();
        assert_eq!(again, payload);
    }

    #[test]
    fn test_short_payload_is_zero_padded() {
        let payload = Ean13::from_digits("123456789").unwrap();
        assert_eq!(payload.as_str(), "0000123456789");
    }

    #[test]
    fn test_long_payload_is_truncated() {
        let payload = Ean13::from_digits("1234567890123456").unwrap();
        assert_eq!(payload.as_str(), "1234567890123");
    }

    #[test]
    fn test_rejects_non_digits() {
        assert!(Ean13::from_digits("").is_none());
        assert!(Ean13::from_digits("49012345A7894").is_none());
        assert!(Ean13::from_cell(&CellValue::from("12.5")).is_none());
        assert!(Ean13::from_cell(&CellValue::Int(-5)).is_none());
        assert!(Ean13::from_cell(&CellValue::Float(12.5)).is_none());
        assert!(Ean13::from_cell(&CellValue::Missing).is_none());
        assert!(Ean13::from_cell(&CellValue::Bool(true)).is_none());
    }

    #[test]
    fn test_numeric_cells() {
        let from_int = Ean13::from_cell(&CellValue::Int(4901234567894)).unwrap();
        assert_eq!(from_int.as_str(), "4901234567894");
        let from_float = Ean13::from_cell(&CellValue::Float(4901234567894.0)).unwrap();
        assert_eq!(from_float.as_str(), "4901234567894");
        let from_text = Ean13::from_cell(&CellValue::from(" 4901234567894 ")).unwrap();
        assert_eq!(from_text.as_str(), "4901234567894");
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit("490123456789"), 4);
        assert_eq!(check_digit("750103131130"), 9);
        let payload = Ean13::from_digits("4901234567890").unwrap();
        assert_eq!(payload.printed_digits(), "4901234567894");
    }

    #[test]
    fn test_drawing_bounds() {
        let payload = Ean13::from_digits("4901234567894").unwrap();
        let drawing = BarcodeDrawing::new(&payload, 11.0).unwrap();
        assert_eq!(drawing.digits, "4901234567894");
        assert!(drawing.width_mm() > 25.0);
        assert!((drawing.height_mm() - (11.0 + DIGIT_BAND_MM)).abs() < 1e-4);
        assert!(!drawing.bars.is_empty());
        let last = drawing.bars.last().unwrap();
        assert!(last.x_mm + last.width_mm <= drawing.width_mm() + 1e-4);
    }

    #[test]
    fn test_bar_runs() {
        let bars = bar_runs(&[1, 0, 1, 1, 0, 0, 1]);
        assert_eq!(bars.len(), 3);
        assert!((bars[1].x_mm - 2.0 * MODULE_WIDTH_MM).abs() < 1e-6);
        assert!((bars[1].width_mm - 2.0 * MODULE_WIDTH_MM).abs() < 1e-6);
    }
}
