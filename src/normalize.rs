//! Record normalisation: blank detection, string coercion and price
//! formatting. Produces the strongly-typed [`NormalizedCard`] the renderer
//! draws from.

use crate::barcode::Ean13;
use crate::record::{CellValue, Record};
use crate::template::{
    PriceLine, PriceRule, Segment, Template, OPEN_PRICE_LABEL, TAX_DENOMINATOR, TAX_NUMERATOR,
    TAX_ROUNDING,
};

/// Display-ready contents of one card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedCard {
    /// Matrix-code payload, only when non-empty
    pub identifier: Option<String>,
    pub label: String,
    pub name: String,
    pub code: String,
    /// One entry per price line of the template
    pub price_lines: Vec<String>,
    pub barcode: Option<Ean13>,
    /// Every required column was empty; the card is neither drawn nor counted
    pub is_blank: bool,
}

pub fn normalize(record: &Record, template: &Template) -> NormalizedCard {
    let is_blank = template
        .required_columns
        .iter()
        .all(|column| record.is_blank(column));
    if is_blank {
        return NormalizedCard {
            is_blank: true,
            ..Default::default()
        };
    }

    let fields = &template.fields;

    let identifier = fields
        .identifier
        .as_deref()
        .map(|column| record.text(column))
        .filter(|id| !id.is_empty());

    let label = match &template.fixed_label {
        Some(fixed) => fixed.clone(),
        None => record.text(&fields.label),
    };

    let code = fields
        .code
        .iter()
        .map(|column| record.text(column))
        .find(|code| !code.is_empty())
        .unwrap_or_default();

    let price_lines = template
        .price_block
        .lines
        .iter()
        .map(|line| format_price_line(line, record, template.price_rule))
        .collect();

    NormalizedCard {
        identifier,
        label,
        name: record.text(&fields.name),
        code,
        price_lines,
        barcode: Ean13::from_cell(record.get(&fields.barcode)),
        is_blank: false,
    }
}

/// Formats a price cell under `rule`.
///
/// Tax-inclusive prices that fail to parse, or overflow once taxed, count as
/// zero. Open prices print
/// [`OPEN_PRICE_LABEL`] for blank or zero values.
pub fn format_price(value: &CellValue, rule: PriceRule) -> String {
    match rule {
        PriceRule::Raw => value.to_display(),
        PriceRule::TaxInclusive => {
            let base = value.as_number().unwrap_or(0.0);
            let taxed = TAX_ROUNDING.apply(base * TAX_NUMERATOR / TAX_DENOMINATOR);
            if taxed.is_finite() && taxed.abs() < i64::MAX as f64 {
                (taxed as i64).to_string()
            } else {
                "0".to_string()
            }
        }
        PriceRule::OpenPrice => {
            let display = value.to_display();
            if display.is_empty() || value.as_number() == Some(0.0) {
                OPEN_PRICE_LABEL.to_string()
            } else {
                display
            }
        }
    }
}

fn format_price_line(line: &PriceLine, record: &Record, rule: PriceRule) -> String {
    let mut text = String::new();
    for (i, segment) in line.segments.iter().enumerate() {
        match segment {
            Segment::Text(s) => text.push_str(s),
            Segment::Field(column) => text.push_str(&record.text(column)),
            Segment::Price(column) => {
                let price = format_price(record.get(column), rule);
                // With a unit after it the sentinel replaces the whole line;
                // otherwise it keeps its caption
                let has_unit = line.segments[i + 1..]
                    .iter()
                    .any(|s| matches!(s, Segment::Text(_)));
                if price == OPEN_PRICE_LABEL && has_unit {
                    return price;
                }
                text.push_str(&price);
            }
        }
    }
    text
}
