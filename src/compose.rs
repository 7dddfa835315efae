//! Sheet composition: drives normalisation, pagination and rendering over
//! the full record sequence.

use crate::error::AppError;
use crate::normalize::normalize;
use crate::pdf::PdfSurface;
use crate::record::Record;
use crate::render::render_card;
use crate::surface::CardSurface;
use crate::template::Template;
use std::collections::BTreeSet;

/// Finished price-card document.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Serialised PDF
    pub document: Vec<u8>,
    /// Primary label of every rendered card, in render order
    pub labels: Vec<String>,
    /// 18 or 24
    pub grid_size: u32,
    pub pages: u32,
}

/// Outcome of laying cards out on a surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub labels: Vec<String>,
    pub pages: u32,
}

/// Fails when the input lacks any of the template's required columns.
/// An empty input has no columns to check and passes.
pub fn validate_columns(records: &[Record], template: &Template) -> Result<(), AppError> {
    if records.is_empty() {
        return Ok(());
    }

    let columns: BTreeSet<&str> = records.iter().flat_map(Record::columns).collect();
    let missing = template.missing_columns(columns.iter().copied());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingColumns {
            template: template.name.clone(),
            columns: missing,
        })
    }
}

/// Lays every non-blank record out on `surface`.
///
/// Blank rows are skipped without using a grid cell. The surface is left on
/// its last page, ready to be finalised by the caller.
pub fn compose_onto<S: CardSurface + ?Sized>(
    records: &[Record],
    template: &Template,
    surface: &mut S,
) -> Result<Layout, AppError> {
    validate_columns(records, template)?;

    let geometry = template.geometry();
    surface.set_font_size(template.default_font_size);

    let mut labels = Vec::new();
    let mut placed: u32 = 0;
    let mut pages: u32 = 1;

    for (row, record) in records.iter().enumerate() {
        let card = normalize(record, template);
        if card.is_blank {
            log::debug!("Row {}: all required columns empty, skipped", row + 1);
            continue;
        }

        if geometry.breaks_page(placed) {
            surface.next_page();
            surface.set_font_size(template.default_font_size);
            pages += 1;
            log::debug!("Page {} started at card {}", pages, placed + 1);
        }

        let address = geometry.place(placed);
        let origin = geometry.cell_origin(address);
        render_card(surface, origin, &geometry, &card, template);

        labels.push(card.label);
        placed += 1;
    }

    Ok(Layout { labels, pages })
}

/// Renders `records` to an A4 PDF using `template`.
///
/// `font_data` is an optional TrueType/OpenType font for the card text.
pub fn compose(
    records: &[Record],
    template: &Template,
    font_data: Option<&[u8]>,
) -> Result<Sheet, AppError> {
    let title = format!("Price Cards ({})", template.name);
    let mut surface = PdfSurface::new(&title, font_data)?;
    let layout = compose_onto(records, template, &mut surface)?;
    let pages = surface.page_count();
    let document = surface.finish()?;

    log::info!(
        "Composed {} cards on {} page(s) with template {}",
        layout.labels.len(),
        pages,
        template.name
    );

    Ok(Sheet {
        document,
        labels: layout.labels,
        grid_size: template.grid_tag(),
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::GridSize;
    use crate::record::CellValue;
    use crate::surface::{DrawOp, RecordingSurface};
    use crate::template::{Audience, PriceRule, DEFAULT_FONT_SIZE};
    use pretty_assertions::assert_eq;

    fn business_row(n: usize) -> Record {
        [
            ("id", CellValue::from(format!("uuid-{n}"))),
            ("出展者名", CellValue::from(format!("Company {n}"))),
            ("display_code", CellValue::from(format!("DC{n}"))),
            ("jan", CellValue::from(format!("49012345{n:05}"))),
            ("name", CellValue::from(format!("Item {n}"))),
            ("price", CellValue::Int(500)),
            ("retail_price", CellValue::Int(1000)),
        ]
        .into_iter()
        .collect()
    }

    fn blank_business_row() -> Record {
        ["id", "出展者名", "display_code", "jan", "name", "price", "retail_price"]
            .into_iter()
            .map(|c| (c, CellValue::Missing))
            .collect()
    }

    fn business(grid: GridSize) -> Template {
        Template::new(Audience::Business, grid, PriceRule::Raw)
    }

    #[test]
    fn test_twenty_five_cards_on_grid_a() {
        let records: Vec<Record> = (0..25).map(business_row).collect();
        let mut surface = RecordingSurface::new();

        let layout = compose_onto(&records, &business(GridSize::TwentyFour), &mut surface).unwrap();

        assert_eq!(layout.pages, 2);
        assert_eq!(surface.page_count(), 2);
        assert_eq!(layout.labels.len(), 25);
        assert_eq!(layout.labels[0], "Company 0");
        assert_eq!(layout.labels[24], "Company 24");

        // The 25th card sits alone in the top-left cell of page two
        let second_page = surface.pages()[1];
        let DrawOp::Image { x, y, .. } = second_page[0].clone() else {
            panic!("expected QR code first on page two");
        };
        assert!((x - (6.0 + 2.0)).abs() < 1e-4);
        assert!((y - (297.0 - 8.5 - 2.0 - 15.0)).abs() < 1e-4);
        let images = second_page
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count();
        assert_eq!(images, 1);
    }

    #[test]
    fn test_full_page_does_not_open_a_new_one() {
        let records: Vec<Record> = (0..18).map(business_row).collect();
        let mut surface = RecordingSurface::new();
        let layout = compose_onto(&records, &business(GridSize::Eighteen), &mut surface).unwrap();
        assert_eq!(layout.pages, 1);
        assert_eq!(surface.page_count(), 1);
    }

    #[test]
    fn test_blank_rows_do_not_consume_cells() {
        let mut records = Vec::new();
        for n in 0..30 {
            records.push(business_row(n));
            records.push(blank_business_row());
        }
        let mut surface = RecordingSurface::new();

        let layout = compose_onto(&records, &business(GridSize::TwentyFour), &mut surface).unwrap();

        assert_eq!(layout.labels.len(), 30);
        assert_eq!(layout.pages, 2);
        let expected: Vec<String> = (0..30).map(|n| format!("Company {n}")).collect();
        assert_eq!(layout.labels, expected);
    }

    #[test]
    fn test_missing_identifier_renders_text_and_barcode_only() {
        let mut record = business_row(1);
        record.insert("id", CellValue::Missing);
        let mut surface = RecordingSurface::new();

        compose_onto(&[record], &business(GridSize::Eighteen), &mut surface).unwrap();

        assert!(!surface.ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
        assert!(surface.ops.iter().any(|op| matches!(op, DrawOp::Barcode { .. })));
        assert_eq!(surface.texts().next(), Some("Company 1"));
    }

    #[test]
    fn test_font_reset_between_cards_and_pages() {
        let records: Vec<Record> = (0..19).map(business_row).collect();
        let mut surface = RecordingSurface::new();

        compose_onto(&records, &business(GridSize::Eighteen), &mut surface).unwrap();

        assert_eq!(surface.font_size(), DEFAULT_FONT_SIZE);
        let second_page = surface.pages()[1];
        let first_text_size = second_page.iter().find_map(|op| match op {
            DrawOp::Text { size, .. } => Some(*size),
            _ => None,
        });
        assert_eq!(first_text_size, Some(DEFAULT_FONT_SIZE));
    }

    #[test]
    fn test_missing_columns_fail_before_rendering() {
        let record: Record = [("タグ", "FK"), ("商品名", "Vase")].into_iter().collect();
        let template = Template::new(Audience::Consumer, GridSize::Eighteen, PriceRule::Raw);
        let mut surface = RecordingSurface::new();

        let err = compose_onto(&[record], &template, &mut surface).unwrap_err();

        match err {
            AppError::MissingColumns { template, columns } => {
                assert_eq!(template, "toC-18");
                assert_eq!(columns, vec!["品番", "商品コード", "商品単価"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_compose_returns_document_and_tag() {
        let records: Vec<Record> = (0..3).map(business_row).collect();
        let sheet = compose(&records, &business(GridSize::Eighteen), None).unwrap();
        assert!(sheet.document.starts_with(b"%PDF"));
        assert_eq!(sheet.grid_size, 18);
        assert_eq!(sheet.pages, 1);
        assert_eq!(sheet.labels, vec!["Company 0", "Company 1", "Company 2"]);
    }

    #[test]
    fn test_compose_counts_document_pages() {
        let records: Vec<Record> = (0..37).map(business_row).collect();
        let sheet = compose(&records, &business(GridSize::Eighteen), None).unwrap();
        assert_eq!(sheet.pages, 3);
        assert_eq!(sheet.labels.len(), 37);
    }

    #[test]
    fn test_empty_input_still_produces_a_page() {
        let sheet = compose(&[], &business(GridSize::TwentyFour), None).unwrap();
        assert!(sheet.document.starts_with(b"%PDF"));
        assert_eq!(sheet.pages, 1);
        assert!(sheet.labels.is_empty());
        assert_eq!(sheet.grid_size, 24);
    }
}
