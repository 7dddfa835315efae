//! Grid pagination: maps the running count of placed cards onto
//! (page, column, row) cells of a fixed A4 grid.

use serde::Serialize;

/// A4 dimensions in mm
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Physical layout of one label sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub cols: u32,
    pub rows: u32,
    pub cell_width_mm: f32,
    pub cell_height_mm: f32,
    pub left_margin_mm: f32,
    pub top_margin_mm: f32,
}

/// 24-up sheet: 3 × 8 cells of 66 × 35 mm.
pub const GRID_A: GridGeometry = GridGeometry {
    cols: 3,
    rows: 8,
    cell_width_mm: 66.0,
    cell_height_mm: 35.0,
    left_margin_mm: 6.0,
    top_margin_mm: 8.5,
};

/// 18-up sheet: 3 × 6 cells of 57.3 × 42.3 mm.
pub const GRID_B: GridGeometry = GridGeometry {
    cols: 3,
    rows: 6,
    cell_width_mm: 57.3,
    cell_height_mm: 42.3,
    left_margin_mm: 19.0,
    top_margin_mm: 21.0,
};

/// The two supported sheet stocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GridSize {
    /// Grid-A, 24 cells per page
    TwentyFour,
    /// Grid-B, 18 cells per page
    Eighteen,
}

impl GridSize {
    pub fn geometry(self) -> GridGeometry {
        match self {
            GridSize::TwentyFour => GRID_A,
            GridSize::Eighteen => GRID_B,
        }
    }

    /// Cells per page; doubles as the tag reported back to callers.
    pub fn tag(self) -> u32 {
        self.geometry().cells_per_page()
    }
}

/// Grid slot assigned to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddress {
    pub page: u32,
    pub column: u32,
    pub row: u32,
}

/// Bottom-left corner of a cell, in mm from the page's bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellOrigin {
    pub x: f32,
    pub y: f32,
}

impl GridGeometry {
    pub fn cells_per_page(&self) -> u32 {
        self.cols * self.rows
    }

    /// Cell for the `ordinal`-th non-blank card (zero-based).
    pub fn place(&self, ordinal: u32) -> CellAddress {
        let per_page = self.cells_per_page();
        let on_page = ordinal % per_page;
        CellAddress {
            page: ordinal / per_page,
            column: on_page % self.cols,
            row: on_page / self.cols,
        }
    }

    /// Whether placing card `ordinal` requires closing the current page first.
    pub fn breaks_page(&self, ordinal: u32) -> bool {
        ordinal != 0 && ordinal % self.cells_per_page() == 0
    }

    /// Row 0 is the topmost row.
    pub fn cell_origin(&self, address: CellAddress) -> CellOrigin {
        CellOrigin {
            x: self.left_margin_mm + address.column as f32 * self.cell_width_mm,
            y: PAGE_HEIGHT_MM
                - self.top_margin_mm
                - (address.row + 1) as f32 * self.cell_height_mm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_matches_formula_for_both_grids() {
        for grid in [GRID_A, GRID_B] {
            for n in 0..200 {
                let address = grid.place(n);
                assert_eq!(address.column, n % grid.cols);
                assert_eq!(address.row, (n / grid.cols) % grid.rows);
                assert_eq!(address.page, n / (grid.cols * grid.rows));
                assert!(address.column < grid.cols);
                assert!(address.row < grid.rows);
            }
        }
    }

    #[test]
    fn test_page_breaks() {
        assert!(!GRID_A.breaks_page(0));
        assert!(!GRID_A.breaks_page(23));
        assert!(GRID_A.breaks_page(24));
        assert!(GRID_A.breaks_page(48));
        assert!(!GRID_B.breaks_page(17));
        assert!(GRID_B.breaks_page(18));
    }

    #[test]
    fn test_twenty_fifth_card_opens_second_page() {
        let address = GRID_A.place(24);
        assert_eq!(address, CellAddress { page: 1, column: 0, row: 0 });
    }

    #[test]
    fn test_cell_origin() {
        let top_left = GRID_A.cell_origin(CellAddress { page: 0, column: 0, row: 0 });
        assert!((top_left.x - 6.0).abs() < 1e-4);
        assert!((top_left.y - (297.0 - 8.5 - 35.0)).abs() < 1e-4);

        let bottom_right = GRID_B.cell_origin(CellAddress { page: 3, column: 2, row: 5 });
        assert!((bottom_right.x - (19.0 + 2.0 * 57.3)).abs() < 1e-3);
        assert!((bottom_right.y - (297.0 - 21.0 - 6.0 * 42.3)).abs() < 1e-3);
    }

    #[test]
    fn test_grid_tags() {
        assert_eq!(GridSize::TwentyFour.tag(), 24);
        assert_eq!(GridSize::Eighteen.tag(), 18);
    }
}
