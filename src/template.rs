//! Card templates: which columns feed which card line, the sheet grid, and
//! how prices are printed.
//!
//! Every layout variant runs through the same pipeline; a [`Template`] is the
//! only thing that differs between them.

use crate::layout::{GridGeometry, GridSize};
use serde::Serialize;

/// Font size for every line outside the price block (pt)
pub const DEFAULT_FONT_SIZE: f32 = 8.0;

/// Character limits for the text column. Longer values are cut silently.
pub const NAME_MAX_CHARS: usize = 13;
pub const CODE_MAX_CHARS: usize = 15;

/// Printed instead of a blank or zero price under [`PriceRule::OpenPrice`]
pub const OPEN_PRICE_LABEL: &str = "オープン価格";

/// Consumption tax multiplier, 1.10, kept as a ratio so that whole-yen
/// prices multiply exactly.
pub const TAX_NUMERATOR: f64 = 11.0;
pub const TAX_DENOMINATOR: f64 = 10.0;

/// Rounding applied to tax-inclusive prices.
pub const TAX_ROUNDING: Rounding = Rounding::HalfUp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// 0.5 rounds away from zero
    HalfUp,
    /// 0.5 rounds to the nearest even integer
    HalfEven,
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::HalfUp => value.round(),
            Rounding::HalfEven => value.round_ties_even(),
        }
    }
}

/// Who the sheet is printed for; decides the column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Audience {
    /// Trade-show sheets: QR identifier, wholesale price and lot
    Business,
    /// Shop-floor sheets keyed on POS import columns
    Consumer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceRule {
    /// Print the cell as-is
    Raw,
    /// Multiply by 1.10 and round with [`TAX_ROUNDING`]
    TaxInclusive,
    /// Blank or zero prints [`OPEN_PRICE_LABEL`]
    OpenPrice,
}

/// Source columns for the fixed card lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMap {
    /// Matrix-code payload; `None` means the template never draws one
    pub identifier: Option<String>,
    /// Primary label (exhibitor or tag); also reported in the label list
    pub label: String,
    pub name: String,
    /// Code line; the first non-empty column wins
    pub code: Vec<String>,
    /// EAN-13 payload
    pub barcode: String,
}

/// Piece of a price line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Segment {
    Text(String),
    /// Display string of a column
    Field(String),
    /// Column formatted through the template's [`PriceRule`]
    Price(String),
}

impl Segment {
    fn text(s: &str) -> Self {
        Segment::Text(s.to_string())
    }

    fn field(column: &str) -> Self {
        Segment::Field(column.to_string())
    }

    fn price(column: &str) -> Self {
        Segment::Price(column.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLine {
    /// Baseline offset below the text top, in points
    pub offset_pt: f32,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceBlock {
    /// Temporary font size for the block; `None` keeps the default
    pub font_size: Option<f32>,
    pub lines: Vec<PriceLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub name: String,
    pub audience: Audience,
    pub grid: GridSize,
    /// A row is blank when every one of these is empty
    pub required_columns: Vec<String>,
    pub fields: FieldMap,
    pub default_font_size: f32,
    pub label_max_chars: usize,
    pub name_max_chars: usize,
    pub code_max_chars: usize,
    pub price_rule: PriceRule,
    pub price_block: PriceBlock,
    /// Supplier branding printed in place of the label column
    pub fixed_label: Option<String>,
}

const BUSINESS_COLUMNS: [&str; 7] = [
    "id",
    "出展者名",
    "display_code",
    "jan",
    "name",
    "price",
    "retail_price",
];

const CONSUMER_COLUMNS: [&str; 5] = ["タグ", "品番", "商品コード", "商品名", "商品単価"];

impl Template {
    pub fn new(audience: Audience, grid: GridSize, price_rule: PriceRule) -> Self {
        let (required, fields) = match audience {
            Audience::Business => (
                &BUSINESS_COLUMNS[..],
                FieldMap {
                    identifier: Some("id".to_string()),
                    label: "出展者名".to_string(),
                    name: "name".to_string(),
                    code: vec!["number".to_string(), "display_code".to_string()],
                    barcode: "jan".to_string(),
                },
            ),
            Audience::Consumer => (
                &CONSUMER_COLUMNS[..],
                FieldMap {
                    identifier: None,
                    label: "タグ".to_string(),
                    name: "商品名".to_string(),
                    code: vec!["品番".to_string()],
                    barcode: "商品コード".to_string(),
                },
            ),
        };

        Template {
            name: template_name(audience, grid, price_rule),
            audience,
            grid,
            required_columns: required.iter().map(|c| c.to_string()).collect(),
            fields,
            default_font_size: DEFAULT_FONT_SIZE,
            label_max_chars: NAME_MAX_CHARS,
            name_max_chars: NAME_MAX_CHARS,
            code_max_chars: CODE_MAX_CHARS,
            price_rule,
            price_block: price_block(audience, grid, price_rule),
            fixed_label: None,
        }
    }

    pub fn with_fixed_label(mut self, label: impl Into<String>) -> Self {
        self.fixed_label = Some(label.into());
        self
    }

    pub fn geometry(&self) -> GridGeometry {
        self.grid.geometry()
    }

    pub fn grid_tag(&self) -> u32 {
        self.grid.tag()
    }

    /// Required columns absent from `columns`, in template order.
    pub fn missing_columns<'a, I>(&self, columns: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: Vec<&str> = columns.into_iter().collect();
        self.required_columns
            .iter()
            .filter(|c| !present.contains(&c.as_str()))
            .cloned()
            .collect()
    }
}

fn template_name(audience: Audience, grid: GridSize, rule: PriceRule) -> String {
    let audience = match audience {
        Audience::Business => "toB",
        Audience::Consumer => "toC",
    };
    let rule = match rule {
        PriceRule::Raw => "",
        PriceRule::TaxInclusive => "-tax-inclusive",
        PriceRule::OpenPrice => "-open-price",
    };
    format!("{}-{}{}", audience, grid.tag(), rule)
}

fn price_block(audience: Audience, grid: GridSize, rule: PriceRule) -> PriceBlock {
    let line = |offset_pt: f32, segments: Vec<Segment>| PriceLine { offset_pt, segments };

    match audience {
        Audience::Business => {
            let retail_caption = match rule {
                PriceRule::TaxInclusive => "上代(税込): ",
                PriceRule::Raw | PriceRule::OpenPrice => "上代: ",
            };
            let retail = vec![Segment::text(retail_caption), Segment::price("retail_price")];
            match grid {
                GridSize::TwentyFour => PriceBlock {
                    font_size: None,
                    lines: vec![
                        line(30.0, retail),
                        line(
                            40.0,
                            vec![
                                Segment::text("販売価格: "),
                                Segment::field("unit_price"),
                                Segment::text(" Lot: "),
                                Segment::field("lot"),
                            ],
                        ),
                    ],
                },
                GridSize::Eighteen => PriceBlock {
                    font_size: Some(10.0),
                    lines: vec![
                        line(34.0, retail),
                        line(
                            48.0,
                            vec![Segment::text("販売価格: "), Segment::field("unit_price")],
                        ),
                        line(62.0, vec![Segment::text("Lot: "), Segment::field("lot")]),
                    ],
                },
            }
        }
        Audience::Consumer => {
            let caption = match (rule, grid) {
                (PriceRule::TaxInclusive, _) => "税込 ",
                (PriceRule::OpenPrice, _) => "",
                (PriceRule::Raw, GridSize::Eighteen) => "税抜 ",
                (PriceRule::Raw, GridSize::TwentyFour) => " ",
            };
            PriceBlock {
                font_size: Some(14.0),
                lines: vec![line(
                    36.0,
                    vec![
                        Segment::text(caption),
                        Segment::price("商品単価"),
                        Segment::text(" 円"),
                    ],
                )],
            }
        }
    }
}
