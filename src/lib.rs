//! # pricecard-pdf
//!
//! Turns spreadsheet rows into printable A4 price-card sheets. Each card
//! carries a QR code with the product identifier, a few short text lines,
//! the price block and a JAN (EAN-13) barcode.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pricecard_pdf::{compose, input, Audience, GridSize, PriceRule, Template};
//! use std::path::Path;
//!
//! let records = input::load_records(Path::new("cards.xlsx"))?;
//! let template = Template::new(Audience::Business, GridSize::Eighteen, PriceRule::Raw);
//! let sheet = compose(&records, &template, None)?;
//! std::fs::write("cards.pdf", &sheet.document)?;
//! # Ok::<(), pricecard_pdf::AppError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`record`] | Raw row values and emptiness rules |
//! | [`template`] | Column mapping, price rules, per-layout constants |
//! | [`normalize`](mod@normalize) | Row → display-ready card |
//! | [`layout`] | Grid geometry and pagination |
//! | [`render`] | Draws one card into one cell |
//! | [`compose`](mod@compose) | Drives the whole sheet |
//! | [`surface`] / [`pdf`] | Drawing backends |
//! | [`barcode`] | EAN-13 payloads and bar layout |
//! | [`input`] | xlsx / csv / json loaders |

pub mod barcode;
pub mod compose;
pub mod error;
pub mod input;
pub mod layout;
pub mod normalize;
pub mod pdf;
pub mod record;
pub mod render;
pub mod surface;
pub mod template;

pub use compose::{compose, compose_onto, Layout, Sheet};
pub use error::AppError;
pub use layout::{CellAddress, GridGeometry, GridSize};
pub use normalize::{normalize, NormalizedCard};
pub use record::{CellValue, Record};
pub use surface::{CardSurface, RecordingSurface};
pub use template::{Audience, PriceRule, Template};
