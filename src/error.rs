//! Error types for price-card generation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to read input file: {0}")]
    InputError(String),
    #[error("Template '{template}' requires columns missing from the input: {}", .columns.join(", "))]
    MissingColumns {
        template: String,
        columns: Vec<String>,
    },
    #[error("Failed to load font: {0}")]
    FontError(String),
    #[error("Failed to serialise layout: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
