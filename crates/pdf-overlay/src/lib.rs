//! PDF Overlay - low-level PDF template manipulation
//!
//! This crate provides functionality for:
//! - Opening a pre-printed template PDF from bytes
//! - Embedding a single TrueType font (CID/Type0, Identity-H)
//! - Inserting text at absolute coordinates (top-origin)
//! - Filling rectangles (highlight boxes)
//! - Duplicating pages and serializing back to bytes
//!
//! # Example
//!
//! ```ignore
//! use pdf_overlay::{Align, PdfDocument};
//!
//! let mut doc = PdfDocument::open_from_bytes(&template_bytes)?;
//! doc.add_font("ipag", &font_bytes)?;
//! doc.insert_text("山田太郎", 1, 130.0, 205.0, 9.0, Align::Left)?;
//! let pdf = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod text;

pub use document::{Color, PdfDocument};
pub use font::EmbeddedFont;
pub use text::{generate_rect_operators, generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("No font loaded")]
    FontNotLoaded,

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}
