//! Form Engine - membership application form layout
//!
//! This crate provides:
//! - The application data model (serde, camelCase wire contract)
//! - Sentinel normalization (「未入力」 and empty strings become absent)
//! - Declarative field placement keyed by product and payment cadence
//! - Page rendering over a `PageSurface` trait
//! - Two-copy document assembly onto a pre-printed template
//!
//! # Example
//!
//! ```ignore
//! use form_engine::{Application, DirAssets, DocumentAssembler};
//!
//! let application = Application::from_json(&body)?;
//! let assets = DirAssets::new("assets/templates", "assets/fonts/ipag.ttf");
//! let assembler = DocumentAssembler::new(assets);
//! let pdf_bytes = assembler.generate(application)?;
//! ```

mod assembler;
mod assets;
mod model;
mod placement;
mod renderer;

pub use assembler::DocumentAssembler;
pub use assets::{AssetSource, DirAssets};
pub use model::{
    AgentInfo, Applicant, Application, ApplicationType, EmergencyContact, Gender, OptionCode,
    PaymentMethod, Product, Property, Resident, SENTINEL,
};
pub use placement::{resolve_placement, FieldKey, Placement};
pub use renderer::{CopyType, PageRenderer, PageSurface};

use thiserror::Error;

/// Errors that can occur during form generation
#[derive(Debug, Error)]
pub enum FormError {
    /// Missing template/font assets or broken deployment layout.
    /// Not retried; the transport layer maps this to a server error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A draw primitive failed. The whole document is abandoned; no
    /// partial output is ever returned.
    #[error("Render error: {0}")]
    Render(String),

    /// The input object is missing a structurally required selector
    /// (product or payment method). Absent field values are never an error.
    #[error("Invalid input: {0}")]
    InputShape(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_overlay::PdfError),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
