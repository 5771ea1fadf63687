//! Document assembly
//!
//! `generate` runs the whole pipeline for one submission: load assets,
//! open the template, render the agency copy and the customer copy, and
//! serialize. The call is atomic: either complete two-copy PDF bytes come
//! back or an error does, never a partial document.

use crate::assets::AssetSource;
use crate::model::Application;
use crate::renderer::{CopyType, PageRenderer, PageSurface};
use crate::Result;
use pdf_overlay::{Align, Color, PdfDocument};
use tracing::debug;

/// Name under which the form font is registered
const FONT_NAME: &str = "ipag";

/// On the full pre-printed template the agency copy is page 1 and the
/// customer copy page 3; pages 2 and 4 pass through untouched.
const CUSTOMER_COPY_PAGE: usize = 3;

/// Adapts one page of a `PdfDocument` to the renderer's surface trait
struct PdfPageSurface<'a> {
    doc: &'a mut PdfDocument,
    page: usize,
}

impl PageSurface for PdfPageSurface<'_> {
    fn draw_text(&mut self, text: &str, x: f64, y: f64, font_size: f64) -> Result<()> {
        self.doc
            .insert_text(text, self.page, x, y, font_size as f32, Align::Left)?;
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.doc
            .fill_rect(self.page, x, y, width, height, Color::yellow())?;
        Ok(())
    }
}

/// Builds the two-copy application PDF
pub struct DocumentAssembler<A: AssetSource> {
    assets: A,
}

impl<A: AssetSource> DocumentAssembler<A> {
    pub fn new(assets: A) -> Self {
        Self { assets }
    }

    /// Generate the complete PDF for one submission
    pub fn generate(&self, application: Application) -> Result<Vec<u8>> {
        let application = application.normalized();

        let template = self
            .assets
            .template_bytes(application.product, application.payment_method)?;
        let font = self.assets.font_bytes()?;

        let mut doc = PdfDocument::open_from_bytes(&template)?;
        doc.add_font(FONT_NAME, &font)?;
        debug!(
            product = application.product.id(),
            pages = doc.page_count(),
            "template loaded"
        );

        // Short fallback templates get the customer copy as an appended
        // duplicate of page 1 instead of targeting page 3
        let customer_page = if doc.page_count() >= CUSTOMER_COPY_PAGE {
            CUSTOMER_COPY_PAGE
        } else {
            doc.duplicate_page(1)?
        };

        let renderer = PageRenderer::new(&application);
        for (copy, page) in [(CopyType::Agency, 1), (CopyType::Customer, customer_page)] {
            renderer.render(&mut PdfPageSurface {
                doc: &mut doc,
                page,
            })?;
            debug!(?copy, page, "copy rendered");
        }

        let bytes = doc.to_bytes()?;
        debug!(size = bytes.len(), "document serialized");
        Ok(bytes)
    }
}
