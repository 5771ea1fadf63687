//! Integration tests for pdf-overlay
//!
//! These tests verify end-to-end functionality with real PDF operations.
//! Tests that need the Japanese form font read it from `assets/fonts/` and
//! are ignored by default so the suite passes on a bare checkout.

use lopdf::dictionary;
use pdf_overlay::{Align, Color, PdfDocument, PdfError};

/// Create a minimal valid PDF for testing
///
/// This creates a simple A4 PDF with the requested number of pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Pages",
        "Count" => page_count as i32,
        "Kids" => vec![], // Will be updated below
    }));

    let mut page_ids = Vec::new();
    for _ in 0..page_count {
        let contents_id = doc.add_object(lopdf::Object::Stream(lopdf::Stream::new(
            lopdf::dictionary! {},
            vec![],
        )));

        let page_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.28.into(), 841.89.into()],
            "Resources" => lopdf::dictionary! {},
            "Contents" => contents_id,
        }));
        page_ids.push(page_id);
    }

    let mut pages_dict = doc.get_object(pages_id).unwrap().as_dict().unwrap().clone();
    pages_dict.set(
        "Kids",
        lopdf::Object::Array(page_ids.into_iter().map(|id| id.into()).collect()),
    );
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    }));

    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn get_form_font_data() -> Vec<u8> {
    std::fs::read("../../assets/fonts/ipag.ttf").expect("Failed to read form font file")
}

#[test]
fn test_open_save_roundtrip() {
    let pdf_data = create_test_pdf(1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    assert_eq!(doc.page_count(), 1);

    let saved_data = doc.to_bytes().expect("Failed to save PDF");

    let doc2 = PdfDocument::open_from_bytes(&saved_data).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 1);
}

#[test]
fn test_open_invalid_bytes() {
    let result = PdfDocument::open_from_bytes(b"not a pdf");
    assert!(matches!(result, Err(PdfError::OpenError(_))));
}

#[test]
fn test_fill_rect() {
    let pdf_data = create_test_pdf(1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.fill_rect(1, 135.0, 528.0, 320.0, 22.0, Color::yellow())
        .expect("Failed to fill rect");

    let saved_data = doc.to_bytes().expect("Failed to save PDF");
    assert!(!saved_data.is_empty());

    // The rect operators must land in a content stream
    let doc2 = PdfDocument::open_from_bytes(&saved_data).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 1);
}

#[test]
fn test_fill_rect_invalid_page() {
    let pdf_data = create_test_pdf(1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    let result = doc.fill_rect(999, 0.0, 0.0, 10.0, 10.0, Color::yellow());

    match result {
        Err(PdfError::InvalidPage(page, total)) => {
            assert_eq!(page, 999);
            assert_eq!(total, 1);
        }
        _ => panic!("Expected InvalidPage error"),
    }
}

#[test]
fn test_page_duplication() {
    let pdf_data = create_test_pdf(1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    assert_eq!(doc.page_count(), 1);

    let new_page = doc.duplicate_page(1).expect("Failed to duplicate page");
    assert_eq!(new_page, 2);
    assert_eq!(doc.page_count(), 2);

    let saved_data = doc.to_bytes().expect("Failed to save PDF");
    let doc2 = PdfDocument::open_from_bytes(&saved_data).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 2);
}

#[test]
fn test_duplicate_page_invalid() {
    let pdf_data = create_test_pdf(1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    let result = doc.duplicate_page(999);

    match result {
        Err(PdfError::InvalidPage(page, total)) => {
            assert_eq!(page, 999);
            assert_eq!(total, 1);
        }
        _ => panic!("Expected InvalidPage error"),
    }
}

#[test]
fn test_insert_text_without_font() {
    let pdf_data = create_test_pdf(1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    let result = doc.insert_text("テスト", 1, 100.0, 100.0, 9.0, Align::Left);

    assert!(matches!(result, Err(PdfError::FontNotLoaded)));
}

#[test]
fn test_add_font_invalid_data() {
    let pdf_data = create_test_pdf(1);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    let result = doc.add_font("broken", &[0u8; 16]);

    assert!(matches!(result, Err(PdfError::FontParseError(_))));
}

#[test]
fn test_deterministic_output_without_text() {
    let pdf_data = create_test_pdf(2);

    let render = || {
        let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
        doc.fill_rect(1, 135.0, 528.0, 320.0, 22.0, Color::yellow())
            .expect("Failed to fill rect");
        doc.fill_rect(2, 135.0, 528.0, 320.0, 22.0, Color::yellow())
            .expect("Failed to fill rect");
        doc.to_bytes().expect("Failed to save PDF")
    };

    assert_eq!(render(), render());
}

#[test]
#[ignore = "requires assets/fonts/ipag.ttf"]
fn test_insert_text_japanese() {
    let pdf_data = create_test_pdf(1);
    let font_data = get_form_font_data();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.add_font("ipag", &font_data).expect("Failed to add font");

    doc.insert_text("山田太郎", 1, 130.0, 205.0, 9.0, Align::Left)
        .expect("Failed to insert text");
    doc.insert_text("ヤマダタロウ", 1, 130.0, 178.0, 8.0, Align::Left)
        .expect("Failed to insert text");

    let saved_data = doc.to_bytes().expect("Failed to save PDF");
    let doc2 = PdfDocument::open_from_bytes(&saved_data).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 1);
}

#[test]
#[ignore = "requires assets/fonts/ipag.ttf"]
fn test_deterministic_output_with_text() {
    let pdf_data = create_test_pdf(1);
    let font_data = get_form_font_data();

    let render = || {
        let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
        doc.add_font("ipag", &font_data).expect("Failed to add font");
        doc.insert_text("未払金確認済", 1, 130.0, 205.0, 9.0, Align::Left)
            .expect("Failed to insert text");
        doc.insert_text("✓", 1, 96.0, 118.0, 12.0, Align::Left)
            .expect("Failed to insert text");
        doc.to_bytes().expect("Failed to save PDF")
    };

    assert_eq!(render(), render());
}

#[test]
#[ignore = "requires assets/fonts/ipag.ttf"]
fn test_text_width_measurement() {
    let pdf_data = create_test_pdf(1);
    let font_data = get_form_font_data();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.add_font("ipag", &font_data).expect("Failed to add font");

    let narrow = doc.text_width("山", 9.0).expect("Failed to measure");
    let wide = doc.text_width("山田太郎", 9.0).expect("Failed to measure");
    assert!(wide > narrow);
    assert!(narrow > 0.0);
}
