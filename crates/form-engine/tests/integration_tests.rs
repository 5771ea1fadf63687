//! Integration tests for form-engine
//!
//! The rendering-rule tests drive a recording surface and assert on the
//! exact draw calls. The full-pipeline tests need the Japanese form font
//! from `assets/fonts/` and are ignored by default.

use form_engine::{
    Application, CopyType, DocumentAssembler, FormError, PageRenderer, PageSurface, PaymentMethod,
    Product, Resident, Result,
};
use lopdf::dictionary;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
enum DrawCall {
    Text { text: String, x: f64, y: f64, size: f64 },
    Rect { x: f64, y: f64, w: f64, h: f64 },
}

#[derive(Default)]
struct RecordingSurface {
    calls: Vec<DrawCall>,
}

impl PageSurface for RecordingSurface {
    fn draw_text(&mut self, text: &str, x: f64, y: f64, font_size: f64) -> Result<()> {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            size: font_size,
        });
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            w: width,
            h: height,
        });
        Ok(())
    }
}

fn render(application: &Application) -> Vec<DrawCall> {
    let mut surface = RecordingSurface::default();
    PageRenderer::new(application)
        .render(&mut surface)
        .expect("render");
    surface.calls
}

fn text_at(calls: &[DrawCall], x: f64, y: f64) -> Vec<&DrawCall> {
    calls
        .iter()
        .filter(|call| matches!(call, DrawCall::Text { x: cx, y: cy, .. } if *cx == x && *cy == y))
        .collect()
}

/// The populated home-assist-24 monthly submission from the acceptance
/// scenario
fn home_assist_monthly() -> Application {
    Application::from_json(
        r#"{
            "product": "home-assist-24",
            "paymentMethod": "monthly",
            "applicationType": "new",
            "applicant": {"name": "山田太郎", "nameKana": "ヤマダタロウ"},
            "servicePrice": "1100",
            "selectedOptions": ["senior-watch"],
            "emergencyContact": {
                "name": "山田花子",
                "nameKana": "ヤマダハナコ",
                "address": "東京都台東区上野一丁目1-1",
                "homePhone": "03-1234-5678",
                "mobilePhone": "090-1234-5678",
                "relationship": "母"
            },
            "residents": []
        }"#,
    )
    .expect("parse")
}

#[test]
fn scenario_home_assist_monthly() {
    let calls = render(&home_assist_monthly());

    // Price token at the monthly coordinate only
    assert_eq!(text_at(&calls, 160.0, 575.0).len(), 1);
    assert!(text_at(&calls, 390.0, 575.0).is_empty());

    // Senior-watch checkmark at its fixed coordinate
    assert_eq!(
        text_at(&calls, 447.0, 127.0),
        vec![&DrawCall::Text {
            text: "✓".to_string(),
            x: 447.0,
            y: 127.0,
            size: 9.0
        }]
    );

    // Emergency-contact name present, no resident rows
    assert_eq!(text_at(&calls, 130.0, 635.0).len(), 1);
    assert!(text_at(&calls, 130.0, 307.0).is_empty());
    assert!(text_at(&calls, 130.0, 290.0).is_empty());
}

#[test]
fn scenario_ierabu_suppresses_shared_sections() {
    let mut app = home_assist_monthly();
    app.product = Product::IerabuAnshinSupport;
    app.payment_method = PaymentMethod::Yearly2;
    app.guarantee_number = "G-123".to_string();
    app.property.address = "大阪府大阪市北区梅田一丁目".to_string();
    app.property.name = "いえらぶマンション".to_string();
    app.agent_info.name = "いえらぶ不動産".to_string();
    app.residents = vec![Resident {
        name: "同居人".to_string(),
        name_kana: String::new(),
        relationship: String::new(),
    }];
    app.service_period_start_date = "2025-04-01".to_string();

    let calls = render(&app);

    // No option checkmarks even though senior-watch is selected
    assert!(text_at(&calls, 447.0, 112.0).is_empty());
    assert!(text_at(&calls, 447.0, 127.0).is_empty());
    assert!(text_at(&calls, 447.0, 142.0).is_empty());

    // No resident, emergency, or service-period draw calls
    assert!(text_at(&calls, 130.0, 307.0).is_empty());
    assert!(text_at(&calls, 130.0, 635.0).is_empty());
    assert!(text_at(&calls, 175.0, 515.0).is_empty());
    assert!(text_at(&calls, 180.0, 515.0).is_empty());

    // No service price in either cadence position
    assert!(text_at(&calls, 160.0, 575.0).is_empty());
    assert!(text_at(&calls, 390.0, 575.0).is_empty());

    // Property block at the alternate coordinates
    assert_eq!(text_at(&calls, 130.0, 300.0).len(), 1);
    assert_eq!(text_at(&calls, 130.0, 362.0).len(), 1);
    assert!(text_at(&calls, 130.0, 420.0).is_empty());

    // Guarantee number at the SKU-specific position
    assert_eq!(text_at(&calls, 350.0, 390.0).len(), 1);
    assert!(text_at(&calls, 350.0, 533.0).is_empty());
    assert!(text_at(&calls, 350.0, 541.0).is_empty());

    // Agent block shifted up as a unit
    assert_eq!(text_at(&calls, 130.0, 740.0).len(), 1);
    assert!(text_at(&calls, 130.0, 780.0).is_empty());
}

#[test]
fn scenario_guarantee_number_sentinel() {
    let positions = [(350.0, 533.0), (350.0, 541.0), (350.0, 390.0)];
    let mut app = home_assist_monthly();

    for value in ["", "未入力"] {
        app.guarantee_number = value.to_string();
        let calls = render(&app.clone().normalized());
        for (x, y) in positions {
            assert!(text_at(&calls, x, y).is_empty(), "unexpected draw for {value:?}");
        }
    }

    app.guarantee_number = "A1234".to_string();
    let calls = render(&app);
    assert_eq!(
        text_at(&calls, 350.0, 533.0),
        vec![&DrawCall::Text {
            text: "A1234".to_string(),
            x: 350.0,
            y: 533.0,
            size: 8.0
        }]
    );
}

#[test]
fn scenario_cadence_gating() {
    let mut app = home_assist_monthly();
    app.selected_options.clear();
    app.emergency_contact = Default::default();

    // Monthly position only
    let calls = render(&app);
    assert_eq!(text_at(&calls, 160.0, 575.0).len(), 1);
    assert!(text_at(&calls, 390.0, 575.0).is_empty());

    // Yearly position only, plus the renewal note over its highlight box
    app.payment_method = PaymentMethod::Yearly2;
    let calls = render(&app);
    assert!(text_at(&calls, 160.0, 575.0).is_empty());
    assert_eq!(text_at(&calls, 390.0, 575.0).len(), 1);
    assert!(calls.contains(&DrawCall::Rect {
        x: 135.0,
        y: 528.0,
        w: 320.0,
        h: 22.0
    }));
    assert_eq!(
        text_at(&calls, 140.0, 540.0),
        vec![&DrawCall::Text {
            text: "から２年後応答月の月末まで".to_string(),
            x: 140.0,
            y: 540.0,
            size: 11.0
        }]
    );
}

#[test]
fn render_call_list_is_deterministic() {
    let app = home_assist_monthly();
    assert_eq!(render(&app), render(&app));
}

#[test]
fn copy_types_are_distinct() {
    assert_ne!(CopyType::Agency, CopyType::Customer);
}

// --- full pipeline ---

struct StubAssets {
    template: Arc<Vec<u8>>,
    font: Arc<Vec<u8>>,
}

impl form_engine::AssetSource for StubAssets {
    fn template_bytes(
        &self,
        _product: Product,
        _cadence: PaymentMethod,
    ) -> Result<Arc<Vec<u8>>> {
        Ok(Arc::clone(&self.template))
    }

    fn font_bytes(&self) -> Result<Arc<Vec<u8>>> {
        Ok(Arc::clone(&self.font))
    }
}

/// Create a minimal valid PDF with the given page count
fn build_template(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Pages",
        "Count" => page_count as i32,
        "Kids" => vec![],
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

fn form_font() -> Vec<u8> {
    std::fs::read("../../assets/fonts/ipag.ttf").expect("Failed to read form font file")
}

#[test]
fn generate_with_broken_template_fails_whole_request() {
    let assembler = DocumentAssembler::new(StubAssets {
        template: Arc::new(b"not a pdf".to_vec()),
        font: Arc::new(vec![0u8; 16]),
    });
    let result = assembler.generate(home_assist_monthly());
    assert!(matches!(result, Err(FormError::Pdf(_))));
}

#[test]
fn generate_with_broken_font_fails_whole_request() {
    let assembler = DocumentAssembler::new(StubAssets {
        template: Arc::new(build_template(4)),
        font: Arc::new(vec![0u8; 16]),
    });
    let result = assembler.generate(home_assist_monthly());
    assert!(matches!(result, Err(FormError::Pdf(_))));
}

#[test]
#[ignore = "requires assets/fonts/ipag.ttf"]
fn generate_targets_pages_one_and_three() {
    let assembler = DocumentAssembler::new(StubAssets {
        template: Arc::new(build_template(4)),
        font: Arc::new(form_font()),
    });

    let bytes = assembler.generate(home_assist_monthly()).expect("generate");
    let doc = lopdf::Document::load_mem(&bytes).expect("reload");
    // Pages 2 and 4 pass through; nothing is appended
    assert_eq!(doc.get_pages().len(), 4);
}

#[test]
#[ignore = "requires assets/fonts/ipag.ttf"]
fn generate_duplicates_page_on_short_template() {
    let assembler = DocumentAssembler::new(StubAssets {
        template: Arc::new(build_template(1)),
        font: Arc::new(form_font()),
    });

    let bytes = assembler.generate(home_assist_monthly()).expect("generate");
    let doc = lopdf::Document::load_mem(&bytes).expect("reload");
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
#[ignore = "requires assets/fonts/ipag.ttf"]
fn generate_is_byte_identical() {
    let template = Arc::new(build_template(4));
    let font = Arc::new(form_font());

    let run = || {
        DocumentAssembler::new(StubAssets {
            template: Arc::clone(&template),
            font: Arc::clone(&font),
        })
        .generate(home_assist_monthly())
        .expect("generate")
    };

    assert_eq!(run(), run());
}
