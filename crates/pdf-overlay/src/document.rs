//! PDF Document wrapper

use crate::font::EmbeddedFont;
use crate::text::{generate_rect_operators, generate_text_operators, TextRenderContext};
use crate::{Align, PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::{BTreeMap, BTreeSet};

/// The font resource name used on every page. The overlay engine embeds
/// exactly one font, so a fixed name keeps the output stable.
const FONT_RESOURCE: &str = "F1";

/// A buffered text operation for deferred encoding
///
/// Text is buffered during rendering and encoded during save, after the full
/// used-character set is known.
#[derive(Debug, Clone)]
struct BufferedTextOp {
    /// The text to render
    text: String,
    /// Page number (1-indexed)
    page: usize,
    /// X coordinate (in PDF coordinates)
    x: f64,
    /// Y coordinate (in PDF coordinates, already converted)
    y: f64,
    /// Font size in points
    font_size: f32,
    /// Text alignment
    align: Align,
    /// Text color
    color: Color,
}

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// Yellow color (highlight boxes on the form)
    pub fn yellow() -> Self {
        Self::rgb(1.0, 1.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF Document wrapper providing high-level overlay operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// The single embedded font
    font: Option<EmbeddedFont>,
    /// Pages that draw text (each gets the font resource at save time)
    pages_using_font: BTreeSet<usize>,
    /// Buffered content operators per page
    page_content_buffer: BTreeMap<usize, Vec<u8>>,
    /// Buffered text operations (encoded during save)
    buffered_text_ops: Vec<BufferedTextOp>,
    /// Current text color
    current_text_color: Color,
}

impl PdfDocument {
    /// Open a PDF document from bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;

        Ok(Self {
            inner,
            font: None,
            pages_using_font: BTreeSet::new(),
            page_content_buffer: BTreeMap::new(),
            buffered_text_ops: Vec::new(),
            current_text_color: Color::default(),
        })
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Register the document font from TrueType bytes
    pub fn add_font(&mut self, name: &str, ttf_data: &[u8]) -> Result<()> {
        if let Some(existing) = &self.font {
            return Err(PdfError::FontAlreadyExists(existing.name.clone()));
        }

        self.font = Some(EmbeddedFont::from_ttf(name, ttf_data)?);
        Ok(())
    }

    /// Set the text color for subsequent insertions
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `font_size` - Font size in points
    /// * `align` - Text alignment
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        font_size: f32,
        align: Align,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        // Nothing to render
        if text.is_empty() {
            return Ok(());
        }

        let font = self.font.as_mut().ok_or(PdfError::FontNotLoaded)?;
        font.add_chars(text);

        // Convert Y coordinate from top-origin to PDF bottom-origin
        let page_height = self.get_page_height(page)?;
        let pdf_y = page_height - y;

        self.pages_using_font.insert(page);
        self.buffered_text_ops.push(BufferedTextOp {
            text: text.to_string(),
            page,
            x,
            y: pdf_y,
            font_size,
            align,
            color: self.current_text_color,
        });

        Ok(())
    }

    /// Fill a rectangle on a page
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `width` - Rectangle width in points
    /// * `height` - Rectangle height in points
    /// * `color` - Fill color
    pub fn fill_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        let page_height = self.get_page_height(page)?;
        let pdf_y = page_height - y - height;

        let operators = generate_rect_operators(x, pdf_y, width, height, color);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Measure text width in points at a given size, using the font metrics
    pub fn text_width(&self, text: &str, font_size: f32) -> Result<f64> {
        let font = self.font.as_ref().ok_or(PdfError::FontNotLoaded)?;
        Ok(font.text_width_points(text, font_size) as f64)
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        // 1. Encode buffered text (full used-character set is known now)
        self.encode_buffered_text()?;

        // 2. Flush buffered content streams to pages
        self.flush_content_buffers()?;

        // 3. Embed the font and wire page resources
        self.embed_font()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Encode buffered text operations into page content buffers
    fn encode_buffered_text(&mut self) -> Result<()> {
        let text_ops: Vec<BufferedTextOp> = std::mem::take(&mut self.buffered_text_ops);
        if text_ops.is_empty() {
            return Ok(());
        }

        let font = self.font.as_ref().ok_or(PdfError::FontNotLoaded)?;

        let mut encoded = Vec::with_capacity(text_ops.len());
        for op in &text_ops {
            let text_hex = font.encode_text_hex(&op.text);
            let text_width = font.text_width_points(&op.text, op.font_size) as f64;

            let ctx = TextRenderContext {
                font_name: FONT_RESOURCE.to_string(),
                font_size: op.font_size,
                text_width,
                color: op.color,
            };

            encoded.push((op.page, generate_text_operators(&text_hex, op.x, op.y, op.align, &ctx)));
        }

        for (page, operators) in encoded {
            self.buffer_content(page, &operators);
        }

        Ok(())
    }

    /// Embed the font into the PDF and reference it from every page that
    /// drew text
    fn embed_font(&mut self) -> Result<()> {
        let font = match &self.font {
            Some(f) if !f.used_chars.is_empty() => f,
            _ => return Ok(()),
        };

        let font_objects = font.to_pdf_objects()?;

        let font_file_id = self.inner.add_object(font_objects.font_file_stream);

        let mut font_descriptor = font_objects.font_descriptor;
        font_descriptor.set("FontFile2", Object::Reference(font_file_id));
        let font_descriptor_id = self.inner.add_object(font_descriptor);

        let mut cid_font = font_objects.cid_font;
        cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
        let cid_font_id = self.inner.add_object(cid_font);

        let mut type0_font = font_objects.type0_font;
        type0_font.set(
            "DescendantFonts",
            Object::Array(vec![Object::Reference(cid_font_id)]),
        );

        let tounicode_id = self.inner.add_object(font_objects.tounicode_stream);
        type0_font.set("ToUnicode", Object::Reference(tounicode_id));

        let type0_font_id = self.inner.add_object(type0_font);

        let pages: Vec<usize> = self.pages_using_font.iter().copied().collect();
        for page in pages {
            self.add_font_to_page_resources(page, type0_font_id)?;
        }

        Ok(())
    }

    /// Add the font reference to a page's Resources dictionary
    fn add_font_to_page_resources(&mut self, page: usize, font_ref: ObjectId) -> Result<()> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let page_obj = self.inner.get_object(page_id)?;
        let page_dict = page_obj
            .as_dict()
            .map_err(|_| PdfError::SaveError("Page object is not a dictionary".to_string()))?;

        let mut resources_dict = match page_dict.get(b"Resources") {
            Ok(resources) => match resources {
                Object::Dictionary(dict) => dict.clone(),
                Object::Reference(ref_id) => match self.inner.get_object(*ref_id) {
                    Ok(Object::Dictionary(dict)) => dict.clone(),
                    _ => Dictionary::new(),
                },
                _ => Dictionary::new(),
            },
            Err(_) => Dictionary::new(),
        };

        let mut font_dict = match resources_dict.get(b"Font") {
            Ok(font) => match font.as_dict() {
                Ok(dict) => dict.clone(),
                Err(_) => Dictionary::new(),
            },
            Err(_) => Dictionary::new(),
        };

        font_dict.set(FONT_RESOURCE.as_bytes(), Object::Reference(font_ref));
        resources_dict.set(b"Font", Object::Dictionary(font_dict));

        let mut new_page_dict = page_dict.clone();
        new_page_dict.set(b"Resources", Object::Dictionary(resources_dict));

        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Get page height in points from the (possibly inherited) MediaBox
    fn get_page_height(&self, page: usize) -> Result<f64> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let media_box = self.get_inherited_media_box(page_id)?;
        self.extract_height_from_media_box(&media_box)
    }

    /// Get MediaBox, following the parent inheritance chain if needed
    fn get_inherited_media_box(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let mut current_id = page_id;

        // Follow parent chain up to 10 levels (safety limit)
        for _ in 0..10 {
            let obj = self.inner.get_object(current_id)?;
            let dict = obj
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                let media_box_array = match media_box {
                    Object::Array(arr) => arr.clone(),
                    Object::Reference(ref_id) => {
                        let referred = self.inner.get_object(*ref_id)?;
                        referred
                            .as_array()
                            .map_err(|_| {
                                PdfError::ParseError(
                                    "MediaBox reference is not an array".to_string(),
                                )
                            })?
                            .clone()
                    }
                    _ => return Err(PdfError::ParseError("MediaBox is not an array".to_string())),
                };
                return Ok(media_box_array);
            }

            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                current_id = *parent_id;
                continue;
            }

            break;
        }

        // Fallback: assume A4 page size
        Ok(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(595.28),
            Object::Real(841.89),
        ])
    }

    /// Extract height from a MediaBox array
    fn extract_height_from_media_box(&self, media_box_array: &[Object]) -> Result<f64> {
        if media_box_array.len() >= 4 {
            let y1 = media_box_array[1]
                .as_f32()
                .map(|v| v as f64)
                .ok()
                .or_else(|| media_box_array[1].as_i64().ok().map(|v| v as f64))
                .ok_or_else(|| PdfError::ParseError("Invalid MediaBox y1".to_string()))?;
            let y2 = media_box_array[3]
                .as_f32()
                .map(|v| v as f64)
                .ok()
                .or_else(|| media_box_array[3].as_i64().ok().map(|v| v as f64))
                .ok_or_else(|| PdfError::ParseError("Invalid MediaBox y2".to_string()))?;
            return Ok(y2 - y1);
        }

        Err(PdfError::ParseError("Invalid MediaBox format".to_string()))
    }

    /// Buffer content operators for a page (written at save time)
    ///
    /// Buffering keeps a single content stream per page instead of one orphan
    /// stream per draw call.
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> =
            std::mem::take(&mut self.page_content_buffer).into_iter().collect();

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append content to a page's content stream
    ///
    /// Handles single streams, referenced streams, and stream arrays; the
    /// existing content is decompressed and re-emitted with the overlay
    /// operators appended.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let pages = self.inner.get_pages();
        let page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, pages.len()))?;

        let (existing_content, page_dict_clone) = {
            let page_obj = self.inner.get_object(page_id)?;
            let page_dict = page_obj
                .as_dict()
                .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;

            let page_dict_clone = page_dict.clone();

            let existing_content = match page_dict.get(b"Contents") {
                Ok(contents) => match contents {
                    Object::Stream(stream) => stream
                        .decompressed_content()
                        .unwrap_or_else(|_| stream.content.clone()),
                    Object::Reference(ref_id) => {
                        if let Ok(Object::Stream(stream)) = self.inner.get_object(*ref_id) {
                            stream
                                .decompressed_content()
                                .unwrap_or_else(|_| stream.content.clone())
                        } else {
                            Vec::new()
                        }
                    }
                    Object::Array(arr) => {
                        let mut combined = Vec::new();
                        for obj in arr {
                            match obj {
                                Object::Reference(ref_id) => {
                                    if let Ok(Object::Stream(stream)) =
                                        self.inner.get_object(*ref_id)
                                    {
                                        let data = stream
                                            .decompressed_content()
                                            .unwrap_or_else(|_| stream.content.clone());
                                        combined.extend_from_slice(&data);
                                    }
                                }
                                Object::Stream(stream) => {
                                    let data = stream
                                        .decompressed_content()
                                        .unwrap_or_else(|_| stream.content.clone());
                                    combined.extend_from_slice(&data);
                                }
                                _ => {}
                            }
                        }
                        combined
                    }
                    _ => Vec::new(),
                },
                Err(_) => Vec::new(),
            };

            (existing_content, page_dict_clone)
        };

        let mut new_content = existing_content;
        new_content.extend_from_slice(content);

        let new_stream = Stream::new(Dictionary::new(), new_content);
        let stream_id = self.inner.add_object(new_stream);

        let mut new_page_dict = page_dict_clone;
        new_page_dict.set(b"Contents", Object::Reference(stream_id));

        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Duplicate a page and return the new page number
    ///
    /// Used when a short fallback template needs a second copy page appended.
    pub fn duplicate_page(&mut self, page: usize) -> Result<usize> {
        let pages = self.inner.get_pages();
        let page_count = pages.len();

        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        let source_page_id = *pages
            .get(&(page as u32))
            .ok_or(PdfError::InvalidPage(page, page_count))?;

        let source_page_obj = self.inner.get_object(source_page_id)?;
        let source_page_dict = source_page_obj
            .as_dict()
            .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;

        let mut new_page_dict = source_page_dict.clone();

        // Clone the content stream(s) so later appends stay page-local
        if let Ok(contents) = source_page_dict.get(b"Contents") {
            match contents {
                Object::Stream(stream) => {
                    let new_stream = Stream::new(stream.dict.clone(), stream.content.clone());
                    new_page_dict.set(b"Contents", new_stream);
                }
                Object::Reference(ref_id) => {
                    if let Ok(Object::Stream(stream)) = self.inner.get_object(*ref_id) {
                        let new_stream = Stream::new(stream.dict.clone(), stream.content.clone());
                        let new_stream_id = self.inner.add_object(new_stream);
                        new_page_dict.set(b"Contents", Object::Reference(new_stream_id));
                    }
                }
                Object::Array(arr) => {
                    let mut streams_to_add = Vec::new();
                    for obj in arr {
                        if let Object::Reference(ref_id) = obj {
                            if let Ok(Object::Stream(stream)) = self.inner.get_object(*ref_id) {
                                streams_to_add
                                    .push(Stream::new(stream.dict.clone(), stream.content.clone()));
                            }
                        }
                    }

                    let mut new_arr = Vec::new();
                    for stream in streams_to_add {
                        let new_stream_id = self.inner.add_object(stream);
                        new_arr.push(Object::Reference(new_stream_id));
                    }
                    new_page_dict.set(b"Contents", Object::Array(new_arr));
                }
                _ => {}
            }
        }

        let new_page_id = self.inner.add_object(new_page_dict);

        // Append the new page to the root Pages tree
        let trailer = self.inner.trailer.get(b"Root").map_err(|_| {
            PdfError::ParseError("Document trailer missing Root entry".to_string())
        })?;
        let catalog_id = trailer
            .as_reference()
            .map_err(|_| PdfError::ParseError("Root is not a reference".to_string()))?;
        let catalog_obj = self.inner.get_object(catalog_id)?;
        let catalog_dict = catalog_obj
            .as_dict()
            .map_err(|_| PdfError::ParseError("Catalog is not a dictionary".to_string()))?;
        let pages_ref = catalog_dict
            .get(b"Pages")
            .map_err(|_| PdfError::ParseError("Catalog missing Pages entry".to_string()))?;
        let pages_id = pages_ref
            .as_reference()
            .map_err(|_| PdfError::ParseError("Pages is not a reference".to_string()))?;

        let pages_obj = self.inner.get_object(pages_id)?;
        let pages_dict = pages_obj
            .as_dict()
            .map_err(|_| PdfError::ParseError("Pages object is not a dictionary".to_string()))?;

        let kids = pages_dict
            .get(b"Kids")
            .map_err(|_| PdfError::ParseError("Pages object missing Kids array".to_string()))?;
        let mut kids_array = kids
            .as_array()
            .map_err(|_| PdfError::ParseError("Kids is not an array".to_string()))?
            .clone();
        kids_array.push(Object::Reference(new_page_id));

        let count = pages_dict
            .get(b"Count")
            .map_err(|_| PdfError::ParseError("Pages object missing Count".to_string()))?;
        let current_count = count
            .as_i64()
            .map_err(|_| PdfError::ParseError("Count is not an integer".to_string()))?;

        let mut new_pages_dict = pages_dict.clone();
        new_pages_dict.set(b"Kids", Object::Array(kids_array));
        new_pages_dict.set(b"Count", Object::Integer(current_count + 1));

        self.inner.objects.insert(pages_id, new_pages_dict.into());

        Ok(page_count + 1)
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }
}
