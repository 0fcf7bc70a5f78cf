//! Content stream walking for positioned text.
//!
//! Tracks the text matrix and current font through a page's operators and
//! emits a [`TextSpan`] for every text-showing operator.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object};

use crate::error::{Error, Result};
use crate::text::is_spaceless_script_char;

/// TJ adjustments larger than this (thousandths of a text unit) read as a word space.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Leading assumed until a `TL` or `TD` operator sets one.
const DEFAULT_LEADING: f32 = 12.0;

/// A run of text shown by one operator.
#[derive(Debug, Clone)]
pub(crate) struct TextSpan {
    pub text: String,
    /// X position (left edge), PDF user space
    pub x: f32,
    /// Y position (baseline), PDF user space, bottom-up
    pub y: f32,
    pub font_size: f32,
    pub is_bold: bool,
    pub is_italic: bool,
}

impl TextSpan {
    /// Create a span, reading weight and slant from the font name.
    pub fn new(text: String, x: f32, y: f32, font_size: f32, font_name: &str) -> Self {
        let lower = font_name.to_lowercase();
        let is_bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let is_italic = lower.contains("italic") || lower.contains("oblique");

        Self {
            text,
            x,
            y,
            font_size,
            is_bold,
            is_italic,
        }
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: DEFAULT_LEADING,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.translate(0.0, -self.leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Font state needed to decode and classify text.
struct FontState<'a> {
    resource_name: Vec<u8>,
    base_font: String,
    size: f32,
    fonts: &'a BTreeMap<Vec<u8>, &'a lopdf::Dictionary>,
    doc: &'a LopdfDocument,
}

impl FontState<'_> {
    fn select(&mut self, resource_name: &[u8], size: f32) {
        self.resource_name = resource_name.to_vec();
        self.base_font = self
            .fonts
            .get(resource_name)
            .and_then(|dict| dict.get(b"BaseFont").ok())
            .and_then(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(resource_name).to_string());
        self.size = size;
    }

    fn decode(&self, bytes: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(&self.resource_name)
            .and_then(|f| f.get_font_encoding(self.doc).ok());

        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }

    /// Decode a TJ array, turning large negative adjustments into spaces.
    fn decode_array(&self, items: &[Object]) -> String {
        let mut combined = String::new();
        for item in items {
            let adjustment = match item {
                Object::String(bytes, _) => {
                    combined.push_str(&self.decode(bytes));
                    continue;
                }
                Object::Integer(n) => -(*n as f32),
                Object::Real(n) => -*n,
                _ => continue,
            };

            let needs_space = adjustment > TJ_SPACE_THRESHOLD
                && !combined.ends_with(' ')
                && !combined.ends_with('\u{00A0}')
                && combined
                    .chars()
                    .last()
                    .is_some_and(|c| !is_spaceless_script_char(c));
            if needs_space {
                combined.push(' ');
            }
        }
        combined
    }
}

/// Raw (decompressed) content stream of a page. A page without
/// `Contents` is blank and yields an empty stream.
pub(crate) fn page_content(doc: &LopdfDocument, page_id: lopdf::ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match contents {
        Object::Reference(r) => match doc.get_object(*r) {
            Ok(Object::Stream(s)) => s
                .decompressed_content()
                .or_else(|_| Ok::<_, lopdf::Error>(s.content.clone()))
                .map_err(|e| Error::PdfParse(e.to_string())),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        },
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(Object::Stream(s)) = doc.get_object(*r) {
                        let data = s.decompressed_content().unwrap_or_else(|_| s.content.clone());
                        content.extend_from_slice(&data);
                        content.push(b' ');
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// Page height from the nearest `MediaBox`, walking up `Parent` links.
/// Defaults to US Letter.
pub(crate) fn page_height(doc: &LopdfDocument, page_id: lopdf::ObjectId) -> f32 {
    let mut current = Some(page_id);
    let mut depth = 0;

    while let Some(id) = current {
        let Ok(dict) = doc.get_dictionary(id) else {
            break;
        };
        if let Ok(array) = dict.get(b"MediaBox").and_then(|m| m.as_array()) {
            if array.len() >= 4 {
                let y0 = get_number(&array[1]).unwrap_or(0.0);
                let y1 = get_number(&array[3]).unwrap_or(792.0);
                return (y1 - y0).abs();
            }
        }
        current = dict.get(b"Parent").and_then(|p| p.as_reference()).ok();
        depth += 1;
        if depth > 32 {
            break;
        }
    }

    792.0
}

/// Walk a page's content stream and collect text spans.
pub(crate) fn extract_spans(
    doc: &LopdfDocument,
    page_id: lopdf::ObjectId,
    content: &[u8],
) -> Result<Vec<TextSpan>> {
    if content.is_empty() {
        return Ok(Vec::new());
    }

    let fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;
    let content =
        lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

    let mut font = FontState {
        resource_name: Vec::new(),
        base_font: String::new(),
        size: 12.0,
        fonts: &fonts,
        doc,
    };
    let mut matrix = TextMatrix::default();
    let mut in_text_block = false;
    let mut spans = Vec::new();

    let mut emit = |text: String, matrix: &TextMatrix, font: &FontState| {
        if !text.trim().is_empty() {
            let (x, y) = matrix.position();
            spans.push(TextSpan::new(
                text,
                x,
                y,
                font.size * matrix.scale(),
                &font.base_font,
            ));
        }
    };

    for op in content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                in_text_block = true;
                let leading = matrix.leading;
                matrix = TextMatrix {
                    leading,
                    ..TextMatrix::default()
                };
            }
            "ET" => in_text_block = false,
            "Tf" if operands.len() >= 2 => {
                if let Object::Name(name) = &operands[0] {
                    font.select(name, get_number(&operands[1]).unwrap_or(12.0));
                }
            }
            "TL" if !operands.is_empty() => {
                matrix.leading = get_number(&operands[0]).unwrap_or(DEFAULT_LEADING);
            }
            "Td" | "TD" if operands.len() >= 2 => {
                let tx = get_number(&operands[0]).unwrap_or(0.0);
                let ty = get_number(&operands[1]).unwrap_or(0.0);
                if op.operator == "TD" {
                    matrix.leading = -ty;
                }
                matrix.translate(tx, ty);
            }
            "Tm" if operands.len() >= 6 => {
                matrix.set(
                    get_number(&operands[0]).unwrap_or(1.0),
                    get_number(&operands[1]).unwrap_or(0.0),
                    get_number(&operands[2]).unwrap_or(0.0),
                    get_number(&operands[3]).unwrap_or(1.0),
                    get_number(&operands[4]).unwrap_or(0.0),
                    get_number(&operands[5]).unwrap_or(0.0),
                );
            }
            "T*" => matrix.next_line(),
            "Tj" if in_text_block => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    emit(font.decode(bytes), &matrix, &font);
                }
            }
            "TJ" if in_text_block => {
                if let Some(Object::Array(items)) = operands.first() {
                    emit(font.decode_array(items), &matrix, &font);
                }
            }
            "'" | "\"" => {
                matrix.next_line();
                let text_idx = if op.operator == "\"" { 2 } else { 0 };
                if in_text_block {
                    if let Some(Object::String(bytes, _)) = operands.get(text_idx) {
                        emit(font.decode(bytes), &matrix, &font);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Simple text decoding fallback when no encoding is available.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span_style_from_font_name() {
        let span = TextSpan::new("A".into(), 0.0, 0.0, 12.0, "Helvetica-Bold");
        assert!(span.is_bold);
        assert!(!span.is_italic);

        let span = TextSpan::new("A".into(), 0.0, 0.0, 12.0, "Times-BoldItalic");
        assert!(span.is_bold);
        assert!(span.is_italic);

        let span = TextSpan::new("A".into(), 0.0, 0.0, 12.0, "Helvetica-Oblique");
        assert!(!span.is_bold);
        assert!(span.is_italic);
    }

    #[test]
    fn test_text_matrix_moves() {
        let mut m = TextMatrix::default();
        m.set(2.0, 0.0, 0.0, 2.0, 100.0, 700.0);
        m.translate(10.0, -5.0);
        assert_eq!(m.position(), (120.0, 690.0));
        assert_eq!(m.scale(), 2.0);

        m.leading = 14.0;
        m.next_line();
        assert_eq!(m.position(), (120.0, 662.0));
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }
}
