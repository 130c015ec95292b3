use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::Path;
use tracing::debug;

use crate::document::pdftotext::PageText;
use crate::document::{check_page, PdfDocument};
use crate::error::InvomarkError;
use crate::model::{BBox, Point, Rgb};

/// Resource name of the font used for inserted text.
const FONT_KEY: &str = "FInvomark";

/// A4 in points, the size of inserted pages.
const NEW_PAGE_SIZE: (f32, f32) = (595.0, 842.0);

/// Line height of multi-line inserted text, relative to the font size.
const TEXT_LEADING: f32 = 1.2;

/// A PDF held in memory by lopdf, with a text layer supplied by an extraction
/// backend.
///
/// Drawing operations are buffered per page and written as one appended
/// content stream per page on [`PdfDocument::save`]. Coordinates are taken
/// as seen on the displayed page, after `/Rotate`.
pub struct LopdfDocument {
    doc: Document,
    pages: Vec<PageSlot>,
    font_id: Option<ObjectId>,
}

struct PageSlot {
    id: ObjectId,
    frame: PageFrame,
    text: PageText,
    pending: Vec<Operation>,
}

impl LopdfDocument {
    /// Wrap a loaded document. `text` holds one entry per page; missing
    /// entries are treated as pages without text.
    pub fn new(doc: Document, text: Vec<PageText>) -> Result<Self, InvomarkError> {
        let mut text = text.into_iter();
        let mut pages = Vec::new();
        for (_, id) in doc.get_pages() {
            let frame = PageFrame {
                media_box: media_box(&doc, id)?,
                rotate: rotation(&doc, id)?,
            };
            pages.push(PageSlot {
                id,
                frame,
                text: text.next().unwrap_or_default(),
                pending: Vec::new(),
            });
        }

        Ok(LopdfDocument {
            doc,
            pages,
            font_id: None,
        })
    }

    /// The underlying lopdf document, with buffered drawing not yet applied.
    pub fn inner(&self) -> &Document {
        &self.doc
    }

    fn slot(&self, page_index: usize) -> Result<&PageSlot, InvomarkError> {
        check_page(page_index, self.pages.len())?;
        Ok(&self.pages[page_index])
    }

    fn slot_mut(&mut self, page_index: usize) -> Result<&mut PageSlot, InvomarkError> {
        check_page(page_index, self.pages.len())?;
        Ok(&mut self.pages[page_index])
    }

    fn font_id(&mut self) -> ObjectId {
        if let Some(id) = self.font_id {
            return id;
        }
        let id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        self.font_id = Some(id);
        id
    }

    /// Write every page's buffered operations into the document.
    fn flush(&mut self) -> Result<(), InvomarkError> {
        let mut uses_font = Vec::new();
        for slot in &mut self.pages {
            if slot.pending.is_empty() {
                continue;
            }
            let operations = std::mem::take(&mut slot.pending);
            if operations.iter().any(|op| op.operator == "Tf") {
                uses_font.push(slot.id);
            }
            append_content(&mut self.doc, slot.id, operations)?;
        }

        if !uses_font.is_empty() {
            let font_id = self.font_id();
            for page_id in uses_font {
                register_font(&mut self.doc, page_id, font_id)?;
            }
        }
        Ok(())
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn extract_lines(&self, page_index: usize) -> Result<Vec<String>, InvomarkError> {
        Ok(self.slot(page_index)?.text.lines.clone())
    }

    fn search_text(&self, page_index: usize, text: &str) -> Result<Vec<BBox>, InvomarkError> {
        Ok(self.slot(page_index)?.text.search(text))
    }

    fn draw_rect(
        &mut self,
        page_index: usize,
        rect: &BBox,
        color: Rgb,
        line_width: f32,
    ) -> Result<(), InvomarkError> {
        let slot = self.slot_mut(page_index)?;
        let [x, y, width, height] = slot.frame.rect_to_user(rect);
        let [r, g, b] = color.components();

        slot.pending.extend([
            Operation::new("q", vec![]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("w", vec![line_width.into()]),
            Operation::new(
                "re",
                vec![x.into(), y.into(), width.into(), height.into()],
            ),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    fn insert_text(
        &mut self,
        page_index: usize,
        origin: Point,
        text: &str,
        font_size: f32,
        color: Rgb,
    ) -> Result<(), InvomarkError> {
        let slot = self.slot_mut(page_index)?;
        let [a, b_axis, c, d] = slot.frame.text_axes();
        let [r, g, b] = color.components();

        slot.pending.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_KEY.as_bytes().to_vec()), font_size.into()],
            ),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
        ]);
        for (i, line) in text.split('\n').enumerate() {
            let y = origin.y + i as f32 * font_size * TEXT_LEADING;
            let (e, f) = slot.frame.to_user(origin.x, y);
            slot.pending.push(Operation::new(
                "Tm",
                vec![
                    a.into(),
                    b_axis.into(),
                    c.into(),
                    d.into(),
                    e.into(),
                    f.into(),
                ],
            ));
            slot.pending.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
            ));
        }
        slot.pending.push(Operation::new("ET", vec![]));
        Ok(())
    }

    fn insert_page(&mut self, at: usize) -> Result<usize, InvomarkError> {
        if at > self.pages.len() {
            return Err(InvomarkError::PageOutOfRange {
                page: at,
                count: self.pages.len(),
            });
        }

        let (width, height) = NEW_PAGE_SIZE;
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {},
        });

        let root_id = pages_root(&self.doc)?;
        insert_into_tree(&mut self.doc, root_id, at, page_id)?;

        self.pages.insert(
            at,
            PageSlot {
                id: page_id,
                frame: PageFrame {
                    media_box: [0.0, 0.0, width, height],
                    rotate: 0,
                },
                text: PageText::default(),
                pending: Vec::new(),
            },
        );
        debug!(at, "inserted page");
        Ok(at)
    }

    fn save(&mut self, path: &Path) -> Result<(), InvomarkError> {
        self.flush()?;
        self.doc.save(path)?;
        Ok(())
    }
}

/// Geometry of a page as displayed: MediaBox plus `/Rotate`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageFrame {
    /// `[x0, y0, x1, y1]` in PDF user space.
    media_box: [f32; 4],
    /// Clockwise display rotation: 0, 90, 180 or 270.
    rotate: i64,
}

impl PageFrame {
    /// Map a point of the displayed page (origin top-left, y down) to PDF
    /// user space.
    fn to_user(&self, x: f32, y: f32) -> (f32, f32) {
        let [x0, y0, x1, y1] = self.media_box;
        match self.rotate {
            90 => (x0 + y, y0 + x),
            180 => (x1 - x, y0 + y),
            270 => (x1 - y, y1 - x),
            _ => (x0 + x, y1 - y),
        }
    }

    /// `[x, y, width, height]` of a displayed rectangle in user space.
    fn rect_to_user(&self, rect: &BBox) -> [f32; 4] {
        let (ax, ay) = self.to_user(rect.x0, rect.y0);
        let (bx, by) = self.to_user(rect.x1, rect.y1);
        [ax.min(bx), ay.min(by), (ax - bx).abs(), (ay - by).abs()]
    }

    /// First four `Tm` entries that keep text upright on the displayed page.
    fn text_axes(&self) -> [f32; 4] {
        match self.rotate {
            90 => [0.0, 1.0, -1.0, 0.0],
            180 => [-1.0, 0.0, 0.0, -1.0],
            270 => [0.0, -1.0, 1.0, 0.0],
            _ => [1.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Look up an inheritable page attribute, following the `Parent` chain.
fn inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, InvomarkError> {
    let mut node = doc.get_dictionary(page_id)?;
    loop {
        if let Ok(obj) = node.get(key) {
            return Ok(Some(resolve(doc, obj)?));
        }
        match node.get(b"Parent") {
            Ok(parent) => node = doc.get_dictionary(parent.as_reference()?)?,
            Err(_) => return Ok(None),
        }
    }
}

fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f32; 4], InvomarkError> {
    if let Some(obj) = inherited(doc, page_id, b"MediaBox")? {
        let values: Vec<f32> = obj.as_array()?.iter().filter_map(number).collect();
        if let [a, b, c, d] = values[..] {
            return Ok([a.min(c), b.min(d), a.max(c), b.max(d)]);
        }
    }

    // No usable box: assume US Letter, the PDF default.
    Ok([0.0, 0.0, 612.0, 792.0])
}

/// Page rotation normalized to 0..360. Values that are not a multiple of 90
/// are invalid and count as 0.
fn rotation(doc: &Document, page_id: ObjectId) -> Result<i64, InvomarkError> {
    let degrees = match inherited(doc, page_id, b"Rotate")? {
        Some(obj) => obj.as_i64().unwrap_or(0).rem_euclid(360),
        None => 0,
    };
    Ok(if degrees % 90 == 0 { degrees } else { 0 })
}

/// Resources in effect for a page: its own or the nearest inherited ones.
fn effective_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary, InvomarkError> {
    match inherited(doc, page_id, b"Resources")? {
        Some(obj) => Ok(obj.as_dict()?.clone()),
        None => Ok(Dictionary::new()),
    }
}

/// Give the page an inline copy of its resources with our font added.
/// Shared resource objects are left untouched.
fn register_font(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> Result<(), InvomarkError> {
    let mut resources = effective_resources(doc, page_id)?;
    let mut fonts = match resources.get(b"Font") {
        Ok(obj) => resolve(doc, obj)?.as_dict()?.clone(),
        Err(_) => Dictionary::new(),
    };
    fonts.set(FONT_KEY, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));

    doc.get_dictionary_mut(page_id)?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

/// Append `operations` after the page's existing content, isolating the
/// existing content's graphics state with `q`/`Q`.
fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<(), InvomarkError> {
    let existing: Vec<Object> = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
        _ => Vec::new(),
    };

    let encode = |ops: Vec<Operation>| -> Result<Vec<u8>, InvomarkError> {
        Ok(Content { operations: ops }.encode()?)
    };
    let added = encode(operations)?;

    let mut contents = Vec::with_capacity(existing.len() + 3);
    if !existing.is_empty() {
        let save = encode(vec![Operation::new("q", vec![])])?;
        let restore = encode(vec![Operation::new("Q", vec![])])?;
        contents.push(Object::Reference(
            doc.add_object(Stream::new(dictionary! {}, save)),
        ));
        contents.extend(existing);
        contents.push(Object::Reference(
            doc.add_object(Stream::new(dictionary! {}, restore)),
        ));
    }
    contents.push(Object::Reference(
        doc.add_object(Stream::new(dictionary! {}, added)),
    ));

    doc.get_dictionary_mut(page_id)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

fn pages_root(doc: &Document) -> Result<ObjectId, InvomarkError> {
    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    Ok(doc.get_dictionary(catalog_id)?.get(b"Pages")?.as_reference()?)
}

/// Insert `page_id` into the page tree below `node_id` so that it becomes
/// leaf number `at` of that subtree. Counts are updated along the path.
fn insert_into_tree(
    doc: &mut Document,
    node_id: ObjectId,
    at: usize,
    page_id: ObjectId,
) -> Result<(), InvomarkError> {
    let kids: Vec<ObjectId> = doc
        .get_dictionary(node_id)?
        .get(b"Kids")?
        .as_array()?
        .iter()
        .filter_map(|k| k.as_reference().ok())
        .collect();

    let mut remaining = at;
    let mut slot = None;
    for (i, kid_id) in kids.iter().enumerate() {
        if remaining == 0 {
            slot = Some(i);
            break;
        }
        let kid = doc.get_dictionary(*kid_id)?;
        let is_tree = matches!(kid.get(b"Type"), Ok(Object::Name(n)) if n == b"Pages");
        let leaves = if is_tree {
            kid.get(b"Count")?.as_i64()?.max(0) as usize
        } else {
            1
        };
        if is_tree && remaining < leaves {
            insert_into_tree(doc, *kid_id, remaining, page_id)?;
            return bump_count(doc, node_id);
        }
        remaining -= leaves;
    }

    let slot = match slot {
        Some(i) => i,
        None if remaining == 0 => kids.len(),
        None => {
            return Err(InvomarkError::PageOutOfRange {
                page: at,
                count: at - remaining,
            })
        }
    };

    let node = doc.get_dictionary_mut(node_id)?;
    let mut new_kids: Vec<Object> = kids.into_iter().map(Object::Reference).collect();
    new_kids.insert(slot, Object::Reference(page_id));
    node.set("Kids", Object::Array(new_kids));
    doc.get_dictionary_mut(page_id)?
        .set("Parent", Object::Reference(node_id));
    bump_count(doc, node_id)
}

fn bump_count(doc: &mut Document, node_id: ObjectId) -> Result<(), InvomarkError> {
    let node = doc.get_dictionary_mut(node_id)?;
    let count = node.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    node.set("Count", Object::Integer(count + 1));
    Ok(())
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, InvomarkError> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Encode text for a WinAnsi Type1 font. Characters outside the encoding
/// become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PDF with one page per entry of `heights`, each page carrying a
    /// tiny text content stream and a shared resources object.
    fn create_pdf(heights: &[i64]) -> Document {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        });
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for height in heights {
            let content = Stream::new(dictionary! {}, b"BT /F1 12 Tf 72 720 Td (Hi) Tj ET\n".to_vec());
            let content_id = doc.add_object(content);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), Object::Integer(*height)],
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => kids.len() as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc
    }

    fn page_text(lines: &[&str]) -> PageText {
        PageText {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            layout: vec![],
        }
    }

    fn operators(doc: &Document, page_id: ObjectId) -> Vec<String> {
        let content = doc.get_page_content(page_id).unwrap();
        Content::decode(&content)
            .unwrap()
            .operations
            .into_iter()
            .map(|op| op.operator)
            .collect()
    }

    #[test]
    fn test_pages_and_text_layer() {
        let doc = create_pdf(&[792, 842]);
        let pdf = LopdfDocument::new(doc, vec![page_text(&["a", "b"])]).unwrap();
        assert_eq!(pdf.page_count(), 2);
        assert_eq!(pdf.extract_lines(0).unwrap(), vec!["a", "b"]);
        assert!(pdf.extract_lines(1).unwrap().is_empty());
        assert!(matches!(
            pdf.extract_lines(2),
            Err(InvomarkError::PageOutOfRange { page: 2, count: 2 })
        ));
    }

    #[test]
    fn test_draw_rect_flips_to_pdf_space() {
        let doc = create_pdf(&[800]);
        let mut pdf = LopdfDocument::new(doc, vec![]).unwrap();
        pdf.draw_rect(0, &BBox::new(10.0, 20.0, 110.0, 35.0), Rgb::GREEN, 0.5)
            .unwrap();

        let re = pdf.pages[0]
            .pending
            .iter()
            .find(|op| op.operator == "re")
            .unwrap();
        let values: Vec<f32> = re.operands.iter().filter_map(number).collect();
        assert_eq!(values, vec![10.0, 765.0, 100.0, 15.0]);
    }

    fn operands(pdf: &LopdfDocument, page_index: usize, operator: &str) -> Vec<f32> {
        pdf.pages[page_index]
            .pending
            .iter()
            .find(|op| op.operator == operator)
            .unwrap()
            .operands
            .iter()
            .filter_map(number)
            .collect()
    }

    fn first_page_id(doc: &Document) -> ObjectId {
        doc.get_pages().into_values().next().unwrap()
    }

    #[test]
    fn test_rotated_page_maps_displayed_coordinates() {
        let mut doc = create_pdf(&[800]);
        let page_id = first_page_id(&doc);
        doc.get_dictionary_mut(page_id).unwrap().set("Rotate", 90);

        let mut pdf = LopdfDocument::new(doc, vec![]).unwrap();
        pdf.draw_rect(0, &BBox::new(10.0, 20.0, 110.0, 35.0), Rgb::GREEN, 0.5)
            .unwrap();
        pdf.insert_text(0, Point::new(50.0, 60.0), "1", 8.0, Rgb::RED)
            .unwrap();

        assert_eq!(operands(&pdf, 0, "re"), vec![20.0, 10.0, 15.0, 100.0]);
        assert_eq!(
            operands(&pdf, 0, "Tm"),
            vec![0.0, 1.0, -1.0, 0.0, 60.0, 50.0]
        );
    }

    #[test]
    fn test_rotation_inherited_from_page_tree() {
        let mut doc = create_pdf(&[800]);
        let root = pages_root(&doc).unwrap();
        doc.get_dictionary_mut(root).unwrap().set("Rotate", -90);

        let mut pdf = LopdfDocument::new(doc, vec![]).unwrap();
        pdf.draw_rect(0, &BBox::new(10.0, 20.0, 110.0, 35.0), Rgb::GREEN, 0.5)
            .unwrap();
        assert_eq!(operands(&pdf, 0, "re"), vec![577.0, 690.0, 15.0, 100.0]);
    }

    #[test]
    fn test_upside_down_page_text_matrix() {
        let mut doc = create_pdf(&[800]);
        let page_id = first_page_id(&doc);
        doc.get_dictionary_mut(page_id).unwrap().set("Rotate", 180);

        let mut pdf = LopdfDocument::new(doc, vec![]).unwrap();
        pdf.insert_text(0, Point::new(50.0, 60.0), "1", 8.0, Rgb::RED)
            .unwrap();
        assert_eq!(
            operands(&pdf, 0, "Tm"),
            vec![-1.0, 0.0, 0.0, -1.0, 562.0, 60.0]
        );
    }

    #[test]
    fn test_odd_rotation_is_ignored() {
        let mut doc = create_pdf(&[800]);
        let page_id = first_page_id(&doc);
        doc.get_dictionary_mut(page_id).unwrap().set("Rotate", 45);
        assert_eq!(rotation(&doc, page_id).unwrap(), 0);
    }

    #[test]
    fn test_insert_page_at_front_keeps_order() {
        let doc = create_pdf(&[792, 792]);
        let mut pdf = LopdfDocument::new(doc, vec![page_text(&["first"]), page_text(&["second"])])
            .unwrap();
        let original: Vec<ObjectId> = pdf.pages.iter().map(|p| p.id).collect();

        assert_eq!(pdf.insert_page(0).unwrap(), 0);
        assert_eq!(pdf.insert_page(1).unwrap(), 1);
        assert_eq!(pdf.page_count(), 4);

        let ids: Vec<ObjectId> = pdf.inner().get_pages().into_values().collect();
        assert_eq!(ids[2..], original[..]);
        assert_eq!(ids[0], pdf.pages[0].id);
        assert_eq!(ids[1], pdf.pages[1].id);
        assert_eq!(pdf.extract_lines(2).unwrap(), vec!["first"]);

        let root = pages_root(pdf.inner()).unwrap();
        let count = pdf
            .inner()
            .get_dictionary(root)
            .unwrap()
            .get(b"Count")
            .unwrap()
            .as_i64()
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn test_insert_page_past_end_is_rejected() {
        let doc = create_pdf(&[792]);
        let mut pdf = LopdfDocument::new(doc, vec![]).unwrap();
        assert!(pdf.insert_page(2).is_err());
        assert!(pdf.insert_page(1).is_ok());
    }

    #[test]
    fn test_save_writes_annotations_and_reloads() {
        let doc = create_pdf(&[792, 792]);
        let mut pdf = LopdfDocument::new(doc, vec![]).unwrap();
        pdf.draw_rect(1, &BBox::new(10.0, 10.0, 20.0, 20.0), Rgb::GREEN, 0.5)
            .unwrap();
        let front = pdf.insert_page(0).unwrap();
        pdf.insert_text(front, Point::new(50.0, 50.0), "Text Index Table", 12.0, Rgb::BLACK)
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        pdf.save(&out).unwrap();

        let reloaded = Document::load(&out).unwrap();
        let pages: Vec<ObjectId> = reloaded.get_pages().into_values().collect();
        assert_eq!(pages.len(), 3);

        let index_ops = operators(&reloaded, pages[0]);
        assert_eq!(index_ops, vec!["BT", "Tf", "rg", "Tm", "Tj", "ET"]);

        // Annotated original page: q, original text, Q, then the rectangle.
        let ops = operators(&reloaded, pages[2]);
        assert_eq!(ops.first().map(String::as_str), Some("q"));
        assert!(ops.iter().any(|op| op == "re"));
        assert_eq!(ops.last().map(String::as_str), Some("Q"));

        // Untouched page keeps its single content stream.
        assert_eq!(operators(&reloaded, pages[1]), vec!["BT", "Tf", "Td", "Tj", "ET"]);

        let resources = effective_resources(&reloaded, pages[0]).unwrap();
        let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
        assert!(fonts.has(FONT_KEY.as_bytes()));
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("50 €"), b"50 \x80".to_vec());
        assert_eq!(encode_win_ansi("März"), b"M\xe4rz".to_vec());
        assert_eq!(encode_win_ansi("📌 x"), b"? x".to_vec());
    }
}
