use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Display;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::document::lopdf_backend::LopdfDocument;
use crate::document::{DocumentLoader, PdfDocument};
use crate::error::InvomarkError;
use crate::model::BBox;

/// Document loader that reads text and word geometry with pdftotext (from
/// poppler-utils) and edits the file itself with lopdf.
///
/// Lines come from plain mode, which joins a word hyphenated across a line
/// break into one line. [`PageText::search`] matches such lines against the
/// joined layout lines as well.
pub struct PdftotextLoader;

impl PdftotextLoader {
    pub fn new() -> Self {
        PdftotextLoader
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader for PdftotextLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>, InvomarkError> {
        let doc = lopdf::Document::load(path)?;
        let page_count = doc.get_pages().len();

        // Plain mode keeps one text line per rendered line, in reading order.
        let plain = run_pdftotext(&["-enc", "UTF-8"], path)?;
        let xml = run_pdftotext(&["-bbox-layout", "-enc", "UTF-8"], path)?;
        let layout = parse_bbox_xml(&String::from_utf8_lossy(&xml))?;

        let pages = build_pages(page_count, &String::from_utf8_lossy(&plain), layout);
        debug!(
            path = %path.display(),
            pages = page_count,
            "loaded text layer via pdftotext"
        );

        Ok(Box::new(LopdfDocument::new(doc, pages)?))
    }

    fn backend_name(&self) -> &str {
        "pdftotext+lopdf"
    }
}

/// Text and word geometry of one page.
#[derive(Debug, Clone, Default)]
pub struct PageText {
    pub lines: Vec<String>,
    pub layout: Vec<LayoutLine>,
}

impl PageText {
    /// Find `needle` on this page.
    ///
    /// Whitespace is normalized on both sides. A hit is a run of consecutive
    /// words of one layout line that spells the needle exactly; the reported
    /// box covers the whole run. Hits are in reading order.
    ///
    /// If no run matches, two consecutive layout lines where the first ends
    /// in a hyphen are searched as one line with the hyphenated word joined.
    /// Failing that, single words that contain a one-word needle are reported.
    pub fn search(&self, needle: &str) -> Vec<BBox> {
        let needle = normalize_ws(needle);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<BBox> = self
            .layout
            .iter()
            .flat_map(|line| word_runs(&line.words, &needle))
            .collect();

        if hits.is_empty() {
            for pair in self.layout.windows(2) {
                if let Some(words) = dehyphenate(&pair[0].words, &pair[1].words) {
                    hits.extend(word_runs(&words, &needle));
                }
            }
        }

        if hits.is_empty() && !needle.contains(' ') {
            hits.extend(
                self.layout
                    .iter()
                    .flat_map(|l| l.words.iter())
                    .filter(|w| w.text.contains(needle.as_str()))
                    .map(|w| w.bbox),
            );
        }

        hits
    }
}

/// Boxes of every run of consecutive `words` that spells `needle`.
fn word_runs(words: &[Word], needle: &str) -> Vec<BBox> {
    let mut hits = Vec::new();
    for start in 0..words.len() {
        let mut joined = String::new();
        for end in start..words.len() {
            if end > start {
                joined.push(' ');
            }
            joined.push_str(&words[end].text);
            if joined.len() > needle.len() {
                break;
            }
            if joined == needle {
                let bbox = words[start + 1..=end]
                    .iter()
                    .fold(words[start].bbox, |acc, w| acc.union(&w.bbox));
                hits.push(bbox);
                break;
            }
        }
    }
    hits
}

/// `first` followed by `second`, with the word hyphenated across the break
/// joined into one. `None` unless `first` ends in a hyphenated word.
fn dehyphenate(first: &[Word], second: &[Word]) -> Option<Vec<Word>> {
    let (last, head) = first.split_last()?;
    let (next, tail) = second.split_first()?;
    let stem = last.text.strip_suffix('-').filter(|s| !s.is_empty())?;

    let mut words = head.to_vec();
    words.push(Word {
        text: format!("{stem}{}", next.text),
        bbox: last.bbox.union(&next.bbox),
    });
    words.extend_from_slice(tail);
    Some(words)
}

#[derive(Debug, Clone)]
pub struct LayoutLine {
    pub words: Vec<Word>,
}

#[derive(Debug, Clone)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

fn run_pdftotext(args: &[&str], pdf_path: &Path) -> Result<Vec<u8>, InvomarkError> {
    let output = Command::new("pdftotext")
        .args(args)
        .arg(pdf_path)
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InvomarkError::PdftotextNotFound
            } else {
                InvomarkError::Extraction(format!("pdftotext failed: {}", e))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(InvomarkError::PdftotextFailed { code, stderr });
    }

    Ok(output.stdout)
}

/// Combine plain text (pages separated by form feed) with the parsed layout.
/// Always returns exactly `page_count` pages.
pub(crate) fn build_pages(
    page_count: usize,
    plain_text: &str,
    layout: Vec<Vec<LayoutLine>>,
) -> Vec<PageText> {
    let mut plain_pages = plain_text.split('\x0c');
    let mut layout_pages = layout.into_iter();

    (0..page_count)
        .map(|_| PageText {
            lines: plain_pages
                .next()
                .map(|t| t.lines().map(|l| l.to_string()).collect())
                .unwrap_or_default(),
            layout: layout_pages.next().unwrap_or_default(),
        })
        .collect()
}

/// Parse `pdftotext -bbox-layout` output into per-page layout lines.
///
/// Pages are returned in document order; empty words and lines are dropped.
pub fn parse_bbox_xml(xml: &str) -> Result<Vec<Vec<LayoutLine>>, InvomarkError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<Vec<LayoutLine>> = Vec::new();
    let mut current_line: Option<Vec<Word>> = None;
    let mut current_word: Option<BBox> = None;
    let mut word_text = String::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"page" => pages.push(Vec::new()),
                b"line" => current_line = Some(Vec::new()),
                b"word" => {
                    current_word = Some(parse_bbox(&e)?);
                    word_text.clear();
                }
                _ => {}
            },
            Event::Text(t) if current_word.is_some() => {
                word_text.push_str(&t.unescape().map_err(xml_error)?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"word" => {
                    if let (Some(bbox), Some(words)) = (current_word.take(), current_line.as_mut())
                    {
                        let text = word_text.trim();
                        if !text.is_empty() {
                            words.push(Word {
                                text: text.to_string(),
                                bbox,
                            });
                        }
                    }
                }
                b"line" => {
                    if let (Some(words), Some(page)) = (current_line.take(), pages.last_mut()) {
                        if !words.is_empty() {
                            page.push(LayoutLine { words });
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(pages)
}

fn parse_bbox(tag: &BytesStart) -> Result<BBox, InvomarkError> {
    Ok(BBox {
        x0: parse_attr_f32(tag, "xMin")?,
        y0: parse_attr_f32(tag, "yMin")?,
        x1: parse_attr_f32(tag, "xMax")?,
        y1: parse_attr_f32(tag, "yMax")?,
    })
}

fn parse_attr_f32(tag: &BytesStart, name: &str) -> Result<f32, InvomarkError> {
    let attr = tag
        .try_get_attribute(name)
        .map_err(xml_error)?
        .ok_or_else(|| InvomarkError::Extraction(format!("word is missing attribute {name}")))?;
    let value = attr.unescape_value().map_err(xml_error)?;
    value.trim().parse().map_err(|e| {
        InvomarkError::Extraction(format!("invalid {name} value '{value}': {e}"))
    })
}

fn xml_error(e: impl Display) -> InvomarkError {
    InvomarkError::Extraction(format!("malformed bbox layout: {e}"))
}

pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX_XML: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title></title>
<meta name="Producer" content="Acme &amp; Co"/>
</head>
<body>
<doc>
  <page width="595.000000" height="842.000000">
    <flow>
      <block xMin="50.0" yMin="60.0" xMax="200.0" yMax="72.0">
        <line xMin="50.0" yMin="60.0" xMax="200.0" yMax="72.0">
          <word xMin="50.0" yMin="60.0" xMax="90.0" yMax="72.0">Invoice</word>
          <word xMin="94.0" yMin="60.0" xMax="120.0" yMax="72.0">#123</word>
        </line>
        <line xMin="50.0" yMin="80.0" xMax="200.0" yMax="92.0">
          <word xMin="50.0" yMin="80.0" xMax="80.0" yMax="92.0">Total:</word>
          <word xMin="84.0" yMin="81.0" xMax="100.0" yMax="93.0">50</word>
          <word xMin="104.0" yMin="80.0" xMax="130.0" yMax="92.0">EUR</word>
        </line>
      </block>
    </flow>
  </page>
  <page width="595.000000" height="842.000000">
    <flow>
      <block xMin="50.0" yMin="60.0" xMax="200.0" yMax="72.0">
        <line xMin="50.0" yMin="60.0" xMax="200.0" yMax="72.0">
          <word xMin="50.0" yMin="60.0" xMax="70.0" yMax="72.0">R&amp;D</word>
        </line>
      </block>
    </flow>
  </page>
</doc>
</body>
</html>
"#;

    const WRAPPED_XML: &str = r#"<html xmlns="http://www.w3.org/1999/xhtml">
<body>
<doc>
  <page width="595.000000" height="842.000000">
    <flow>
      <block xMin="50.0" yMin="80.0" xMax="200.0" yMax="126.0">
        <line xMin="50.0" yMin="80.0" xMax="130.0" yMax="92.0">
          <word xMin="50.0" yMin="80.0" xMax="80.0" yMax="92.0">Total:</word>
          <word xMin="84.0" yMin="80.0" xMax="100.0" yMax="92.0">50</word>
          <word xMin="104.0" yMin="80.0" xMax="130.0" yMax="92.0">EUR</word>
        </line>
        <line xMin="50.0" yMin="100.0" xMax="130.0" yMax="112.0">
          <word xMin="50.0" yMin="100.0" xMax="70.0" yMax="112.0">Der</word>
          <word xMin="74.0" yMin="100.0" xMax="130.0" yMax="112.0">Leistungs-</word>
        </line>
        <line xMin="50.0" yMin="114.0" xMax="140.0" yMax="126.0">
          <word xMin="50.0" yMin="114.0" xMax="100.0" yMax="126.0">zeitraum</word>
          <word xMin="104.0" yMin="114.0" xMax="140.0" yMax="126.0">Januar</word>
        </line>
        <line xMin="50.0" yMin="200.0" xMax="130.0" yMax="212.0">
          <word xMin="50.0" yMin="200.0" xMax="80.0" yMax="212.0">Total:</word>
          <word xMin="84.0" yMin="200.0" xMax="100.0" yMax="212.0">50</word>
          <word xMin="104.0" yMin="200.0" xMax="130.0" yMax="212.0">EUR</word>
        </line>
      </block>
    </flow>
  </page>
</doc>
</body>
</html>
"#;

    fn wrapped_page() -> PageText {
        let mut layout = parse_bbox_xml(WRAPPED_XML).unwrap();
        PageText {
            lines: vec![],
            layout: layout.remove(0),
        }
    }

    fn first_page() -> PageText {
        let mut layout = parse_bbox_xml(BBOX_XML).unwrap();
        PageText {
            lines: vec![],
            layout: layout.remove(0),
        }
    }

    #[test]
    fn test_parse_bbox_xml_pages_and_words() {
        let pages = parse_bbox_xml(BBOX_XML).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[0][1].words.len(), 3);
        assert_eq!(pages[0][0].words[1].text, "#123");
        assert_eq!(pages[0][0].words[1].bbox.x0, 94.0);
        assert_eq!(pages[1][0].words[0].text, "R&D");
    }

    #[test]
    fn test_search_matches_word_run_and_unions_boxes() {
        let hits = first_page().search("Total:  50 EUR");
        assert_eq!(hits, vec![BBox::new(50.0, 80.0, 130.0, 93.0)]);
    }

    #[test]
    fn test_search_partial_run() {
        let hits = first_page().search("50 EUR");
        assert_eq!(hits, vec![BBox::new(84.0, 80.0, 130.0, 93.0)]);
    }

    #[test]
    fn test_search_single_word_substring_fallback() {
        let hits = first_page().search("voice");
        assert_eq!(hits, vec![BBox::new(50.0, 60.0, 90.0, 72.0)]);
    }

    #[test]
    fn test_search_repeated_phrase_in_reading_order() {
        let hits = wrapped_page().search("Total: 50 EUR");
        assert_eq!(
            hits,
            vec![
                BBox::new(50.0, 80.0, 130.0, 92.0),
                BBox::new(50.0, 200.0, 130.0, 212.0),
            ]
        );
    }

    #[test]
    fn test_search_joins_hyphenated_line_break() {
        let page = wrapped_page();
        assert_eq!(
            page.search("Der Leistungszeitraum"),
            vec![BBox::new(50.0, 100.0, 130.0, 126.0)]
        );
        assert_eq!(
            page.search("Leistungszeitraum Januar"),
            vec![BBox::new(50.0, 100.0, 140.0, 126.0)]
        );
        // The hyphenated word as printed still matches on its own line.
        assert_eq!(
            page.search("Der Leistungs-"),
            vec![BBox::new(50.0, 100.0, 130.0, 112.0)]
        );
    }

    #[test]
    fn test_search_no_match() {
        assert!(first_page().search("Subtotal").is_empty());
        assert!(first_page().search("   ").is_empty());
    }

    #[test]
    fn test_build_pages_pads_and_splits_on_form_feed() {
        let layout = parse_bbox_xml(BBOX_XML).unwrap();
        let pages = build_pages(3, "Invoice #123\n\nTotal: 50 EUR\n\x0cR&D\n\x0c", layout);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].lines, vec!["Invoice #123", "", "Total: 50 EUR"]);
        assert_eq!(pages[1].lines, vec!["R&D"]);
        assert!(pages[2].lines.is_empty());
        assert!(pages[2].layout.is_empty());
    }
}
