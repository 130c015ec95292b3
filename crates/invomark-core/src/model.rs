use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::normalize::currency::NormalizedAmount;
use crate::normalize::date::NormalizedDate;

/// Rectangle on a page in points, origin at the top-left corner, y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        BBox { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A position on a page, same coordinate space as [`BBox`].
///
/// For text insertion this is the baseline origin of the first line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

/// RGB color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const GREEN: Rgb = Rgb(0.0, 1.0, 0.0);
    pub const RED: Rgb = Rgb(1.0, 0.0, 0.0);

    pub fn components(&self) -> [f32; 3] {
        [self.0, self.1, self.2]
    }

    pub fn is_valid(&self) -> bool {
        self.components()
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Rgb(c[0], c[1], c[2])
    }
}

/// One located, annotated line of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedLine {
    /// Enumeration position of the line on its page (0-based, resets per page).
    pub index: usize,
    /// Trimmed line text, never empty.
    pub text: String,
    /// 1-based page number the line came from.
    pub page_number: usize,
}

/// Values extracted from one invoice PDF.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRecord {
    pub file_name: String,
    pub date: NormalizedDate,
    pub original_value: NormalizedAmount,
    pub value_in_eur: Option<Decimal>,
}

impl InvoiceRecord {
    pub const COLUMNS: [&'static str; 4] = ["File Name", "Date", "Original Value", "Value in EUR"];
}
