//! Header-addressed view over HTML tables

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("static selector"));
static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// A `<table>` whose first row is treated as the header row.
///
/// Header cells are indexed by their trimmed text so columns can be looked up
/// by name instead of position. When a header text repeats, the leftmost
/// column wins.
pub struct HtmlTable<'a> {
    rows: Vec<ElementRef<'a>>,
    columns: HashMap<String, usize>,
}

impl<'a> HtmlTable<'a> {
    pub fn new(table: ElementRef<'a>) -> Self {
        // Rows of nested tables belong to those tables, not this one.
        let rows: Vec<ElementRef<'a>> = child_elements(&table)
            .flat_map(|child| match child.value().name() {
                "tr" => vec![child],
                "thead" | "tbody" | "tfoot" => child_elements(&child)
                    .filter(|row| row.value().name() == "tr")
                    .collect(),
                _ => Vec::new(),
            })
            .collect();
        let mut columns = HashMap::new();
        if let Some(header) = rows.first() {
            for (index, cell) in cells(header).into_iter().enumerate() {
                columns.entry(cell_text(cell)).or_insert(index);
            }
        }
        Self { rows, columns }
    }

    /// Zero-based position of the header cell whose text is exactly `header`.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.columns.get(header).copied()
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.columns.contains_key(header)
    }

    /// Rows after the header, in document order.
    pub fn data_rows(&self) -> &[ElementRef<'a>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// All tables of `document`, in document order.
pub fn tables(document: &Html) -> impl Iterator<Item = HtmlTable<'_>> {
    document.select(&TABLE).map(HtmlTable::new)
}

/// Cells of a row, in column order.
pub fn cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    child_elements(row)
        .filter(|cell| matches!(cell.value().name(), "th" | "td"))
        .collect()
}

fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + use<'a> {
    element.children().filter_map(ElementRef::wrap)
}

/// Text content with runs of whitespace collapsed to single spaces.
pub fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Link target of the first anchor inside `cell`.
pub fn first_link<'a>(cell: &ElementRef<'a>) -> Option<&'a str> {
    cell.select(&ANCHOR)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
}
