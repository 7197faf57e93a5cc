//! Finds story rows on a listing page.
//!
//! The host markup is not ours and has changed over the years, so both the
//! container lookup and the row lookup are ordered cascades of independent
//! strategies; the first strategy that produces something wins.

use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::page::Page;

static RANK_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.").unwrap());
static RANK_CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.$").unwrap());

/// Opaque reference to a located story row in one `Page` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHandle(NodeId);

impl RowHandle {
    pub fn element<'a>(&self, page: &'a Page) -> Option<ElementRef<'a>> {
        page.document().tree.get(self.0).and_then(ElementRef::wrap)
    }
}

type ContainerStrategy = for<'a> fn(&'a Html) -> Option<ElementRef<'a>>;
type RowStrategy = for<'a> fn(&Page, ElementRef<'a>) -> Vec<ElementRef<'a>>;

const CONTAINER_STRATEGIES: &[(&str, ContainerStrategy)] = &[
    ("table.itemlist", itemlist_table),
    ("table#hnmain", main_table),
    ("largest table", largest_table),
];

const ROW_STRATEGIES: &[(&str, RowStrategy)] = &[
    ("tr.athing", athing_rows),
    ("rank with external link", ranked_rows_with_external_link),
    ("rank cell", rank_cell_rows),
    ("title element", title_element_rows),
];

fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap()
}

/// Locate story rows in document order. Never fails; an unrecognised page
/// yields an empty list.
pub fn locate(page: &Page) -> Vec<RowHandle> {
    let Some(container) = find_container(page.document()) else {
        log::debug!("no row container on {}", page.location().display());
        return Vec::new();
    };

    for (name, strategy) in ROW_STRATEGIES {
        let rows = strategy(page, container);
        if !rows.is_empty() {
            log::debug!("located {} rows via {}", rows.len(), name);
            return rows.into_iter().map(|row| RowHandle(row.id())).collect();
        }
    }

    log::debug!("container found but no story rows matched");
    Vec::new()
}

pub fn find_container(document: &Html) -> Option<ElementRef<'_>> {
    CONTAINER_STRATEGIES.iter().find_map(|(name, strategy)| {
        let found = strategy(document);
        if found.is_some() {
            log::debug!("row container found via {}", name);
        }
        found
    })
}

fn itemlist_table(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&css("table.itemlist")).next()
}

fn main_table(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&css("table#hnmain")).next()
}

fn largest_table(document: &Html) -> Option<ElementRef<'_>> {
    let tr = css("tr");
    let mut best: Option<(usize, ElementRef<'_>)> = None;
    for table in document.select(&css("table")) {
        let count = table.select(&tr).count();
        if count > 0 && best.is_none_or(|(max, _)| count > max) {
            best = Some((count, table));
        }
    }
    best.map(|(_, table)| table)
}

fn rows_of(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    container.select(&css("tr")).collect()
}

pub(crate) fn athing_rows<'a>(_page: &Page, container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    container.select(&css("tr.athing")).collect()
}

pub(crate) fn ranked_rows_with_external_link<'a>(
    page: &Page,
    container: ElementRef<'a>,
) -> Vec<ElementRef<'a>> {
    let links = css("a[href]");
    rows_of(container)
        .into_iter()
        .filter(|row| {
            let text: String = row.text().collect();
            RANK_PREFIX.is_match(&text)
                && row.select(&links).any(|link| {
                    link.value()
                        .attr("href")
                        .and_then(|href| page.resolve(href))
                        .is_some_and(|url| page.is_external(&url))
                })
        })
        .collect()
}

pub(crate) fn rank_cell_rows<'a>(_page: &Page, container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let first_cell = css("td:first-child");
    rows_of(container)
        .into_iter()
        .filter(|row| {
            row.select(&first_cell).next().is_some_and(|cell| {
                let text: String = cell.text().collect();
                RANK_CELL.is_match(text.trim())
            })
        })
        .collect()
}

pub(crate) fn title_element_rows<'a>(_page: &Page, container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let title = css(r#".title, .storylink, [class*="title"]"#);
    rows_of(container)
        .into_iter()
        .filter(|row| row.select(&title).next().is_some())
        .collect()
}

/// Collapsed, human readable text of a row plus the subtext line that
/// follows it on the page, if any.
pub fn row_text(page: &Page, row: RowHandle) -> (String, Option<String>) {
    let Some(element) = row.element(page) else {
        return (String::new(), None);
    };
    let text = collapse_whitespace(element.text());
    let subtext = element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()
        .filter(|sibling| sibling.select(&css(".subtext")).next().is_some())
        .map(|sibling| collapse_whitespace(sibling.text()))
        .filter(|s| !s.is_empty());
    (text, subtext)
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
