//! HTML parser for catalog documents
//!
//! Catalog pages are reduced to a small tagged node model so that the
//! crawling logic never touches markup:
//! - search result anchors
//! - volume groups and loose chapter groups with their chapter links
//! - the page selector of a chapter viewer
//! - the page image of a viewer
//!
//! Nodes of each kind are returned in document order.

use crate::url::{chapter_location, resolve_link};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A structured element extracted from a catalog document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogNode {
    /// A search result: display title and landing page
    SearchHit { title: String, url: Url },

    /// An explicit volume grouping with its chapter links (catalog order)
    VolumeGroup { chapters: Vec<Url> },

    /// A chapter container outside any volume grouping (catalog order)
    ChapterGroup { chapters: Vec<Url> },

    /// The page selector of a chapter viewer; `total` is the page count
    PageSelector { label: String, total: Option<u32> },

    /// The page image shown by a viewer
    Image { src: Url },
}

/// The kinds of node that can be requested from a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    SearchHit,
    VolumeGroup,
    ChapterGroup,
    PageSelector,
    Image,
}

impl NodeKind {
    /// CSS selector locating nodes of this kind
    pub fn selector(&self) -> &'static str {
        match self {
            Self::SearchHit => "a.thumb.position-relative",
            Self::VolumeGroup => "div.volume-element",
            Self::ChapterGroup => "div.chapter",
            Self::PageSelector => "select.page.custom-select",
            Self::Image => "div.col-12.text-center.position-relative img.img-fluid",
        }
    }
}

const CHAPTER_LINK: &str = "a.chap";
const SELECTOR_OPTION: &str = "option";

/// Parses HTML content and extracts nodes of the requested kinds
///
/// Results are grouped by kind, in the order the kinds were requested;
/// within a kind, nodes keep document order.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL of the document, for resolving relative links
/// * `kinds` - Node kinds to extract
///
/// # Example
///
/// ```
/// use manga_binder::crawler::{parse_nodes, CatalogNode, NodeKind};
/// use url::Url;
///
/// let html = r#"<select class="page custom-select"><option>1/18</option></select>"#;
/// let base = Url::parse("https://catalog.example.com/read/abc/1").unwrap();
/// let nodes = parse_nodes(html, &base, &[NodeKind::PageSelector]).unwrap();
/// assert!(matches!(nodes[0], CatalogNode::PageSelector { total: Some(18), .. }));
/// ```
pub fn parse_nodes(
    html: &str,
    base_url: &Url,
    kinds: &[NodeKind],
) -> Result<Vec<CatalogNode>, String> {
    let document = Html::parse_document(html);
    let mut nodes = Vec::new();

    for kind in kinds {
        let selector = parse_selector(kind.selector())?;
        for element in document.select(&selector) {
            if let Some(node) = build_node(*kind, element, base_url)? {
                nodes.push(node);
            }
        }
    }

    Ok(nodes)
}

fn parse_selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {}", css, e))
}

fn build_node(
    kind: NodeKind,
    element: ElementRef<'_>,
    base_url: &Url,
) -> Result<Option<CatalogNode>, String> {
    let node = match kind {
        NodeKind::SearchHit => {
            let url = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url));
            let title = element
                .value()
                .attr("title")
                .map(str::to_string)
                .unwrap_or_else(|| collapse_text(element));

            match url {
                Some(url) if !title.is_empty() => Some(CatalogNode::SearchHit { title, url }),
                _ => None,
            }
        }
        NodeKind::VolumeGroup => Some(CatalogNode::VolumeGroup {
            chapters: chapter_links(element, base_url)?,
        }),
        NodeKind::ChapterGroup => Some(CatalogNode::ChapterGroup {
            chapters: chapter_links(element, base_url)?,
        }),
        NodeKind::PageSelector => {
            let option = parse_selector(SELECTOR_OPTION)?;
            element.select(&option).next().map(|first| {
                let label = collapse_text(first);
                let total = parse_page_total(&label);
                CatalogNode::PageSelector { label, total }
            })
        }
        NodeKind::Image => element
            .value()
            .attr("src")
            .and_then(|src| resolve_link(src, base_url))
            .map(|src| CatalogNode::Image { src }),
    };

    Ok(node)
}

/// Extracts the chapter links inside a group, in document order
fn chapter_links(group: ElementRef<'_>, base_url: &Url) -> Result<Vec<Url>, String> {
    let selector = parse_selector(CHAPTER_LINK)?;
    Ok(group
        .select(&selector)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| chapter_location(href, base_url))
        .collect())
}

/// Parses the total out of a page selector label such as `"1/23"`
pub fn parse_page_total(label: &str) -> Option<u32> {
    let (_, total) = label.split_once('/')?;
    total.trim().parse().ok()
}

/// Joins an element's text nodes with runs of whitespace collapsed
fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
