use crate::UrlError;
use url::Url;

/// Resolves an href against the document it was found in
///
/// Returns None if the link should be ignored:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - anything that is not HTTP(S) after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}

/// Normalizes a chapter link into its canonical location
///
/// # Normalization Steps
///
/// 1. Resolve against the landing page
/// 2. Remove the query string (catalog links carry viewer options)
/// 3. Remove the fragment
/// 4. Remove a trailing slash (page numbers are appended as a path segment)
///
/// # Examples
///
/// ```
/// use manga_binder::url::chapter_location;
/// use url::Url;
///
/// let base = Url::parse("https://catalog.example.com/manga/1/title").unwrap();
/// let chapter = chapter_location("/manga/1/title/read/abc/?style=list", &base).unwrap();
/// assert_eq!(chapter.as_str(), "https://catalog.example.com/manga/1/title/read/abc");
/// ```
pub fn chapter_location(href: &str, base_url: &Url) -> Option<Url> {
    let mut url = resolve_link(href, base_url)?;
    url.set_query(None);
    url.set_fragment(None);

    let trimmed = url.path().trim_end_matches('/').to_string();
    if !trimmed.is_empty() {
        url.set_path(&trimmed);
    }

    Some(url)
}

/// Builds the viewer URL of a 1-based page within a chapter
///
/// The layout is `{chapter}/{page}?style={style}`.
///
/// # Examples
///
/// ```
/// use manga_binder::url::page_url;
/// use url::Url;
///
/// let chapter = Url::parse("https://catalog.example.com/read/abc").unwrap();
/// let page = page_url(&chapter, 3, "pages").unwrap();
/// assert_eq!(page.as_str(), "https://catalog.example.com/read/abc/3?style=pages");
/// ```
pub fn page_url(chapter: &Url, page: u32, style: &str) -> Result<Url, UrlError> {
    if chapter.cannot_be_a_base() {
        return Err(UrlError::CannotBeABase(chapter.to_string()));
    }

    let mut url = chapter.clone();
    url.set_query(None);
    url.set_fragment(None);

    let path = format!("{}/{}", chapter.path().trim_end_matches('/'), page);
    url.set_path(&path);
    url.query_pairs_mut().append_pair("style", style);

    Ok(url)
}

/// Builds the catalog search URL for a free-text query
///
/// # Examples
///
/// ```
/// use manga_binder::url::search_url;
///
/// let url = search_url("https://catalog.example.com", "/archive", "one piece").unwrap();
/// assert_eq!(url.as_str(), "https://catalog.example.com/archive?keyword=one+piece");
/// ```
pub fn search_url(base_url: &str, search_path: &str, query: &str) -> Result<Url, UrlError> {
    let base = Url::parse(base_url)?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            base.scheme()
        )));
    }

    let mut url = base.join(search_path)?;
    url.query_pairs_mut().append_pair("keyword", query);
    Ok(url)
}
