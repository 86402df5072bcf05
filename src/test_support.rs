//! In-memory catalog fixtures shared by unit tests

use crate::crawler::PageSource;
use crate::FetchError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

pub const BASE: &str = "https://catalog.example.com";

#[derive(Debug, Clone)]
enum Fixture {
    Html(String),
    Bytes(Vec<u8>),
    Status(u16),
}

/// A `PageSource` serving canned responses keyed by full URL
///
/// Unknown URLs answer 404. Every request is recorded, and the highest
/// number of concurrently running requests is tracked.
#[derive(Debug, Default)]
pub struct FixtureSource {
    responses: HashMap<String, Fixture>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(mut self, url: &str, html: impl Into<String>) -> Self {
        self.responses
            .insert(url.to_string(), Fixture::Html(html.into()));
        self
    }

    pub fn with_bytes(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), Fixture::Bytes(bytes));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), Fixture::Status(status));
        self
    }

    /// Holds every request open for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Registers a full chapter: one viewer page and one JPEG per entry of
    /// `widths`, the JPEG of page `n` being `widths[n - 1]` pixels wide
    pub fn with_chapter(mut self, chapter: &str, widths: &[u32]) -> Self {
        let total = widths.len() as u32;
        for (i, width) in widths.iter().enumerate() {
            let page = i as u32 + 1;
            let src = format!("{}/img/{}.jpg", chapter, page);
            self = self
                .with_html(
                    &format!("{}/{}?style=pages", chapter, page),
                    viewer_page(page, total, &src),
                )
                .with_bytes(&src, jpeg_bytes(*width, 16));
        }
        self
    }

    /// Every URL requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests made for URLs containing `needle`
    pub fn request_count(&self, needle: &str) -> usize {
        self.requests()
            .iter()
            .filter(|url| url.contains(needle))
            .count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn respond(&self, url: &Url) -> Result<Fixture, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.responses.get(url.as_str()) {
            Some(Fixture::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status: *status,
            }),
            Some(fixture) => Ok(fixture.clone()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl PageSource for FixtureSource {
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        match self.respond(url).await? {
            Fixture::Html(html) => Ok(html),
            Fixture::Bytes(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Fixture::Status(_) => unreachable!("status fixtures are returned as errors"),
        }
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        match self.respond(url).await? {
            Fixture::Html(html) => Ok(html.into_bytes()),
            Fixture::Bytes(bytes) => Ok(bytes),
            Fixture::Status(_) => unreachable!("status fixtures are returned as errors"),
        }
    }
}

pub fn url(path: &str) -> Url {
    Url::parse(BASE).unwrap().join(path).unwrap()
}

/// Landing page with explicit volume groups, listed as the catalog does
/// (newest volume first, newest chapter first)
pub fn volume_landing(volumes: &[&[&str]]) -> String {
    let groups: String = volumes
        .iter()
        .map(|chapters| {
            let links: String = chapters
                .iter()
                .map(|href| format!(r#"<a class="chap" href="{}?style=list">ch</a>"#, href))
                .collect();
            format!(r#"<div class="volume-element pl-2">{}</div>"#, links)
        })
        .collect();
    format!("<html><body>{}</body></html>", groups)
}

/// Landing page without volume groups (newest chapter first)
pub fn chapter_landing(chapters: &[&str]) -> String {
    let groups: String = chapters
        .iter()
        .map(|href| {
            format!(
                r#"<div class="chapter pl-2"><a class="chap" href="{}">ch</a></div>"#,
                href
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", groups)
}

/// Chapter viewer page showing `page` of `total`
pub fn viewer_page(page: u32, total: u32, src: &str) -> String {
    format!(
        r#"<html><body>
            <select class="page custom-select"><option value="0">{}/{}</option></select>
            <div class="col-12 text-center position-relative">
                <img class="img-fluid" src="{}">
            </div>
        </body></html>"#,
        page, total, src
    )
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, image::ImageFormat::Jpeg)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, image::ImageFormat::Png)
}

fn encode(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}
