//! Fake catalog served by wiremock

use manga_binder::config::Config;
use std::io::Cursor;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Configuration pointing at the mock server, with all directories in `dir`
pub fn test_config(server: &MockServer, dir: &Path) -> Config {
    let mut config = Config::default();
    config.catalog.base_url = server.uri();
    config.http.retry_delay_ms = 10;
    config.http.timeout_secs = 5;
    config.download.work_dir = dir.join("Data");
    config.download.output_dir = dir.join("out");
    config.download.max_concurrent_pages = 4;
    config
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .unwrap();
    bytes
}

/// Mounts the search results page for `keyword`
pub async fn mount_search(server: &MockServer, keyword: &str, hits: &[(&str, &str)]) {
    let links: String = hits
        .iter()
        .map(|(title, href)| {
            format!(
                r#"<a class="thumb position-relative" href="{}" title="{}"><img></a>"#,
                href, title
            )
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/archive"))
        .and(query_param("keyword", keyword))
        .respond_with(html(links))
        .mount(server)
        .await;
}

/// Mounts a landing page without volume groups, newest chapter first
pub async fn mount_landing(server: &MockServer, landing: &str, chapters: &[&str]) {
    let groups: String = chapters
        .iter()
        .map(|href| format!(r#"<div class="chapter"><a class="chap" href="{}?style=list">ch</a></div>"#, href))
        .collect();
    Mock::given(method("GET"))
        .and(path(landing))
        .respond_with(html(groups))
        .mount(server)
        .await;
}

/// Mounts one viewer page and one image per entry of `widths`
pub async fn mount_chapter(server: &MockServer, chapter: &str, widths: &[u32]) {
    let total = widths.len();
    for (i, width) in widths.iter().enumerate() {
        let page = i + 1;
        let image_path = format!("/images{}/{}.jpg", chapter, page);
        let viewer = format!(
            r#"<select class="page custom-select"><option>{}/{}</option></select>
            <div class="col-12 text-center position-relative"><img class="img-fluid" src="{}"></div>"#,
            page, total, image_path
        );

        Mock::given(method("GET"))
            .and(path(format!("{}/{}", chapter, page)))
            .and(query_param("style", "pages"))
            .respond_with(html(viewer))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(image_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(jpeg(*width, 20))
                    .insert_header("content-type", "image/jpeg"),
            )
            .mount(server)
            .await;
    }
}

/// MediaBox widths of every page of the PDF at `path`, in page order
pub fn page_widths(path: &Path) -> Vec<i64> {
    let document = lopdf::Document::load(path).unwrap();
    document
        .get_pages()
        .values()
        .map(|id| {
            let page = document.get_object(*id).unwrap().as_dict().unwrap();
            page.get(b"MediaBox").unwrap().as_array().unwrap()[2]
                .as_i64()
                .unwrap()
        })
        .collect()
}
