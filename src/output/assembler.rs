//! Binds a volume's persisted page images into one PDF
//!
//! Every image becomes one page whose media box equals the image's pixel
//! dimensions (1 px = 1 pt). 8-bit baseline or progressive JPEG data with one
//! (gray) or three (RGB) components is embedded as-is; any other image,
//! CMYK JPEG included, is re-encoded to RGB JPEG first.

use crate::model::PageKey;
use crate::storage::Workspace;
use crate::{AssemblyError, BinderError};
use image::{DynamicImage, GenericImageView, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Name of the XObject each page draws
const IMAGE_NAME: &str = "Im0";

/// File name of the document produced for a volume
pub fn document_name(volume: usize) -> String {
    format!("Volume_{}.pdf", volume)
}

/// Produces one document per volume from the working storage
#[derive(Debug, Clone)]
pub struct VolumeAssembler {
    workspace: Workspace,
    output_dir: PathBuf,
}

impl VolumeAssembler {
    pub fn new(workspace: Workspace, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            workspace,
            output_dir: output_dir.into(),
        }
    }

    /// Path the document of `volume` is written to
    pub fn document_path(&self, volume: usize) -> PathBuf {
        self.output_dir.join(document_name(volume))
    }

    /// Binds a volume
    ///
    /// `chapter_page_counts[i]` is the page count of chapter `i`. Images
    /// are read in (chapter, page) order; a missing one aborts this volume
    /// and nothing is written.
    pub fn assemble(&self, volume: usize, chapter_page_counts: &[u32]) -> Result<PathBuf, BinderError> {
        self.try_assemble(volume, chapter_page_counts)
            .map_err(|source| BinderError::Assembly { volume, source })
    }

    fn try_assemble(&self, volume: usize, chapter_page_counts: &[u32]) -> Result<PathBuf, AssemblyError> {
        let keys: Vec<PageKey> = chapter_page_counts
            .iter()
            .enumerate()
            .flat_map(|(chapter, &pages)| {
                (1..=pages).map(move |page| PageKey::new(volume, chapter, page))
            })
            .collect();

        if keys.is_empty() {
            return Err(AssemblyError::Empty(volume));
        }

        let mut builder = PdfBuilder::new();
        for key in &keys {
            let image = load_page_image(&self.workspace.image_path(*key), key)?;
            builder.add_page(image)?;
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.document_path(volume);
        builder.save(&path)?;

        tracing::info!(
            "Wrote {} ({} pages from {} chapters)",
            path.display(),
            keys.len(),
            chapter_page_counts.len()
        );
        Ok(path)
    }
}

/// Image data ready to embed as a DCT-encoded XObject
#[derive(Debug)]
struct PageImage {
    width: u32,
    height: u32,
    color_space: &'static str,
    jpeg: Vec<u8>,
}

fn load_page_image(path: &Path, key: &PageKey) -> Result<PageImage, AssemblyError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AssemblyError::MissingImage {
                chapter: key.chapter,
                page: key.page,
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let image_error = |source| AssemblyError::Image {
        path: path.to_path_buf(),
        source,
    };

    let format = image::guess_format(&bytes).map_err(image_error)?;
    let decoded = image::load_from_memory_with_format(&bytes, format).map_err(image_error)?;
    let (width, height) = decoded.dimensions();

    // The decoder reports CMYK input as RGB, so the raw stream decides
    let frame = match format {
        ImageFormat::Jpeg => jpeg_frame(&bytes),
        _ => None,
    };
    let (color_space, jpeg) = match frame {
        Some(JpegFrame {
            precision: 8,
            components: 1,
        }) => ("DeviceGray", bytes),
        Some(JpegFrame {
            precision: 8,
            components: 3,
        }) => ("DeviceRGB", bytes),
        _ => ("DeviceRGB", reencode_rgb_jpeg(decoded).map_err(image_error)?),
    };

    Ok(PageImage {
        width,
        height,
        color_space,
        jpeg,
    })
}

/// Sample layout declared by a JPEG's start-of-frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JpegFrame {
    precision: u8,
    components: u8,
}

/// Walks the marker segments up to the first start-of-frame header
///
/// Returns `None` for anything that is not a well-formed JPEG prefix.
fn jpeg_frame(bytes: &[u8]) -> Option<JpegFrame> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    loop {
        if *bytes.get(pos)? != 0xFF {
            return None;
        }
        // Any number of fill bytes may precede a marker
        while *bytes.get(pos + 1)? == 0xFF {
            pos += 1;
        }
        let marker = *bytes.get(pos + 1)?;
        pos += 2;

        match marker {
            // Standalone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return None,
            // SOF0..SOF15, minus DHT, JPG and DAC
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return Some(JpegFrame {
                    precision: *bytes.get(pos + 2)?,
                    components: *bytes.get(pos + 7)?,
                });
            }
            _ => {
                let length = u16::from_be_bytes([*bytes.get(pos)?, *bytes.get(pos + 1)?]);
                // The length counts its own two bytes
                if length < 2 {
                    return None;
                }
                pos += usize::from(length);
            }
        }
    }
}

fn reencode_rgb_jpeg(image: DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(image.to_rgb8()).write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;
    Ok(jpeg)
}

/// Incrementally builds an image-only PDF
struct PdfBuilder {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    fn add_page(&mut self, image: PageImage) -> Result<(), AssemblyError> {
        let width = i64::from(image.width);
        let height = i64::from(image.height);

        let mut image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => image.color_space,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.jpeg,
        );
        image_stream.allows_compression = false;
        let image_id = self.document.add_object(image_stream);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        width.into(),
                        0.into(),
                        0.into(),
                        height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .document
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => image_id,
                },
            },
        });
        self.kids.push(page_id.into());
        Ok(())
    }

    fn save(mut self, path: &Path) -> Result<(), AssemblyError> {
        let count = self.kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => count,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        // Write next to the target and rename, so a failed save never
        // leaves a truncated document under the final name
        let partial = path.with_extension("pdf.part");
        if let Err(e) = self.document.save(&partial) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        std::fs::rename(&partial, path)?;
        Ok(())
    }
}
