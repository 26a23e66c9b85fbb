//! # Photo Acquisition and Decoding
//!
//! Resolves a photo's `url` to decoded pixel data ready for the render
//! surface. JPEG bytes pass through untouched (PDF-style surfaces embed
//! them natively); PNG and WebP are decoded to RGB with a separate alpha
//! channel.
//!
//! Acquisition is the only latency-bound step of report generation, so
//! [`PhotoFetcher::fetch_ordered`] prefetches a bounded window of images
//! concurrently while preserving the strict commit order the layout
//! depends on. A fetch that fails or exceeds the timeout yields an error
//! item; the grid renderer degrades that cell to a placeholder.

use std::io::Cursor as IoCursor;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use tracing::debug;

use crate::error::ImageLoadError;
use crate::model::PhotoRecord;

/// A fully decoded/loaded image ready for the surface to draw.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

/// Pixel data in a form a document surface can consume directly.
#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Raw JPEG bytes, embeddable as-is.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// Decoded RGB pixels + optional alpha channel.
    Decoded {
        /// width * height * 3 bytes (RGB).
        rgb: Vec<u8>,
        /// width * height bytes of alpha. None when fully opaque.
        alpha: Option<Vec<u8>>,
    },
}

/// JPEG color space, detected from the SOF component count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

/// Fetches and decodes photos with bounded concurrency and a per-photo
/// timeout.
#[derive(Debug, Clone)]
pub struct PhotoFetcher {
    client: reqwest::Client,
    timeout: Duration,
    prefetch: usize,
}

impl Default for PhotoFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(15), 4)
    }
}

impl PhotoFetcher {
    pub fn new(timeout: Duration, prefetch: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
            prefetch: prefetch.max(1),
        }
    }

    /// A stream of decode results in the exact order of `photos`.
    ///
    /// Up to the prefetch window of acquisitions run concurrently, but
    /// items are yielded strictly in input order, so the commit loop can
    /// consume them while later fetches are still in flight. Dropping
    /// the stream cancels whatever is in flight.
    pub fn fetch_ordered<'a>(
        &'a self,
        photos: &'a [&'a PhotoRecord],
    ) -> impl Stream<Item = Result<LoadedImage, ImageLoadError>> + 'a {
        stream::iter(photos.iter().copied())
            .map(move |photo| self.load(&photo.url))
            .buffered(self.prefetch)
    }

    /// Load one image from any supported source.
    pub async fn load(&self, src: &str) -> Result<LoadedImage, ImageLoadError> {
        let bytes = self.read_source_bytes(src).await?;
        debug!(src, len = bytes.len(), "photo acquired");
        decode_image_bytes(&bytes)
    }

    /// Resolve the source string to raw image bytes.
    ///
    /// Supported forms:
    /// - `http://` / `https://` URL (hosted storage)
    /// - `data:image/...;base64,...` data URI
    /// - file path (absolute or `./`-relative)
    /// - raw base64 image data
    async fn read_source_bytes(&self, src: &str) -> Result<Vec<u8>, ImageLoadError> {
        if src.starts_with("http://") || src.starts_with("https://") {
            return self.fetch_url(src).await;
        }

        // Data URI: data:image/png;base64,iVBOR...
        if src.starts_with("data:image/") {
            let comma_pos = src.find(',').ok_or_else(|| {
                ImageLoadError::Decode("invalid data URI: missing comma".to_string())
            })?;
            return base64_decode(&src[comma_pos + 1..]);
        }

        // Only explicit path prefixes count as paths, so base64 payloads
        // (which contain '/') are not mistaken for files.
        if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
            return tokio::fs::read(src).await.map_err(|e| ImageLoadError::File {
                path: src.to_string(),
                message: e.to_string(),
            });
        }

        base64_decode(src)
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|source| ImageLoadError::Fetch {
                    url: url.to_string(),
                    source,
                })?;
            let bytes = response.bytes().await.map_err(|source| ImageLoadError::Fetch {
                url: url.to_string(),
                source,
            })?;
            Ok(bytes.to_vec())
        };

        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(ImageLoadError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}

fn base64_decode(input: &str) -> Result<Vec<u8>, ImageLoadError> {
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.decode(input)?)
}

/// Detect the format from magic bytes and decode accordingly.
pub fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage, ImageLoadError> {
    if data.len() < 4 {
        return Err(ImageLoadError::TooShort);
    }

    if is_jpeg(data) {
        decode_jpeg(data)
    } else if is_png(data) || is_webp(data) {
        decode_raster(data)
    } else {
        Err(ImageLoadError::UnsupportedFormat)
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

fn is_webp(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP"
}

/// JPEG: read dimensions and color space without decoding pixels; the
/// raw bytes pass through to the surface.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage, ImageLoadError> {
    let reader = image::io::Reader::new(IoCursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImageLoadError::Decode(format!("JPEG format detection: {e}")))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ImageLoadError::Decode(format!("JPEG dimensions: {e}")))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: detect_jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Scan JPEG markers for the SOF segment and read the component count.
fn detect_jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2; // skip SOI marker (FF D8)
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        // SOF markers: C0-C3, C5-C7, C9-CB, CD-CF
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof {
            // SOF segment: length(2) + precision(1) + height(2) + width(2) + num_components(1)
            if i + 9 < data.len() {
                return if data[i + 9] == 1 {
                    JpegColorSpace::DeviceGray
                } else {
                    JpegColorSpace::DeviceRGB
                };
            }
        }
        if i + 3 < data.len() {
            let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + seg_len;
        } else {
            break;
        }
    }
    JpegColorSpace::DeviceRGB
}

/// PNG/WebP: decode to RGBA and split into RGB + alpha.
fn decode_raster(data: &[u8]) -> Result<LoadedImage, ImageLoadError> {
    let img = image::load_from_memory(data)
        .map_err(|e| ImageLoadError::Decode(e.to_string()))?;

    let rgba = img.to_rgba8();
    let width = rgba.width();
    let height = rgba.height();

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;

    for pixel in rgba.pixels() {
        rgb.push(pixel[0]);
        rgb.push(pixel[1]);
        rgb.push(pixel[2]);
        let a = pixel[3];
        alpha.push(a);
        if a != 255 {
            has_transparency = true;
        }
    }

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if has_transparency { Some(alpha) } else { None },
        },
        width_px: width,
        height_px: height,
    })
}
