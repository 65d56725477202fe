//! Decorative dimension probing. Failures degrade to [`Dimensions::Unknown`].

use std::{fmt, io::Cursor};

use async_trait::async_trait;
use image::ImageReader;
use reqwest::Client;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimensions {
    Known { width: u32, height: u32 },
    Unknown,
}

impl Dimensions {
    pub fn is_known(&self) -> bool {
        matches!(self, Dimensions::Known { .. })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimensions::Known { width, height } => write!(f, "{width} × {height} px"),
            Dimensions::Unknown => f.write_str("- × - px"),
        }
    }
}

/// Reads width and height from the image header without decoding pixels.
pub fn probe_bytes(bytes: &[u8]) -> Dimensions {
    let reader = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(err) => {
            warn!(error = %err, "unable to guess image format");
            return Dimensions::Unknown;
        }
    };
    match reader.into_dimensions() {
        Ok((width, height)) => Dimensions::Known { width, height },
        Err(err) => {
            warn!(error = %err, "unable to read image dimensions");
            Dimensions::Unknown
        }
    }
}

#[async_trait]
pub trait ThumbnailProbe: Send + Sync {
    async fn dimensions(&self, url: &str) -> Dimensions;
}

/// Downloads the generated thumbnail and reads its header.
pub struct HttpThumbnailProbe {
    http: Client,
}

impl HttpThumbnailProbe {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    async fn fetch(&self, url: &str) -> reqwest::Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ThumbnailProbe for HttpThumbnailProbe {
    async fn dimensions(&self, url: &str) -> Dimensions {
        match self.fetch(url).await {
            Ok(bytes) => probe_bytes(&bytes),
            Err(err) => {
                warn!(error = %err, url, "thumbnail download failed; dimensions unavailable");
                Dimensions::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn reads_dimensions_from_png_header() {
        assert_eq!(
            probe_bytes(&png(7, 3)),
            Dimensions::Known {
                width: 7,
                height: 3
            }
        );
    }

    #[test]
    fn garbage_degrades_to_unknown() {
        assert_eq!(probe_bytes(b"definitely not an image"), Dimensions::Unknown);
        assert_eq!(probe_bytes(&[]), Dimensions::Unknown);
    }

    #[test]
    fn renders_placeholder_for_unknown() {
        assert_eq!(Dimensions::Unknown.to_string(), "- × - px");
        assert_eq!(
            Dimensions::Known {
                width: 600,
                height: 400
            }
            .to_string(),
            "600 × 400 px"
        );
    }
}
