use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Extension of every stored logo
pub const LOGO_EXTENSION: &str = "webp";

/// On-disk layout of cached channel logos: `<directory>/<channel id>.webp`
#[derive(Debug, Clone)]
pub struct LogoAssetStorage {
    logo_dir: PathBuf,
}

impl LogoAssetStorage {
    pub fn new(logo_dir: PathBuf) -> Self {
        Self { logo_dir }
    }

    pub fn directory(&self) -> &Path {
        &self.logo_dir
    }

    pub async fn ensure_storage_dir(&self) -> Result<(), std::io::Error> {
        if !self.logo_dir.exists() {
            fs::create_dir_all(&self.logo_dir).await?;
        }
        Ok(())
    }

    /// Path for a channel's logo, or `None` when the id cannot be a file name
    pub fn logo_path(&self, channel_id: &str) -> Option<PathBuf> {
        if !is_safe_file_stem(channel_id) {
            return None;
        }
        Some(self.logo_dir.join(format!("{channel_id}.{LOGO_EXTENSION}")))
    }

    /// Re-encode arbitrary image bytes as WebP and write them to `path`
    pub async fn save_as_webp(&self, image_bytes: &[u8], path: &Path) -> Result<u64, image::ImageError> {
        let encoded = Self::convert_to_webp(image_bytes)?;
        fs::write(path, &encoded).await?;
        Ok(encoded.len() as u64)
    }

    /// Decode any supported format and encode it as lossless WebP
    ///
    /// The WebP encoder only takes 8-bit RGB(A), so everything is widened to RGBA8 first.
    pub fn convert_to_webp(image_bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
        let img = image::load_from_memory(image_bytes)?;
        let rgba = DynamicImage::ImageRgba8(img.to_rgba8());

        let mut webp_bytes = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut webp_bytes), ImageFormat::WebP)?;
        Ok(webp_bytes)
    }
}

/// Ids end up as file names; reject anything that could escape the directory
fn is_safe_file_stem(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.chars().any(|c| matches!(c, '/' | '\\' | '\0') || c.is_control())
}
