//! History thumbnail generation

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// Generate a base64-encoded JPEG thumbnail whose longest edge is
/// `max_px`. Returns `None` when the image cannot be decoded or
/// re-encoded; a missing thumbnail never blocks tagging.
pub fn create_thumbnail(path: &Path, max_px: u32) -> Option<String> {
    let img = image::open(path).ok()?;
    // JPEG has no alpha channel, force RGB before encoding
    let thumb = DynamicImage::ImageRgb8(img.thumbnail(max_px, max_px).to_rgb8());

    let mut buf = Vec::new();
    thumb
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .ok()?;
    Some(STANDARD.encode(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn generates_base64_for_a_real_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        RgbImage::from_pixel(320, 240, image::Rgb([120, 80, 40]))
            .save(&path)
            .unwrap();

        let thumb = create_thumbnail(&path, 96).unwrap();
        assert!(!thumb.is_empty());

        // Decodes back to a JPEG no larger than the requested edge
        let bytes = STANDARD.decode(&thumb).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.width() <= 96 && decoded.height() <= 96);
    }

    #[test]
    fn unreadable_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.jpg");
        std::fs::write(&path, b"plain text").unwrap();

        assert!(create_thumbnail(&path, 96).is_none());
        assert!(create_thumbnail(&dir.path().join("missing.jpg"), 96).is_none());
    }
}
