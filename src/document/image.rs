//! Image loading for embedded pictures.
//!
//! Two sources are accepted: a local file path, resolved against a base
//! directory when relative, and a `data:<mime>;base64,<payload>` URI. Only
//! the pixel dimensions are decoded here; the bytes are embedded as-is.

use crate::error::Md2DocxError;
use base64::Engine;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw image bytes plus their pixel size.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub data: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Load the image referenced by an `<img src>` value.
pub fn load_image(src: &str, base_dir: &Path) -> Result<LoadedImage, Md2DocxError> {
    let data = if let Some(rest) = src.strip_prefix("data:") {
        decode_data_uri(rest)?
    } else {
        let path = resolve_path(src, base_dir);
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Md2DocxError::ImageNotFound { path: path.clone() },
            _ => Md2DocxError::from_read(&path, e),
        })?
    };

    let label = image_label(src);
    let (width_px, height_px) = dimensions(&data, &label)?;
    if width_px == 0 || height_px == 0 {
        return Err(Md2DocxError::ImageDecode {
            image: label,
            source: image::ImageError::Limits(image::error::LimitError::from_kind(
                image::error::LimitErrorKind::DimensionError,
            )),
        });
    }
    debug!("Loaded image {} ({}×{} px)", label, width_px, height_px);

    Ok(LoadedImage {
        data,
        width_px,
        height_px,
    })
}

fn resolve_path(src: &str, base_dir: &Path) -> PathBuf {
    let path = Path::new(src);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Decode the part of a data URI after `data:`.
fn decode_data_uri(rest: &str) -> Result<Vec<u8>, Md2DocxError> {
    let (meta, payload) = rest.split_once(',').ok_or_else(|| Md2DocxError::InvalidDataUri {
        detail: "missing ',' separator".to_string(),
    })?;
    if !meta.ends_with(";base64") {
        return Err(Md2DocxError::InvalidDataUri {
            detail: format!("unsupported encoding '{meta}', only base64 is accepted"),
        });
    }
    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| Md2DocxError::InvalidDataUri {
            detail: e.to_string(),
        })
}

fn dimensions(data: &[u8], label: &str) -> Result<(u32, u32), Md2DocxError> {
    let decode_err = |source| Md2DocxError::ImageDecode {
        image: label.to_string(),
        source,
    };
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .into_dimensions()
        .map_err(decode_err)
}

/// Short name for messages; data URIs are not echoed in full.
fn image_label(src: &str) -> String {
    match src.split_once(',') {
        Some((meta, _)) if src.starts_with("data:") => format!("{meta},…"),
        _ => src.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        RgbImage::new(w, h)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn loads_relative_path_against_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fig.png"), png_bytes(30, 20)).unwrap();
        let img = load_image("fig.png", dir.path()).unwrap();
        assert_eq!((img.width_px, img.height_px), (30, 20));
    }

    #[test]
    fn missing_file_is_image_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image("nope.png", dir.path()).unwrap_err();
        assert!(matches!(err, Md2DocxError::ImageNotFound { .. }));
    }

    #[test]
    fn data_uri_is_decoded() {
        let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes(4, 2));
        let src = format!("data:image/png;base64,{b64}");
        let img = load_image(&src, Path::new(".")).unwrap();
        assert_eq!((img.width_px, img.height_px), (4, 2));
    }

    #[test]
    fn non_base64_data_uri_is_rejected() {
        let err = load_image("data:image/svg+xml,<svg/>", Path::new(".")).unwrap_err();
        assert!(matches!(err, Md2DocxError::InvalidDataUri { .. }));
    }

    #[test]
    fn corrupt_payload_is_rejected() {
        let err = load_image("data:image/png;base64,!!!", Path::new(".")).unwrap_err();
        assert!(matches!(err, Md2DocxError::InvalidDataUri { .. }));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.png"), b"not an image").unwrap();
        let err = load_image("bad.png", dir.path()).unwrap_err();
        assert!(matches!(err, Md2DocxError::ImageDecode { .. }));
    }

    #[test]
    fn label_hides_data_payload() {
        assert_eq!(image_label("data:image/png;base64,AAAA"), "data:image/png;base64,…");
        assert_eq!(image_label("a.png"), "a.png");
    }
}
