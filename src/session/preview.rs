use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

/// Longest edge of a generated preview thumbnail.
pub const PREVIEW_EDGE: u32 = 160;

/// A locally chosen image file awaiting upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub contents: Arc<[u8]>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, contents))
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// Decoded thumbnail owned by the session for the current selection.
///
/// Dropped whenever the selection changes or the session goes away.
#[derive(Debug)]
pub struct Preview {
    source_name: String,
    thumbnail: RgbaImage,
}

impl Preview {
    /// Decode the file as an image; `None` when the bytes are not one.
    pub fn generate(file: &SelectedFile) -> Option<Self> {
        match image::load_from_memory(&file.contents) {
            Ok(decoded) => Some(Self {
                source_name: file.name.clone(),
                thumbnail: decoded.thumbnail(PREVIEW_EDGE, PREVIEW_EDGE).to_rgba8(),
            }),
            Err(err) => {
                tracing::debug!("No preview for {}: {err}", file.name);
                None
            }
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.thumbnail.dimensions()
    }
}

#[cfg(test)]
pub(crate) mod test_images {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    /// Encode a solid PNG of the given size.
    pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([40, 90, 200, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }
}
