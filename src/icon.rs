use eframe::egui;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

/// Full resolution widget icon. Every rescale starts from the original image
/// so repeated resizes do not compound quality loss.
#[derive(Clone)]
pub struct IconSource {
    original: DynamicImage,
}

impl IconSource {
    pub fn from_image(original: DynamicImage) -> Self {
        Self { original }
    }

    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::from_image(image::open(path)?))
    }

    /// Load an optional icon, logging and returning `None` when it cannot be
    /// used so the caller can paint a placeholder instead.
    pub fn load(path: Option<&Path>) -> Option<Self> {
        let path = path?;
        match Self::open(path) {
            Ok(icon) => Some(icon),
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to load icon: {e}");
                None
            }
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.original.width(), self.original.height())
    }

    /// Copy that fits inside `edge` x `edge`, keeping the aspect ratio.
    pub fn scaled(&self, edge: u32) -> image::RgbaImage {
        let edge = edge.max(1);
        self.original
            .resize(edge, edge, FilterType::Lanczos3)
            .to_rgba8()
    }

    pub fn color_image(&self, edge: u32) -> egui::ColorImage {
        let img = self.scaled(edge);
        let size = [img.width() as usize, img.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw())
    }
}
