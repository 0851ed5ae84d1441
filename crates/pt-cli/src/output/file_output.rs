use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{Rgb, Rgb32FImage, RgbImage};
use pt::color::linear_to_srgb;

use super::FinalOutput;

/// Writes `color.exr` (linear) and `color.png` (sRGB) into `outdir`
pub struct FileOutput {
    pub outdir: PathBuf,
}

impl FileOutput {
    pub fn new(outdir: impl Into<PathBuf>) -> Self {
        Self {
            outdir: outdir.into(),
        }
    }
}

/// Tone maps nothing: values are clamped then sRGB encoded
pub fn to_ldr(color: &Rgb32FImage) -> RgbImage {
    RgbImage::from_fn(color.width(), color.height(), |x, y| {
        let Rgb(c) = *color.get_pixel(x, y);
        Rgb(c.map(|v| (linear_to_srgb(v) * 255.0).round() as u8))
    })
}

impl FinalOutput for FileOutput {
    fn commit(&self, color: &Rgb32FImage) -> Result<()> {
        std::fs::create_dir_all(&self.outdir)
            .with_context(|| format!("creating {}", self.outdir.display()))?;

        let path = self.outdir.join("color.exr");
        log::info!("saving HDR image to {}", path.display());
        color
            .save(&path)
            .with_context(|| format!("saving {}", path.display()))?;

        let path = self.outdir.join("color.png");
        log::info!("saving LDR image to {}", path.display());
        to_ldr(color)
            .save(&path)
            .with_context(|| format!("saving {}", path.display()))?;

        Ok(())
    }
}
