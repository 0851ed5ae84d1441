//! Environment seen by rays escaping the scene.

use std::path::Path;

use glam::Vec3;
use image::{DynamicImage, Rgb32FImage};

use crate::{
    color::{srgb_to_linear, RgbAsVec3Ext, Vec3AsRgbExt},
    math::distributions::equirect_uv_from_direction,
    Result,
};

/// An equirectangular linear RGB image
#[derive(Debug, Clone)]
pub struct Skybox {
    image: Rgb32FImage,
}

impl Default for Skybox {
    fn default() -> Self {
        Self::gradient(
            Vec3::new(0.25, 0.22, 0.2),
            Vec3::new(0.9, 0.95, 1.0),
            Vec3::new(0.3, 0.5, 0.9),
            64,
        )
    }
}

impl Skybox {
    pub fn uniform(color: Vec3) -> Self {
        Self {
            image: Rgb32FImage::from_pixel(1, 1, color.rgb()),
        }
    }

    /// Vertical gradient from `horizon` to `zenith`, the lower hemisphere is `ground`
    pub fn gradient(ground: Vec3, horizon: Vec3, zenith: Vec3, height: u32) -> Self {
        let height = height.max(2);
        let image = Rgb32FImage::from_fn(1, height, |_, y| {
            // Row 0 is straight up
            let elevation = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;
            if elevation < 0.0 {
                ground.rgb()
            } else {
                horizon.lerp(zenith, elevation).rgb()
            }
        });
        Self { image }
    }

    pub fn from_image(image: DynamicImage) -> Self {
        let image = match image {
            // Float images are already linear
            DynamicImage::ImageRgb32F(image) => image,
            image @ DynamicImage::ImageRgba32F(_) => image.into_rgb32f(),
            image => {
                let mut image = image.into_rgb32f();
                for pixel in image.pixels_mut() {
                    pixel.0 = pixel.0.map(srgb_to_linear);
                }
                image
            }
        };
        Self { image }
    }

    /// Loads an HDR, EXR or 8 bit image. 8 and 16 bit images are assumed to be sRGB encoded
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let skybox = Self::from_image(image::open(path)?);
        log::info!(
            "loaded skybox {} ({}x{})",
            path.display(),
            skybox.image.width(),
            skybox.image.height()
        );
        Ok(skybox)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Nearest texel, wrapping on both axes
    pub fn sample(&self, direction: Vec3) -> Vec3 {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Vec3::ZERO;
        }

        let uv = equirect_uv_from_direction(direction);
        // v grows upward, rows grow downward
        let x = ((uv.x * width as f32).floor() as i64).rem_euclid(width as i64);
        let y = (((1.0 - uv.y) * height as f32).floor() as i64).rem_euclid(height as i64);

        self.image.get_pixel(x as u32, y as u32).vec()
    }
}
