//! Colors are linear RGB, carried as [Vec3] inside the tracer and as [image::Rgb<f32>]
//! in output images.

use glam::Vec3;
use image::Rgb;
use rand::{distributions::Uniform, prelude::Distribution, Rng};

pub type Color = Rgb<f32>;

pub mod linear {
    use glam::Vec3;

    pub const WHITE: Vec3 = Vec3::ONE;
    pub const BLACK: Vec3 = Vec3::ZERO;
}

pub trait RgbAsVec3Ext {
    fn vec(&self) -> Vec3;
}

impl RgbAsVec3Ext for Color {
    fn vec(&self) -> Vec3 {
        Vec3::from_array(self.0)
    }
}

pub trait Vec3AsRgbExt {
    fn rgb(&self) -> Color;
}

impl Vec3AsRgbExt for Vec3 {
    fn rgb(&self) -> Color {
        Rgb(self.to_array())
    }
}

/// HSV to linear RGB. `h` wraps around, `s` is clamped to [0, 1], `v` is left as is so
/// that it can be used as an intensity.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = h.rem_euclid(1.0) * 6.0;
    let s = s.clamp(0.0, 1.0);

    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u32 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

/// A random color, hue and saturation uniform in [0, 1(, value uniform in `value`
pub fn random_hsv<R: Rng + ?Sized>(rng: &mut R, value: std::ops::Range<f32>) -> Vec3 {
    let unit = Uniform::new(0.0f32, 1.0);
    let h = unit.sample(rng);
    let s = unit.sample(rng);
    let v = Uniform::new(value.start, value.end).sample(rng);
    hsv_to_rgb(h, s, v)
}

/// sRGB transfer function, the input is clamped to [0, 1]
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear.is_nan() {
        return 0.0;
    }
    let linear = linear.clamp(0.0, 1.0);
    if linear < 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Inverse of [linear_to_srgb]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    if srgb.is_nan() {
        return 0.0;
    }
    let srgb = srgb.clamp(0.0, 1.0);
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

pub fn luminance(c: Vec3) -> f32 {
    c.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}
