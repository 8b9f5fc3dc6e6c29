//! Source raster sampling for export.
//!
//! Sample positions are in source pixel space with pixel centres at
//! `i + 0.5`. Neighbours beyond the border are clamped to the edge so that
//! the outermost rows and columns of a photo are never darkened.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// Interpolation filter used when drawing photos onto the export canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Nearest source pixel. Fastest, mainly for tests and drafts.
    Nearest,
    /// Bilinear interpolation of the 4 nearest pixels.
    #[default]
    Bilinear,
    /// Lanczos3 over a 6x6 neighbourhood. Sharpest, slowest.
    Lanczos3,
}

impl InterpolationFilter {
    /// Sample `image` at normalised position `(u, v)`, both in `[0, 1)`.
    #[inline]
    pub(crate) fn sample(self, image: &DecodedImage, u: f64, v: f64) -> [u8; 3] {
        let x = u * image.width as f64 - 0.5;
        let y = v * image.height as f64 - 0.5;
        match self {
            InterpolationFilter::Nearest => sample_nearest(image, x, y),
            InterpolationFilter::Bilinear => sample_bilinear(image, x, y),
            InterpolationFilter::Lanczos3 => sample_lanczos3(image, x, y),
        }
    }
}

#[inline]
fn clamp_index(v: i64, len: u32) -> u32 {
    v.clamp(0, len as i64 - 1) as u32
}

#[inline]
fn pixel_f64(image: &DecodedImage, x: i64, y: i64) -> [f64; 3] {
    let p = image.pixel(clamp_index(x, image.width), clamp_index(y, image.height));
    [p[0] as f64, p[1] as f64, p[2] as f64]
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let px = clamp_index(x.round() as i64, image.width);
    let py = clamp_index(y.round() as i64, image.height);
    image.pixel(px, py)
}

fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = pixel_f64(image, x0, y0);
    let p10 = pixel_f64(image, x0 + 1, y0);
    let p01 = pixel_f64(image, x0, y0 + 1);
    let p11 = pixel_f64(image, x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}

fn sample_lanczos3(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 3];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);

            let pixel = pixel_f64(image, px, py);
            sum[0] += pixel[0] * weight;
            sum[1] += pixel[1] * weight;
            sum[2] += pixel[2] * weight;
            weight_sum += weight;
        }
    }

    if weight_sum.abs() < f64::EPSILON {
        return sample_bilinear(image, x, y);
    }

    let mut result = [0u8; 3];
    for i in 0..3 {
        result[i] = (sum[i] / weight_sum).clamp(0.0, 255.0).round() as u8;
    }
    result
}

/// `sinc(x) * sinc(x / a)` for `|x| < a`, zero elsewhere.
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
