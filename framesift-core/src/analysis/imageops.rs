//! Pixel-level primitives shared by the differencer and the motion detector.
//!
//! These follow the 8-bit conventions of the common computer-vision
//! toolchains so that thresholds tuned there carry over:
//! - grayscale uses BT.601 weights in 14-bit fixed point
//! - Gaussian sigma is derived from the kernel size when not given
//! - hue is stored halved (0..180) so it fits a byte
//!
//! Filtering, thresholding and morphology are delegated to `imageproc`.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::distance_transform::Norm;
use imageproc::filter::separable_filter_equal;
use imageproc::map::map_colors2;
use imageproc::morphology;

/// Converts an RGB image to 8-bit luma.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    let data: Vec<u8> = image
        .as_raw()
        .chunks_exact(3)
        .map(|px| {
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            ((r * 4899 + g * 9617 + b * 1868 + (1 << 13)) >> 14) as u8
        })
        .collect();
    // Length is width*height by construction.
    GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}

/// Sigma used for a Gaussian kernel of `ksize` when none is given.
pub fn default_sigma(ksize: usize) -> f64 {
    0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalised 1-D Gaussian kernel of odd length `ksize`.
pub fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    let sigma = default_sigma(ksize);
    let radius = (ksize / 2) as isize;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (-radius..=radius)
        .map(|x| (scale * (x * x) as f64).exp())
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Separable Gaussian blur with a square `ksize` kernel. Borders replicate
/// the edge pixel.
pub fn gaussian_blur(image: &GrayImage, ksize: usize) -> GrayImage {
    let (width, height) = image.dimensions();
    if ksize <= 1 || width == 0 || height == 0 {
        return image.clone();
    }
    separable_filter_equal(image, &gaussian_kernel(ksize))
}

/// Pixel-wise `|a - b|`. Both images must share dimensions.
pub fn abs_diff(a: &GrayImage, b: &GrayImage) -> GrayImage {
    map_colors2(a, b, |Luma([x]), Luma([y])| Luma([x.abs_diff(y)]))
}

/// Mean intensity over all pixels; 0 for an empty image.
pub fn mean(image: &GrayImage) -> f64 {
    let raw = image.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| v as u64).sum();
    sum as f64 / raw.len() as f64
}

/// Mean absolute difference between two grayscale images.
pub fn mean_abs_diff(a: &GrayImage, b: &GrayImage) -> f64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let len = a.as_raw().len();
    if len == 0 {
        return 0.0;
    }
    let sum: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| x.abs_diff(y) as u64)
        .sum();
    sum as f64 / len as f64
}

/// Pixels strictly above `cutoff` become 255, the rest 0.
pub fn threshold_binary(image: &GrayImage, cutoff: u8) -> GrayImage {
    threshold(image, cutoff, ThresholdType::Binary)
}

/// Dilates a binary mask with a 3x3 square, `iterations` times. Pixels
/// outside the image count as background.
pub fn dilate(mask: &GrayImage, iterations: usize) -> GrayImage {
    // Repeated 3x3 dilation reaches exactly the L-infinity ball of that radius.
    let radius = u8::try_from(iterations).unwrap_or(u8::MAX);
    morphology::dilate(mask, Norm::LInf, radius)
}

/// Number of non-zero pixels.
pub fn count_nonzero(image: &GrayImage) -> u64 {
    image.as_raw().iter().filter(|&&v| v != 0).count() as u64
}

/// Converts one RGB pixel to 8-bit HSV with hue halved into `0..180`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let v = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = v - min;

    let s = if v > 0.0 { delta * 255.0 / v } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if v == rf {
        60.0 * (gf - bf) / delta
    } else if v == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h8 = (h / 2.0).round() as u32 % 180;
    (h8 as u8, s.round().clamp(0.0, 255.0) as u8, v as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gray(width: u32, height: u32, values: &[u8]) -> GrayImage {
        GrayImage::from_raw(width, height, values.to_vec()).unwrap()
    }

    #[test]
    fn test_grayscale_weights() {
        let mut image = RgbImage::new(3, 1);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));
        image.put_pixel(2, 0, Rgb([255, 255, 255]));
        let g = to_grayscale(&image);
        assert_eq!(g.as_raw(), &vec![76, 150, 255]);
    }

    #[test]
    fn test_kernel_is_normalised_and_symmetric() {
        let kernel = gaussian_kernel(21);
        assert_eq!(kernel.len(), 21);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(kernel[0], kernel[20]);
        assert!(kernel[10] > kernel[9]);
        assert!((default_sigma(21) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_blur_keeps_uniform_images_uniform() {
        let image = GrayImage::from_pixel(40, 30, Luma([77]));
        let blurred = gaussian_blur(&image, 21);
        // Float weights may lose a unit to truncation, never more than one per pass.
        assert!(blurred.pixels().all(|p| p.0[0].abs_diff(77) <= 2));
        let first = blurred.get_pixel(0, 0).0[0];
        assert!(blurred.pixels().all(|p| p.0[0] == first));
    }

    #[test]
    fn test_blur_handles_images_smaller_than_kernel() {
        let image = gray(3, 3, &[0, 0, 0, 0, 255, 0, 0, 0, 0]);
        let blurred = gaussian_blur(&image, 21);
        assert_eq!(blurred.dimensions(), (3, 3));
        // Energy spreads out from the centre.
        assert!(blurred.get_pixel(1, 1).0[0] < 255);
        assert!(blurred.get_pixel(0, 0).0[0] > 0);
    }

    #[test]
    fn test_blur_with_trivial_kernel_is_identity() {
        let image = gray(2, 2, &[1, 2, 3, 4]);
        assert_eq!(gaussian_blur(&image, 1), image);
    }

    #[test]
    fn test_threshold_is_strict() {
        let image = gray(3, 1, &[25, 26, 200]);
        let mask = threshold_binary(&image, 25);
        assert_eq!(mask.as_raw(), &vec![0, 255, 255]);
    }

    #[test]
    fn test_dilate_grows_single_pixel() {
        let mut image = GrayImage::new(7, 7);
        image.put_pixel(3, 3, Luma([255]));

        assert_eq!(count_nonzero(&dilate(&image, 1)), 9);
        assert_eq!(count_nonzero(&dilate(&image, 2)), 25);
        assert_eq!(count_nonzero(&dilate(&image, 0)), 1);
    }

    #[test]
    fn test_dilate_at_corner_stays_in_bounds() {
        let mut image = GrayImage::new(4, 4);
        image.put_pixel(0, 0, Luma([255]));
        assert_eq!(count_nonzero(&dilate(&image, 1)), 4);
    }

    #[test]
    fn test_mean_and_mean_abs_diff() {
        let a = gray(2, 2, &[0, 10, 20, 30]);
        let b = gray(2, 2, &[10, 10, 0, 40]);
        assert_eq!(mean(&a), 15.0);
        assert_eq!(mean_abs_diff(&a, &b), 10.0);
        assert_eq!(abs_diff(&a, &b).as_raw(), &vec![10, 0, 20, 10]);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(rgb_to_hsv(255, 0, 0), (0, 255, 255));
        assert_eq!(rgb_to_hsv(0, 255, 0), (60, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), (120, 255, 255));
        assert_eq!(rgb_to_hsv(128, 128, 128), (0, 0, 128));
        assert_eq!(rgb_to_hsv(0, 0, 0), (0, 0, 0));
    }
}
