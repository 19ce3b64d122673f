//! Keypoint recovery from model heatmaps.
//!
//! Each joint's heatmap is reduced to one coordinate:
//! 1. integer argmax of the raw heatmap (masked to the origin when the peak is not positive)
//! 2. Gaussian blur of the heatmap, rescaled to its original peak
//! 3. log of the blurred heatmap, floored away from zero
//! 4. one Newton step on the log heatmap (second-order Taylor expansion)
//!    when the argmax is far enough from the border
//! 5. scaling from heatmap to image pixels

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};

use super::DetectError;
use crate::constants::detector::LOG_FLOOR;
use crate::geometry::Point2;
use crate::transform::Size;

/// Decode `(joints, height, width)` heatmaps into image-space points, one per joint.
pub fn decode_heatmaps(
    heatmaps: ArrayView3<'_, f32>,
    blur_kernel: usize,
    image_size: Size,
) -> Result<Vec<Point2>, DetectError> {
    validate_kernel(blur_kernel)?;
    let (joints, height, width) = heatmaps.dim();
    if height == 0 || width == 0 {
        return Err(DetectError::Shape {
            message: format!("empty heatmap {height}x{width}"),
        });
    }

    let scale_x = f64::from(image_size.width) / to_f64(width);
    let scale_y = f64::from(image_size.height) / to_f64(height);

    let mut points = Vec::with_capacity(joints);
    for joint in heatmaps.axis_iter(Axis(0)) {
        let (coord, _) = argmax(joint);
        let mut blurred = joint.mapv(f64::from);
        gaussian_blur(&mut blurred, blur_kernel);
        blurred.mapv_inplace(|v| v.max(f64::from(LOG_FLOOR)).ln());
        let refined = taylor_refine(blurred.view(), coord);
        points.push(Point2::new(refined.x * scale_x, refined.y * scale_y));
    }
    log::debug!("Decoded {joints} joints from {width}x{height} heatmaps");
    Ok(points)
}

fn validate_kernel(kernel: usize) -> Result<(), DetectError> {
    if kernel < 3 || kernel % 2 == 0 {
        return Err(DetectError::Shape {
            message: format!("blur kernel must be odd and at least 3, got {kernel}"),
        });
    }
    Ok(())
}

fn to_f64(n: usize) -> f64 {
    // Heatmap dimensions are far below 2^32.
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Location `(column, row)` and value of the maximum.
///
/// The first maximum in row-major order wins. A non-positive maximum
/// yields the origin.
pub fn argmax(heatmap: ArrayView2<'_, f32>) -> (Point2, f32) {
    let mut best = (0usize, 0usize, f32::NEG_INFINITY);
    for ((row, col), &value) in heatmap.indexed_iter() {
        if value > best.2 {
            best = (row, col, value);
        }
    }
    let (row, col, max) = best;
    if max > 0.0 {
        (Point2::new(to_f64(col), to_f64(row)), max)
    } else {
        (Point2::default(), max)
    }
}

/// Gaussian kernel weights with OpenCV's default sigma for this size.
fn gaussian_weights(kernel: usize) -> Vec<f64> {
    let sigma = 0.3 * ((to_f64(kernel) - 1.0) * 0.5 - 1.0) + 0.8;
    let center = to_f64(kernel / 2);
    let weights: Vec<f64> = (0..kernel)
        .map(|i| {
            let d = to_f64(i) - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Reflect `i` into `0..n` without repeating the edge sample (`dcb|abcd|cba`).
fn reflect_101(i: isize, n: usize) -> usize {
    let n = isize::try_from(n).unwrap_or(isize::MAX);
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    usize::try_from(i).unwrap_or(0)
}

/// Blur in place with a zero border of half the kernel size, then rescale
/// so the maximum matches the original maximum.
pub fn gaussian_blur(heatmap: &mut Array2<f64>, kernel: usize) {
    let (height, width) = heatmap.dim();
    let border = (kernel - 1) / 2;
    let origin_max = heatmap.fold(f64::NEG_INFINITY, |m, &v| m.max(v));

    let mut padded = Array2::<f64>::zeros((height + 2 * border, width + 2 * border));
    for ((r, c), &v) in heatmap.indexed_iter() {
        padded[[r + border, c + border]] = v;
    }

    let weights = gaussian_weights(kernel);
    let radius = isize::try_from(border).unwrap_or(0);
    let (ph, pw) = padded.dim();

    let mut horizontal = Array2::<f64>::zeros((ph, pw));
    for ((r, c), out) in horizontal.indexed_iter_mut() {
        let c = isize::try_from(c).unwrap_or(0);
        *out = weights
            .iter()
            .zip(-radius..=radius)
            .map(|(w, k)| w * padded[[r, reflect_101(c + k, pw)]])
            .sum();
    }

    for r in 0..height {
        for c in 0..width {
            let pr = isize::try_from(r + border).unwrap_or(0);
            heatmap[[r, c]] = weights
                .iter()
                .zip(-radius..=radius)
                .map(|(w, k)| w * horizontal[[reflect_101(pr + k, ph), c + border]])
                .sum();
        }
    }

    let new_max = heatmap.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    if new_max != 0.0 && new_max.is_finite() && origin_max.is_finite() {
        let factor = origin_max / new_max;
        heatmap.mapv_inplace(|v| v * factor);
    }
}

/// One Newton step from `coord` on a log heatmap.
///
/// Only applied when the integer coordinate is at least two samples away
/// from every edge and the Hessian is invertible.
pub fn taylor_refine(hm: ArrayView2<'_, f64>, coord: Point2) -> Point2 {
    let (height, width) = hm.dim();
    // Coordinates come from argmax, so they are non-negative integers.
    let px = coord.x as usize;
    let py = coord.y as usize;
    if !(1 < px && px + 2 < width && 1 < py && py + 2 < height) {
        return coord;
    }

    let at = |y: usize, x: usize| hm[[y, x]];
    let dx = 0.5 * (at(py, px + 1) - at(py, px - 1));
    let dy = 0.5 * (at(py + 1, px) - at(py - 1, px));
    let dxx = 0.25 * (at(py, px + 2) - 2.0 * at(py, px) + at(py, px - 2));
    let dxy = 0.25 * (at(py + 1, px + 1) - at(py - 1, px + 1) - at(py + 1, px - 1) + at(py - 1, px - 1));
    let dyy = 0.25 * (at(py + 2, px) - 2.0 * at(py, px) + at(py - 2, px));

    let det = dxx * dyy - dxy * dxy;
    if det == 0.0 {
        return coord;
    }
    // offset = -H⁻¹ · ∇
    let offset_x = -(dyy * dx - dxy * dy) / det;
    let offset_y = -(-dxy * dx + dxx * dy) / det;
    Point2::new(coord.x + offset_x, coord.y + offset_y)
}
