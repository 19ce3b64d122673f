//! Automatic landmark proposal.
//!
//! A [`LandmarkDetector`] takes a decoded image and returns one source-pixel
//! coordinate per landmark it knows about. The engine only feeds those
//! coordinates into the store (see [`crate::interaction::Annotator::auto_add_points`]).
//!
//! [`HeatmapDetector`] is the stock implementation: it prepares the model
//! input, asks a [`HeatmapModel`] for per-joint heatmaps and decodes them
//! with sub-pixel refinement. The model itself is pluggable; [`NpyHeatmaps`]
//! replays heatmaps that were computed offline and saved as `.npy`.

mod heatmap;
mod npy;

pub use heatmap::{argmax, decode_heatmaps, gaussian_blur, taylor_refine};
pub use npy::NpyHeatmaps;

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array3;
use ndarray_npy::ReadNpyError;
use thiserror::Error;

use crate::constants::detector;
use crate::geometry::Point2;
use crate::transform::Size;

/// Errors from landmark detection.
#[derive(Debug, Error)]
pub enum DetectError {
    /// Heatmaps or kernel parameters have an unusable shape.
    #[error("Invalid heatmap shape: {message}")]
    Shape { message: String },

    #[error("Failed to read heatmaps: {0}")]
    Npy(#[from] ReadNpyError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The heatmap model failed.
    #[error("Model error: {message}")]
    Model { message: String },

    #[error("No image loaded")]
    NoImage,
}

/// Produces source-space landmark coordinates for an image.
pub trait LandmarkDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Point2>, DetectError>;
}

/// A keypoint model producing one heatmap per joint.
pub trait HeatmapModel {
    /// Run the model on a `(3, height, width)` normalised input.
    ///
    /// Returns `(joints, heatmap_height, heatmap_width)`.
    fn predict(&self, input: &Array3<f32>) -> Result<Array3<f32>, DetectError>;
}

/// Detector decoding the heatmaps of a [`HeatmapModel`].
#[derive(Debug, Clone)]
pub struct HeatmapDetector<M> {
    model: M,
    input_size: Size,
    blur_kernel: usize,
}

impl<M: HeatmapModel> HeatmapDetector<M> {
    /// Detector with the default input size and blur kernel.
    pub fn new(model: M) -> Self {
        Self {
            model,
            input_size: Size::new(detector::INPUT_WIDTH, detector::INPUT_HEIGHT),
            blur_kernel: detector::BLUR_KERNEL,
        }
    }

    pub fn with_input_size(mut self, input_size: Size) -> Self {
        self.input_size = input_size;
        self
    }

    /// Odd kernel size, at least 3.
    pub fn with_blur_kernel(mut self, blur_kernel: usize) -> Self {
        self.blur_kernel = blur_kernel;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: HeatmapModel> LandmarkDetector for HeatmapDetector<M> {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Point2>, DetectError> {
        let input = prepare_input(image, self.input_size);
        let heatmaps = self.model.predict(&input)?;
        let image_size = Size::new(image.width(), image.height());
        decode_heatmaps(heatmaps.view(), self.blur_kernel, image_size)
    }
}

/// Resize `image` to the model input and normalise it.
///
/// The result is channels-first `(3, height, width)`. Values are shifted to
/// zero mean, divided by their standard deviation and finally by their
/// maximum. A constant image skips the steps that would divide by zero.
pub fn prepare_input(image: &DynamicImage, size: Size) -> Array3<f32> {
    let resized = image.resize_exact(size.width, size.height, FilterType::Triangle).to_rgb32f();
    let (width, height) = (size.width as usize, size.height as usize);

    let mut input = Array3::<f32>::zeros((3, height, width));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for (channel, &value) in pixel.0.iter().enumerate() {
            input[[channel, y as usize, x as usize]] = value * 255.0;
        }
    }

    // Accumulate in f64 so a constant image has exactly zero spread.
    let count = input.len().max(1) as f64;
    let mean = input.iter().map(|&v| f64::from(v)).sum::<f64>() / count;
    input.mapv_inplace(|v| (f64::from(v) - mean) as f32);

    let std = (input.iter().map(|&v| f64::from(v) * f64::from(v)).sum::<f64>() / count).sqrt();
    if std > 0.0 {
        input.mapv_inplace(|v| (f64::from(v) / std) as f32);
    }

    let max = input.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
    if max > 0.0 {
        input.mapv_inplace(|v| v / max);
    }
    log::debug!("Prepared {}x{} model input (mean {mean}, std {std})", size.width, size.height);
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    struct FixedModel(Array3<f32>);

    impl HeatmapModel for FixedModel {
        fn predict(&self, input: &Array3<f32>) -> Result<Array3<f32>, DetectError> {
            assert_eq!(input.dim(), (3, 64, 32));
            Ok(self.0.clone())
        }
    }

    struct FailingModel;

    impl HeatmapModel for FailingModel {
        fn predict(&self, _input: &Array3<f32>) -> Result<Array3<f32>, DetectError> {
            Err(DetectError::Model {
                message: "offline".to_string(),
            })
        }
    }

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
            Luma([((x + y) * 8).min(255) as u8])
        }))
    }

    #[test]
    fn test_prepare_input_shape_and_range() {
        let input = prepare_input(&gradient_image(20, 10), Size::new(256, 512));
        assert_eq!(input.dim(), (3, 512, 256));
        let max = input.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        let mean = input.sum() / input.len() as f32;
        assert!((max - 1.0).abs() < 1e-5);
        assert!(mean.abs() < 1e-3);
    }

    #[test]
    fn test_prepare_input_constant_image_is_zero() {
        let flat = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([100])));
        let input = prepare_input(&flat, Size::new(4, 4));
        assert!(input.iter().all(|v| v.abs() < 1e-4));
    }

    #[test]
    fn test_detector_scales_to_image() {
        let mut heatmaps = Array3::<f32>::zeros((2, 16, 8));
        heatmaps[[0, 4, 2]] = 1.0;
        let detector = HeatmapDetector::new(FixedModel(heatmaps)).with_input_size(Size::new(32, 64));

        let points = detector.detect(&gradient_image(80, 160)).unwrap();
        assert_eq!(points.len(), 2);
        // A symmetric peak needs no sub-pixel shift.
        assert!((points[0].x - 20.0).abs() < 1e-9);
        assert!((points[0].y - 40.0).abs() < 1e-9);
        assert_eq!(points[1], Point2::default());
    }

    #[test]
    fn test_model_error_propagates() {
        let detector = HeatmapDetector::new(FailingModel);
        let err = detector.detect(&gradient_image(4, 4)).unwrap_err();
        assert!(matches!(err, DetectError::Model { .. }));
    }
}
