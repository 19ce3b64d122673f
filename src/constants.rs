//! Global constants for the medmark engine.

/// Floor applied to every distance so coincident points never divide by zero.
pub const DEFAULT_EPS: f64 = 1e-5;

/// Large constant K used to build far-away helper points along a ray.
pub const DEFAULT_BASE: f64 = 128.0;

/// Angle label radius as a fraction of the shorter arm.
pub const DEFAULT_RATIO_TO_RADIUS: f64 = 0.2;

/// Dot diameter in view pixels; also the hit-test radius.
pub const DEFAULT_POINT_WIDTH: f64 = 7.0;

/// Stroke width for lines and circles.
pub const DEFAULT_LINE_WIDTH: f64 = 3.0;

/// Stroke width for angle arcs.
pub const DEFAULT_ANGLE_WIDTH: f64 = 2.0;

/// Label font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Zoom limits and step, in percent of the fitted view.
pub mod zoom {
    pub const MIN_PERCENT: u32 = 50;
    pub const MAX_PERCENT: u32 = 200;
    pub const STEP_PERCENT: u32 = 10;
    pub const DEFAULT_PERCENT: u32 = 100;
}

/// Keypoint detector defaults.
pub mod detector {
    /// Model input width in pixels.
    pub const INPUT_WIDTH: u32 = 256;
    /// Model input height in pixels.
    pub const INPUT_HEIGHT: u32 = 512;
    /// Gaussian kernel size used before sub-pixel refinement.
    pub const BLUR_KERNEL: usize = 11;
    /// Floor applied to heatmaps before taking the logarithm.
    pub const LOG_FLOOR: f32 = 1e-10;
}
