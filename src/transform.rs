//! Source/view coordinate mapping.
//!
//! The source image is shown scaled into the viewport at the current zoom
//! level. Point coordinates live in view space, so whenever the view bitmap
//! changes size the stored points must be scaled once by the ratio of new
//! to old view width. That ratio is held here until
//! [`ViewTransform::take_rescale`] consumes it.

use crate::config::EngineConfig;
use crate::constants::zoom;
use crate::geometry::Point2;

/// Integer pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Both dimensions scaled by `percent / 100`, rounded down.
    pub fn scaled_percent(&self, percent: u32) -> Size {
        Size::new(mul_div(self.width, percent, 100), mul_div(self.height, percent, 100))
    }

    /// The largest size with this aspect ratio that fits inside `target`.
    ///
    /// Integer arithmetic, rounding down. Never smaller than 1×1.
    pub fn fit_within(&self, target: Size) -> Size {
        if self.is_empty() || target.is_empty() {
            return Size::new(1, 1);
        }
        let rw = mul_div(target.height, self.width, self.height);
        let fitted = if rw <= target.width {
            Size::new(rw, target.height)
        } else {
            Size::new(target.width, mul_div(target.width, self.height, self.width))
        };
        Size::new(fitted.width.max(1), fitted.height.max(1))
    }
}

/// `a * b / c` without intermediate overflow.
fn mul_div(a: u32, b: u32, c: u32) -> u32 {
    let value = u64::from(a) * u64::from(b) / u64::from(c.max(1));
    u32::try_from(value).unwrap_or(u32::MAX)
}

// ============================================================================
// View Transform
// ============================================================================

/// Mapping between source pixels and the displayed view bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    source: Size,
    viewport: Size,
    view: Size,
    zoom_percent: u32,
    zoom_min_percent: u32,
    zoom_max_percent: u32,
    zoom_step_percent: u32,
    /// New view width over previous view width, pending until consumed.
    scale_from_previous_view: f64,
    /// Source width over view width.
    scale_view_to_source: f64,
}

impl ViewTransform {
    /// Fit `source` into `viewport` at 100% zoom.
    pub fn new(source: Size, viewport: Size, config: &EngineConfig) -> Self {
        let mut transform = Self {
            source,
            viewport,
            view: source,
            zoom_percent: zoom::DEFAULT_PERCENT,
            zoom_min_percent: config.zoom_min_percent,
            zoom_max_percent: config.zoom_max_percent,
            zoom_step_percent: config.zoom_step_percent,
            scale_from_previous_view: 1.0,
            scale_view_to_source: 1.0,
        };
        transform.zoom_percent = transform.clamp_zoom(zoom::DEFAULT_PERCENT);
        transform.view = transform.fitted_view();
        transform.scale_view_to_source = transform.ratio_to_source();
        transform
    }

    pub fn source_size(&self) -> Size {
        self.source
    }

    pub fn view_size(&self) -> Size {
        self.view
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn zoom_percent(&self) -> u32 {
        self.zoom_percent
    }

    pub fn scale_view_to_source(&self) -> f64 {
        self.scale_view_to_source
    }

    /// Pending rescale factor not yet applied to the stored points.
    pub fn scale_from_previous_view(&self) -> f64 {
        self.scale_from_previous_view
    }

    // ========================================================================
    // Resizing
    // ========================================================================

    /// The viewport changed size.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.refit();
    }

    /// Zoom in by one step, capped at the maximum. Returns the new percent.
    pub fn zoom_in(&mut self) -> u32 {
        let percent = self.zoom_percent.saturating_add(self.zoom_step_percent);
        self.set_zoom_percent(percent)
    }

    /// Zoom out by one step, floored at the minimum. Returns the new percent.
    pub fn zoom_out(&mut self) -> u32 {
        let percent = self.zoom_percent.saturating_sub(self.zoom_step_percent);
        self.set_zoom_percent(percent)
    }

    pub fn reset_zoom(&mut self) -> u32 {
        self.set_zoom_percent(zoom::DEFAULT_PERCENT)
    }

    /// Set the zoom level, clamped to the configured range.
    pub fn set_zoom_percent(&mut self, percent: u32) -> u32 {
        let percent = self.clamp_zoom(percent);
        if percent != self.zoom_percent {
            self.zoom_percent = percent;
            self.refit();
        }
        self.zoom_percent
    }

    /// Take the pending point rescale factor, if any.
    ///
    /// Returns `None` when nothing changed since the last call, so the
    /// factor is applied to the points at most once.
    pub fn take_rescale(&mut self) -> Option<f64> {
        let factor = std::mem::replace(&mut self.scale_from_previous_view, 1.0);
        if factor == 1.0 { None } else { Some(factor) }
    }

    fn clamp_zoom(&self, percent: u32) -> u32 {
        let min = self.zoom_min_percent.min(self.zoom_max_percent);
        percent.clamp(min, self.zoom_max_percent)
    }

    fn fitted_view(&self) -> Size {
        self.source.fit_within(self.viewport.scaled_percent(self.zoom_percent))
    }

    fn ratio_to_source(&self) -> f64 {
        f64::from(self.source.width) / f64::from(self.view.width)
    }

    fn refit(&mut self) {
        let old = self.view;
        self.view = self.fitted_view();
        if self.view != old {
            self.scale_from_previous_view *= f64::from(self.view.width) / f64::from(old.width);
            self.scale_view_to_source = self.ratio_to_source();
            log::debug!(
                "View resized {}x{} -> {}x{} (zoom {}%)",
                old.width,
                old.height,
                self.view.width,
                self.view.height,
                self.zoom_percent
            );
        }
    }

    // ========================================================================
    // Mapping
    // ========================================================================

    pub fn to_source(&self, view_point: Point2) -> Point2 {
        view_point.scaled(self.scale_view_to_source)
    }

    pub fn to_view(&self, source_point: Point2) -> Point2 {
        Point2::new(
            source_point.x / self.scale_view_to_source,
            source_point.y / self.scale_view_to_source,
        )
    }

    /// Whether a view point is within `point_width / 2` of any edge.
    pub fn is_out_of_bounds(&self, point: Point2, point_width: f64) -> bool {
        let half = point_width / 2.0;
        let width = f64::from(self.view.width);
        let height = f64::from(self.view.height);
        point.x < half || point.x > width - half || point.y < half || point.y > height - half
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn transform(source: Size, viewport: Size) -> ViewTransform {
        ViewTransform::new(source, viewport, &EngineConfig::default())
    }

    #[test]
    fn test_fit_within_height_bound() {
        // 1000x500 into 400x400: rw = 400*1000/500 = 800 > 400 -> width-bound
        assert_eq!(Size::new(1000, 500).fit_within(Size::new(400, 400)), Size::new(400, 200));
        // 500x1000 into 400x400: rw = 200 <= 400 -> height-bound
        assert_eq!(Size::new(500, 1000).fit_within(Size::new(400, 400)), Size::new(200, 400));
    }

    #[test]
    fn test_fit_within_rounds_down() {
        assert_eq!(Size::new(3, 7).fit_within(Size::new(100, 100)), Size::new(42, 100));
    }

    #[test]
    fn test_fit_within_never_empty() {
        assert_eq!(Size::new(100, 1).fit_within(Size::new(10, 10)), Size::new(10, 1));
        assert_eq!(Size::new(10000, 1).fit_within(Size::new(10, 10)), Size::new(10, 1));
        assert_eq!(Size::new(10, 10).fit_within(Size::new(0, 0)), Size::new(1, 1));
    }

    #[test]
    fn test_initial_scales() {
        let t = transform(Size::new(2000, 1000), Size::new(1000, 1000));
        assert_eq!(t.view_size(), Size::new(1000, 500));
        assert!(approx_eq(t.scale_view_to_source(), 2.0));
        assert!(approx_eq(t.scale_from_previous_view(), 1.0));
    }

    #[test]
    fn test_to_source_and_back() {
        let t = transform(Size::new(2000, 1000), Size::new(1000, 1000));
        let src = t.to_source(Point2::new(10.0, 10.0));
        assert_eq!(src, Point2::new(20.0, 20.0));
        assert_eq!(t.to_view(src), Point2::new(10.0, 10.0));
    }

    #[test]
    fn test_rescale_is_consumed_once() {
        let mut t = transform(Size::new(2000, 1000), Size::new(1000, 1000));
        t.resize(Size::new(1500, 1500));
        assert_eq!(t.view_size(), Size::new(1500, 750));
        assert_eq!(t.take_rescale(), Some(1.5));
        assert_eq!(t.take_rescale(), None);
        assert!(approx_eq(t.scale_view_to_source(), 2000.0 / 1500.0));
    }

    #[test]
    fn test_rescale_accumulates_until_taken() {
        let mut t = transform(Size::new(1000, 1000), Size::new(1000, 1000));
        t.resize(Size::new(500, 500));
        t.resize(Size::new(250, 250));
        assert_eq!(t.take_rescale(), Some(0.25));
    }

    #[test]
    fn test_unchanged_view_has_no_rescale() {
        let mut t = transform(Size::new(1000, 500), Size::new(800, 800));
        t.resize(Size::new(800, 900));
        assert_eq!(t.view_size(), Size::new(800, 400));
        assert_eq!(t.take_rescale(), None);
    }

    #[test]
    fn test_zoom_steps_and_limits() {
        let mut t = transform(Size::new(1000, 1000), Size::new(100, 100));
        assert_eq!(t.zoom_in(), 110);
        assert_eq!(t.view_size(), Size::new(110, 110));
        for _ in 0..20 {
            t.zoom_in();
        }
        assert_eq!(t.zoom_percent(), 200);
        for _ in 0..20 {
            t.zoom_out();
        }
        assert_eq!(t.zoom_percent(), 50);
        assert_eq!(t.view_size(), Size::new(50, 50));
        assert_eq!(t.reset_zoom(), 100);
        assert_eq!(t.set_zoom_percent(999), 200);
    }

    #[test]
    fn test_zoom_triggers_rescale() {
        let mut t = transform(Size::new(1000, 1000), Size::new(100, 100));
        t.set_zoom_percent(200);
        assert_eq!(t.take_rescale(), Some(2.0));
    }

    #[test]
    fn test_out_of_bounds_margin() {
        let t = transform(Size::new(100, 100), Size::new(100, 100));
        assert!(!t.is_out_of_bounds(Point2::new(50.0, 50.0), 7.0));
        assert!(!t.is_out_of_bounds(Point2::new(3.5, 96.5), 7.0));
        assert!(t.is_out_of_bounds(Point2::new(3.0, 50.0), 7.0));
        assert!(t.is_out_of_bounds(Point2::new(50.0, 97.0), 7.0));
    }
}
