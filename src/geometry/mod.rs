//! Plane geometry over annotation coordinates.
//!
//! Every function here is pure. The few that depend on tuning constants
//! (ε, the large probe distance `K`, the label radius ratio) live on
//! [`Kernel`], which is built once from an [`EngineConfig`].

pub mod labels;

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

// ============================================================================
// Core Geometry Types
// ============================================================================

/// A 2D point, in view or source pixels depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f64) -> Point2 {
        self.scaled(rhs)
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanned by two opposite corners.
    pub fn from_corners(p1: Point2, p2: Point2) -> Self {
        Self::new(
            p1.x.min(p2.x),
            p1.y.min(p2.y),
            (p1.x - p2.x).abs(),
            (p1.y - p2.y).abs(),
        )
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

// ============================================================================
// Kernel
// ============================================================================

/// Geometry functions parameterised by the engine's numeric constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    eps: f64,
    base: f64,
    ratio_to_radius: f64,
}

impl Kernel {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            eps: config.eps,
            base: config.base,
            ratio_to_radius: config.ratio_to_radius,
        }
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Euclidean distance, never smaller than ε.
    pub fn distance(&self, a: Point2, b: Point2) -> f64 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        let d = (dx * dx + dy * dy).sqrt();
        if d > self.eps { d } else { self.eps }
    }

    pub fn midpoint(&self, a: Point2, b: Point2) -> Point2 {
        Point2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }

    /// The point on ray A→B at distance `d` from A.
    ///
    /// Coincident A and B give a meaningless result; callers guard.
    pub fn point_at_distance(&self, a: Point2, b: Point2, d: f64) -> Point2 {
        let ratio = d / self.distance(a, b);
        Point2::new(a.x + (b.x - a.x) * ratio, a.y + (b.y - a.y) * ratio)
    }

    /// Projection of C onto the infinite line AB.
    ///
    /// The line is taken as `a·x + b·y + c = 0`; A = B divides by zero.
    pub fn foot_of_perpendicular(&self, a: Point2, b: Point2, c: Point2) -> Point2 {
        let la = a.y - b.y;
        let lb = b.x - a.x;
        let lc = -la * a.x - lb * a.y;
        let norm = la * la + lb * lb;
        Point2::new(
            (lb * lb * c.x - la * lb * c.y - la * lc) / norm,
            (la * la * c.y - la * lb * c.x - lb * lc) / norm,
        )
    }

    /// BA · BC
    pub fn dot(&self, a: Point2, b: Point2, c: Point2) -> f64 {
        let ba = a - b;
        let bc = c - b;
        ba.x * bc.x + ba.y * bc.y
    }

    /// BA × BC
    pub fn cross(&self, a: Point2, b: Point2, c: Point2) -> f64 {
        let ba = a - b;
        let bc = c - b;
        ba.x * bc.y - bc.x * ba.y
    }

    /// Angle ABC in degrees, in `[0, 180]`.
    pub fn angle_degrees(&self, a: Point2, b: Point2, c: Point2) -> f64 {
        let ratio = self.dot(a, b, c) / self.distance(b, a) / self.distance(b, c);
        ratio.clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Start angle, in degrees counter-clockwise from east, of the arc drawn
    /// for ∠ABC. The sweep is [`Kernel::angle_degrees`].
    ///
    /// The arc starts from whichever arm keeps the sweep counter-clockwise
    /// on screen (y grows downwards).
    pub fn arc_start_degree(&self, a: Point2, b: Point2, c: Point2) -> f64 {
        let d = if self.cross(a, b, c) > 0.0 { c } else { a };
        let east = Point2::new(b.x + self.base, b.y);
        let deg = self.angle_degrees(d, b, east);
        if d.y > b.y { 360.0 - deg } else { deg }
    }

    /// `min(|BA|, |BC|) · ratio_to_radius`
    pub fn label_radius(&self, a: Point2, b: Point2, c: Point2) -> f64 {
        self.distance(b, a).min(self.distance(b, c)) * self.ratio_to_radius
    }

    /// Point on the bisector of ∠ABC at the label radius from B.
    pub fn arc_midpoint(&self, a: Point2, b: Point2, c: Point2) -> Point2 {
        let far_a = self.point_at_distance(b, a, self.base);
        let far_c = self.point_at_distance(b, c, self.base);
        let bisector = self.midpoint(far_a, far_c);
        self.point_at_distance(b, bisector, self.label_radius(a, b, c))
    }

    /// Opposite corners `B ± r` of the square bounding the angle arc.
    pub fn diag_points(&self, a: Point2, b: Point2, c: Point2) -> (Point2, Point2) {
        let r = self.label_radius(a, b, c);
        (Point2::new(b.x - r, b.y - r), Point2::new(b.x + r, b.y + r))
    }

    /// Square bounding the circle centred at A through B.
    pub fn circle_bounds(&self, center: Point2, rim: Point2) -> Rect {
        let r = self.distance(center, rim);
        Rect::new(center.x - r, center.y - r, 2.0 * r, 2.0 * r)
    }

    pub fn is_collinear(&self, a: Point2, b: Point2, c: Point2) -> bool {
        ((a.x - c.x) * (a.y - b.y) - (a.x - b.x) * (a.y - c.y)).abs() < self.eps
    }

    /// Whether C lies between A and B. Only the x extent is compared.
    pub fn is_between(&self, a: Point2, b: Point2, c: Point2) -> bool {
        a.x.min(b.x) < c.x + self.eps && c.x < a.x.max(b.x) + self.eps
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-4;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn test_distance_floor_is_exact_eps() {
        let k = Kernel::default();
        assert_eq!(k.distance(p(3.0, 4.0), p(3.0, 4.0)), k.eps());
        assert!(approx_eq(k.distance(p(0.0, 0.0), p(3.0, 4.0)), 5.0));
    }

    #[test]
    fn test_point_at_distance() {
        let k = Kernel::default();
        let q = k.point_at_distance(p(0.0, 0.0), p(10.0, 0.0), 4.0);
        assert!(approx_eq(q.x, 4.0));
        assert!(approx_eq(q.y, 0.0));
    }

    #[test]
    fn test_right_angle() {
        let k = Kernel::default();
        let deg = k.angle_degrees(p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0));
        assert!(approx_eq(deg, 90.0));
    }

    #[test]
    fn test_straight_angle_is_clamped() {
        let k = Kernel::default();
        let deg = k.angle_degrees(p(-1e9, 0.0), p(0.0, 0.0), p(1e9, 0.0));
        assert!(approx_eq(deg, 180.0));
        assert!(!deg.is_nan());
    }

    #[test]
    fn test_foot_of_perpendicular() {
        let k = Kernel::default();
        let d = k.foot_of_perpendicular(p(0.0, 0.0), p(10.0, 0.0), p(3.0, 7.0));
        assert!(approx_eq(d.x, 3.0));
        assert!(approx_eq(d.y, 0.0));

        let d = k.foot_of_perpendicular(p(0.0, 0.0), p(10.0, 10.0), p(10.0, 0.0));
        assert!(approx_eq(d.x, 5.0));
        assert!(approx_eq(d.y, 5.0));
    }

    #[test]
    fn test_arc_start_degree() {
        let k = Kernel::default();
        // A east of B, C above B on screen: cross < 0, start from A at 0°
        let start = k.arc_start_degree(p(10.0, 0.0), p(0.0, 0.0), p(0.0, -10.0));
        assert!(approx_eq(start, 0.0));
        // Mirror: C below B, cross > 0, start from C, measured below B
        let start = k.arc_start_degree(p(10.0, 0.0), p(0.0, 0.0), p(0.0, 10.0));
        assert!(approx_eq(start, 270.0));
    }

    #[test]
    fn test_arc_midpoint_on_bisector() {
        let k = Kernel::default();
        let m = k.arc_midpoint(p(10.0, 0.0), p(0.0, 0.0), p(0.0, -10.0));
        // radius = 10 * 0.2 = 2, bisector at -45°
        let r = 2.0 / 2f64.sqrt();
        assert!(approx_eq(m.x, r));
        assert!(approx_eq(m.y, -r));
    }

    #[test]
    fn test_diag_points_and_circle_bounds() {
        let k = Kernel::default();
        let (tl, br) = k.diag_points(p(20.0, 0.0), p(0.0, 0.0), p(0.0, 10.0));
        assert_eq!((tl, br), (p(-2.0, -2.0), p(2.0, 2.0)));

        let bounds = k.circle_bounds(p(5.0, 5.0), p(8.0, 9.0));
        assert_eq!(bounds, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_collinear() {
        let k = Kernel::default();
        assert!(k.is_collinear(p(0.0, 0.0), p(1.0, 1.0), p(5.0, 5.0)));
        assert!(!k.is_collinear(p(0.0, 0.0), p(1.0, 1.0), p(5.0, 4.0)));
    }

    #[test]
    fn test_is_between_ignores_y() {
        let k = Kernel::default();
        assert!(k.is_between(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 1000.0)));
        assert!(!k.is_between(p(0.0, 0.0), p(10.0, 0.0), p(11.0, 0.0)));
        // Vertical segment: any x equal to the segment's counts as between
        assert!(k.is_between(p(3.0, 0.0), p(3.0, 10.0), p(3.0, 50.0)));
    }

    #[test]
    fn test_rect_from_corners() {
        let r = Rect::from_corners(p(4.0, 1.0), p(1.0, 3.0));
        assert_eq!(r, Rect::new(1.0, 1.0, 3.0, 2.0));
        assert_eq!(r.center(), p(2.5, 2.0));
    }
}
