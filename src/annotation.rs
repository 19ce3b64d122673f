//! Annotation storage.
//!
//! This module owns the landmark graph for one image:
//! - Points, addressed by a positive [`PointIndex`]
//! - Lines, angles and circles, keyed by canonical index tuples
//! - The pivot set
//!
//! Relations store indices, never positions, so erasing or renumbering a
//! point is a rewrite of the key tables. Every mutation leaves the graph
//! referentially consistent.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::AnnotationError;
use crate::geometry::{Kernel, Point2};
use crate::model::{AngleKey, CircleKey, Color, LineKey, PointIndex};

/// A placed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// Position in view space.
    pub position: Point2,
    pub color: Color,
}

impl Landmark {
    pub fn new(position: Point2, color: Color) -> Self {
        Self { position, color }
    }
}

// ============================================================================
// Annotation Store
// ============================================================================

/// Storage for the annotations on a single image.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    points: BTreeMap<PointIndex, Landmark>,
    lines: BTreeMap<LineKey, Color>,
    angles: BTreeMap<AngleKey, Color>,
    circles: BTreeMap<CircleKey, Color>,
    pivots: BTreeSet<PointIndex>,
    /// Dirty flag - set by every mutation, cleared after an import.
    /// Tells a caller the annotations differ from what was last loaded.
    dirty: bool,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Default::default()
        }
    }

    /// Check if the store has been modified since last clear_dirty().
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Call once the store matches a file on disk.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn points(&self) -> impl Iterator<Item = (PointIndex, &Landmark)> {
        self.points.iter().map(|(index, point)| (*index, point))
    }

    pub fn point(&self, index: PointIndex) -> Option<&Landmark> {
        self.points.get(&index)
    }

    pub fn position(&self, index: PointIndex) -> Option<Point2> {
        self.points.get(&index).map(|p| p.position)
    }

    pub fn contains_point(&self, index: PointIndex) -> bool {
        self.points.contains_key(&index)
    }

    pub fn lines(&self) -> impl Iterator<Item = (LineKey, Color)> + '_ {
        self.lines.iter().map(|(key, color)| (*key, *color))
    }

    pub fn angles(&self) -> impl Iterator<Item = (AngleKey, Color)> + '_ {
        self.angles.iter().map(|(key, color)| (*key, *color))
    }

    pub fn circles(&self) -> impl Iterator<Item = (CircleKey, Color)> + '_ {
        self.circles.iter().map(|(key, color)| (*key, *color))
    }

    pub fn pivots(&self) -> impl Iterator<Item = PointIndex> + '_ {
        self.pivots.iter().copied()
    }

    pub fn has_line(&self, a: PointIndex, b: PointIndex) -> bool {
        self.lines.contains_key(&LineKey::new(a, b))
    }

    pub fn has_angle(&self, a: PointIndex, b: PointIndex, c: PointIndex) -> bool {
        self.angles.contains_key(&AngleKey::new(a, b, c))
    }

    pub fn has_circle(&self, center: PointIndex, rim: PointIndex) -> bool {
        self.circles.contains_key(&CircleKey::new(center, rim))
    }

    pub fn is_pivot(&self, index: PointIndex) -> bool {
        self.pivots.contains(&index)
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn angle_count(&self) -> usize {
        self.angles.len()
    }

    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    pub fn pivot_count(&self) -> usize {
        self.pivots.len()
    }

    /// Check if there are no annotations at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.lines.is_empty()
            && self.angles.is_empty()
            && self.circles.is_empty()
            && self.pivots.is_empty()
    }

    /// Index the next auto-numbered point receives.
    pub fn next_index(&self) -> PointIndex {
        self.points.keys().next_back().map_or(1, |max| max + 1)
    }

    /// Find the point nearest to `position` strictly within `radius`.
    ///
    /// Ties go to the lowest index.
    pub fn hit_test(&self, position: Point2, radius: f64, kernel: &Kernel) -> Option<PointIndex> {
        let mut best: Option<(PointIndex, f64)> = None;
        for (index, point) in &self.points {
            let d = kernel.distance(position, point.position);
            if d >= radius {
                continue;
            }
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((*index, d));
            }
        }
        best.map(|(index, _)| index)
    }

    // ========================================================================
    // Points
    // ========================================================================

    /// Add a point under the next free index and return that index.
    pub fn add_point(&mut self, position: Point2, color: Color) -> PointIndex {
        let index = self.next_index();
        self.points.insert(index, Landmark::new(position, color));
        self.mark_dirty();
        index
    }

    /// Add a point under a caller-chosen index.
    pub fn insert_point(&mut self, index: PointIndex, position: Point2, color: Color) -> Result<(), AnnotationError> {
        if index == 0 {
            return Err(AnnotationError::NonPositiveIndex { index: 0 });
        }
        if self.points.contains_key(&index) {
            return Err(AnnotationError::DuplicateIndex { index });
        }
        self.points.insert(index, Landmark::new(position, color));
        self.mark_dirty();
        Ok(())
    }

    /// Move a point. Returns false if it does not exist.
    pub fn move_point(&mut self, index: PointIndex, position: Point2) -> bool {
        match self.points.get_mut(&index) {
            Some(point) => {
                point.position = position;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Recolour a point. Returns false if it does not exist.
    pub fn set_point_color(&mut self, index: PointIndex, color: Color) -> bool {
        match self.points.get_mut(&index) {
            Some(point) => {
                point.color = color;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Remove a point and every relation that mentions it.
    ///
    /// Erasing a missing index does nothing.
    pub fn erase_point(&mut self, index: PointIndex) {
        if self.points.remove(&index).is_none() {
            return;
        }
        self.lines.retain(|key, _| !key.contains(index));
        self.angles.retain(|key, _| !key.contains(index));
        self.circles.retain(|key, _| !key.contains(index));
        self.pivots.remove(&index);
        self.mark_dirty();
        log::debug!("Erased point {index} with its relations");
    }

    /// Give point `old` the index `new`, rewriting every relation.
    ///
    /// On error nothing changes.
    pub fn renumber_point(&mut self, old: PointIndex, new: PointIndex) -> Result<(), AnnotationError> {
        if new == 0 {
            return Err(AnnotationError::NonPositiveIndex { index: 0 });
        }
        if self.points.contains_key(&new) {
            return Err(AnnotationError::DuplicateIndex { index: new });
        }
        let Some(point) = self.points.get(&old).copied() else {
            return Err(AnnotationError::UnknownPoint { index: old });
        };

        let lines: BTreeMap<_, _> = self
            .lines
            .iter()
            .map(|(key, color)| (key.renamed(old, new), *color))
            .collect();
        let angles: BTreeMap<_, _> = self
            .angles
            .iter()
            .map(|(key, color)| (key.renamed(old, new), *color))
            .collect();
        let circles: BTreeMap<_, _> = self
            .circles
            .iter()
            .map(|(key, color)| (key.renamed(old, new), *color))
            .collect();
        let pivots: BTreeSet<_> = self
            .pivots
            .iter()
            .map(|&i| if i == old { new } else { i })
            .collect();

        self.points.remove(&old);
        self.points.insert(new, point);
        self.lines = lines;
        self.angles = angles;
        self.circles = circles;
        self.pivots = pivots;
        self.mark_dirty();
        log::debug!("Renumbered point {old} -> {new}");
        Ok(())
    }

    /// Flip pivot membership of an existing point.
    pub fn toggle_pivot(&mut self, index: PointIndex) {
        if !self.points.contains_key(&index) {
            return;
        }
        if !self.pivots.remove(&index) {
            self.pivots.insert(index);
        }
        self.mark_dirty();
    }

    // ========================================================================
    // Relations
    // ========================================================================

    /// Connect two distinct existing points. Returns whether a line is stored.
    pub fn add_line(&mut self, a: PointIndex, b: PointIndex, color: Color) -> bool {
        if a == b || !self.contains_point(a) || !self.contains_point(b) {
            return false;
        }
        self.lines.insert(LineKey::new(a, b), color);
        self.mark_dirty();
        true
    }

    /// Add ∠ABC. Both AB and BC must already be lines.
    pub fn add_angle(&mut self, a: PointIndex, b: PointIndex, c: PointIndex, color: Color) -> bool {
        if a == c || !self.has_line(a, b) || !self.has_line(b, c) {
            return false;
        }
        self.angles.insert(AngleKey::new(a, b, c), color);
        self.mark_dirty();
        true
    }

    /// Add the circle centred at `center` through `rim`.
    pub fn add_circle(&mut self, center: PointIndex, rim: PointIndex, color: Color) -> bool {
        if center == rim || !self.contains_point(center) || !self.contains_point(rim) {
            return false;
        }
        self.circles.insert(CircleKey::new(center, rim), color);
        self.mark_dirty();
        true
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Scale every point position by `factor`.
    pub fn rescale(&mut self, factor: f64) {
        if self.points.is_empty() {
            return;
        }
        for point in self.points.values_mut() {
            point.position = point.position.scaled(factor);
        }
        self.mark_dirty();
    }

    /// Clear all annotations.
    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.mark_dirty();
        }
        self.points.clear();
        self.lines.clear();
        self.angles.clear();
        self.circles.clear();
        self.pivots.clear();
    }

    /// Drop relations that reference missing points or lines.
    ///
    /// Returns how many entries were removed.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.lines.len() + self.angles.len() + self.circles.len() + self.pivots.len();

        let points = &self.points;
        self.lines
            .retain(|key, _| !key.is_degenerate() && points.contains_key(&key.a()) && points.contains_key(&key.b()));
        self.circles.retain(|key, _| {
            key.center != key.rim && points.contains_key(&key.center) && points.contains_key(&key.rim)
        });
        let lines = &self.lines;
        self.angles.retain(|key, _| {
            let (ab, bc) = key.arms();
            !key.is_degenerate() && lines.contains_key(&ab) && lines.contains_key(&bc)
        });
        self.pivots.retain(|index| points.contains_key(index));

        let after = self.lines.len() + self.angles.len() + self.circles.len() + self.pivots.len();
        let removed = before - after;
        if removed > 0 {
            self.mark_dirty();
        }
        removed
    }

    /// Insert a relation without checking its endpoints.
    ///
    /// Import uses this and then calls [`AnnotationStore::prune_dangling`].
    pub(crate) fn insert_line_unchecked(&mut self, key: LineKey, color: Color) {
        self.lines.insert(key, color);
        self.mark_dirty();
    }

    pub(crate) fn insert_angle_unchecked(&mut self, key: AngleKey, color: Color) {
        self.angles.insert(key, color);
        self.mark_dirty();
    }

    pub(crate) fn insert_circle_unchecked(&mut self, key: CircleKey, color: Color) {
        self.circles.insert(key, color);
        self.mark_dirty();
    }

    pub(crate) fn insert_pivot_unchecked(&mut self, index: PointIndex) {
        self.pivots.insert(index);
        self.mark_dirty();
    }
}
