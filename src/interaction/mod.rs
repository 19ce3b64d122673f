//! Pointer-driven editing of the annotation graph.
//!
//! [`Annotator`] owns the store, the view transform and the active mode. A
//! caller feeds it [`PointerEvent`]s in view coordinates and reads the
//! store (or a [`crate::render::Scene`]) back to draw. Each event is handled
//! to completion before `handle_event` returns.

mod context_menu;
mod cursor;
mod handlers;

pub use context_menu::{ContextAction, ContextMenu};
pub use cursor::{ModeState, PendingCursor};

use std::collections::BTreeSet;

use image::DynamicImage;

use crate::annotation::AnnotationStore;
use crate::config::EngineConfig;
use crate::detect::{DetectError, LandmarkDetector};
use crate::error::AnnotationError;
use crate::geometry::{Kernel, Point2};
use crate::measure::format_rounded;
use crate::model::{AnnotationMode, Color, PointIndex};
use crate::transform::{Size, ViewTransform};

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Mouse button associated with a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    /// Moves carry no button.
    None,
}

/// A pointer event in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub button: PointerButton,
    pub position: Point2,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, button: PointerButton, position: Point2) -> Self {
        Self { kind, button, position }
    }

    /// Left button pressed.
    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, PointerButton::Left, Point2::new(x, y))
    }

    /// Right button pressed.
    pub fn right_down(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, PointerButton::Right, Point2::new(x, y))
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, PointerButton::None, Point2::new(x, y))
    }

    /// Left button released.
    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, PointerButton::Left, Point2::new(x, y))
    }

    fn is_left_down(&self) -> bool {
        self.kind == PointerKind::Down && self.button == PointerButton::Left
    }

    fn is_right_down(&self) -> bool {
        self.kind == PointerKind::Down && self.button == PointerButton::Right
    }
}

// ============================================================================
// Annotator
// ============================================================================

/// Interactive annotation engine for one image at a time.
#[derive(Debug, Clone)]
pub struct Annotator {
    config: EngineConfig,
    kernel: Kernel,
    store: AnnotationStore,
    transform: Option<ViewTransform>,
    mode: ModeState,
    color: Color,
    /// Point under the pointer after the last move.
    hover: Option<PointIndex>,
    /// Point left highlighted by the last completed gesture.
    hot: Option<PointIndex>,
    menu: Option<ContextMenu>,
    /// Pointer position in source pixels after the last move.
    readout: Option<Point2>,
}

impl Annotator {
    pub fn new(config: EngineConfig) -> Self {
        let kernel = Kernel::new(&config);
        let color = config.default_color();
        Self {
            config,
            kernel,
            store: AnnotationStore::new(),
            transform: None,
            mode: ModeState::None,
            color,
            hover: None,
            hot: None,
            menu: None,
            readout: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Mutable access for bulk edits such as import.
    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    pub fn transform(&self) -> Option<&ViewTransform> {
        self.transform.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.transform.is_some()
    }

    pub fn mode(&self) -> AnnotationMode {
        self.mode.mode()
    }

    pub fn mode_state(&self) -> &ModeState {
        &self.mode
    }

    /// Points selected by the gesture in progress.
    pub fn pending(&self) -> &[PointIndex] {
        self.mode.pending()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Colour given to entities created from now on.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn hovered(&self) -> Option<PointIndex> {
        self.hover
    }

    pub fn hot(&self) -> Option<PointIndex> {
        self.hot
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref()
    }

    // ========================================================================
    // Image lifecycle
    // ========================================================================

    /// Start annotating a new image. Any previous annotations are dropped.
    pub fn load_image(&mut self, source: Size, viewport: Size) {
        self.reset_interaction();
        self.store = AnnotationStore::new();
        let transform = ViewTransform::new(source, viewport, &self.config);
        log::info!(
            "Loaded image {}x{} shown at {}x{}",
            source.width,
            source.height,
            transform.view_size().width,
            transform.view_size().height
        );
        self.transform = Some(transform);
    }

    /// Drop the image and everything on it.
    pub fn close_image(&mut self) {
        self.reset_interaction();
        self.store = AnnotationStore::new();
        self.transform = None;
        log::info!("Closed image");
    }

    /// Remove all annotations but keep the image.
    pub fn clear_annotations(&mut self) {
        if !self.has_image() {
            return;
        }
        self.reset_interaction();
        self.store.clear();
        log::info!("Cleared annotations");
    }

    fn reset_interaction(&mut self) {
        self.mode.reset();
        self.hover = None;
        self.hot = None;
        self.menu = None;
        self.readout = None;
    }

    // ========================================================================
    // View size
    // ========================================================================

    /// The viewport was resized.
    pub fn resize_view(&mut self, viewport: Size) {
        if let Some(transform) = &mut self.transform {
            transform.resize(viewport);
        }
        self.apply_rescale();
    }

    pub fn zoom_in(&mut self) -> Option<u32> {
        self.with_zoom(ViewTransform::zoom_in)
    }

    pub fn zoom_out(&mut self) -> Option<u32> {
        self.with_zoom(ViewTransform::zoom_out)
    }

    pub fn reset_zoom(&mut self) -> Option<u32> {
        self.with_zoom(ViewTransform::reset_zoom)
    }

    pub fn set_zoom_percent(&mut self, percent: u32) -> Option<u32> {
        self.with_zoom(|t| t.set_zoom_percent(percent))
    }

    fn with_zoom(&mut self, step: impl FnOnce(&mut ViewTransform) -> u32) -> Option<u32> {
        let percent = self.transform.as_mut().map(step);
        self.apply_rescale();
        percent
    }

    /// Move every point along with the view bitmap.
    fn apply_rescale(&mut self) {
        if let Some(factor) = self.transform.as_mut().and_then(ViewTransform::take_rescale) {
            self.store.rescale(factor);
            log::debug!("Rescaled {} points by {factor}", self.store.point_count());
        }
    }

    // ========================================================================
    // Modes and events
    // ========================================================================

    /// Switch mode, ending any gesture in progress.
    pub fn switch_mode(&mut self, mode: AnnotationMode) {
        self.end_gesture();
        self.mode = ModeState::enter(mode);
        log::debug!("Switched to {} mode", mode.name());
    }

    /// Abandon the current gesture.
    ///
    /// A circle whose rim is still being dragged loses its rim point.
    pub fn end_gesture(&mut self) {
        if let ModeState::Circle { pending } = &self.mode {
            if let Some(rim) = pending.get(1) {
                self.store.erase_point(rim);
            }
        }
        self.mode.reset();
        self.hover = None;
        self.hot = None;
    }

    /// Process one pointer event. Ignored while no image is loaded or a
    /// context menu is open.
    pub fn handle_event(&mut self, event: PointerEvent) {
        if !self.has_image() || self.menu.is_some() {
            return;
        }

        self.dispatch_mode(event);

        if event.kind == PointerKind::Move {
            self.update_hover(event.position);
        } else if event.is_right_down() {
            self.open_context_menu(event.position);
        }
    }

    fn update_hover(&mut self, position: Point2) {
        self.hover = self.hit_test(position);
        self.hot = None;
        self.readout = self.transform.as_ref().map(|t| t.to_source(position));
    }

    /// Nearest point within the hit radius of a view position.
    pub fn hit_test(&self, position: Point2) -> Option<PointIndex> {
        self.store.hit_test(position, self.config.hit_radius(), &self.kernel)
    }

    /// Pointer position in source pixels after the last move.
    pub fn readout(&self) -> Option<Point2> {
        self.readout
    }

    /// `"x, y"` of the last pointer position in source pixels.
    pub fn status_text(&self) -> Option<String> {
        self.readout
            .map(|p| format!("{}, {}", format_rounded(p.x, 2), format_rounded(p.y, 2)))
    }

    /// Points that should be drawn highlighted.
    pub fn highlighted_points(&self) -> BTreeSet<PointIndex> {
        let mut set: BTreeSet<PointIndex> = self.pending().iter().copied().collect();
        set.extend(self.hot);
        match &self.menu {
            Some(menu) => {
                set.insert(menu.target);
            }
            None => set.extend(self.hover),
        }
        set
    }

    /// Drop hover, hot and pending references to erased points.
    fn forget_missing(&mut self) {
        let store = &self.store;
        self.mode.retain(|i| store.contains_point(i));
        if self.hover.is_some_and(|i| !store.contains_point(i)) {
            self.hover = None;
        }
        if self.hot.is_some_and(|i| !store.contains_point(i)) {
            self.hot = None;
        }
    }

    // ========================================================================
    // Programmatic insertion
    // ========================================================================

    /// Place a point given in source pixels, under `index` or the next free one.
    pub fn add_point_at_source(&mut self, index: Option<PointIndex>, source: Point2) -> Result<PointIndex, AnnotationError> {
        let transform = self.transform.as_ref().ok_or(AnnotationError::NoImage)?;
        let position = transform.to_view(source);
        match index {
            Some(index) => {
                self.store.insert_point(index, position, self.color)?;
                Ok(index)
            }
            None => Ok(self.store.add_point(position, self.color)),
        }
    }

    /// Run a landmark detector on the source image and add every point it finds.
    pub fn auto_add_points(
        &mut self,
        detector: &dyn LandmarkDetector,
        image: &DynamicImage,
    ) -> Result<Vec<PointIndex>, DetectError> {
        if !self.has_image() {
            return Err(DetectError::NoImage);
        }
        let detected = detector.detect(image)?;
        let mut added = Vec::with_capacity(detected.len());
        for source in detected {
            match self.add_point_at_source(None, source) {
                Ok(index) => added.push(index),
                Err(e) => log::warn!("Skipped detected landmark at ({}, {}): {e}", source.x, source.y),
            }
        }
        log::info!("Auto-detection added {} points", added.len());
        Ok(added)
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
