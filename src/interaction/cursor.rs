//! Pending selection and per-mode gesture state.

use crate::model::{AnnotationMode, PointIndex};

/// Points picked so far in a multi-click gesture, in click order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCursor {
    slots: Vec<PointIndex>,
}

impl PendingCursor {
    /// Maximum number of pending points.
    pub const CAPACITY: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor holding just `index`.
    pub fn with(index: PointIndex) -> Self {
        Self { slots: vec![index] }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, index: PointIndex) -> bool {
        self.slots.contains(&index)
    }

    pub fn as_slice(&self) -> &[PointIndex] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<PointIndex> {
        self.slots.get(slot).copied()
    }

    /// Add `index` if absent, remove it if present. Order of the others is kept.
    ///
    /// A full cursor ignores new indices.
    pub fn toggle(&mut self, index: PointIndex) {
        if let Some(pos) = self.slots.iter().position(|&i| i == index) {
            self.slots.remove(pos);
        } else if self.slots.len() < Self::CAPACITY {
            self.slots.push(index);
        }
    }

    /// Drop the oldest pending point.
    pub fn drop_first(&mut self) {
        if !self.slots.is_empty() {
            self.slots.remove(0);
        }
    }

    /// Restart the gesture from `index` alone.
    pub fn restart_from(&mut self, index: PointIndex) {
        self.slots.clear();
        self.slots.push(index);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Forget indices for which `exists` is false.
    pub fn retain(&mut self, exists: impl Fn(PointIndex) -> bool) {
        self.slots.retain(|&i| exists(i));
    }

    /// Rewrite `from` to `to`.
    pub fn rename(&mut self, from: PointIndex, to: PointIndex) {
        for slot in &mut self.slots {
            if *slot == from {
                *slot = to;
            }
        }
    }
}

/// The active mode together with its in-progress gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModeState {
    #[default]
    None,
    Point,
    Line {
        pending: PendingCursor,
    },
    Angle {
        pending: PendingCursor,
    },
    /// While the rim is being dragged `pending` holds `[center, rim]`.
    Circle {
        pending: PendingCursor,
    },
    Midpoint {
        pending: PendingCursor,
    },
    Vertical {
        pending: PendingCursor,
    },
    MovePoint {
        dragging: Option<PointIndex>,
    },
    ErasePoint,
}

impl ModeState {
    /// Fresh state for `mode`, with no gesture in progress.
    pub fn enter(mode: AnnotationMode) -> Self {
        match mode {
            AnnotationMode::None => ModeState::None,
            AnnotationMode::Point => ModeState::Point,
            AnnotationMode::Line => ModeState::Line { pending: PendingCursor::new() },
            AnnotationMode::Angle => ModeState::Angle { pending: PendingCursor::new() },
            AnnotationMode::Circle => ModeState::Circle { pending: PendingCursor::new() },
            AnnotationMode::Midpoint => ModeState::Midpoint { pending: PendingCursor::new() },
            AnnotationMode::Vertical => ModeState::Vertical { pending: PendingCursor::new() },
            AnnotationMode::MovePoint => ModeState::MovePoint { dragging: None },
            AnnotationMode::ErasePoint => ModeState::ErasePoint,
        }
    }

    pub fn mode(&self) -> AnnotationMode {
        match self {
            ModeState::None => AnnotationMode::None,
            ModeState::Point => AnnotationMode::Point,
            ModeState::Line { .. } => AnnotationMode::Line,
            ModeState::Angle { .. } => AnnotationMode::Angle,
            ModeState::Circle { .. } => AnnotationMode::Circle,
            ModeState::Midpoint { .. } => AnnotationMode::Midpoint,
            ModeState::Vertical { .. } => AnnotationMode::Vertical,
            ModeState::MovePoint { .. } => AnnotationMode::MovePoint,
            ModeState::ErasePoint => AnnotationMode::ErasePoint,
        }
    }

    /// Points selected by the in-progress gesture.
    pub fn pending(&self) -> &[PointIndex] {
        match self {
            ModeState::Line { pending }
            | ModeState::Angle { pending }
            | ModeState::Circle { pending }
            | ModeState::Midpoint { pending }
            | ModeState::Vertical { pending } => pending.as_slice(),
            ModeState::MovePoint { dragging } => dragging.as_slice(),
            ModeState::None | ModeState::Point | ModeState::ErasePoint => &[],
        }
    }

    fn cursor_mut(&mut self) -> Option<&mut PendingCursor> {
        match self {
            ModeState::Line { pending }
            | ModeState::Angle { pending }
            | ModeState::Circle { pending }
            | ModeState::Midpoint { pending }
            | ModeState::Vertical { pending } => Some(pending),
            _ => None,
        }
    }

    /// Drop the in-progress gesture but stay in the same mode.
    pub fn reset(&mut self) {
        *self = ModeState::enter(self.mode());
    }

    /// Forget pending points that no longer exist.
    pub fn retain(&mut self, exists: impl Fn(PointIndex) -> bool) {
        match self {
            ModeState::MovePoint { dragging } => {
                if dragging.is_some_and(|i| !exists(i)) {
                    *dragging = None;
                }
            }
            other => {
                if let Some(cursor) = other.cursor_mut() {
                    cursor.retain(exists);
                }
            }
        }
    }

    pub fn rename(&mut self, from: PointIndex, to: PointIndex) {
        match self {
            ModeState::MovePoint { dragging } => {
                if *dragging == Some(from) {
                    *dragging = Some(to);
                }
            }
            other => {
                if let Some(cursor) = other.cursor_mut() {
                    cursor.rename(from, to);
                }
            }
        }
    }
}
