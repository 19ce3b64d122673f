//! Per-mode pointer handlers.

use super::{Annotator, ModeState, PendingCursor, PointerEvent, PointerKind};
use crate::geometry::Point2;
use crate::model::PointIndex;

impl Annotator {
    /// Route an event to the handler of the active mode.
    pub(super) fn dispatch_mode(&mut self, event: PointerEvent) {
        let mut mode = std::mem::take(&mut self.mode);
        match &mut mode {
            ModeState::None => {}
            ModeState::Point => self.on_point(event),
            ModeState::Line { pending } => self.on_line(pending, event),
            ModeState::Angle { pending } => self.on_angle(pending, event),
            ModeState::Circle { pending } => self.on_circle(pending, event),
            ModeState::Midpoint { pending } => self.on_midpoint(pending, event),
            ModeState::Vertical { pending } => self.on_vertical(pending, event),
            ModeState::MovePoint { dragging } => self.on_move_point(dragging, event),
            ModeState::ErasePoint => self.on_erase_point(event),
        }
        self.mode = mode;
    }

    /// The point under `position`, or a new one placed there.
    fn resolve_or_create(&mut self, position: Point2) -> PointIndex {
        match self.hit_test(position) {
            Some(index) => index,
            None => self.store.add_point(position, self.color),
        }
    }

    fn position(&self, index: PointIndex) -> Option<Point2> {
        self.store.position(index)
    }

    fn can_drag_to(&self, position: Point2) -> bool {
        self.transform
            .as_ref()
            .is_some_and(|t| !t.is_out_of_bounds(position, self.config.point_width))
    }

    fn on_point(&mut self, event: PointerEvent) {
        if !event.is_left_down() {
            return;
        }
        match self.hit_test(event.position) {
            Some(index) => {
                self.store.set_point_color(index, self.color);
            }
            None => {
                let index = self.store.add_point(event.position, self.color);
                log::debug!("Added point {index}");
            }
        }
    }

    fn on_line(&mut self, pending: &mut PendingCursor, event: PointerEvent) {
        if !event.is_left_down() {
            return;
        }
        pending.toggle(self.resolve_or_create(event.position));

        if let &[a, b] = pending.as_slice() {
            self.store.add_line(a, b, self.color);
            log::debug!("Added line {a}-{b}");
            pending.restart_from(b);
            self.hot = Some(b);
        }
    }

    fn on_angle(&mut self, pending: &mut PendingCursor, event: PointerEvent) {
        if !event.is_left_down() {
            return;
        }
        pending.toggle(self.resolve_or_create(event.position));

        match *pending.as_slice() {
            [a, b] if !self.store.has_line(a, b) => pending.drop_first(),
            [a, b, c] => {
                if self.store.has_line(b, c) {
                    self.store.add_angle(a, b, c, self.color);
                    log::debug!("Added angle {a}-{b}-{c}");
                    self.hot = Some(c);
                }
                pending.restart_from(c);
            }
            _ => {}
        }
    }

    fn on_circle(&mut self, pending: &mut PendingCursor, event: PointerEvent) {
        match event.kind {
            PointerKind::Down if event.is_left_down() => {
                if pending.is_empty() {
                    let center = self.resolve_or_create(event.position);
                    let Some(origin) = self.position(center) else {
                        return;
                    };
                    let offset = 2.0 * self.kernel.eps();
                    let rim = self
                        .store
                        .add_point(Point2::new(origin.x + offset, origin.y + offset), self.color);
                    self.store.add_circle(center, rim, self.color);
                    pending.toggle(center);
                    pending.toggle(rim);
                    log::debug!("Started circle {center} with rim {rim}");
                } else if let Some(rim) = pending.get(1) {
                    pending.clear();
                    self.hot = Some(rim);
                }
            }
            PointerKind::Move => {
                if let Some(rim) = pending.get(1) {
                    if self.can_drag_to(event.position) {
                        self.store.move_point(rim, event.position);
                    }
                }
            }
            _ => {}
        }
    }

    fn on_midpoint(&mut self, pending: &mut PendingCursor, event: PointerEvent) {
        if !event.is_left_down() {
            return;
        }
        pending.toggle(self.resolve_or_create(event.position));

        let &[a, b] = pending.as_slice() else {
            return;
        };
        if !self.store.has_line(a, b) {
            pending.drop_first();
            return;
        }
        let (Some(pa), Some(pb)) = (self.position(a), self.position(b)) else {
            return;
        };
        let m = self.store.add_point(self.kernel.midpoint(pa, pb), self.color);
        self.store.add_line(a, m, self.color);
        self.store.add_line(b, m, self.color);
        log::debug!("Split line {a}-{b} at new point {m}");
        pending.restart_from(b);
        self.hot = Some(b);
    }

    fn on_vertical(&mut self, pending: &mut PendingCursor, event: PointerEvent) {
        if !event.is_left_down() {
            return;
        }
        pending.toggle(self.resolve_or_create(event.position));

        match *pending.as_slice() {
            [a, b] if !self.store.has_line(a, b) => pending.drop_first(),
            [a, b, c] => {
                let (Some(pa), Some(pb), Some(pc)) = (self.position(a), self.position(b), self.position(c)) else {
                    return;
                };
                if self.kernel.is_collinear(pa, pb, pc) {
                    if self.store.has_line(b, c) {
                        pending.drop_first();
                    } else {
                        pending.restart_from(c);
                    }
                    return;
                }

                let foot = self.kernel.foot_of_perpendicular(pa, pb, pc);
                let d = self.store.add_point(foot, self.color);
                if !self.kernel.is_between(pa, pb, foot) {
                    let nearer = if self.kernel.distance(pa, foot) < self.kernel.distance(pb, foot) {
                        a
                    } else {
                        b
                    };
                    self.store.add_line(nearer, d, self.color);
                }
                self.store.add_line(c, d, self.color);
                log::debug!("Dropped perpendicular from {c} onto {a}-{b} at {d}");
                pending.restart_from(c);
                self.hot = Some(c);
            }
            _ => {}
        }
    }

    fn on_move_point(&mut self, dragging: &mut Option<PointIndex>, event: PointerEvent) {
        match (event.kind, *dragging) {
            (PointerKind::Down, None) if event.is_left_down() => {
                *dragging = self.hit_test(event.position);
            }
            (PointerKind::Move, Some(index)) => {
                if self.can_drag_to(event.position) {
                    self.store.move_point(index, event.position);
                }
            }
            (PointerKind::Up, Some(_)) => *dragging = None,
            _ => {}
        }
    }

    fn on_erase_point(&mut self, event: PointerEvent) {
        if !event.is_left_down() {
            return;
        }
        if let Some(index) = self.hit_test(event.position) {
            self.store.erase_point(index);
            self.forget_missing();
        }
    }
}
