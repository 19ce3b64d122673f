//! Right-click actions on a single point.

use super::Annotator;
use crate::error::AnnotationError;
use crate::geometry::Point2;
use crate::model::PointIndex;

/// An open context menu, pinned to the point it was opened on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub target: PointIndex,
    /// Where the menu was requested, in view coordinates.
    pub position: Point2,
    /// Whether the target is currently a pivot, for labelling the toggle.
    pub is_pivot: bool,
}

/// What the user picked from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    /// Give the point a new index.
    Rename(i64),
    TogglePivot,
    Erase,
}

impl ContextAction {
    /// Menu label. `is_pivot` selects the wording of the pivot toggle.
    pub fn label(&self, is_pivot: bool) -> &'static str {
        match self {
            ContextAction::Rename(_) => "Change index",
            ContextAction::TogglePivot if is_pivot => "Remove from pivots",
            ContextAction::TogglePivot => "Add to pivots",
            ContextAction::Erase => "Erase point",
        }
    }
}

impl Annotator {
    /// Open the menu for the point under `position`, if any.
    ///
    /// Ends the current gesture first, exactly like a mode switch. The hit
    /// test runs afterwards, so a circle rim erased by that cannot be the
    /// target.
    pub fn open_context_menu(&mut self, position: Point2) -> Option<ContextMenu> {
        if !self.has_image() {
            return None;
        }
        self.end_gesture();
        let target = self.hit_test(position)?;
        let menu = ContextMenu {
            target,
            position,
            is_pivot: self.store.is_pivot(target),
        };
        self.menu = Some(menu);
        log::debug!("Opened context menu for point {target}");
        Some(menu)
    }

    /// Close the menu without acting.
    pub fn close_context_menu(&mut self) {
        self.menu = None;
    }

    /// Apply `action` to the menu's point and close the menu.
    ///
    /// Does nothing when no menu is open. Renaming to the current index is
    /// accepted and changes nothing.
    pub fn apply_context_action(&mut self, action: ContextAction) -> Result<(), AnnotationError> {
        let Some(menu) = self.menu.take() else {
            return Ok(());
        };
        let target = menu.target;

        match action {
            ContextAction::Rename(new) => {
                if new == i64::from(target) {
                    return Ok(());
                }
                let index = u32::try_from(new)
                    .ok()
                    .filter(|&i| i > 0)
                    .ok_or(AnnotationError::NonPositiveIndex { index: new });
                let result = index.and_then(|index| {
                    self.store.renumber_point(target, index)?;
                    Ok(index)
                });
                match result {
                    Ok(index) => {
                        self.mode.rename(target, index);
                        if self.hover == Some(target) {
                            self.hover = Some(index);
                        }
                        if self.hot == Some(target) {
                            self.hot = Some(index);
                        }
                        log::info!("Renamed point {target} to {index}");
                    }
                    Err(e) => {
                        log::warn!("Rejected rename of point {target}: {e}");
                        return Err(e);
                    }
                }
            }
            ContextAction::TogglePivot => {
                self.store.toggle_pivot(target);
            }
            ContextAction::Erase => {
                self.store.erase_point(target);
                self.forget_missing();
            }
        }
        Ok(())
    }
}
