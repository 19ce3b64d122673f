//! Annotation modes selectable by the user.

/// Annotation modes available in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnnotationMode {
    /// Pointer events only drive hover and the context menu
    #[default]
    None,
    /// Place or recolour points
    Point,
    /// Connect two points with a line
    Line,
    /// Mark the angle between two connected lines
    Angle,
    /// Draw a circle by dragging its rim
    Circle,
    /// Split a line at its midpoint
    Midpoint,
    /// Drop a perpendicular onto a line
    Vertical,
    /// Drag an existing point
    MovePoint,
    /// Delete points on click
    ErasePoint,
}

impl AnnotationMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationMode::None => "None",
            AnnotationMode::Point => "Point",
            AnnotationMode::Line => "Line",
            AnnotationMode::Angle => "Angle",
            AnnotationMode::Circle => "Circle",
            AnnotationMode::Midpoint => "Midpoint",
            AnnotationMode::Vertical => "Vertical",
            AnnotationMode::MovePoint => "Move Point",
            AnnotationMode::ErasePoint => "Erase Point",
        }
    }

    /// Get all available modes, in menu order.
    pub fn all() -> &'static [AnnotationMode] {
        &[
            AnnotationMode::None,
            AnnotationMode::Point,
            AnnotationMode::Line,
            AnnotationMode::Angle,
            AnnotationMode::Circle,
            AnnotationMode::Midpoint,
            AnnotationMode::Vertical,
            AnnotationMode::MovePoint,
            AnnotationMode::ErasePoint,
        ]
    }

    /// Whether clicks in this mode build up a multi-point selection.
    pub fn is_multi_click(&self) -> bool {
        matches!(
            self,
            AnnotationMode::Line
                | AnnotationMode::Angle
                | AnnotationMode::Circle
                | AnnotationMode::Midpoint
                | AnnotationMode::Vertical
        )
    }
}
