//! Global constants for the annotation core.

/// Label given to freshly drawn annotations.
pub const NO_LABEL: &str = "No Label";

/// Base name for user-declared labels created from the labels panel.
pub const CUSTOM_LABEL_BASE: &str = "Custom Label";

/// Default number of undo steps kept in memory.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Base (unscaled) sizes for interaction affordances.
///
/// Every value is multiplied by the per-photo UI scale factor before use.
pub mod scale {
    /// `(display width + display height) / DIVISOR` gives the UI scale.
    pub const DIVISOR: f32 = 1000.0;
    /// Side length of a corner resize handle.
    pub const HANDLE_SIZE: f32 = 10.0;
    /// Outline thickness of an annotation box.
    pub const LINE_THICKNESS: f32 = 4.0;
    /// Font size of the label drawn inside a box.
    pub const LABEL_SIZE: f32 = 12.0;
    /// Minimum creatable area; also the floor for a resized dimension.
    pub const MIN_AREA: f32 = 16.0;
}
