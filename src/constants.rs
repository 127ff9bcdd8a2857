//! Shared engine-wide constants.
//! Centralizes tweakable values used across geometry, interaction and catalog browsing.

// Geometry
/// Lower bound of the wall scale slider, in percent.
pub const WALL_SCALE_MIN: f32 = -50.0;
/// Upper bound of the wall scale slider, in percent.
pub const WALL_SCALE_MAX: f32 = 50.0;
/// Lower bound of the spacing slider, in percent.
pub const SPACING_MIN: f32 = -50.0;
/// Upper bound of the spacing slider, in percent.
pub const SPACING_MAX: f32 = 100.0;
/// Frame border thickness as a fraction of the frame's display width.
pub const BORDER_RATIO: f32 = 0.04;
/// Thinnest border drawn, in wall percent.
pub const MIN_BORDER: f32 = 0.25;

// Units
/// Centimetres per inch.
pub const CM_PER_INCH: f32 = 2.54;
/// Two print sizes whose sides differ by less than this many centimetres are the same size.
pub const SIZE_TOLERANCE_CM: f32 = 0.05;

// Interaction
/// Pointer travel (in pointer units) below which a press+release counts as a click.
pub const CLICK_THRESHOLD: f32 = 5.0;

// Undo/redo
/// Maximum number of undo history entries to retain.
pub const MAX_UNDO_HISTORY: usize = 50;

// Catalog browsing
/// Number of artworks revealed per "show more" step.
pub const REVEAL_PAGE_SIZE: usize = 12;
/// Artificial delay between requesting and completing a reveal, in milliseconds.
pub const REVEAL_DELAY_MS: u64 = 500;

// Preview canvas
/// Width divided by height of the wall drawn in the preview.
pub const WALL_ASPECT_RATIO: f32 = 1.6;
/// Gap between the canvas edge and the wall, in points.
pub const WALL_MARGIN: f32 = 24.0;
/// Stroke width of the highlight around the active frame.
pub const ACTIVE_STROKE_WIDTH: f32 = 3.0;
/// Frame finishes offered by the preview.
pub const FRAME_FINISHES: [&str; 4] = ["Black", "White", "Oak", "Walnut"];
