//! Layout geometry resolution.
//!
//! Turns a template's abstract slots plus the shopper's size, orientation,
//! wall scale and spacing choices into concrete on-wall geometry. Everything
//! here is pure: the same inputs always produce the same frames.
//!
//! Frames are drawn to scale. Each slot's design box fixes how many wall
//! percent one centimetre of print occupies; the resolved print size is then
//! laid out with that ratio, so a 50×70 print is visibly larger than a 30×40.

use crate::constants::*;
use crate::types::*;
use serde::{Deserialize, Serialize};

/// ISO 216 A-series sizes in centimetres, portrait.
const PAPER_SIZES: [(&str, f32, f32); 5] = [
    ("A0", 84.1, 118.9),
    ("A1", 59.4, 84.1),
    ("A2", 42.0, 59.4),
    ("A3", 29.7, 42.0),
    ("A4", 21.0, 29.7),
];

/// Shopper choices that shape the whole composition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutOptions {
    /// Unit used for size labels
    pub unit: SizeUnit,
    /// Orientation applied to frames without their own override
    pub orientation: OrientationHint,
    /// Signed percentage growing or shrinking the composition, in [-50, 50]
    pub wall_scale: f32,
    /// Signed percentage pushing frames away from the centroid, in [-50, 100]
    pub spacing: f32,
    /// Border thickness as a fraction of frame width
    pub border_ratio: f32,
    /// Thinnest border
    pub min_border: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            unit: SizeUnit::Centimeters,
            orientation: OrientationHint::Auto,
            wall_scale: 0.0,
            spacing: 0.0,
            border_ratio: BORDER_RATIO,
            min_border: MIN_BORDER,
        }
    }
}

impl LayoutOptions {
    /// Multiplier applied to every frame's footprint.
    pub fn footprint(&self) -> f32 {
        1.0 + clamp_or_zero(self.wall_scale, WALL_SCALE_MIN, WALL_SCALE_MAX) / 100.0
    }

    /// Multiplier applied to each frame's distance from the centroid, on top of the footprint.
    pub fn spread(&self) -> f32 {
        1.0 + clamp_or_zero(self.spacing, SPACING_MIN, SPACING_MAX) / 100.0
    }
}

fn clamp_or_zero(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        0.0
    }
}

/// Parses a print size string.
///
/// Accepts "30x40", "30 × 40", "29.7*42", "30x40cm", "8x10in", "8x10\"" and
/// the paper codes A0 to A4. Unit-less numbers are centimetres.
///
/// # Returns
///
/// The size in centimetres, or `None` if the string is not a size.
pub fn parse_print_size(input: &str) -> Option<PrintSize> {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if compact.is_empty() {
        return None;
    }

    let upper = compact.to_uppercase();
    if let Some((code, width, height)) = PAPER_SIZES.iter().find(|(code, _, _)| *code == upper) {
        return Some(PrintSize {
            width_cm: *width,
            height_cm: *height,
            paper_code: Some(code.to_string()),
        });
    }

    let normalized = compact.replace(['×', '*'], "x").replace(',', ".");
    let (body, factor) = if let Some(body) = normalized.strip_suffix("cm") {
        (body, 1.0)
    } else if let Some(body) = normalized.strip_suffix("in") {
        (body, CM_PER_INCH)
    } else if let Some(body) = normalized.strip_suffix('"') {
        (body, CM_PER_INCH)
    } else {
        (normalized.as_str(), 1.0)
    };

    let mut parts = body.split('x');
    let width = parse_dimension(parts.next()?)?;
    let height = parse_dimension(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some(PrintSize::new(width * factor, height * factor))
}

fn parse_dimension(text: &str) -> Option<f32> {
    let value: f32 = text.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Formats a centimetre length in the given unit, one decimal at most.
pub fn format_length(cm: f32, unit: SizeUnit) -> String {
    let value = match unit {
        SizeUnit::Centimeters => cm,
        SizeUnit::Inches => cm / CM_PER_INCH,
    };
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

/// Human-readable label, e.g. "30 × 40 cm" or "A3 · 11.7 × 16.5 in".
pub fn size_label(size: &PrintSize, unit: SizeUnit) -> String {
    let dims = format!(
        "{} × {} {}",
        format_length(size.width_cm, unit),
        format_length(size.height_cm, unit),
        unit.suffix()
    );
    match &size.paper_code {
        Some(code) => format!("{code} · {dims}"),
        None => dims,
    }
}

/// Resolves a template's slots into render geometry.
///
/// The result always has one frame per slot, in slot order. A slot whose
/// effective size cannot be parsed keeps its original, unscaled design box.
///
/// # Arguments
///
/// * `frames` - The template's slots
/// * `sizes` - Global and per-frame size and orientation choices
/// * `options` - Unit, orientation, wall scale, spacing and border settings
pub fn resolve(
    frames: &[FrameSlot],
    sizes: &PrintSizeSelection,
    options: &LayoutOptions,
) -> Vec<RenderFrame> {
    if frames.is_empty() {
        return Vec::new();
    }

    let footprint = options.footprint();
    let projection = footprint * options.spread();

    let centers: Vec<(f32, f32)> = frames.iter().map(FrameSlot::center).collect();
    let count = centers.len() as f32;
    let centroid = (
        centers.iter().map(|c| c.0).sum::<f32>() / count,
        centers.iter().map(|c| c.1).sum::<f32>() / count,
    );

    // Wall percent per centimetre, fixed by each slot's design box.
    let slot_scales: Vec<Option<f32>> = frames
        .iter()
        .map(|slot| {
            parse_print_size(&slot.size)
                .filter(|_| slot.width > 0.0)
                .map(|nominal| slot.width / nominal.width_cm)
        })
        .collect();
    let known: Vec<f32> = slot_scales.iter().flatten().copied().collect();
    let mean_scale = (!known.is_empty()).then(|| known.iter().sum::<f32>() / known.len() as f32);

    frames
        .iter()
        .enumerate()
        .map(|(index, slot)| {
            let requested = sizes.size_for(index, slot);
            let hint = sizes.orientation_for(index, options.orientation);
            let parsed = parse_print_size(requested).map(|size| size.oriented(hint));
            let scale = slot_scales[index].or(mean_scale);

            match (parsed, scale) {
                (Some(size), Some(scale)) => {
                    let (cx, cy) = centers[index];
                    let width = size.width_cm * scale * footprint;
                    RenderFrame {
                        center_x: centroid.0 + (cx - centroid.0) * projection,
                        center_y: centroid.1 + (cy - centroid.1) * projection,
                        width,
                        aspect_ratio: size.aspect_ratio(),
                        border: border_for(width, options),
                        label: size_label(&size, options.unit),
                        orientation: size.orientation(),
                        size: Some(size),
                        fallback: false,
                    }
                }
                _ => {
                    log::warn!(
                        "frame {index}: cannot resolve print size {requested:?}, keeping design box"
                    );
                    design_box(slot, requested, options)
                }
            }
        })
        .collect()
}

fn border_for(width: f32, options: &LayoutOptions) -> f32 {
    (width * options.border_ratio).max(options.min_border)
}

fn design_box(slot: &FrameSlot, requested: &str, options: &LayoutOptions) -> RenderFrame {
    let (center_x, center_y) = slot.center();
    let aspect_ratio = if slot.height > 0.0 && slot.width > 0.0 {
        slot.width / slot.height
    } else {
        1.0
    };
    RenderFrame {
        center_x,
        center_y,
        width: slot.width,
        aspect_ratio,
        border: border_for(slot.width, options),
        label: requested.trim().to_string(),
        size: None,
        orientation: Orientation::of(slot.width, slot.height),
        fallback: true,
    }
}
