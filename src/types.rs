//! Core data types for the gallery wall engine.
//!
//! This module defines the layout templates shoppers pick from, the resolved
//! geometry drawn on the wall, the persisted drag offsets, and the catalog
//! records artworks are matched and priced from.
//!
//! Frames are identified by their index in the template's slot list. The same
//! index keys geometry, drag offsets, size overrides and artwork assignment.

use crate::error::LoadError;
use egui::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position of a frame within its template. Stable while the template is kept.
pub type FrameIndex = usize;

/// Artworks assigned to frames. A missing entry is an unfilled frame.
pub type SelectedArtworks = BTreeMap<FrameIndex, Artwork>;

/// Unit used when presenting print sizes to the shopper.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SizeUnit {
    /// Centimetres
    #[default]
    Centimeters,
    /// Inches
    Inches,
}

impl SizeUnit {
    /// Short suffix used in labels.
    pub fn suffix(self) -> &'static str {
        match self {
            SizeUnit::Centimeters => "cm",
            SizeUnit::Inches => "in",
        }
    }

    /// The other unit.
    pub fn toggled(self) -> Self {
        match self {
            SizeUnit::Centimeters => SizeUnit::Inches,
            SizeUnit::Inches => SizeUnit::Centimeters,
        }
    }
}

/// Orientation requested by the shopper for a frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrientationHint {
    /// Use the print size as written
    #[default]
    Auto,
    /// Long side vertical
    Portrait,
    /// Long side horizontal
    Landscape,
}

/// Orientation derived from concrete dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Orientation {
    /// Taller than wide
    Portrait,
    /// Wider than tall
    Landscape,
    /// Equal sides
    Square,
}

impl Orientation {
    /// Classifies a width/height pair.
    pub fn of(width: f32, height: f32) -> Self {
        if (width - height).abs() < 1e-3 {
            Orientation::Square
        } else if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Lowercase name, as used in catalog filters.
    pub fn name(self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
            Orientation::Square => "square",
        }
    }
}

/// A physical print size, always stored in centimetres.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrintSize {
    /// Width in centimetres
    pub width_cm: f32,
    /// Height in centimetres
    pub height_cm: f32,
    /// Paper-standard code (e.g. "A3") when the size was given as one
    #[serde(default)]
    pub paper_code: Option<String>,
}

impl PrintSize {
    /// Creates a size from centimetre dimensions.
    pub fn new(width_cm: f32, height_cm: f32) -> Self {
        Self {
            width_cm,
            height_cm,
            paper_code: None,
        }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width_cm / self.height_cm
    }

    /// Orientation of the dimensions as stored.
    pub fn orientation(&self) -> Orientation {
        Orientation::of(self.width_cm, self.height_cm)
    }

    /// Returns the size turned to satisfy the hint. Square sizes never change.
    pub fn oriented(&self, hint: OrientationHint) -> Self {
        let swap = match (hint, self.orientation()) {
            (OrientationHint::Portrait, Orientation::Landscape) => true,
            (OrientationHint::Landscape, Orientation::Portrait) => true,
            _ => false,
        };
        if swap {
            Self {
                width_cm: self.height_cm,
                height_cm: self.width_cm,
                paper_code: self.paper_code.clone(),
            }
        } else {
            self.clone()
        }
    }
}

/// A templated rectangular placeholder, independent of any artwork.
///
/// Position and size are percentages of the wall box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSlot {
    /// Nominal print size label, e.g. "30x40" or "A3"
    pub size: String,
    /// Distance from the wall's top edge to the slot's top edge
    pub top: f32,
    /// Distance from the wall's left edge to the slot's left edge
    pub left: f32,
    /// Slot width
    pub width: f32,
    /// Slot height
    pub height: f32,
    /// Ignore `left` and center the slot horizontally on the wall
    #[serde(default)]
    pub center_horizontally: bool,
}

impl FrameSlot {
    /// Creates a slot from its nominal size and percentage box.
    pub fn new(size: impl Into<String>, left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            size: size.into(),
            top,
            left,
            width,
            height,
            center_horizontally: false,
        }
    }

    /// Marks the slot as horizontally centered.
    pub fn centered(mut self) -> Self {
        self.center_horizontally = true;
        self
    }

    /// Center of the design box, in wall percent.
    pub fn center(&self) -> (f32, f32) {
        let x = if self.center_horizontally {
            50.0
        } else {
            self.left + self.width / 2.0
        };
        (x, self.top + self.height / 2.0)
    }
}

/// An ordered set of frame slots offered as one arrangement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutTemplate {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Slots, in frame index order
    pub frames: Vec<FrameSlot>,
}

impl LayoutTemplate {
    /// Creates a template.
    pub fn new(id: impl Into<String>, name: impl Into<String>, frames: Vec<FrameSlot>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            frames,
        }
    }

    /// Deserialize a template from a JSON string
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the template to a JSON string
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The shopper's print size choices.
///
/// Sizes resolve per frame as: override, then global, then the slot's own size.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrintSizeSelection {
    /// Size applied to every frame without an override
    pub global: Option<String>,
    /// Sparse per-frame size overrides; may be shorter than the frame list
    #[serde(default)]
    pub overrides: Vec<Option<String>>,
    /// Per-frame orientation overrides; may be shorter than the frame list
    #[serde(default)]
    pub orientation_overrides: Vec<Option<OrientationHint>>,
}

impl PrintSizeSelection {
    /// Selection that applies one size to every frame.
    pub fn uniform(size: impl Into<String>) -> Self {
        Self {
            global: Some(size.into()),
            ..Default::default()
        }
    }

    /// Effective size label for a frame.
    pub fn size_for<'a>(&'a self, index: FrameIndex, slot: &'a FrameSlot) -> &'a str {
        self.overrides
            .get(index)
            .and_then(|o| o.as_deref())
            .or(self.global.as_deref())
            .unwrap_or(&slot.size)
    }

    /// Effective orientation for a frame, falling back to the global hint.
    pub fn orientation_for(&self, index: FrameIndex, global: OrientationHint) -> OrientationHint {
        self.orientation_overrides
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(global)
    }

    /// Sets or clears a frame's size override.
    pub fn set_override(&mut self, index: FrameIndex, size: Option<String>) {
        if self.overrides.len() <= index {
            self.overrides.resize(index + 1, None);
        }
        self.overrides[index] = size;
    }

    /// Sets or clears a frame's orientation override.
    pub fn set_orientation_override(&mut self, index: FrameIndex, hint: Option<OrientationHint>) {
        if self.orientation_overrides.len() <= index {
            self.orientation_overrides.resize(index + 1, None);
        }
        self.orientation_overrides[index] = hint;
    }
}

/// Resolved geometry for one frame, in wall percent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderFrame {
    /// Horizontal center
    pub center_x: f32,
    /// Vertical center
    pub center_y: f32,
    /// Display width, as a percentage of wall width
    pub width: f32,
    /// Width divided by height of the resolved print
    pub aspect_ratio: f32,
    /// Border thickness, same units as `width`
    pub border: f32,
    /// Human-readable size label
    pub label: String,
    /// The resolved print size, or `None` when the size string did not parse
    pub size: Option<PrintSize>,
    /// Orientation of the resolved print
    pub orientation: Orientation,
    /// Whether the frame fell back to its design box
    pub fallback: bool,
}

impl RenderFrame {
    /// Screen rectangle of the frame on a wall drawn into `wall`, shifted by `offset`.
    pub fn rect(&self, wall: egui::Rect, offset: Vec2) -> egui::Rect {
        let width = self.width / 100.0 * wall.width();
        let height = if self.aspect_ratio > 0.0 {
            width / self.aspect_ratio
        } else {
            width
        };
        let center = egui::pos2(
            wall.min.x + self.center_x / 100.0 * wall.width(),
            wall.min.y + self.center_y / 100.0 * wall.height(),
        ) + offset;
        egui::Rect::from_center_size(center, egui::vec2(width, height))
    }
}

/// Drag offsets that survive between gestures.
///
/// Only one of the two kinds takes effect at a time, chosen by the lock flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedOffsets {
    /// Offset applied to every frame while the composition is locked
    pub group: Vec2,
    /// Per-frame offsets applied while the composition is unlocked
    pub individual: BTreeMap<FrameIndex, Vec2>,
}

impl PersistedOffsets {
    /// Offset of one frame in individual mode.
    pub fn individual(&self, index: FrameIndex) -> Vec2 {
        self.individual.get(&index).copied().unwrap_or(Vec2::ZERO)
    }

    /// Offset that renders for a frame under the given lock flag.
    pub fn effective(&self, index: FrameIndex, locked: bool) -> Vec2 {
        if locked {
            self.group
        } else {
            self.individual(index)
        }
    }

    /// True when nothing has been moved.
    pub fn is_zero(&self) -> bool {
        self.group == Vec2::ZERO && self.individual.values().all(|v| *v == Vec2::ZERO)
    }
}

/// A purchasable SKU of an artwork for one print size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// SKU identifier used at checkout
    pub id: String,
    /// Size label as written in the catalog, e.g. "50x70cm"
    pub title: String,
    /// Price of this SKU
    pub price: f64,
}

/// A catalog artwork. Metadata fields are frequently missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artwork {
    /// Catalog identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared colors, if tagged
    #[serde(default)]
    pub colors: Option<Vec<String>>,
    /// Declared styles, if tagged
    #[serde(default)]
    pub styles: Option<Vec<String>>,
    /// Rooms the artwork suits, if tagged
    #[serde(default)]
    pub rooms: Option<Vec<String>>,
    /// Collection or product category
    #[serde(default)]
    pub category: Option<String>,
    /// Artist names, if tagged
    #[serde(default)]
    pub artists: Option<Vec<String>>,
    /// Vendor, used as the artist when no artist is declared
    #[serde(default)]
    pub vendor: Option<String>,
    /// Base price, used only when no variant exists
    pub price: f64,
    /// ISO currency code
    #[serde(default)]
    pub currency: String,
    /// Purchasable sizes
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Artwork {
    /// Creates an artwork with no metadata and no variants.
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image: String::new(),
            tags: Vec::new(),
            colors: None,
            styles: None,
            rooms: None,
            category: None,
            artists: None,
            vendor: None,
            price,
            currency: "EUR".to_string(),
            variants: Vec::new(),
        }
    }

    /// Adds a variant, builder-style.
    pub fn with_variant(mut self, id: impl Into<String>, title: impl Into<String>, price: f64) -> Self {
        self.variants.push(Variant {
            id: id.into(),
            title: title.into(),
            price,
        });
        self
    }
}

/// Parses a catalog document (a JSON array of artworks).
pub fn catalog_from_json(json: &str) -> Result<Vec<Artwork>, LoadError> {
    Ok(serde_json::from_str(json)?)
}
