//! Built-in sample layouts and a small demo catalog.
//!
//! Real templates and artworks come from the storefront; these exist so the
//! preview window has something to show and tests have realistic fixtures.

use crate::types::*;
use serde_json::json;

/// Kinds of built-in sample layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// One large frame, centered
    Solo,
    /// Two small portraits beside one large portrait
    Trio,
    /// Two by two grid of equal frames
    Grid,
    /// Mixed sizes hung salon-style
    Salon,
}

/// Metadata for a single sample.
pub struct SampleInfo {
    /// Stable identifier for the sample
    pub kind: SampleKind,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all samples with their display names.
pub const fn all_samples() -> &'static [SampleInfo] {
    const SAMPLES: &[SampleInfo] = &[
        SampleInfo {
            kind: SampleKind::Solo,
            name: "Solo",
        },
        SampleInfo {
            kind: SampleKind::Trio,
            name: "Trio",
        },
        SampleInfo {
            kind: SampleKind::Grid,
            name: "Grid of Four",
        },
        SampleInfo {
            kind: SampleKind::Salon,
            name: "Salon Wall",
        },
    ];
    SAMPLES
}

/// Builds the template for the given sample kind.
pub fn build_sample(kind: SampleKind) -> LayoutTemplate {
    match kind {
        SampleKind::Solo => LayoutTemplate::new(
            "solo",
            "Solo",
            vec![FrameSlot::new("50x70", 0.0, 20.0, 20.0, 42.0).centered()],
        ),
        SampleKind::Trio => LayoutTemplate::new(
            "trio",
            "Trio",
            vec![
                FrameSlot::new("30x40", 24.0, 26.0, 12.0, 24.0),
                FrameSlot::new("30x40", 24.0, 54.0, 12.0, 24.0),
                FrameSlot::new("50x70", 39.0, 26.0, 20.0, 52.0),
            ],
        ),
        SampleKind::Grid => {
            let mut frames = Vec::new();
            for row in 0..2 {
                for col in 0..2 {
                    frames.push(FrameSlot::new(
                        "40x50",
                        32.0 + col as f32 * 19.0,
                        14.0 + row as f32 * 38.0,
                        16.0,
                        30.0,
                    ));
                }
            }
            LayoutTemplate::new("grid", "Grid of Four", frames)
        }
        SampleKind::Salon => LayoutTemplate::new(
            "salon",
            "Salon Wall",
            vec![
                FrameSlot::new("50x70", 0.0, 18.0, 18.0, 40.0).centered(),
                FrameSlot::new("A3", 24.0, 14.0, 11.0, 24.0),
                FrameSlot::new("A4", 26.0, 42.0, 8.0, 17.0),
                FrameSlot::new("30x30", 64.0, 16.0, 11.0, 18.0),
                FrameSlot::new("A3", 63.0, 40.0, 11.0, 24.0),
            ],
        ),
    }
}

/// Demo catalog exercising every metadata gap the matcher has to tolerate.
pub fn sample_catalog() -> Vec<Artwork> {
    let catalog = json!([
        {
            "id": "harbour-dawn",
            "title": "Harbour at Dawn",
            "tags": ["sea", "boats"],
            "colors": ["Blue", "Grey"],
            "styles": ["Photography"],
            "rooms": ["Living room"],
            "category": "Coastal",
            "artists": ["Mira Holm"],
            "price": 29.0,
            "currency": "EUR",
            "variants": [
                {"id": "hd-30x40", "title": "30x40cm", "price": 39.0},
                {"id": "hd-40x50", "title": "40x50cm", "price": 49.0},
                {"id": "hd-50x70", "title": "50x70cm", "price": 69.0}
            ]
        },
        {
            "id": "red-poppies",
            "title": "Red Poppies",
            "tags": ["flowers", "summer"],
            "colors": ["Red", "Green"],
            "styles": ["Botanical"],
            "category": "Botanical",
            "vendor": "Studio Nord",
            "price": 25.0,
            "currency": "EUR",
            "variants": [
                {"id": "rp-a4", "title": "A4", "price": 29.0},
                {"id": "rp-a3", "title": "A3", "price": 39.0},
                {"id": "rp-30x40", "title": "30 × 40 cm", "price": 42.0}
            ]
        },
        {
            "id": "quiet-dunes",
            "title": "Quiet Dunes",
            "tags": ["desert", "minimal"],
            "colors": ["Sand", "Beige"],
            "styles": ["Minimal"],
            "rooms": ["Bedroom"],
            "category": "Landscapes",
            "artists": ["Ana Ruiz"],
            "price": 35.0,
            "currency": "EUR",
            "variants": [
                {"id": "qd-70x50", "title": "70x50cm", "price": 75.0},
                {"id": "qd-40x30", "title": "40x30cm", "price": 45.0}
            ]
        },
        {
            "id": "line-study",
            "title": "Line Study No. 3",
            "tags": ["abstract", "black and white"],
            "price": 19.0,
            "currency": "EUR",
            "variants": [
                {"id": "ls-30x30", "title": "30x30", "price": 29.0},
                {"id": "ls-50x50", "title": "50x50", "price": 49.0}
            ]
        },
        {
            "id": "city-lights",
            "title": "City Lights",
            "tags": ["urban", "night"],
            "colors": ["Black", "Yellow"],
            "styles": ["Photography"],
            "rooms": ["Office"],
            "category": "Urban",
            "price": 45.0,
            "currency": "EUR"
        },
        {
            "id": "fern",
            "title": "Fern",
            "tags": ["plants", "green"],
            "colors": ["Green"],
            "rooms": ["Bathroom", "Kitchen"],
            "category": "Botanical",
            "artists": ["Mira Holm"],
            "price": 22.0,
            "currency": "EUR",
            "variants": [
                {"id": "fe-30x40", "title": "30x40cm / Matte", "price": 34.0},
                {"id": "fe-30x40g", "title": "30x40cm / Glossy", "price": 36.0},
                {"id": "fe-50x70", "title": "50x70cm / Matte", "price": 58.0}
            ]
        }
    ]);
    serde_json::from_value(catalog).unwrap_or_else(|err| {
        log::warn!("sample catalog failed to load: {err}");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::parse_print_size;

    #[test]
    fn test_every_sample_builds() {
        for info in all_samples() {
            let template = build_sample(info.kind);
            assert_eq!(template.name, info.name);
            assert!(!template.frames.is_empty());
        }
    }

    #[test]
    fn test_sample_sizes_parse() {
        for info in all_samples() {
            for slot in build_sample(info.kind).frames {
                assert!(parse_print_size(&slot.size).is_some(), "{}", slot.size);
            }
        }
    }

    #[test]
    fn test_sample_catalog_loads() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.iter().any(|a| a.variants.is_empty()));
        assert!(catalog.iter().any(|a| a.colors.is_none()));
    }
}
