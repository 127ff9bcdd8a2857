//! Variant resolution and pricing.
//!
//! Catalog variants are titled loosely ("50x70cm", "50 X 70", "A3 / Black"),
//! so the desired print size and every variant title are normalized before
//! comparing; titles that are sizes in another notation ("A3", "16x12in")
//! are compared by their dimensions. When no variant can be pinned down the resolver degrades to the
//! first variant, and when there are none at all to the artwork's base price.
//! Whatever is chosen, the chosen variant's own price is the one shown and
//! charged.

use crate::constants::SIZE_TOLERANCE_CM;
use crate::error::CheckoutError;
use crate::geometry::parse_print_size;
use crate::types::{Artwork, FrameIndex, PrintSize, Variant};
use serde::{Deserialize, Serialize};

/// How a price was arrived at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriceSource {
    /// A variant matching the desired size
    Exact,
    /// No unambiguous match; the artwork's first variant
    FirstVariantFallback,
    /// The artwork has no variants; its base price, with no SKU
    BasePriceFallback,
}

/// Outcome of resolving an artwork against a desired size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPrice<'a> {
    /// The chosen variant, if the artwork has any
    pub variant: Option<&'a Variant>,
    /// Authoritative price
    pub price: f64,
    /// How the price was found
    pub source: PriceSource,
}

impl ResolvedPrice<'_> {
    /// SKU to order, if one was resolved.
    pub fn sku(&self) -> Option<&str> {
        self.variant.map(|v| v.id.as_str())
    }
}

/// Normalizes a size or variant title for comparison.
///
/// Whitespace is removed, letters are uppercased and the multiplication glyphs
/// `×` and `*` become `X`, so "50 × 70" and "50x70" compare equal.
pub fn normalize_size(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .map(|c| if c == '×' || c == '*' { 'X' } else { c })
        .collect()
}

/// True if `needle` occurs in `haystack` without being part of a longer number.
fn contains_bounded(haystack: &str, needle: &str) -> bool {
    let is_numeric = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit() || c == '.');
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !is_numeric(before) && !is_numeric(after)
    })
}

/// Finds the variant of `artwork` that sells `desired_size`, without logging.
///
/// A variant matches when its normalized title contains the normalized size
/// and the match is not embedded in a longer number. If no title matches that
/// way, variants whose title parses to the same dimensions (in either
/// orientation) are considered instead. Zero or several matches give `None`.
pub fn find_variant<'a>(artwork: &'a Artwork, desired_size: &str) -> Option<&'a Variant> {
    let key = normalize_size(desired_size);
    if key.is_empty() {
        return None;
    }

    let by_title: Vec<&Variant> = artwork
        .variants
        .iter()
        .filter(|v| contains_bounded(&normalize_size(&v.title), &key))
        .collect();
    match by_title.as_slice() {
        [only] => return Some(*only),
        [] => {}
        _ => return None,
    }

    let wanted = parse_print_size(desired_size)?;
    let by_size: Vec<&Variant> = artwork
        .variants
        .iter()
        .filter(|v| parse_print_size(&v.title).is_some_and(|size| same_dimensions(&size, &wanted)))
        .collect();
    match by_size.as_slice() {
        [only] => Some(*only),
        [] => None,
        several => {
            let upright: Vec<&Variant> = several
                .iter()
                .copied()
                .filter(|v| {
                    parse_print_size(&v.title).is_some_and(|size| size.orientation() == wanted.orientation())
                })
                .collect();
            match upright.as_slice() {
                [only] => Some(*only),
                _ => None,
            }
        }
    }
}

/// True if two sizes have the same sides, in either orientation.
pub fn same_dimensions(a: &PrintSize, b: &PrintSize) -> bool {
    let close = |x: f32, y: f32| (x - y).abs() < SIZE_TOLERANCE_CM;
    (close(a.width_cm, b.width_cm) && close(a.height_cm, b.height_cm))
        || (close(a.width_cm, b.height_cm) && close(a.height_cm, b.width_cm))
}

/// Prices `artwork` for `desired_size`.
///
/// Uses [`find_variant`]; when that finds nothing the first variant is used,
/// and an artwork without variants is priced at its base price. The returned
/// [`PriceSource`] says which happened. Nothing is logged;
/// [`checkout_lines`] reports the fallbacks that reach an order.
pub fn resolve_variant<'a>(artwork: &'a Artwork, desired_size: &str) -> ResolvedPrice<'a> {
    let Some(first) = artwork.variants.first() else {
        return ResolvedPrice {
            variant: None,
            price: artwork.price,
            source: PriceSource::BasePriceFallback,
        };
    };

    match find_variant(artwork, desired_size) {
        Some(variant) => ResolvedPrice {
            variant: Some(variant),
            price: variant.price,
            source: PriceSource::Exact,
        },
        None => ResolvedPrice {
            variant: Some(first),
            price: first.price,
            source: PriceSource::FirstVariantFallback,
        },
    }
}

/// True if the artwork can be ordered in `desired_size`.
///
/// Artworks without variants are sold at their base price in any size.
pub fn offers_size(artwork: &Artwork, desired_size: &str) -> bool {
    artwork.variants.is_empty() || find_variant(artwork, desired_size).is_some()
}

/// One priced frame of the composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Frame the artwork hangs in
    pub frame_index: FrameIndex,
    /// Catalog identifier of the artwork
    pub artwork_id: String,
    /// Artwork title
    pub title: String,
    /// Size the frame requires
    pub size: String,
    /// SKU to order, if resolved
    pub sku: Option<String>,
    /// Authoritative price
    pub price: f64,
    /// ISO currency code
    pub currency: String,
    /// How the price was found
    pub source: PriceSource,
}

impl LineItem {
    /// Prices `artwork` for the frame at `frame_index`.
    pub fn new(frame_index: FrameIndex, artwork: &Artwork, size: &str) -> Self {
        let resolved = resolve_variant(artwork, size);
        Self {
            frame_index,
            artwork_id: artwork.id.clone(),
            title: artwork.title.clone(),
            size: size.to_string(),
            sku: resolved.sku().map(str::to_string),
            price: resolved.price,
            currency: artwork.currency.clone(),
            source: resolved.source,
        }
    }
}

/// Sum of line item prices.
pub fn total(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.price).sum()
}

/// A custom attribute attached to a checkout line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name
    pub key: String,
    /// Attribute value
    pub value: String,
}

/// One line handed to the checkout collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    /// SKU to order
    pub sku_id: String,
    /// Number of prints
    pub quantity: u32,
    /// Frame position, size and finish
    pub custom_attributes: Vec<Attribute>,
}

/// Builds the checkout payload.
///
/// Items without a SKU are skipped with a warning, and items ordered as a
/// first-variant fallback are logged. Checkout is only refused when nothing
/// at all can be ordered.
///
/// # Arguments
///
/// * `items` - Priced frames
/// * `finish` - Frame finish chosen for the whole composition, if any
pub fn checkout_lines(items: &[LineItem], finish: Option<&str>) -> Result<Vec<CheckoutLine>, CheckoutError> {
    if items.is_empty() {
        return Err(CheckoutError::NothingSelected);
    }

    let lines: Vec<CheckoutLine> = items
        .iter()
        .filter_map(|item| {
            let Some(sku) = &item.sku else {
                log::warn!(
                    "frame {}: artwork {} has no SKU, leaving it out of checkout",
                    item.frame_index,
                    item.artwork_id
                );
                return None;
            };
            if item.source == PriceSource::FirstVariantFallback {
                log::warn!(
                    "frame {}: artwork {} has no unambiguous variant for size {:?}, ordering {sku}",
                    item.frame_index,
                    item.artwork_id,
                    item.size
                );
            }
            let mut custom_attributes = vec![
                Attribute {
                    key: "Frame".to_string(),
                    value: (item.frame_index + 1).to_string(),
                },
                Attribute {
                    key: "Size".to_string(),
                    value: item.size.clone(),
                },
            ];
            if let Some(finish) = finish {
                custom_attributes.push(Attribute {
                    key: "Finish".to_string(),
                    value: finish.to_string(),
                });
            }
            Some(CheckoutLine {
                sku_id: sku.clone(),
                quantity: 1,
                custom_attributes,
            })
        })
        .collect();

    if lines.is_empty() {
        return Err(CheckoutError::NoResolvableSkus(items.len()));
    }
    log::info!("checkout payload built with {} of {} lines", lines.len(), items.len());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poster() -> Artwork {
        Artwork::new("poster", "Poster", 19.0)
            .with_variant("sku-40", "40x50cm", 35.0)
            .with_variant("sku-50", "50x70cm", 49.0)
    }

    #[test]
    fn test_normalize_size() {
        assert_eq!(normalize_size(" 50 × 70 "), "50X70");
        assert_eq!(normalize_size("50x70cm"), "50X70CM");
        assert_eq!(normalize_size("50*70"), "50X70");
    }

    #[test]
    fn test_resolves_matching_variant() {
        let artwork = poster();
        let resolved = resolve_variant(&artwork, "50 × 70");
        assert_eq!(resolved.variant.unwrap().title, "50x70cm");
        assert_eq!(resolved.price, 49.0);
        assert_eq!(resolved.sku(), Some("sku-50"));
        assert_eq!(resolved.source, PriceSource::Exact);
    }

    #[test]
    fn test_no_match_falls_back_to_first_variant() {
        let artwork = poster();
        let resolved = resolve_variant(&artwork, "13x18");
        assert_eq!(resolved.variant.unwrap().id, "sku-40");
        assert_eq!(resolved.price, 35.0);
        assert_eq!(resolved.source, PriceSource::FirstVariantFallback);
    }

    #[test]
    fn test_empty_size_falls_back_to_first_variant() {
        let artwork = poster();
        assert_eq!(
            resolve_variant(&artwork, "  ").source,
            PriceSource::FirstVariantFallback
        );
    }

    #[test]
    fn test_no_variants_uses_base_price() {
        let artwork = Artwork::new("bare", "Bare", 25.0);
        let resolved = resolve_variant(&artwork, "30x40");
        assert!(resolved.variant.is_none());
        assert_eq!(resolved.sku(), None);
        assert_eq!(resolved.price, 25.0);
        assert_eq!(resolved.source, PriceSource::BasePriceFallback);
    }

    #[test]
    fn test_embedded_number_does_not_win() {
        let artwork = Artwork::new("a", "A", 10.0)
            .with_variant("sku-130", "130x40", 90.0)
            .with_variant("sku-30", "30x40", 30.0);
        let resolved = resolve_variant(&artwork, "30x40");
        assert_eq!(resolved.sku(), Some("sku-30"));
        assert_eq!(resolved.source, PriceSource::Exact);
    }

    #[test]
    fn test_lone_embedded_match_is_not_exact() {
        let artwork = Artwork::new("a", "A", 10.0)
            .with_variant("sku-50", "50x70cm", 50.0)
            .with_variant("sku-130", "130x40cm", 90.0);
        let resolved = resolve_variant(&artwork, "30x40");
        assert_eq!(resolved.sku(), Some("sku-50"));
        assert_eq!(resolved.source, PriceSource::FirstVariantFallback);
        assert!(!offers_size(&artwork, "30x40"));
    }

    /// Collects warnings so tests can see what was logged.
    struct WarningLog;

    static WARNINGS: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());

    impl log::Log for WarningLog {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn warnings_mentioning(id: &str) -> usize {
        WARNINGS.lock().unwrap().iter().filter(|w| w.contains(id)).count()
    }

    #[test]
    fn test_only_checkout_reports_fallbacks() {
        static LOGGER: WarningLog = WarningLog;
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Warn);

        let artwork = Artwork::new("quiet-print", "Quiet", 10.0).with_variant("sku-q", "50x70cm", 50.0);
        for _ in 0..3 {
            assert!(!offers_size(&artwork, "13x18"));
            assert_eq!(resolve_variant(&artwork, "13x18").source, PriceSource::FirstVariantFallback);
        }
        let items = vec![LineItem::new(0, &artwork, "13x18")];
        assert_eq!(warnings_mentioning("quiet-print"), 0);

        checkout_lines(&items, None).unwrap();
        assert_eq!(warnings_mentioning("quiet-print"), 1);
    }

    #[test]
    fn test_titles_in_other_notations_match_by_dimensions() {
        let artwork = Artwork::new("a", "A", 10.0)
            .with_variant("sku-a4", "A4", 29.0)
            .with_variant("sku-a3", "A3", 39.0);
        assert_eq!(find_variant(&artwork, "29.7 x 42 cm").map(|v| v.id.as_str()), Some("sku-a3"));
        assert_eq!(find_variant(&artwork, "42x29.7").map(|v| v.id.as_str()), Some("sku-a3"));
        assert!(find_variant(&artwork, "30x40").is_none());
    }

    #[test]
    fn test_same_orientation_wins_between_turned_variants() {
        let artwork = Artwork::new("a", "A", 10.0)
            .with_variant("tall", "12x16in", 30.0)
            .with_variant("wide", "16x12in", 31.0);
        assert_eq!(find_variant(&artwork, "40.64x30.48").map(|v| v.id.as_str()), Some("wide"));
    }

    #[test]
    fn test_ambiguous_match_falls_back_to_first_variant() {
        let artwork = Artwork::new("a", "A", 10.0)
            .with_variant("sku-black", "30x40cm / Black", 30.0)
            .with_variant("sku-white", "30x40cm / White", 32.0);
        let resolved = resolve_variant(&artwork, "30x40");
        assert_eq!(resolved.sku(), Some("sku-black"));
        assert_eq!(resolved.source, PriceSource::FirstVariantFallback);
    }

    #[test]
    fn test_variant_price_beats_base_price() {
        let artwork = poster();
        let item = LineItem::new(0, &artwork, "40x50");
        assert_eq!(item.price, 35.0);
        assert_ne!(item.price, artwork.price);
    }

    #[test]
    fn test_offers_size() {
        let artwork = poster();
        assert!(offers_size(&artwork, "40 x 50"));
        assert!(!offers_size(&artwork, "13x18"));
        assert!(offers_size(&Artwork::new("bare", "Bare", 1.0), "13x18"));
    }

    #[test]
    fn test_checkout_lines_carry_attributes() {
        let items = vec![
            LineItem::new(0, &poster(), "50x70"),
            LineItem::new(2, &poster(), "40x50"),
        ];
        assert_eq!(total(&items), 84.0);

        let lines = checkout_lines(&items, Some("Oak")).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].sku_id, "sku-50");
        assert_eq!(lines[0].quantity, 1);
        assert_eq!(
            lines[1].custom_attributes,
            vec![
                Attribute { key: "Frame".into(), value: "3".into() },
                Attribute { key: "Size".into(), value: "40x50".into() },
                Attribute { key: "Finish".into(), value: "Oak".into() },
            ]
        );

        let json = serde_json::to_value(&lines[0]).unwrap();
        assert_eq!(json["skuId"], "sku-50");
    }

    #[test]
    fn test_checkout_skips_items_without_sku() {
        let items = vec![
            LineItem::new(0, &Artwork::new("bare", "Bare", 5.0), "30x40"),
            LineItem::new(1, &poster(), "50x70"),
        ];
        let lines = checkout_lines(&items, None).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].custom_attributes.len(), 2);
    }

    #[test]
    fn test_checkout_blocked_without_any_sku() {
        let items = vec![LineItem::new(0, &Artwork::new("bare", "Bare", 5.0), "30x40")];
        assert_eq!(checkout_lines(&items, None), Err(CheckoutError::NoResolvableSkus(1)));
        assert_eq!(checkout_lines(&[], None), Err(CheckoutError::NothingSelected));
    }
}
