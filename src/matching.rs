//! Artwork matching against shopper filters.
//!
//! Each filter dimension is a multi-select: selected values combine with OR
//! inside a dimension and with AND across dimensions. Catalog records are
//! often under-tagged, so an artwork that declares nothing for a dimension is
//! kept rather than hidden. When it does declare something, values compare
//! case-insensitively in both directions ("blue" matches "Navy Blue" and vice
//! versa), with tags, title and category as a second chance.

use crate::geometry::{format_length, parse_print_size};
use crate::pricing::{normalize_size, offers_size, same_dimensions};
use crate::types::{Artwork, Orientation, PrintSize, SizeUnit};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A filterable attribute of an artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterDimension {
    /// Free-text search
    Text,
    /// Dominant colors
    Color,
    /// Portrait, landscape or square
    Orientation,
    /// Print size
    Size,
    /// Art style
    Style,
    /// Collection (catalog category)
    Collection,
    /// Artist
    Artist,
    /// Room the artwork suits
    Room,
}

impl FilterDimension {
    /// Every dimension, in display order.
    pub const ALL: [FilterDimension; 8] = [
        FilterDimension::Text,
        FilterDimension::Color,
        FilterDimension::Orientation,
        FilterDimension::Size,
        FilterDimension::Style,
        FilterDimension::Collection,
        FilterDimension::Artist,
        FilterDimension::Room,
    ];

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            FilterDimension::Text => "Search",
            FilterDimension::Color => "Color",
            FilterDimension::Orientation => "Orientation",
            FilterDimension::Size => "Size",
            FilterDimension::Style => "Style",
            FilterDimension::Collection => "Collection",
            FilterDimension::Artist => "Artist",
            FilterDimension::Room => "Room",
        }
    }
}

/// What an artwork declares for one dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata<'a> {
    /// Nothing declared; the artwork passes any filter on this dimension
    Unknown,
    /// Declared values
    Known(Vec<Cow<'a, str>>),
}

/// Reads an artwork's metadata for a dimension.
pub fn metadata(artwork: &Artwork, dimension: FilterDimension) -> Metadata<'_> {
    fn listed(values: &Option<Vec<String>>) -> Metadata<'_> {
        match values {
            Some(values) if values.iter().any(|v| !v.trim().is_empty()) => {
                Metadata::Known(values.iter().map(|v| Cow::Borrowed(v.as_str())).collect())
            }
            _ => Metadata::Unknown,
        }
    }

    match dimension {
        FilterDimension::Text => {
            let mut values = vec![Cow::Borrowed(artwork.title.as_str())];
            values.extend(artwork.tags.iter().map(|t| Cow::Borrowed(t.as_str())));
            values.extend(artwork.category.iter().map(|c| Cow::Borrowed(c.as_str())));
            values.extend(artwork.vendor.iter().map(|v| Cow::Borrowed(v.as_str())));
            values.extend(artwork.artists.iter().flatten().map(|a| Cow::Borrowed(a.as_str())));
            Metadata::Known(values)
        }
        FilterDimension::Color => listed(&artwork.colors),
        FilterDimension::Style => listed(&artwork.styles),
        FilterDimension::Room => listed(&artwork.rooms),
        FilterDimension::Collection => match artwork.category.as_deref() {
            Some(category) if !category.trim().is_empty() => {
                Metadata::Known(vec![Cow::Borrowed(category)])
            }
            _ => Metadata::Unknown,
        },
        FilterDimension::Artist => match listed(&artwork.artists) {
            Metadata::Unknown => match artwork.vendor.as_deref() {
                Some(vendor) if !vendor.trim().is_empty() => {
                    Metadata::Known(vec![Cow::Borrowed(vendor)])
                }
                _ => Metadata::Unknown,
            },
            known => known,
        },
        FilterDimension::Size => {
            if artwork.variants.is_empty() {
                Metadata::Unknown
            } else {
                Metadata::Known(
                    artwork
                        .variants
                        .iter()
                        .map(|v| Cow::Borrowed(v.title.as_str()))
                        .collect(),
                )
            }
        }
        FilterDimension::Orientation => {
            let mut orientations: Vec<Orientation> = artwork
                .variants
                .iter()
                .filter_map(|v| parse_print_size(&v.title))
                .map(|size| size.orientation())
                .collect();
            orientations.dedup();
            if orientations.is_empty() {
                Metadata::Unknown
            } else {
                Metadata::Known(orientations.into_iter().map(|o| Cow::Borrowed(o.name())).collect())
            }
        }
    }
}

/// Case-insensitive substring match in either direction.
fn loosely_equal(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// Compares a selected size with a variant title.
///
/// When both parse as print sizes their dimensions decide, in either
/// orientation, so "29.7x42" selects an "A3" variant. Otherwise the
/// normalized strings are compared loosely.
fn sizes_match(wanted: &str, title: &str) -> bool {
    match (parse_print_size(wanted), parse_print_size(title)) {
        (Some(wanted), Some(have)) => same_dimensions(&wanted, &have),
        _ => loosely_equal(&normalize_size(wanted), &normalize_size(title)),
    }
}

/// Shopper filter selections, one multi-select per dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtworkFilter {
    /// Free-text search terms
    pub text: Vec<String>,
    /// Selected colors
    pub colors: Vec<String>,
    /// Selected orientations ("portrait", "landscape", "square")
    pub orientations: Vec<String>,
    /// Selected print sizes
    pub sizes: Vec<String>,
    /// Selected styles
    pub styles: Vec<String>,
    /// Selected collections
    pub collections: Vec<String>,
    /// Selected artists
    pub artists: Vec<String>,
    /// Selected rooms
    pub rooms: Vec<String>,
}

impl ArtworkFilter {
    /// Selected values for a dimension.
    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Text => &self.text,
            FilterDimension::Color => &self.colors,
            FilterDimension::Orientation => &self.orientations,
            FilterDimension::Size => &self.sizes,
            FilterDimension::Style => &self.styles,
            FilterDimension::Collection => &self.collections,
            FilterDimension::Artist => &self.artists,
            FilterDimension::Room => &self.rooms,
        }
    }

    fn values_mut(&mut self, dimension: FilterDimension) -> &mut Vec<String> {
        match dimension {
            FilterDimension::Text => &mut self.text,
            FilterDimension::Color => &mut self.colors,
            FilterDimension::Orientation => &mut self.orientations,
            FilterDimension::Size => &mut self.sizes,
            FilterDimension::Style => &mut self.styles,
            FilterDimension::Collection => &mut self.collections,
            FilterDimension::Artist => &mut self.artists,
            FilterDimension::Room => &mut self.rooms,
        }
    }

    /// Adds the value to a dimension's selection, or removes it if present.
    pub fn toggle(&mut self, dimension: FilterDimension, value: &str) {
        let values = self.values_mut(dimension);
        if let Some(pos) = values.iter().position(|v| v.eq_ignore_ascii_case(value)) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
    }

    /// True if the value is selected for the dimension.
    pub fn is_selected(&self, dimension: FilterDimension, value: &str) -> bool {
        self.values(dimension).iter().any(|v| v.eq_ignore_ascii_case(value))
    }

    /// Replaces the free-text search with the whitespace-separated words of `query`.
    pub fn set_search(&mut self, query: &str) {
        self.text = query.split_whitespace().map(str::to_string).collect();
    }

    /// Clears one dimension.
    pub fn clear_dimension(&mut self, dimension: FilterDimension) {
        self.values_mut(dimension).clear();
    }

    /// Whether a dimension has any non-blank selection.
    pub fn is_active(&self, dimension: FilterDimension) -> bool {
        self.values(dimension).iter().any(|v| !v.trim().is_empty())
    }

    /// Whether any dimension is active.
    pub fn any_active(&self) -> bool {
        FilterDimension::ALL.iter().any(|d| self.is_active(*d))
    }
}

/// Whether an artwork passes one dimension of the filter.
///
/// Inactive dimensions and artworks with no metadata for the dimension pass.
pub fn matches_dimension(artwork: &Artwork, dimension: FilterDimension, selected: &[String]) -> bool {
    let selected: Vec<&str> = selected
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if selected.is_empty() {
        return true;
    }

    let declared = match metadata(artwork, dimension) {
        Metadata::Unknown => return true,
        Metadata::Known(values) => values,
    };

    let compare = |wanted: &str, have: &str| {
        if dimension == FilterDimension::Size {
            sizes_match(wanted, have)
        } else {
            loosely_equal(wanted, have)
        }
    };
    if selected
        .iter()
        .any(|wanted| declared.iter().any(|have| compare(*wanted, &**have)))
    {
        return true;
    }

    // Second chance: the value may only appear in tags, title or category
    let secondary = artwork
        .tags
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(artwork.title.as_str()))
        .chain(artwork.category.as_deref());
    secondary
        .into_iter()
        .any(|have| selected.iter().any(|wanted| loosely_equal(wanted, have)))
}

/// Whether an artwork passes every active dimension of the filter.
pub fn matches(artwork: &Artwork, filter: &ArtworkFilter) -> bool {
    FilterDimension::ALL
        .iter()
        .all(|d| matches_dimension(artwork, *d, filter.values(*d)))
}

/// Artworks passing the filter, in catalog order.
///
/// The active frame's size and orientation are not applied here; see
/// [`artworks_for_frame`].
pub fn filter_catalog<'a>(catalog: &'a [Artwork], filter: &ArtworkFilter) -> Vec<&'a Artwork> {
    catalog.iter().filter(|a| matches(a, filter)).collect()
}

/// Artworks passing the filter that also fit a frame.
///
/// An artwork fits when it can be ordered in `frame_size` and, if its
/// variants declare orientations, one of them is `orientation`.
pub fn artworks_for_frame<'a>(
    catalog: &'a [Artwork],
    filter: &ArtworkFilter,
    frame_size: &str,
    orientation: Orientation,
) -> Vec<&'a Artwork> {
    catalog
        .iter()
        .filter(|a| {
            matches(a, filter) && offers_size(a, frame_size) && offers_orientation(a, orientation)
        })
        .collect()
}

/// Whether an artwork can hang in the given orientation.
///
/// Artworks whose variants declare no parseable size pass.
pub fn offers_orientation(artwork: &Artwork, orientation: Orientation) -> bool {
    match metadata(artwork, FilterDimension::Orientation) {
        Metadata::Unknown => true,
        Metadata::Known(declared) => declared.iter().any(|o| o == orientation.name()),
    }
}

/// Distinct declared values for a dimension across the catalog, for filter chips.
pub fn facet_values(catalog: &[Artwork], dimension: FilterDimension) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    match dimension {
        FilterDimension::Text => {}
        FilterDimension::Size => {
            let mut seen: Vec<PrintSize> = Vec::new();
            for variant in catalog.iter().flat_map(|a| &a.variants) {
                let Some(size) = parse_print_size(&variant.title) else {
                    continue;
                };
                if seen.iter().any(|s| same_dimensions(s, &size)) {
                    continue;
                }
                values.push(format!(
                    "{}x{}",
                    format_length(size.width_cm, SizeUnit::Centimeters),
                    format_length(size.height_cm, SizeUnit::Centimeters)
                ));
                seen.push(size);
            }
        }
        _ => {
            for artwork in catalog {
                if let Metadata::Known(declared) = metadata(artwork, dimension) {
                    for value in declared {
                        let value = value.trim();
                        if !value.is_empty() && !values.iter().any(|v| v.eq_ignore_ascii_case(value)) {
                            values.push(value.to_string());
                        }
                    }
                }
            }
        }
    }
    values.sort_by_key(|v| v.to_lowercase());
    values
}

/// Staged "show more" paging of a result list.
///
/// A reveal is requested, then completed after an artificial delay owned by
/// the caller. While one is pending, further requests are refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealPager {
    visible: usize,
    page_size: usize,
    pending: bool,
}

impl RevealPager {
    /// Creates a pager showing one page.
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            visible: page_size,
            page_size,
            pending: false,
        }
    }

    /// Number of items to show out of `total`.
    pub fn visible_count(&self, total: usize) -> usize {
        self.visible.min(total)
    }

    /// Whether items remain hidden.
    pub fn has_more(&self, total: usize) -> bool {
        self.visible < total
    }

    /// Whether a reveal is waiting to complete.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Starts a reveal.
    ///
    /// # Returns
    ///
    /// `false` if a reveal is already pending or nothing is hidden.
    pub fn request_more(&mut self, total: usize) -> bool {
        if self.pending || !self.has_more(total) {
            return false;
        }
        self.pending = true;
        true
    }

    /// Completes the pending reveal, showing one more page.
    pub fn complete(&mut self) {
        if self.pending {
            self.visible += self.page_size;
            self.pending = false;
        }
    }

    /// Back to the first page, dropping any pending reveal.
    pub fn reset(&mut self) {
        self.visible = self.page_size;
        self.pending = false;
    }
}
