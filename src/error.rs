//! Error types for the few operations that can genuinely fail.
//!
//! Layout, matching and pricing never fail on bad input; they degrade and log.
//! Only loading external data and building a checkout payload report errors.

use thiserror::Error;

/// Failure to build a checkout payload from the current selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// No frame has an artwork assigned.
    #[error("no frames have artwork assigned")]
    NothingSelected,
    /// Artwork is assigned, but none of it resolves to a purchasable SKU.
    #[error("none of the {0} selected artworks resolves to a purchasable SKU")]
    NoResolvableSkus(usize),
}

/// Failure to load templates, catalogs or configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The JSON document was malformed or did not match the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
