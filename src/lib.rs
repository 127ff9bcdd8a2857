//! # Gallery Wall
//!
//! Layout and interaction engine for composing multi-frame gallery walls.
//! A shopper picks an arrangement of frames, sizes it to their wall, drags it
//! into place and hangs an artwork in each frame; the engine resolves what to
//! draw and what to charge.
//!
//! ## Components
//! - [`geometry`] - Turns template slots plus size, orientation, wall scale and
//!   spacing choices into to-scale frame geometry
//! - [`drag`] - Group and individual drag gestures with click detection
//! - [`history`] - Bounded undo/redo of layout snapshots
//! - [`matching`] - Artwork filtering tolerant of missing catalog metadata
//! - [`pricing`] - Variant resolution, line items and the checkout payload
//! - [`session`] - One shopper's configurator state tying the above together
//!
//! The `gallery_wall` binary opens a desktop preview built on eframe.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod constants;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod history;
pub mod matching;
pub mod pricing;
pub mod samples;
pub mod session;
pub mod types;
mod ui;

pub use config::EngineConfig;
pub use error::{CheckoutError, LoadError};
pub use session::{LayoutSession, LayoutSnapshot, PlacedFrame, TemplateChange};
pub use types::*;
pub use ui::{PreviewApp, PreviewSettings};

/// Runs the preview window.
///
/// Presentation settings saved by a previous run are restored from eframe's
/// storage.
///
/// # Returns
///
/// Returns `Ok(())` when the window closes, or an `eframe::Error` if
/// initialization fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     gallery_wall::run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Gallery Wall",
        options,
        Box::new(|cc| Ok(Box::new(PreviewApp::restore(cc.storage)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{build_sample, SampleKind};

    #[test]
    fn test_session_from_sample() {
        let session = LayoutSession::new(build_sample(SampleKind::Salon), EngineConfig::default());
        assert_eq!(session.frames().len(), 5);
        assert!(session.artworks().is_empty());
        assert!(session.is_locked());
    }

    #[test]
    fn test_template_from_json() {
        let json = r#"{
            "id": "pair",
            "name": "Pair",
            "frames": [
                {"size": "30x40", "top": 20, "left": 20, "width": 15, "height": 30},
                {"size": "30x40", "top": 20, "left": 60, "width": 15, "height": 30}
            ]
        }"#;
        let template = LayoutTemplate::from_json(json).unwrap();
        let session = LayoutSession::new(template, EngineConfig::default());
        let frames = session.frames();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| !f.fallback));
    }
}
