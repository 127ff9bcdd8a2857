//! Preview application state.
//!
//! The preview owns one [`LayoutSession`] plus the browsing state of the
//! artwork picker. Only presentation settings survive a restart; the layout
//! itself is rebuilt from the sample template every launch.

use crate::config::EngineConfig;
use crate::matching::{ArtworkFilter, RevealPager};
use crate::samples::{all_samples, build_sample, sample_catalog, SampleKind};
use crate::session::{LayoutSession, TemplateChange};
use crate::types::*;
use eframe::egui;
use serde::{Deserialize, Serialize};

/// Key under which [`PreviewSettings`] are stored.
pub const SETTINGS_KEY: &str = "preview_settings";

/// Settings persisted between restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Unit for size labels
    pub unit: SizeUnit,
    /// Identifier of the last template shown
    pub template_id: String,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            unit: SizeUnit::Centimeters,
            template_id: "trio".to_string(),
            dark_mode: true,
        }
    }
}

impl PreviewSettings {
    /// Serializes the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The preview window's state.
///
/// Implements `eframe::App` in the parent module.
pub struct PreviewApp {
    /// The configurator session being previewed
    pub session: LayoutSession,
    /// Artworks offered in the picker
    pub catalog: Vec<Artwork>,
    /// Picker filter selections
    pub filter: ArtworkFilter,
    /// Text of the picker's search box
    pub search: String,
    /// Staged reveal of picker results
    pub pager: RevealPager,
    /// Input time at which the pending reveal completes
    pub reveal_due: Option<f64>,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Wall rectangle drawn in the last frame
    pub last_wall_rect: Option<egui::Rect>,
    /// Outcome of the last checkout attempt, shown under the total
    pub checkout_status: Option<String>,
}

impl Default for PreviewApp {
    fn default() -> Self {
        Self::new(PreviewSettings::default())
    }
}

impl PreviewApp {
    /// Builds the preview from restored settings.
    ///
    /// An unknown template id falls back to the first sample.
    pub fn new(settings: PreviewSettings) -> Self {
        let config = EngineConfig::default();
        let template = find_sample(&settings.template_id).unwrap_or_else(|| {
            log::warn!("unknown template {:?}, showing the first sample", settings.template_id);
            build_sample(SampleKind::Solo)
        });
        let pager = RevealPager::new(config.reveal_page_size);
        let mut session = LayoutSession::new(template, config);
        session.set_unit(settings.unit);
        Self {
            session,
            catalog: sample_catalog(),
            filter: ArtworkFilter::default(),
            search: String::new(),
            pager,
            reveal_due: None,
            dark_mode: settings.dark_mode,
            last_wall_rect: None,
            checkout_status: None,
        }
    }

    /// Builds the preview from eframe's storage, if any was saved.
    pub fn restore(storage: Option<&dyn eframe::Storage>) -> Self {
        let settings = storage
            .and_then(|storage| storage.get_string(SETTINGS_KEY))
            .and_then(|json| {
                PreviewSettings::from_json(&json)
                    .map_err(|err| log::warn!("Discarding stored preview settings: {err}"))
                    .ok()
            })
            .unwrap_or_default();
        Self::new(settings)
    }

    /// Settings to persist.
    pub fn settings(&self) -> PreviewSettings {
        PreviewSettings {
            unit: self.session.unit(),
            template_id: self.session.template().id.clone(),
            dark_mode: self.dark_mode,
        }
    }

    /// Asks the session to switch templates; the confirmation dialog opens if needed.
    pub fn select_template(&mut self, kind: SampleKind) {
        let template = build_sample(kind);
        if template.id == self.session.template().id {
            return;
        }
        if self.session.request_template(template) == TemplateChange::Applied {
            self.on_template_replaced();
        }
    }

    /// Applies the template waiting for confirmation.
    pub fn confirm_template_change(&mut self) {
        if self.session.confirm_template_change() {
            self.on_template_replaced();
        }
    }

    fn on_template_replaced(&mut self) {
        self.pager.reset();
        self.reveal_due = None;
        self.checkout_status = None;
    }

    /// Undoes the last layout change.
    pub fn perform_undo(&mut self) {
        self.session.undo();
    }

    /// Redoes the last undone layout change.
    pub fn perform_redo(&mut self) {
        self.session.redo();
    }

    /// Filter or frame changed: results start over at the first page.
    pub fn restart_reveal(&mut self) {
        self.pager.reset();
        self.reveal_due = None;
    }
}

fn find_sample(id: &str) -> Option<LayoutTemplate> {
    all_samples()
        .iter()
        .map(|info| build_sample(info.kind))
        .find(|template| template.id == id)
}
