//! Editor configuration.

use crate::element::ElementStyle;
use crate::storage::DEFAULT_AUTOSAVE_INTERVAL_MS;
use crate::viewport::{MAX_ZOOM, MIN_ZOOM};
use serde::{Deserialize, Serialize};

/// Tunables for an [`Editor`](crate::editor::Editor). Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fractional zoom change per modified wheel notch.
    pub wheel_zoom_step: f64,
    pub autosave_interval_ms: u64,
    /// Maximum undo depth, unlimited when `None`.
    pub history_limit: Option<usize>,
    pub default_style: ElementStyle,
    /// Install the welcome scene when the loaded scene is empty.
    pub seed_initial_content: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_zoom_step: 0.1,
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
            history_limit: None,
            default_style: ElementStyle::default(),
            seed_initial_content: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
