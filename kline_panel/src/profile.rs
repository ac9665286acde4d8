use serde::{Deserialize, Serialize};

use crate::touch::{Rotation, TouchCalibration};

/// Spacing knobs for the screen layout, in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMargins {
    pub margin: u32,
    pub header_height: u32,
    pub button_height: u32,
    pub button_gap: u32,
    /// Room reserved right of the bars for the min/max labels.
    pub label_width: u32,
    pub chart_padding: u32,
    pub draw_frame: bool,
}

impl Default for LayoutMargins {
    fn default() -> Self {
        Self {
            margin: 4,
            header_height: 56,
            button_height: 26,
            button_gap: 4,
            label_width: 44,
            chart_padding: 6,
            draw_frame: true,
        }
    }
}

/// Everything that differs between hardware revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayProfile {
    pub name: String,
    pub native_width: u32,
    pub native_height: u32,
    pub rotation: Rotation,
    pub calibration: TouchCalibration,
    pub layout: LayoutMargins,
}

impl DisplayProfile {
    pub fn effective_size(&self) -> (u32, u32) {
        self.rotation.apply(self.native_width, self.native_height)
    }
}

impl Default for DisplayProfile {
    fn default() -> Self {
        Self {
            name: "esp32-2432s028".to_string(),
            native_width: 240,
            native_height: 320,
            rotation: Rotation::Landscape,
            calibration: TouchCalibration::default(),
            layout: LayoutMargins::default(),
        }
    }
}
