use serde::{Deserialize, Serialize};

/// Purely local rendering switches, only consumed when building stream URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub draw_detections: bool,
    pub apply_blur: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            draw_detections: true,
            apply_blur: true,
        }
    }
}

impl DisplaySettings {
    pub fn merge(&mut self, update: &DisplaySettingsUpdate) {
        if let Some(draw_detections) = update.draw_detections {
            self.draw_detections = draw_detections;
        }
        if let Some(apply_blur) = update.apply_blur {
            self.apply_blur = apply_blur;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplaySettingsUpdate {
    pub draw_detections: Option<bool>,
    pub apply_blur: Option<bool>,
}

impl DisplaySettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draw_detections(mut self, draw_detections: bool) -> Self {
        self.draw_detections = Some(draw_detections);
        self
    }

    pub fn with_apply_blur(mut self, apply_blur: bool) -> Self {
        self.apply_blur = Some(apply_blur);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge() {
        let mut settings = DisplaySettings::default();
        settings.merge(&DisplaySettingsUpdate::new().with_apply_blur(false));
        assert!(settings.draw_detections);
        assert!(!settings.apply_blur);
    }
}
