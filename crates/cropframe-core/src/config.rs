//! Editor configuration.
//!
//! A configuration is fixed when the editor is created and may later be
//! partially overridden with an [`EditorConfigPatch`]. Patches merge one
//! level deep:
//!
//! - top-level scalar fields replace the current value
//! - nested objects (`minimumCropDimensions`, `coverMarker`, `controlBar`)
//!   merge field by field
//! - objects nested deeper than that (the control bar buttons) replace
//!   the current value wholesale
//!
//! The merged result is validated before it is accepted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::Size;

/// Default minimum crop size in screen pixels.
pub const DEFAULT_MINIMUM_CROP_DIMENSIONS: Size = Size {
    width: 100.0,
    height: 100.0,
};

/// Whether the crop frame keeps a fixed width/height ratio.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode", content = "ratio")]
pub enum AspectMode {
    /// Width and height resize independently.
    #[default]
    Dynamic,
    /// `width / height` is locked to the given ratio.
    Fixed(f64),
}

impl AspectMode {
    /// The locked ratio, if any.
    pub fn ratio(self) -> Option<f64> {
        match self {
            AspectMode::Dynamic => None,
            AspectMode::Fixed(ratio) => Some(ratio),
        }
    }
}

/// Placement of the control bar relative to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlBarPosition {
    #[default]
    Top,
    Bottom,
}

/// Appearance of one control bar button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonOptions {
    pub color: String,
    pub icon_name: String,
    pub text: String,
}

impl ButtonOptions {
    fn new(color: &str, icon_name: &str, text: &str) -> Self {
        Self {
            color: color.to_string(),
            icon_name: icon_name.to_string(),
            text: text.to_string(),
        }
    }
}

/// Corner markers drawn on the crop frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverMarker {
    pub show: bool,
    pub color: String,
}

impl Default for CoverMarker {
    fn default() -> Self {
        Self {
            show: true,
            color: "#fff".to_string(),
        }
    }
}

/// Control bar layout and buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlBarOptions {
    pub position: ControlBarPosition,
    pub height: f64,
    pub background_color: String,
    pub cancel_button: ButtonOptions,
    pub crop_button: ButtonOptions,
    pub back_button: ButtonOptions,
    pub save_button: ButtonOptions,
}

impl Default for ControlBarOptions {
    fn default() -> Self {
        Self {
            position: ControlBarPosition::Top,
            height: 80.0,
            background_color: "#333".to_string(),
            cancel_button: ButtonOptions::new("#fff", "cancel", "Cancel"),
            crop_button: ButtonOptions::new("#fff", "crop", "Crop"),
            back_button: ButtonOptions::new("#fff", "arrow-back", "Back"),
            save_button: ButtonOptions::new("#fff", "done", "Save"),
        }
    }
}

/// Visual theming. Carried for the host's view layer; the geometry engine
/// never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    pub background_color: String,
    pub overlay_crop_color: String,
    pub grid_overlay_color: String,
    pub cover_marker: CoverMarker,
    pub control_bar: ControlBarOptions,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            background_color: "#222".to_string(),
            overlay_crop_color: "#33333355".to_string(),
            grid_overlay_color: "#ffffff88".to_string(),
            cover_marker: CoverMarker::default(),
            control_bar: ControlBarOptions::default(),
        }
    }
}

/// Complete, validated editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Smallest crop frame the user can resize to, in screen pixels.
    pub minimum_crop_dimensions: Size,
    /// Fixed-ratio or dynamic cropping.
    pub aspect: AspectMode,
    /// Theming for the host view layer.
    pub options: EditorOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            minimum_crop_dimensions: DEFAULT_MINIMUM_CROP_DIMENSIONS,
            aspect: AspectMode::Dynamic,
            options: EditorOptions::default(),
        }
    }
}

impl EditorConfig {
    /// Default configuration with a fixed aspect ratio.
    pub fn fixed(ratio: f64) -> Result<Self, ConfigError> {
        let config = Self {
            aspect: AspectMode::Fixed(ratio),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from the defaults overridden by `patch`.
    pub fn from_patch(patch: EditorConfigPatch) -> Result<Self, ConfigError> {
        Self::default().merge(patch)
    }

    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let AspectMode::Fixed(ratio) = self.aspect {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(ConfigError::InvalidAspectRatio(ratio));
            }
        }

        let min = self.minimum_crop_dimensions;
        if !min.width.is_finite() || !min.height.is_finite() || min.width < 0.0 || min.height < 0.0
        {
            return Err(ConfigError::InvalidMinimumDimensions {
                width: min.width,
                height: min.height,
            });
        }

        let height = self.options.control_bar.height;
        if !height.is_finite() || height <= 0.0 {
            return Err(ConfigError::InvalidControlBarHeight(height));
        }

        Ok(())
    }

    /// Apply `patch` on top of this configuration.
    ///
    /// Returns the merged configuration, or the validation error; `self` is
    /// consumed either way, so callers that need to keep the previous value
    /// on failure should merge a clone.
    pub fn merge(mut self, patch: EditorConfigPatch) -> Result<Self, ConfigError> {
        if let Some(min) = patch.minimum_crop_dimensions {
            if let Some(width) = min.width {
                self.minimum_crop_dimensions.width = width;
            }
            if let Some(height) = min.height {
                self.minimum_crop_dimensions.height = height;
            }
        }

        if patch.dynamic_crop == Some(true) {
            self.aspect = AspectMode::Dynamic;
        } else if let Some(ratio) = patch.fixed_aspect_ratio {
            self.aspect = AspectMode::Fixed(ratio);
        } else if patch.dynamic_crop == Some(false) {
            log::warn!("dynamicCrop=false without fixedAspectRatio keeps {:?}", self.aspect);
        }

        if let Some(options) = patch.editor_options {
            self.options.merge(options);
        }

        self.validate()?;
        Ok(self)
    }
}

impl EditorOptions {
    fn merge(&mut self, patch: EditorOptionsPatch) {
        if let Some(color) = patch.background_color {
            self.background_color = color;
        }
        if let Some(color) = patch.overlay_crop_color {
            self.overlay_crop_color = color;
        }
        if let Some(color) = patch.grid_overlay_color {
            self.grid_overlay_color = color;
        }

        if let Some(marker) = patch.cover_marker {
            if let Some(show) = marker.show {
                self.cover_marker.show = show;
            }
            if let Some(color) = marker.color {
                self.cover_marker.color = color;
            }
        }

        if let Some(bar) = patch.control_bar {
            let current = &mut self.control_bar;
            if let Some(position) = bar.position {
                current.position = position;
            }
            if let Some(height) = bar.height {
                current.height = height;
            }
            if let Some(color) = bar.background_color {
                current.background_color = color;
            }
            if let Some(button) = bar.cancel_button {
                current.cancel_button = button;
            }
            if let Some(button) = bar.crop_button {
                current.crop_button = button;
            }
            if let Some(button) = bar.back_button {
                current.back_button = button;
            }
            if let Some(button) = bar.save_button {
                current.save_button = button;
            }
        }
    }
}

/// Partial minimum crop dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizePatch {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Partial cover marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverMarkerPatch {
    pub show: Option<bool>,
    pub color: Option<String>,
}

/// Partial control bar. Buttons are replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlBarPatch {
    pub position: Option<ControlBarPosition>,
    pub height: Option<f64>,
    pub background_color: Option<String>,
    pub cancel_button: Option<ButtonOptions>,
    pub crop_button: Option<ButtonOptions>,
    pub back_button: Option<ButtonOptions>,
    pub save_button: Option<ButtonOptions>,
}

/// Partial theming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorOptionsPatch {
    pub background_color: Option<String>,
    pub overlay_crop_color: Option<String>,
    pub grid_overlay_color: Option<String>,
    pub cover_marker: Option<CoverMarkerPatch>,
    pub control_bar: Option<ControlBarPatch>,
}

/// Caller-supplied overrides, shaped like the host's editor props.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfigPatch {
    pub minimum_crop_dimensions: Option<SizePatch>,
    /// Selects fixed-ratio mode unless `dynamic_crop` is `Some(true)`.
    pub fixed_aspect_ratio: Option<f64>,
    pub dynamic_crop: Option<bool>,
    pub editor_options: Option<EditorOptionsPatch>,
}

impl EditorConfigPatch {
    /// True if applying this patch could change crop geometry (as opposed to
    /// theming only).
    pub fn touches_geometry(&self) -> bool {
        self.minimum_crop_dimensions.is_some()
            || self.fixed_aspect_ratio.is_some()
            || self.dynamic_crop.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.minimum_crop_dimensions, Size::new(100.0, 100.0));
        assert_eq!(config.aspect, AspectMode::Dynamic);
        assert_eq!(config.options.control_bar.position, ControlBarPosition::Top);
        assert_eq!(config.options.control_bar.height, 80.0);
        assert_eq!(config.options.control_bar.save_button.icon_name, "done");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let merged = EditorConfig::default()
            .merge(EditorConfigPatch::default())
            .unwrap();
        assert_eq!(merged, EditorConfig::default());
    }

    #[test]
    fn test_fixed_ratio_patch() {
        let config = EditorConfig::from_patch(EditorConfigPatch {
            fixed_aspect_ratio: Some(1.5),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.aspect, AspectMode::Fixed(1.5));
        assert_eq!(config.aspect.ratio(), Some(1.5));
    }

    #[test]
    fn test_dynamic_crop_overrides_ratio() {
        let config = EditorConfig::from_patch(EditorConfigPatch {
            fixed_aspect_ratio: Some(1.5),
            dynamic_crop: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.aspect, AspectMode::Dynamic);
    }

    #[test]
    fn test_partial_minimum_dimensions() {
        let config = EditorConfig::from_patch(EditorConfigPatch {
            minimum_crop_dimensions: Some(SizePatch {
                width: Some(40.0),
                height: None,
            }),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.minimum_crop_dimensions, Size::new(40.0, 100.0));
    }

    #[test]
    fn test_nested_merge_is_one_level_deep() {
        let custom_save = ButtonOptions::new("#0f0", "check", "Done");
        let patch = EditorConfigPatch {
            editor_options: Some(EditorOptionsPatch {
                background_color: Some("#000".to_string()),
                cover_marker: Some(CoverMarkerPatch {
                    show: Some(false),
                    color: None,
                }),
                control_bar: Some(ControlBarPatch {
                    position: Some(ControlBarPosition::Bottom),
                    save_button: Some(custom_save.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let options = EditorConfig::from_patch(patch).unwrap().options;
        let defaults = EditorOptions::default();

        assert_eq!(options.background_color, "#000");
        assert_eq!(options.grid_overlay_color, defaults.grid_overlay_color);
        // Sibling fields of a merged nested object survive
        assert!(!options.cover_marker.show);
        assert_eq!(options.cover_marker.color, "#fff");
        assert_eq!(options.control_bar.position, ControlBarPosition::Bottom);
        assert_eq!(options.control_bar.height, 80.0);
        assert_eq!(options.control_bar.cancel_button, defaults.control_bar.cancel_button);
        // Deeper objects are replaced wholesale
        assert_eq!(options.control_bar.save_button, custom_save);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        for ratio in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = EditorConfig::from_patch(EditorConfigPatch {
                fixed_aspect_ratio: Some(ratio),
                ..Default::default()
            });
            assert!(matches!(result, Err(ConfigError::InvalidAspectRatio(_))));
        }
        assert!(EditorConfig::fixed(0.0).is_err());
        assert!(EditorConfig::fixed(2.0 / 3.0).is_ok());
    }

    #[test]
    fn test_invalid_minimum_rejected() {
        let result = EditorConfig::from_patch(EditorConfigPatch {
            minimum_crop_dimensions: Some(SizePatch {
                width: Some(-5.0),
                height: None,
            }),
            ..Default::default()
        });
        assert_eq!(
            result,
            Err(ConfigError::InvalidMinimumDimensions {
                width: -5.0,
                height: 100.0
            })
        );
    }

    #[test]
    fn test_invalid_control_bar_height_rejected() {
        let result = EditorConfig::from_patch(EditorConfigPatch {
            editor_options: Some(EditorOptionsPatch {
                control_bar: Some(ControlBarPatch {
                    height: Some(0.0),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(result, Err(ConfigError::InvalidControlBarHeight(0.0)));
    }

    #[test]
    fn test_touches_geometry() {
        assert!(!EditorConfigPatch::default().touches_geometry());
        let theming_only = EditorConfigPatch {
            editor_options: Some(EditorOptionsPatch::default()),
            ..Default::default()
        };
        assert!(!theming_only.touches_geometry());
        let ratio = EditorConfigPatch {
            fixed_aspect_ratio: Some(1.0),
            ..Default::default()
        };
        assert!(ratio.touches_geometry());
    }
}
