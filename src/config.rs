//! Crate-wide configuration

use crate::error::{Result, SketchError};
use crate::io::dxf::ExportOptions;
use crate::smoothing::SmoothingPolicy;
use crate::stream::StreamConfig;
use crate::viewport::ViewportConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// All tunable behavior, loadable from JSON.
///
/// Missing sections and fields take their defaults, so `{}` is a valid
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub viewport: ViewportConfig,
    pub stream: StreamConfig,
    pub smoothing: SmoothingPolicy,
    pub export: ExportOptions,
}

impl SketchConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.viewport.validate()?;
        let stream = &self.stream;
        if !stream.unit_scale.is_finite() || stream.unit_scale == 0.0 {
            return Err(SketchError::Custom(format!(
                "stream.unit_scale must be finite and non-zero, found {}",
                stream.unit_scale
            )));
        }
        if stream.batch_size == 0 || stream.read_chunk_size == 0 {
            return Err(SketchError::Custom(
                "stream.batch_size and stream.read_chunk_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::dxf::Dialect;

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(SketchConfig::from_json_str("{}").unwrap(), SketchConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = SketchConfig::from_json_str(
            r#"{"viewport": {"max_zoom": 50}, "export": {"dialect": "legacy"}}"#,
        )
        .unwrap();
        assert_eq!(config.viewport.max_zoom, 50.0);
        assert_eq!(config.viewport.min_zoom, 0.002);
        assert_eq!(config.export.dialect, Dialect::Legacy);
        assert_eq!(config.stream.batch_size, 100);
    }

    #[test]
    fn test_serializes_every_section() {
        let text = SketchConfig::default().to_json_string().unwrap();
        for key in ["viewport", "stream", "smoothing", "export", "batch_size", "version_label"] {
            assert!(text.contains(key), "missing {}", key);
        }
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        for text in [
            r#"{"viewport": {"min_zoom": 200}}"#,
            r#"{"viewport": {"min_zoom": -1}}"#,
            r#"{"viewport": {"fit_margin": 0}}"#,
            r#"{"stream": {"unit_scale": 0}}"#,
            r#"{"stream": {"batch_size": 0}}"#,
        ] {
            assert!(
                matches!(SketchConfig::from_json_str(text), Err(SketchError::Custom(_))),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = std::env::temp_dir().join("pointsketch-inverted-zoom.json");
        fs::write(&path, r#"{"viewport": {"min_zoom": 200, "max_zoom": 100}}"#).unwrap();
        assert!(SketchConfig::from_file(&path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SketchConfig::from_json_str("{"),
            Err(crate::SketchError::Json(_))
        ));
    }
}
