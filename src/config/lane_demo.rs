use crate::LaneParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct LaneDemoConfig {
    /// Camera frame (PNG or JPEG).
    pub input: PathBuf,
    #[serde(default)]
    pub params: LaneParams,
    pub output: LaneDemoOutput,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LaneDemoOutput {
    pub overlay_image: PathBuf,
    pub report_json: Option<PathBuf>,
    /// Rectified lane mask, written as a 0/255 grayscale PNG.
    pub birdseye_mask: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<LaneDemoConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: LaneDemoConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_default_params() {
        let config: LaneDemoConfig = serde_json::from_str(
            r#"{ "input": "frame.jpg", "output": { "overlay_image": "out.png" } }"#,
        )
        .unwrap();
        assert_eq!(config.input, PathBuf::from("frame.jpg"));
        assert_eq!(config.params.frame.width, 1280);
        assert!(config.output.report_json.is_none());
    }

    #[test]
    fn overlay_font_path_comes_from_params() {
        let config: LaneDemoConfig = serde_json::from_str(
            r#"{
                "input": "frame.jpg",
                "params": { "overlay": { "font_path": "fonts/Mono.ttf", "text_height": 32.0 } },
                "output": { "overlay_image": "out.png" }
            }"#,
        )
        .unwrap();
        let overlay = &config.params.overlay;
        assert_eq!(overlay.font_path, Some(PathBuf::from("fonts/Mono.ttf")));
        assert_eq!(overlay.text_height, 32.0);
        assert_eq!(overlay.line_spacing, 50);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/lane.json")).unwrap_err();
        assert!(err.contains("/nonexistent/lane.json"));
    }
}
