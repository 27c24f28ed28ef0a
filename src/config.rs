use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "RUSTY_TRENDS_CONFIG";

/// Common system locations probed for a TrueType font when none is configured.
const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Everything one pipeline run needs. Defaults analyse `SepalLengthCm` in
/// `data.csv` and write the three charts to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    /// Attribute whose moments are reported.
    pub attribute: String,
    /// Rows shown in the "Sample Data" block.
    pub sample_rows: usize,
    pub output_dir: PathBuf,
    pub relational: RelationalPlot,
    pub categorical: CategoricalPlot,
    pub statistical: StatisticalPlot,
    pub image_width: u32,
    pub image_height: u32,
    /// TrueType font for chart text. Probed from common system paths when unset.
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationalPlot {
    pub x: String,
    pub y: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoricalPlot {
    pub column: String,
    pub bins: usize,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticalPlot {
    pub title: String,
    pub file: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.csv"),
            attribute: "SepalLengthCm".to_string(),
            sample_rows: 10,
            output_dir: PathBuf::from("."),
            relational: RelationalPlot::default(),
            categorical: CategoricalPlot::default(),
            statistical: StatisticalPlot::default(),
            image_width: 700,
            image_height: 700,
            font_path: None,
        }
    }
}

impl Default for RelationalPlot {
    fn default() -> Self {
        Self {
            x: "PetalLengthCm".to_string(),
            y: "PetalWidthCm".to_string(),
            file: "relational_plot.png".to_string(),
        }
    }
}

impl Default for CategoricalPlot {
    fn default() -> Self {
        Self {
            column: "SepalWidthCm".to_string(),
            bins: 20,
            file: "categorical_plot.png".to_string(),
        }
    }
}

impl Default for StatisticalPlot {
    fn default() -> Self {
        Self {
            title: "HeatMap of Iris".to_string(),
            file: "statistical_plot.png".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Defaults, overridden by the JSON file named in `RUSTY_TRENDS_CONFIG`
    /// when that variable is set.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Using config from {}", path.display());
        Ok(config)
    }

    /// The configured font, or the first candidate that exists on disk.
    pub fn resolve_font(&self) -> Option<PathBuf> {
        if let Some(path) = &self.font_path {
            return Some(path.clone());
        }
        FONT_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
    }

    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_run() {
        let c = AnalysisConfig::default();
        assert_eq!(c.input, PathBuf::from("data.csv"));
        assert_eq!(c.attribute, "SepalLengthCm");
        assert_eq!(c.categorical.bins, 20);
        assert_eq!(c.relational.file, "relational_plot.png");
        assert_eq!(c.categorical.file, "categorical_plot.png");
        assert_eq!(c.statistical.file, "statistical_plot.png");
        assert_eq!(c.output_path("a.png"), PathBuf::from("./a.png"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trends.json");
        std::fs::write(
            &path,
            r#"{ "attribute": "PetalWidthCm", "categorical": { "bins": 8 } }"#,
        )
        .unwrap();

        let c = AnalysisConfig::from_file(&path).unwrap();
        assert_eq!(c.attribute, "PetalWidthCm");
        assert_eq!(c.categorical.bins, 8);
        assert_eq!(c.categorical.column, "SepalWidthCm");
        assert_eq!(c.input, PathBuf::from("data.csv"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ attribute: ").unwrap();
        assert!(AnalysisConfig::from_file(&path).is_err());
    }

    #[test]
    fn explicit_font_wins() {
        let c = AnalysisConfig {
            font_path: Some(PathBuf::from("/nowhere/font.ttf")),
            ..Default::default()
        };
        assert_eq!(c.resolve_font(), Some(PathBuf::from("/nowhere/font.ttf")));
    }
}
