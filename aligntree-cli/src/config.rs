//! Configuration handling for the aligntree CLI
//!
//! Supports loading configuration from aligntree.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use aligntree_core::scoring::{DEFAULT_GAP_EXTEND, DEFAULT_GAP_OPEN, DEFAULT_LINEAR_GAP};
use aligntree_core::tree::DEFAULT_MAX_NODES;
use aligntree_core::{BoundaryPolicy, GapModel};

pub const DEFAULT_CONFIG_FILE: &str = "aligntree.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub tree: TreeConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapModelKind {
    Affine,
    Linear,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// "affine" or "linear"
    #[serde(default = "default_gap_model")]
    pub gap_model: GapModelKind,

    #[serde(default = "default_gap_open")]
    pub gap_open: i32,

    #[serde(default = "default_gap_extend")]
    pub gap_extend: i32,

    /// Per-residue penalty of the linear model
    #[serde(default = "default_gap_penalty")]
    pub gap_penalty: i32,

    /// Substitution table file (dictionary literal or NCBI matrix).
    /// Without one, an identity table over the input symbols is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<PathBuf>,

    #[serde(default = "default_match_score")]
    pub match_score: i32,

    #[serde(default = "default_mismatch_score")]
    pub mismatch_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// "exhaust" or "single-step"
    #[serde(default)]
    pub boundary: BoundaryPolicy,

    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// Print the score and path grids before the tree
    #[serde(default)]
    pub show_grids: bool,
}

// Default value functions
fn default_gap_model() -> GapModelKind { GapModelKind::Affine }
fn default_gap_open() -> i32 { DEFAULT_GAP_OPEN }
fn default_gap_extend() -> i32 { DEFAULT_GAP_EXTEND }
fn default_gap_penalty() -> i32 { DEFAULT_LINEAR_GAP }
fn default_match_score() -> i32 { 1 }
fn default_mismatch_score() -> i32 { -1 }
fn default_max_nodes() -> usize { DEFAULT_MAX_NODES }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            gap_model: default_gap_model(),
            gap_open: default_gap_open(),
            gap_extend: default_gap_extend(),
            gap_penalty: default_gap_penalty(),
            matrix: None,
            match_score: default_match_score(),
            mismatch_score: default_mismatch_score(),
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            boundary: BoundaryPolicy::default(),
            max_nodes: default_max_nodes(),
            show_grids: false,
        }
    }
}

impl ScoringConfig {
    /// The configured gap model, validated
    pub fn gap_model(&self) -> aligntree_core::Result<GapModel> {
        match self.gap_model {
            GapModelKind::Affine => GapModel::affine(self.gap_open, self.gap_extend),
            GapModelKind::Linear => GapModel::linear(self.gap_penalty),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    log::info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                    Self::load_from_file(&default_path)?
                } else {
                    log::info!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scoring.gap_model, GapModelKind::Affine);
        assert_eq!(config.scoring.gap_open, -3);
        assert_eq!(config.scoring.gap_extend, -1);
        assert_eq!(config.tree.boundary, BoundaryPolicy::Exhaust);
        assert!(!config.tree.show_grids);
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.scoring.gap_model = GapModelKind::Linear;
        config.scoring.matrix = Some(PathBuf::from("blosum62.txt"));
        config.tree.boundary = BoundaryPolicy::SingleStep;
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded_config.scoring.gap_model, GapModelKind::Linear);
        assert_eq!(loaded_config.scoring.matrix, config.scoring.matrix);
        assert_eq!(loaded_config.tree.boundary, BoundaryPolicy::SingleStep);
        assert_eq!(loaded_config.tree.max_nodes, config.tree.max_nodes);

        Ok(())
    }

    #[test]
    fn test_partial_file_fills_defaults() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        std::fs::write(temp_file.path(), "[tree]\nboundary = \"single-step\"\n")?;

        let config = Config::load_from_file(temp_file.path())?;
        assert_eq!(config.tree.boundary, BoundaryPolicy::SingleStep);
        assert_eq!(config.tree.max_nodes, DEFAULT_MAX_NODES);
        assert_eq!(config.scoring.gap_open, DEFAULT_GAP_OPEN);
        Ok(())
    }

    #[test]
    fn test_gap_model_selection() {
        let mut scoring = ScoringConfig::default();
        assert_eq!(scoring.gap_model().unwrap(), GapModel::Affine { open: -3, extend: -1 });

        scoring.gap_model = GapModelKind::Linear;
        assert_eq!(scoring.gap_model().unwrap(), GapModel::Linear { penalty: -3 });

        scoring.gap_penalty = 2;
        assert!(scoring.gap_model().is_err());
    }

    #[test]
    fn test_example_toml_generation() {
        let example = Config::example_toml().unwrap();
        assert!(example.contains("[scoring]"));
        assert!(example.contains("[tree]"));
        assert!(example.contains("boundary = \"exhaust\""));
    }
}
