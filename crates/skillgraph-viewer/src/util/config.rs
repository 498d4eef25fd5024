use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::graph::layout::LayoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Side-by-side regions on one plane.
    #[default]
    Flat2d,
    /// Parallel planes stacked along z.
    Planes3d,
}

impl LayoutMode {
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        match input {
            "2d" | "flat2d" => Ok(Self::Flat2d),
            "3d" | "planes3d" => Ok(Self::Planes3d),
            _ => anyhow::bail!("invalid mode: {input} (expected 2d|3d)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RadiusCurve {
    Linear,
    #[default]
    Sqrt,
}

impl RadiusCurve {
    pub fn apply(self, depth: usize) -> f32 {
        let d = depth as f32;
        match self {
            Self::Linear => d,
            Self::Sqrt => d.sqrt(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layout_mode: LayoutMode,
    pub base_radius: f32,
    pub radius_curve: RadiusCurve,
    pub shrink: f32,
    pub min_arc_spacing: f32,
    pub max_density: f32,
    pub jitter: f32,
    pub seed: u64,
    pub graph_gap: f32,
    pub plane_spacing: f32,
    /// Maximum search hits kept; 0 keeps them all.
    pub search_limit: usize,
    pub show_mapping_edges: bool,
    pub node_size_min: f32,
    pub node_size_max: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            layout_mode: LayoutMode::Flat2d,
            base_radius: 12.0,
            radius_curve: RadiusCurve::Sqrt,
            shrink: 0.9,
            min_arc_spacing: 3.0,
            max_density: 3.0,
            jitter: 0.0,
            seed: 0x5eed,
            graph_gap: 10.0,
            plane_spacing: 30.0,
            search_limit: 50,
            show_mapping_edges: true,
            node_size_min: 0.6,
            node_size_max: 1.6,
        }
    }
}

impl ViewerConfig {
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            mode: self.layout_mode,
            base_radius: self.base_radius,
            radius_curve: self.radius_curve,
            shrink: self.shrink,
            min_arc_spacing: self.min_arc_spacing,
            max_density: self.max_density,
            jitter: self.jitter,
            seed: self.seed,
            graph_gap: self.graph_gap,
            plane_spacing: self.plane_spacing,
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "skillgraph")?;
    Some(proj.config_dir().join("viewer.toml"))
}

pub fn load_or_default() -> ViewerConfig {
    let Some(path) = config_file_path() else {
        return ViewerConfig::default();
    };
    load_or_default_from_path(&path)
}

pub fn load_or_default_from_path(path: &Path) -> ViewerConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return ViewerConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "invalid viewer config, using defaults");
        ViewerConfig::default()
    })
}

pub fn save(cfg: &ViewerConfig) -> anyhow::Result<()> {
    let Some(path) = config_file_path() else {
        return Err(anyhow::anyhow!("no config directory available"));
    };
    save_to_path(cfg, &path)
}

pub fn save_to_path(cfg: &ViewerConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let data = toml::to_string_pretty(cfg).context("failed to serialize viewer config")?;
    fs::write(path, data)
        .with_context(|| format!("failed to write viewer config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn viewer_config_roundtrip_save_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("viewer.toml");
        let cfg = ViewerConfig {
            layout_mode: LayoutMode::Planes3d,
            jitter: 0.1,
            ..ViewerConfig::default()
        };

        save_to_path(&cfg, &path).expect("save config");
        let loaded = load_or_default_from_path(&path);

        assert_eq!(cfg, loaded);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("viewer.toml");
        fs::write(&path, "layout_mode = \"planes3d\"\nbase_radius = 20.0\n").expect("write");

        let loaded = load_or_default_from_path(&path);

        assert_eq!(loaded.layout_mode, LayoutMode::Planes3d);
        assert_eq!(loaded.base_radius, 20.0);
        assert_eq!(loaded.shrink, ViewerConfig::default().shrink);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("viewer.toml");
        fs::write(&path, "layout_mode = \"sideways\"").expect("write");

        assert_eq!(load_or_default_from_path(&path), ViewerConfig::default());
    }

    #[test]
    fn layout_mode_parses_cli_spelling() {
        assert_eq!(LayoutMode::parse("3d").expect("3d"), LayoutMode::Planes3d);
        assert_eq!(LayoutMode::parse("2d").expect("2d"), LayoutMode::Flat2d);
        assert!(LayoutMode::parse("4d").is_err());
    }
}
