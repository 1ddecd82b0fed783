//! Configuration loading and validation

use anyhow::{Context, Result};
use arplace_core::{CatalogError, ModelCatalog, ModelEntry};
use arplace_scene::SurfaceSpec;
use bevy::math::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub debug: DebugConfig,
    /// Models offered in the selection menu (at most five)
    #[serde(default = "default_models")]
    pub models: Vec<ModelEntry>,
    /// Surfaces taps can land on
    #[serde(default = "default_surfaces")]
    pub surfaces: Vec<SurfaceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            debug: DebugConfig::default(),
            models: default_models(),
            surfaces: default_surfaces(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

fn default_title() -> String {
    "arplace".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Space bar starts a placement at the origin without a surface tap
    #[serde(default)]
    pub identity_pose_shortcut: bool,
}

const SAMPLE_MODELS_BASE: &str =
    "https://raw.githubusercontent.com/KhronosGroup/glTF-Sample-Assets/main/Models";

fn default_models() -> Vec<ModelEntry> {
    ["Duck", "Avocado", "BoomBox", "Lantern", "WaterBottle"]
        .into_iter()
        .map(|name| ModelEntry {
            name: name.to_string(),
            url: format!("{}/{}/glTF-Binary/{}.glb", SAMPLE_MODELS_BASE, name, name),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Center of the surface in meters
    #[serde(default)]
    pub center: [f32; 3],
    /// Width (X) and depth (Z) in meters
    #[serde(default = "default_surface_size")]
    pub size: [f32; 2],
}

fn default_surface_size() -> [f32; 2] {
    [2.0, 2.0]
}

fn default_surfaces() -> Vec<SurfaceConfig> {
    vec![SurfaceConfig {
        center: [0.0, 0.0, 0.0],
        size: default_surface_size(),
    }]
}

impl Config {
    /// Build the model catalog, rejecting more than five models or blank URLs
    pub fn catalog(&self) -> Result<ModelCatalog, CatalogError> {
        ModelCatalog::new(self.models.clone())
    }

    pub fn surface_specs(&self) -> Vec<SurfaceSpec> {
        self.surfaces
            .iter()
            .map(|surface| SurfaceSpec {
                center: Vec3::from_array(surface.center),
                size: Vec2::from_array(surface.size),
            })
            .collect()
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}
