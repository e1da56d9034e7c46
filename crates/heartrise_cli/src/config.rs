//! Session configuration
//!
//! A session is described by `heartrise.toml`:
//! - `[hearts]` - animation parameters
//! - `[container]` - emitter size
//! - `[images]` - heart sprites, from files or generated colors
//! - `[run]` - how many hearts to launch and when

use anyhow::{Context, Result};
use heartrise_animation::{HeartConfig, HeartImages};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "heartrise.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub hearts: HeartConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Emitter size
#[derive(Debug, Deserialize, Serialize)]
pub struct ContainerConfig {
    /// Explicit width; defaults to five image widths
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_height() -> f32 {
    500.0
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: default_height(),
        }
    }
}

/// Heart sprites
#[derive(Debug, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Image files; when empty, hearts are drawn in `colors`
    #[serde(default)]
    pub paths: Vec<PathBuf>,
    #[serde(default = "default_colors")]
    pub colors: Vec<[u8; 4]>,
}

fn default_colors() -> Vec<[u8; 4]> {
    vec![[230, 40, 80, 255], [255, 120, 160, 255], [255, 170, 40, 255]]
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            colors: default_colors(),
        }
    }
}

impl ImagesConfig {
    /// Build the sprite table, resolving relative paths against `base`
    pub fn load(&self, base: &Path, size: f32) -> Result<HeartImages> {
        if self.paths.is_empty() {
            return HeartImages::hearts(size, &self.colors).context("No heart colors configured");
        }

        let paths: Vec<PathBuf> = self.paths.iter().map(|p| base.join(p)).collect();
        HeartImages::load_paths(&paths, size).context("Failed to load heart images")
    }
}

/// Launch schedule
#[derive(Debug, Deserialize, Serialize)]
pub struct RunConfig {
    #[serde(default = "default_spawn_count")]
    pub spawn_count: u32,
    #[serde(default = "default_spawn_interval")]
    pub spawn_interval_ms: u64,
    /// Safety stop for the tick loop
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

fn default_spawn_count() -> u32 {
    5
}

fn default_spawn_interval() -> u64 {
    300
}

fn default_max_ticks() -> u64 {
    10_000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            spawn_count: default_spawn_count(),
            spawn_interval_ms: default_spawn_interval(),
            max_ticks: default_max_ticks(),
        }
    }
}

impl SessionConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SessionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize session config")
    }
}
