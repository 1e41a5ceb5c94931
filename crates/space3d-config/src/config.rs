//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Name of the persisted config file inside the config directory.
const CONFIG_FILE: &str = "config.ron";

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// What to generate and at which resolution.
    pub generation: GenerationConfig,
    /// Display-loop settings. Not generation inputs.
    pub viewer: ViewerConfig,
    /// Where and how rendered faces are written.
    pub export: ExportConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Generation inputs: the seed and the feature toggles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Seed string. Empty means "pick a random seed at generation time".
    pub seed: String,
    /// Face size in pixels (256, 512, 1024, 2048 or 4096).
    pub resolution: u32,
    /// Render the static point-star field.
    pub point_stars: bool,
    /// Render bright stars with glow.
    pub stars: bool,
    /// Render a single sun.
    pub sun: bool,
    /// Render nebula clouds.
    pub nebulae: bool,
}

/// Settings for the orbiting skybox preview.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Multiplier on the per-frame orbit step.
    pub animation_speed: f32,
    /// Show the composed cross image instead of six separate faces.
    pub unified_texture: bool,
}

/// Export target for rendered cubemaps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory (for [`ExportLayout::Faces`]) or parent directory of the composed image.
    pub output_dir: PathBuf,
    /// How faces are arranged on disk.
    pub layout: ExportLayout,
}

/// On-disk arrangement of the six faces.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportLayout {
    /// One PNG per face: `front.png`, `back.png`, ...
    #[default]
    Faces,
    /// A single 4x3 cross image.
    Cross,
    /// A single 6x1 horizontal row in cube-layer order.
    Row,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: String::new(),
            resolution: 1024,
            point_stars: true,
            stars: true,
            sun: true,
            nebulae: true,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov: 80.0,
            animation_speed: 1.0,
            unified_texture: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("skybox"),
            layout: ExportLayout::Faces,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = read_config(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path,
            source,
        })
    }

    /// Re-read `config.ron`, returning `Some(new_config)` only if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = read_config(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
