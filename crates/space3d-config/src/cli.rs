//! Command-line argument parsing for the space3d generator.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, ExportLayout, FragmentState};

/// space3d command-line arguments.
///
/// CLI values override settings loaded from `config.ron`. A `--fragment` is
/// applied first, so explicit flags win over values carried in a shared link.
#[derive(Parser, Debug, Default)]
#[command(name = "space3d", about = "Procedural space skybox generator")]
pub struct CliArgs {
    /// Seed string; the same seed always produces the same sky.
    #[arg(long)]
    pub seed: Option<String>,

    /// Face resolution in pixels (256, 512, 1024, 2048, 4096).
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Render the point-star field.
    #[arg(long)]
    pub point_stars: Option<bool>,

    /// Render bright stars.
    #[arg(long)]
    pub stars: Option<bool>,

    /// Render the sun.
    #[arg(long)]
    pub sun: Option<bool>,

    /// Render nebulae.
    #[arg(long)]
    pub nebulae: Option<bool>,

    /// Shared-link fragment, e.g. "#seed=abc&sun=false".
    #[arg(long)]
    pub fragment: Option<String>,

    /// Export layout: faces, cross or row.
    #[arg(long, value_parser = parse_layout)]
    pub layout: Option<ExportLayout>,

    /// Output directory for exported images.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref fragment) = args.fragment {
            self.apply_fragment(&FragmentState::parse(fragment));
        }
        if let Some(ref seed) = args.seed {
            self.generation.seed = seed.clone();
        }
        if let Some(resolution) = args.resolution {
            self.generation.resolution = resolution;
        }
        if let Some(v) = args.point_stars {
            self.generation.point_stars = v;
        }
        if let Some(v) = args.stars {
            self.generation.stars = v;
        }
        if let Some(v) = args.sun {
            self.generation.sun = v;
        }
        if let Some(v) = args.nebulae {
            self.generation.nebulae = v;
        }
        if let Some(layout) = args.layout {
            self.export.layout = layout;
        }
        if let Some(ref dir) = args.output {
            self.export.output_dir = dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

fn parse_layout(value: &str) -> Result<ExportLayout, String> {
    match value.to_ascii_lowercase().as_str() {
        "faces" => Ok(ExportLayout::Faces),
        "cross" => Ok(ExportLayout::Cross),
        "row" => Ok(ExportLayout::Row),
        other => Err(format!("unknown layout '{other}' (expected faces, cross or row)")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some("abc".to_string()),
            resolution: Some(256),
            sun: Some(false),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generation.seed, "abc");
        assert_eq!(config.generation.resolution, 256);
        assert!(!config.generation.sun);
        // Non-overridden fields retain defaults
        assert!(config.generation.nebulae);
        assert_eq!(config.export.layout, ExportLayout::Faces);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_explicit_flags_win_over_fragment() {
        let mut config = Config::default();
        let args = CliArgs {
            fragment: Some("#seed=from-link&stars=false&resolution=512".to_string()),
            seed: Some("from-flag".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generation.seed, "from-flag");
        assert!(!config.generation.stars);
        assert_eq!(config.generation.resolution, 512);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::try_parse_from([
            "space3d",
            "--seed",
            "abc",
            "--point-stars",
            "false",
            "--layout",
            "cross",
        ])
        .unwrap();
        assert_eq!(args.seed.as_deref(), Some("abc"));
        assert_eq!(args.point_stars, Some(false));
        assert_eq!(args.layout, Some(ExportLayout::Cross));
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        assert!(CliArgs::try_parse_from(["space3d", "--layout", "sphere"]).is_err());
    }
}
