//! Command-line front end: generate a sky from a seed and export its faces.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p space3d-cli -- --seed "best seed ever"`.

mod export;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use space3d_config::{CliArgs, Config, FragmentState};
use space3d_sky::{GenerationRequest, Resolution, SkyError, SpaceGenerator};
use tracing::{error, info, instrument};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("space3d")
    });

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    space3d_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[instrument(skip_all, fields(seed = %config.generation.seed))]
fn run(config: &Config) -> Result<(), SkyError> {
    let request = build_request(config);

    let mut generator = SpaceGenerator::new()?;
    let cubemap = generator.generate(&request)?;

    let written = export::export_cubemap(&cubemap, &config.export, config.viewer.unified_texture)?;
    info!(
        "Exported {} file(s) to {}",
        written.len(),
        config.export.output_dir.display()
    );

    // Share the seed that was actually used, even when it was generated.
    let mut share = FragmentState::from_config(config);
    share.seed = Some(request.seed.clone());
    share.resolution = request.pixels();
    info!("Share link fragment: #{}", share.encode());
    Ok(())
}

fn build_request(config: &Config) -> GenerationRequest {
    let generation = &config.generation;
    let mut request = GenerationRequest::new(
        &generation.seed,
        Resolution::from_pixels(generation.resolution),
    );
    request.point_stars = generation.point_stars;
    request.stars = generation.stars;
    request.sun = generation.sun;
    request.nebulae = generation.nebulae;
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_copies_toggles() {
        let mut config = Config::default();
        config.generation.seed = "abc".to_string();
        config.generation.resolution = 512;
        config.generation.sun = false;
        let request = build_request(&config);
        assert_eq!(request.seed, "abc");
        assert_eq!(request.resolution, Resolution::R512);
        assert!(!request.sun);
        assert!(request.nebulae);
    }

    #[test]
    fn test_build_request_snaps_resolution_and_fills_seed() {
        let mut config = Config::default();
        config.generation.seed = String::new();
        config.generation.resolution = 300;
        let request = build_request(&config);
        assert!(!request.seed.is_empty());
        assert!(Resolution::ALL.contains(&request.resolution));
    }
}
