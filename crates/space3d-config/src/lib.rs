//! Configuration system for the space3d skybox generator.
//!
//! Provides generation, viewer, and export settings that persist to disk as RON
//! files, CLI overrides via clap, and the URL-fragment encoding used to share a
//! sky by link.

mod cli;
mod config;
mod error;
mod fragment;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, ExportConfig, ExportLayout, GenerationConfig, ViewerConfig,
};
pub use error::ConfigError;
pub use fragment::FragmentState;
