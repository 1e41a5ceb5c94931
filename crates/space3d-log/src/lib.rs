//! Structured logging for the space3d generator.
//!
//! Installs a `tracing` subscriber with console output and, in debug builds,
//! a JSON log file. Library crates log through the `log` facade; those records
//! reach the same subscriber through `tracing-subscriber`'s log bridge.

use space3d_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config sets a level.
/// wgpu and naga are chatty at info, so they are held at warn.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "space3d.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (only used when `debug_build`)
/// * `debug_build` - enables the file layer
/// * `config` - supplies `debug.log_level`; `RUST_LOG` still takes precedence
///
/// Calling this twice is harmless: the second install is ignored.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_for(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        if subscriber.with(file_layer).try_init().is_ok() {
            tracing::debug!(
                filter = %filter_str,
                log_dir = %log_dir.display(),
                "Logging initialized"
            );
        }
        return;
    }

    if subscriber.try_init().is_ok() {
        tracing::debug!(filter = %filter_str, "Logging initialized");
    }
}

/// Resolve the filter string: the config's level when set, else [`DEFAULT_FILTER`].
///
/// A bare level from the config keeps wgpu and naga at warn.
pub fn filter_for(config: Option<&Config>) -> String {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if !level.is_empty() && !level.contains('=') => {
            format!("{level},wgpu=warn,naga=warn")
        }
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiets_gpu_crates() {
        let filter_str = format!("{}", EnvFilter::new(filter_for(None)));
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_filter_without_config_is_default() {
        assert_eq!(filter_for(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_bare_level_from_config_keeps_gpu_quiet() {
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();
        assert_eq!(filter_for(Some(&config)), "debug,wgpu=warn,naga=warn");
    }

    #[test]
    fn test_directive_list_from_config_is_used_verbatim() {
        let mut config = Config::default();
        config.debug.log_level = "warn,space3d_sky=trace".to_string();
        assert_eq!(filter_for(Some(&config)), "warn,space3d_sky=trace");
    }

    #[test]
    fn test_empty_level_falls_back_to_default() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_for(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_resolved_filters_parse() {
        for level in ["info", "debug,space3d_render=trace", "error"] {
            let mut config = Config::default();
            config.debug.log_level = level.to_string();
            let filter = filter_for(Some(&config));
            assert!(
                EnvFilter::try_new(&filter).is_ok(),
                "Failed to parse filter: {filter}"
            );
        }
    }

    #[test]
    fn test_init_logging_writes_file_in_debug_builds() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");
        init_logging(Some(&log_dir), true, None);
        assert!(log_dir.join(LOG_FILE_NAME).exists());
    }
}
