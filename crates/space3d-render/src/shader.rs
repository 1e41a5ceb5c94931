//! WGSL shader module loading with compile-error detection.
//!
//! Module and pipeline creation run inside a validation error scope, so a
//! broken shader comes back as a [`ShaderError`] instead of reaching the
//! device's uncaptured-error handler.

use log::debug;
use thiserror::Error;
use wgpu::{ShaderModuleDescriptor, ShaderSource};

/// Error types for shader loading and pipeline creation.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("shader '{name}' failed to compile: {message}")]
    CompilationFailed { name: String, message: String },

    #[error("pipeline '{label}' failed validation: {message}")]
    PipelineFailed { label: String, message: String },
}

/// Compile `source` as WGSL.
///
/// Fails with [`ShaderError::CompilationFailed`] carrying every error-level
/// message the compiler reported.
pub fn compile_shader(
    device: &wgpu::Device,
    name: &str,
    source: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    debug!("Compiling shader '{}'", name);

    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(name),
        source: ShaderSource::Wgsl(source.into()),
    });
    let validation = pollster::block_on(scope.pop());

    let compilation = pollster::block_on(module.get_compilation_info());
    let mut errors = compilation_errors(&compilation);
    if errors.is_empty()
        && let Some(error) = validation
    {
        errors.push(error.to_string());
    }
    if !errors.is_empty() {
        return Err(ShaderError::CompilationFailed {
            name: name.to_string(),
            message: errors.join("; "),
        });
    }

    debug!("Compiled shader '{}'", name);
    Ok(module)
}

/// Run `create` inside a validation scope, turning a captured error into
/// [`ShaderError::PipelineFailed`].
pub fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, ShaderError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(scope.pop()) {
        None => Ok(value),
        Some(error) => Err(ShaderError::PipelineFailed {
            label: label.to_string(),
            message: error.to_string(),
        }),
    }
}

/// Collect the error-level messages, formatted with their line when known.
fn compilation_errors(info: &wgpu::CompilationInfo) -> Vec<String> {
    info.messages
        .iter()
        .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
        .map(|m| match &m.location {
            Some(loc) => format!("line {}: {}", loc.line_number, m.message),
            None => m.message.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::init_headless_blocking;

    const VALID_SHADER: &str = r#"
        @vertex
        fn vs_main(@builtin(vertex_index) idx: u32) -> @builtin(position) vec4<f32> {
            return vec4<f32>(0.0, 0.0, 0.0, 1.0);
        }

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 0.0, 0.0, 1.0);
        }
    "#;

    #[test]
    fn test_load_valid_shader_succeeds() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        assert!(compile_shader(&ctx.device, "test", VALID_SHADER).is_ok());
    }

    #[test]
    fn test_broken_wgsl_is_an_error_not_a_panic() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let result = compile_shader(&ctx.device, "bad", "fn broken( {");
        match result {
            Err(ShaderError::CompilationFailed { name, message }) => {
                assert_eq!(name, "bad");
                assert!(!message.is_empty());
            }
            other => panic!("expected CompilationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_device_stays_usable_after_failed_compile() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        assert!(compile_shader(&ctx.device, "bad", "not wgsl at all").is_err());
        assert!(compile_shader(&ctx.device, "good", VALID_SHADER).is_ok());
    }

    #[test]
    fn test_validated_passes_through_clean_work() {
        let Ok(ctx) = init_headless_blocking() else {
            return;
        };
        let value = validated(&ctx.device, "noop", || 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_compilation_errors_keep_only_errors() {
        let info = wgpu::CompilationInfo {
            messages: vec![
                wgpu::CompilationMessage {
                    message: "unused variable".to_string(),
                    message_type: wgpu::CompilationMessageType::Warning,
                    location: None,
                },
                wgpu::CompilationMessage {
                    message: "no definition in scope".to_string(),
                    message_type: wgpu::CompilationMessageType::Error,
                    location: None,
                },
            ],
        };
        assert_eq!(compilation_errors(&info), vec!["no definition in scope"]);
    }
}
