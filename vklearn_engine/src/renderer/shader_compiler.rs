/// GLSL to SPIR-V recompilation when the source is newer than the binary
///
/// The renderer always loads `<source>.spv`. With `shader_recompilation`
/// enabled, each source is first recompiled through a `ShaderCompiler` if
/// its binary is missing or stale.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::graphics_device::{ShaderModuleDesc, ShaderStage};
use crate::{engine_debug, engine_warn};

/// Compiles one GLSL source into SPIR-V words serialized as bytes
pub trait ShaderCompiler {
    fn compile(&self, source: &str, stage: ShaderStage, file_name: &str) -> Result<Vec<u8>>;
}

/// Path of the compiled binary for `glsl_path` (`shader.glsl` → `shader.glsl.spv`)
pub fn spirv_path(glsl_path: &Path) -> PathBuf {
    let mut path = glsl_path.as_os_str().to_owned();
    path.push(".spv");
    PathBuf::from(path)
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Recompile `glsl_path` if its binary is missing or older; returns the binary path
pub fn compile_if_changed(
    compiler: &dyn ShaderCompiler,
    glsl_path: &Path,
    stage: ShaderStage,
) -> Result<PathBuf> {
    let spv_path = spirv_path(glsl_path);
    let source_time = modified(glsl_path).ok_or_else(|| {
        Error::InitializationFailed(format!("shader source {} not found", glsl_path.display()))
    })?;

    let up_to_date = modified(&spv_path).is_some_and(|spv_time| spv_time >= source_time);
    if up_to_date {
        return Ok(spv_path);
    }

    let source = fs::read_to_string(glsl_path).map_err(|e| {
        Error::InitializationFailed(format!("failed to read {}: {}", glsl_path.display(), e))
    })?;
    let file_name = glsl_path.file_name().and_then(|n| n.to_str()).unwrap_or("shader");
    let spirv = compiler.compile(&source, stage, file_name)?;
    fs::write(&spv_path, spirv).map_err(|e| {
        Error::InitializationFailed(format!("failed to write {}: {}", spv_path.display(), e))
    })?;

    engine_debug!("vklearn::ShaderCompiler", "Compiled {} to {}", glsl_path.display(), spv_path.display());
    Ok(spv_path)
}

/// GLSL sources of the forward pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardShaders {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ForwardShaders {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("resources/shaders/fwd_vertex.glsl"),
            fragment: PathBuf::from("resources/shaders/fwd_fragment.glsl"),
        }
    }
}

impl ForwardShaders {
    /// Resolve relative source paths against `root`; absolute paths are kept
    pub fn rooted_at(&self, root: &Path) -> Self {
        Self {
            vertex: root.join(&self.vertex),
            fragment: root.join(&self.fragment),
        }
    }

    /// SPIR-V modules to build the pipeline from, recompiling first when enabled
    pub fn modules(
        &self,
        config: &EngineConfig,
        compiler: Option<&dyn ShaderCompiler>,
    ) -> Result<Vec<ShaderModuleDesc>> {
        let sources = [(ShaderStage::Vertex, &self.vertex), (ShaderStage::Fragment, &self.fragment)];
        let compiler = match (config.shader_recompilation, compiler) {
            (true, None) => {
                engine_warn!(
                    "vklearn::ShaderCompiler",
                    "Shader recompilation requested but no compiler available, using existing binaries"
                );
                None
            }
            (true, compiler) => compiler,
            (false, _) => None,
        };

        sources
            .into_iter()
            .map(|(stage, glsl)| {
                let spirv_path = match compiler {
                    Some(compiler) => compile_if_changed(compiler, glsl, stage)?,
                    None => spirv_path(glsl),
                };
                Ok(ShaderModuleDesc { stage, spirv_path })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "shader_compiler_tests.rs"]
mod tests;
