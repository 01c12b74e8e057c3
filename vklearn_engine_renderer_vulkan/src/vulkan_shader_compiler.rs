/// GLSL to SPIR-V compiler backed by shaderc (feature `shader-recompile`)

use vklearn_engine::vklearn::{Error, Result};
use vklearn_engine::vklearn::graphics::ShaderStage;
use vklearn_engine::vklearn::render::ShaderCompiler;
use vklearn_engine::{engine_error, engine_warn};

pub struct ShadercCompiler {
    compiler: shaderc::Compiler,
    options: shaderc::CompileOptions<'static>,
}

impl ShadercCompiler {
    pub fn new() -> Result<Self> {
        let compiler = shaderc::Compiler::new().map_err(|e| {
            engine_error!("vklearn::vulkan", "Failed to initialize shaderc: {}", e);
            Error::InitializationFailed(format!("Failed to initialize shaderc: {}", e))
        })?;
        let mut options = shaderc::CompileOptions::new().map_err(|e| {
            Error::InitializationFailed(format!("Failed to create shaderc options: {}", e))
        })?;
        options.set_target_env(shaderc::TargetEnv::Vulkan, shaderc::EnvVersion::Vulkan1_3 as u32);
        options.set_optimization_level(shaderc::OptimizationLevel::Performance);

        Ok(Self { compiler, options })
    }
}

fn shader_kind(stage: ShaderStage) -> shaderc::ShaderKind {
    match stage {
        ShaderStage::Vertex => shaderc::ShaderKind::Vertex,
        ShaderStage::Fragment => shaderc::ShaderKind::Fragment,
    }
}

impl ShaderCompiler for ShadercCompiler {
    fn compile(&self, source: &str, stage: ShaderStage, file_name: &str) -> Result<Vec<u8>> {
        let artifact = self
            .compiler
            .compile_into_spirv(source, shader_kind(stage), file_name, "main", Some(&self.options))
            .map_err(|e| {
                engine_error!("vklearn::vulkan", "Failed to compile {}: {}", file_name, e);
                Error::InitializationFailed(format!("Failed to compile {}: {}", file_name, e))
            })?;

        if artifact.get_num_warnings() > 0 {
            engine_warn!("vklearn::vulkan", "{}: {}", file_name, artifact.get_warning_messages());
        }

        Ok(artifact.as_binary_u8().to_vec())
    }
}
