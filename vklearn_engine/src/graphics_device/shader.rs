/// Shader stages and shader module descriptors

use std::path::PathBuf;
use bitflags::bitflags;

/// Single shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

bitflags! {
    /// Set of shader stages (push-constant visibility)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
    }
}

impl From<ShaderStage> for ShaderStageFlags {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
        }
    }
}

/// One compiled shader module on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderModuleDesc {
    pub stage: ShaderStage,
    /// Path to the SPIR-V binary
    pub spirv_path: PathBuf,
}
