//! Engine configuration
//!
//! Loaded once at startup from a TOML file and handed by reference to the
//! components that need it. Missing keys take their defaults.

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};
use crate::{engine_debug, engine_warn};

/// Default configuration file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "engine.toml";

/// Engine-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed update rate of the application loop
    #[serde(rename = "updates_per_second")]
    pub ups: u32,

    /// Enable the Khronos validation layer and the debug messenger
    #[serde(rename = "vulkan_validate")]
    pub validate: bool,

    /// Preferred physical device name; empty means "first suitable device"
    pub physical_device_name: String,

    /// Requested number of swapchain images (clamped to the surface limits)
    pub requested_images: u32,

    /// FIFO presentation when true, IMMEDIATE otherwise
    pub vsync: bool,

    /// Recompile GLSL shaders whose SPIR-V is missing or stale
    pub shader_recompilation: bool,

    /// Vertical field of view in degrees
    pub fov: f32,

    /// Near clip plane distance
    pub z_near: f32,

    /// Far clip plane distance
    pub z_far: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ups: 30,
            validate: true,
            physical_device_name: String::new(),
            requested_images: 3,
            vsync: true,
            shader_recompilation: false,
            fov: 60.0,
            z_near: 1.0,
            z_far: 100.0,
        }
    }
}

impl EngineConfig {
    /// Load the configuration from `path`
    ///
    /// A missing file is not an error: a warning is logged and the defaults
    /// are returned. An unreadable or malformed file is a `ConfigError`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            engine_warn!("vklearn::Config", "File [{}] not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Could not read {}: {}", path.display(), e)))?;
        let config = Self::from_toml(&contents)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;

        engine_debug!("vklearn::Config", "Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from TOML text and check it
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Write the configuration to `path`, replacing any previous file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = self.to_toml()?;
        fs::write(path, contents)
            .map_err(|e| Error::ConfigError(format!("Could not write {}: {}", path.display(), e)))?;
        engine_debug!("vklearn::Config", "Saved configuration to {}", path.display());
        Ok(())
    }

    /// Preferred device name, `None` when no preference is configured
    pub fn preferred_device_name(&self) -> Option<&str> {
        let name = self.physical_device_name.trim();
        if name.is_empty() { None } else { Some(name) }
    }

    /// Reject values no component can work with
    pub fn check(&self) -> Result<()> {
        if self.ups == 0 {
            return Err(Error::ConfigError("updates_per_second must be greater than 0".to_string()));
        }
        if self.requested_images == 0 {
            return Err(Error::ConfigError("requested_images must be greater than 0".to_string()));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(Error::ConfigError(format!("fov must be in (0, 180) degrees, got {}", self.fov)));
        }
        if !(self.z_near > 0.0) {
            return Err(Error::ConfigError(format!("z_near must be positive, got {}", self.z_near)));
        }
        if !(self.z_far > self.z_near) {
            return Err(Error::ConfigError(format!(
                "z_far ({}) must be greater than z_near ({})",
                self.z_far, self.z_near
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
