/// Model data on the CPU side and its GPU upload
///
/// A model is identified by its model id, which is what scene entities
/// refer to. Each mesh gets its own device-local vertex and index buffer,
/// filled from staging buffers by one copy submission per upload.

use std::sync::Arc;
use crate::error::{Error, Result};
use crate::graphics_device::{
    Buffer, BufferDesc, BufferUsage, CommandBuffer, CommandBufferLevel, CommandPool, GraphicsDevice,
    Queue, SubmitInfo,
};
use crate::renderer::vertex::FLOATS_PER_VERTEX;
use crate::engine_debug;

/// Raw mesh geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// xyz per vertex
    pub positions: Vec<f32>,
    /// uv per vertex
    pub texture_coords: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    pub model_id: String,
    pub meshes: Vec<MeshData>,
}

impl ModelData {
    pub fn new(model_id: impl Into<String>, meshes: Vec<MeshData>) -> Self {
        Self { model_id: model_id.into(), meshes }
    }
}

/// Interleave positions and texture coordinates as `x y z u v` per vertex
pub fn interleave_vertices(mesh: &MeshData) -> Result<Vec<f32>> {
    if mesh.positions.is_empty() || mesh.positions.len() % 3 != 0 {
        return Err(Error::InvalidResource(format!(
            "mesh positions must be a non-empty multiple of 3, got {}",
            mesh.positions.len()
        )));
    }
    let vertex_count = mesh.vertex_count();
    if mesh.texture_coords.len() != vertex_count * 2 {
        return Err(Error::InvalidResource(format!(
            "mesh has {} vertices but {} texture coordinate floats",
            vertex_count,
            mesh.texture_coords.len()
        )));
    }

    let mut data = Vec::with_capacity(vertex_count * FLOATS_PER_VERTEX);
    for (position, uv) in mesh.positions.chunks_exact(3).zip(mesh.texture_coords.chunks_exact(2)) {
        data.extend_from_slice(position);
        data.extend_from_slice(uv);
    }
    Ok(data)
}

/// One mesh resident on the GPU
pub struct GpuMesh {
    vertex_buffer: Arc<dyn Buffer>,
    index_buffer: Arc<dyn Buffer>,
    index_count: u32,
}

/// Destination buffers of one mesh plus the staging buffers that fill them
struct StagedMesh {
    mesh: GpuMesh,
    staging: [Arc<dyn Buffer>; 2],
}

/// Check a mesh and return its interleaved vertex data
fn validate_mesh(mesh: &MeshData) -> Result<Vec<f32>> {
    if mesh.indices.is_empty() {
        return Err(Error::InvalidResource("mesh has no indices".to_string()));
    }
    let vertices = interleave_vertices(mesh)?;
    let vertex_count = mesh.vertex_count();
    if let Some(index) = mesh.indices.iter().find(|i| **i as usize >= vertex_count) {
        return Err(Error::InvalidResource(format!(
            "index {} out of range for {} vertices",
            index, vertex_count
        )));
    }
    Ok(vertices)
}

fn staging_buffer(device: &dyn GraphicsDevice, data: &[u8]) -> Result<Arc<dyn Buffer>> {
    let buffer = device.create_buffer(&BufferDesc {
        size: data.len() as u64,
        usage: BufferUsage::Staging,
    })?;
    buffer.update(0, data)?;
    Ok(buffer)
}

impl GpuMesh {
    /// Create the mesh buffers and record the staging copies into `commands`
    fn stage(
        device: &dyn GraphicsDevice,
        commands: &mut dyn CommandBuffer,
        mesh: &MeshData,
        vertices: &[f32],
    ) -> Result<StagedMesh> {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(&mesh.indices);

        let vertex_buffer = device.create_buffer(&BufferDesc {
            size: vertex_bytes.len() as u64,
            usage: BufferUsage::Vertex,
        })?;
        let index_buffer = device.create_buffer(&BufferDesc {
            size: index_bytes.len() as u64,
            usage: BufferUsage::Index,
        })?;

        let vertex_staging = staging_buffer(device, vertex_bytes)?;
        let index_staging = staging_buffer(device, index_bytes)?;
        commands.copy_buffer(vertex_staging.as_ref(), vertex_buffer.as_ref(), vertex_bytes.len() as u64)?;
        commands.copy_buffer(index_staging.as_ref(), index_buffer.as_ref(), index_bytes.len() as u64)?;

        Ok(StagedMesh {
            mesh: Self {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
            },
            staging: [vertex_staging, index_staging],
        })
    }

    pub fn vertex_buffer(&self) -> &dyn Buffer {
        self.vertex_buffer.as_ref()
    }

    pub fn index_buffer(&self) -> &dyn Buffer {
        self.index_buffer.as_ref()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// A model resident on the GPU
pub struct GpuModel {
    model_id: String,
    meshes: Vec<GpuMesh>,
}

impl GpuModel {
    /// Upload `models` through staging buffers
    ///
    /// Every mesh is checked before any GPU object is created. The copies
    /// of all meshes go into one primary command buffer, submitted on
    /// `queue`; the call blocks on a fence until the copies are done and
    /// only then releases the staging buffers.
    pub fn upload_all(
        device: &dyn GraphicsDevice,
        command_pool: &dyn CommandPool,
        queue: &dyn Queue,
        models: &[ModelData],
    ) -> Result<Vec<GpuModel>> {
        let vertex_data = models
            .iter()
            .map(|model| model.meshes.iter().map(validate_mesh).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        if models.iter().all(|model| model.meshes.is_empty()) {
            return Ok(models
                .iter()
                .map(|model| GpuModel { model_id: model.model_id.clone(), meshes: Vec::new() })
                .collect());
        }

        let mut commands = command_pool.allocate_command_buffer(CommandBufferLevel::Primary)?;
        commands.begin()?;

        let mut staging = Vec::new();
        let mut gpu_models = Vec::with_capacity(models.len());
        for (model, vertices) in models.iter().zip(&vertex_data) {
            let mut meshes = Vec::with_capacity(model.meshes.len());
            for (mesh, vertices) in model.meshes.iter().zip(vertices) {
                let staged = GpuMesh::stage(device, commands.as_mut(), mesh, vertices)?;
                staging.extend(staged.staging);
                meshes.push(staged.mesh);
            }
            gpu_models.push(GpuModel { model_id: model.model_id.clone(), meshes });
        }
        commands.end()?;

        let fence = device.create_fence(false)?;
        queue.submit(&SubmitInfo {
            command_buffer: commands.as_ref(),
            wait_semaphore: None,
            signal_semaphore: None,
            fence: Some(fence.as_ref()),
        })?;
        fence.wait()?;
        drop(staging);

        for model in &gpu_models {
            engine_debug!("vklearn::Model", "Uploaded model '{}' ({} mesh(es))", model.model_id, model.meshes.len());
        }
        Ok(gpu_models)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn meshes(&self) -> &[GpuMesh] {
        &self.meshes
    }
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
