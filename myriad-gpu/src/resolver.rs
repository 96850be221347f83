//! wgpu compute implementation of the resolution pass.
//!
//! Upload the snapshot as storage buffers, dispatch one invocation per
//! entity, copy the output into a staging buffer, and block on the map for
//! readback. The readback wait is the single point where the control thread
//! stalls; everything up to it is fire-and-forget on the queue.

use std::sync::mpsc;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use myriad_core::camera::CameraState;
use myriad_core::dataset::DatasetSnapshot;
use myriad_core::error::EngineError;
use myriad_core::lod::{aggression_factor, LodTier};
use myriad_core::resolve::{Backend, ResolvedFrame, Resolver, ResultRecord};
use myriad_core::visibility::{CONE_WIDEN_FACTOR, FAR_CUTOFF_FRACTION};

use crate::shaders::RESOLVE_SHADER;
use crate::GpuContext;

const WORKGROUP_SIZE: u32 = 64;
/// Per-dimension dispatch limit; wider dispatches tile into a 2D grid.
const MAX_WORKGROUPS_PER_DIM: u32 = 65_535;

/// Uniform block mirrored by `Params` in resolve.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct GpuParams {
    eye_far: [f32; 4],
    forward_cone: [f32; 4],
    aggr_time: [f32; 4],
    entity_count: u32,
    row_stride: u32,
    _pad: [u32; 2],
}

/// Output record layout mirrored by `ResultOut` in resolve.wgsl. 32 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct GpuResultRecord {
    position: [f32; 3],
    radius: f32,
    distance: f32,
    element: u32,
    lod: u32,
    visible: u32,
}

impl From<&GpuResultRecord> for ResultRecord {
    fn from(r: &GpuResultRecord) -> Self {
        ResultRecord {
            position: r.position,
            element: r.element as u8,
            radius: r.radius,
            // the shader only writes 0..=3; clamp rather than trust it
            lod: LodTier::from_index(r.lod.min(3)).unwrap_or(LodTier::Point),
            distance: r.distance,
            visible: r.visible != 0,
        }
    }
}

/// Accelerated resolution pass on a wgpu compute queue.
pub struct GpuResolver {
    context: GpuContext,
    pipeline: wgpu::ComputePipeline,
}

impl GpuResolver {
    pub fn new(context: GpuContext) -> Result<Self> {
        let shader = context
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Myriad Resolve Shader"),
                source: wgpu::ShaderSource::Wgsl(RESOLVE_SHADER.into()),
            });

        let pipeline =
            context
                .device
                .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                    label: Some("Myriad Resolve Pipeline"),
                    layout: None,
                    module: &shader,
                    entry_point: "main",
                    compilation_options: Default::default(),
                });

        Ok(Self { context, pipeline })
    }

    fn build_params(&self, dataset: &DatasetSnapshot<'_>, camera: &CameraState) -> GpuParams {
        let forward = camera.forward();
        let (_, _, row_stride) = dispatch_extent(dataset.entity_count() as u32);
        GpuParams {
            eye_far: [
                camera.position.x,
                camera.position.y,
                camera.position.z,
                camera.far * FAR_CUTOFF_FRACTION,
            ],
            forward_cone: [
                forward.x,
                forward.y,
                forward.z,
                (camera.fov_y * CONE_WIDEN_FACTOR).cos(),
            ],
            aggr_time: [
                aggression_factor(dataset.entity_count()),
                camera.time,
                0.0,
                0.0,
            ],
            entity_count: dataset.entity_count() as u32,
            row_stride,
            _pad: [0; 2],
        }
    }
}

/// 2D workgroup grid covering `count` entities, plus the per-row invocation
/// stride the shader uses to linearize its index.
fn dispatch_extent(count: u32) -> (u32, u32, u32) {
    let groups = count.div_ceil(WORKGROUP_SIZE).max(1);
    let gx = groups.min(MAX_WORKGROUPS_PER_DIM);
    let gy = groups.div_ceil(gx);
    (gx, gy, gx * WORKGROUP_SIZE)
}

impl Resolver for GpuResolver {
    fn resolve(
        &self,
        dataset: &DatasetSnapshot<'_>,
        camera: &CameraState,
    ) -> Result<ResolvedFrame, EngineError> {
        camera.validate()?;

        if dataset.is_empty() {
            return Ok(ResolvedFrame {
                records: Vec::new(),
                generation: dataset.generation(),
            });
        }

        let device = &self.context.device;
        let queue = &self.context.queue;
        let count = dataset.entity_count() as usize;

        let params = self.build_params(dataset, camera);
        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Resolve Params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Entity Positions"),
            contents: bytemuck::cast_slice(dataset.positions()),
            usage: wgpu::BufferUsages::STORAGE,
        });

        // storage buffers have no u8 element type; widen on upload
        let elements: Vec<u32> = dataset.elements().iter().map(|&e| e as u32).collect();
        let element_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Entity Elements"),
            contents: bytemuck::cast_slice(&elements),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let output_size = (count * std::mem::size_of::<GpuResultRecord>()) as u64;
        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Resolve Output"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Resolve Staging"),
            size: output_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Resolve Bind Group"),
            layout: &self.pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: position_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: element_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: output_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Resolve Encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Resolve Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            let (gx, gy, _) = dispatch_extent(count as u32);
            pass.dispatch_workgroups(gx, gy, 1);
        }
        encoder.copy_buffer_to_buffer(&output_buffer, 0, &staging_buffer, 0, output_size);
        queue.submit(std::iter::once(encoder.finish()));

        // the one blocking wait in the frame: readback of the full result set
        let slice = staging_buffer.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        let _ = device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|_| EngineError::backend_unavailable("readback channel closed"))?
            .map_err(|e| EngineError::backend_unavailable(format!("buffer map failed: {e}")))?;

        let records = {
            let data = slice.get_mapped_range();
            let gpu_records: &[GpuResultRecord] = bytemuck::cast_slice(&data);
            gpu_records.iter().map(ResultRecord::from).collect()
        };
        staging_buffer.unmap();

        Ok(ResolvedFrame {
            records,
            generation: dataset.generation(),
        })
    }

    fn backend(&self) -> Backend {
        Backend::Gpu
    }
}
