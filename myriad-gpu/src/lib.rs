/*!
# Myriad GPU Backend

Accelerated resolution pass for the Myriad engine: one compute invocation
per entity, grouped into 64-wide workgroups, writing each entity's result
record into the output slot owned by its index. No cross-entity
communication, so equivalence with the sequential path reduces to
per-invocation arithmetic.

Backend selection happens once at startup via [`create_resolver`]: if no
adapter or device can be acquired the process falls back to the sequential
resolver permanently, logged a single time.
*/

use std::sync::Arc;

use log::{info, warn};

use myriad_core::error::EngineError;
use myriad_core::resolve::{CpuResolver, Resolver};
use myriad_core::Engine;

pub mod resolver;
pub mod shaders;

pub use resolver::GpuResolver;

/// Shared wgpu device and queue for the compute backend.
pub struct GpuContext {
    pub device: Arc<wgpu::Device>,
    pub queue: Arc<wgpu::Queue>,
    pub adapter_info: wgpu::AdapterInfo,
}

impl GpuContext {
    /// Probe for an adapter and acquire a device, blocking on the async
    /// wgpu setup. Fails with [`EngineError::BackendUnavailable`] when no
    /// suitable adapter exists (headless CI, missing drivers).
    pub fn initialize() -> Result<Self, EngineError> {
        pollster::block_on(Self::initialize_async())
    }

    async fn initialize_async() -> Result<Self, EngineError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| EngineError::backend_unavailable("no compatible GPU adapter"))?;

        let adapter_info = adapter.get_info();

        // Large datasets need the adapter's real storage limits, not the
        // conservative defaults.
        let adapter_limits = adapter.limits();
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Myriad Compute Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits {
                        max_storage_buffer_binding_size: adapter_limits
                            .max_storage_buffer_binding_size,
                        max_buffer_size: adapter_limits.max_buffer_size,
                        ..Default::default()
                    },
                },
                None,
            )
            .await
            .map_err(|e| EngineError::backend_unavailable(format!("device request failed: {e}")))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
        })
    }
}

/// Build the best available resolver: the wgpu compute backend when an
/// adapter can be acquired, the sequential resolver otherwise.
///
/// Probing happens exactly once here; a failed probe is logged once and
/// never retried for the process lifetime.
pub fn create_resolver() -> Box<dyn Resolver> {
    match GpuContext::initialize() {
        Ok(context) => {
            let name = context.adapter_info.name.clone();
            match GpuResolver::new(context) {
                Ok(resolver) => {
                    info!("accelerated resolution backend on {name}");
                    Box::new(resolver)
                }
                Err(e) => {
                    warn!("compute pipeline setup failed ({e}), using sequential resolver");
                    Box::new(CpuResolver::new())
                }
            }
        }
        Err(e) => {
            warn!("{e}, using sequential resolver");
            Box::new(CpuResolver::new())
        }
    }
}

/// Convenience constructor: an [`Engine`] driven by the best available
/// backend.
pub fn create_engine() -> Engine {
    Engine::new(create_resolver())
}
