//! Resolution pass: visibility + LOD + radius over the full entity set.
//!
//! Two interchangeable execution strategies sit behind the [`Resolver`]
//! trait: the sequential [`CpuResolver`] here, and the wgpu compute backend
//! in `myriad-gpu`. Both must be observationally equivalent for identical
//! inputs; [`resolve_entity`] is the reference semantics both follow.

use glam::Vec3;

use crate::camera::CameraState;
use crate::dataset::DatasetSnapshot;
use crate::error::EngineError;
use crate::lod::{aggression_factor, select_lod, LodTier};
use crate::radius::animated_radius;
use crate::visibility::is_visible;

/// Which execution strategy produced a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Sequential fallback, always available.
    Cpu,
    /// Parallel compute backend.
    Gpu,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Cpu => write!(f, "cpu"),
            Backend::Gpu => write!(f, "gpu"),
        }
    }
}

/// Per-entity output of one resolution pass. Never mutated after creation;
/// consumed by bucketing within the same frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRecord {
    pub position: [f32; 3],
    pub element: u8,
    pub radius: f32,
    pub lod: LodTier,
    pub distance: f32,
    pub visible: bool,
}

/// One complete resolution pass output, tagged with the dataset generation
/// it was computed against so stale passes can be rejected before bucketing.
#[derive(Debug, Clone)]
pub struct ResolvedFrame {
    pub records: Vec<ResultRecord>,
    pub generation: u64,
}

/// A full-dataset resolution strategy.
///
/// Implementations must produce, per entity, the record [`resolve_entity`]
/// would: visibility flag and LOD tier exactly equal, radius and distance
/// within normal cross-implementation floating-point tolerance.
pub trait Resolver {
    fn resolve(
        &self,
        dataset: &DatasetSnapshot<'_>,
        camera: &CameraState,
    ) -> Result<ResolvedFrame, EngineError>;

    fn backend(&self) -> Backend;
}

/// Reference per-entity semantics shared by every backend.
pub fn resolve_entity(
    position: Vec3,
    element: u8,
    camera: &CameraState,
    aggression: f32,
) -> ResultRecord {
    let distance = (position - camera.position).length();
    let visible = is_visible(position, camera);
    let lod = select_lod(distance, aggression);
    let radius = animated_radius(element, position, camera.time);

    ResultRecord {
        position: position.to_array(),
        element,
        radius,
        lod,
        distance,
        visible,
    }
}

/// Sequential resolution over the whole snapshot. Always available; also
/// the preferred path for small datasets where dispatch and readback
/// overhead on the accelerated backend would dominate actual compute.
#[derive(Debug, Default)]
pub struct CpuResolver;

impl CpuResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for CpuResolver {
    fn resolve(
        &self,
        dataset: &DatasetSnapshot<'_>,
        camera: &CameraState,
    ) -> Result<ResolvedFrame, EngineError> {
        camera.validate()?;
        let aggression = aggression_factor(dataset.entity_count());

        let mut records = Vec::with_capacity(dataset.entity_count() as usize);
        for i in 0..dataset.entity_count() as usize {
            records.push(resolve_entity(
                dataset.position(i),
                dataset.element(i),
                camera,
                aggression,
            ));
        }

        Ok(ResolvedFrame {
            records,
            generation: dataset.generation(),
        })
    }

    fn backend(&self) -> Backend {
        Backend::Cpu
    }
}
