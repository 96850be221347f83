//! Change-gated frame scheduler and engine facade.
//!
//! Owns the selected resolver, the live buckets, and the camera-dirty flag.
//! Small datasets re-resolve every frame on the sequential path so the
//! radius animation stays live even with a parked camera; large datasets
//! resolve when the camera changed or the dataset was regenerated, and
//! otherwise reuse the prior frame's buckets untouched.

use std::time::Instant;

use log::debug;

use crate::bucket::{BucketConfig, LodBuckets};
use crate::camera::CameraState;
use crate::dataset::DatasetSnapshot;
use crate::error::EngineError;
use crate::resolve::{Backend, CpuResolver, Resolver};
use crate::stats::Stats;

/// Entity count at or below which every frame re-resolves sequentially.
/// Above it, accelerated dispatch amortizes and change gating applies.
pub const SMALL_DATASET_THRESHOLD: u64 = 1_000;

/// What the scheduler did for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Whether a resolution pass ran this frame. `false` means the prior
    /// frame's buckets were reused (or a stale pass was discarded).
    pub resolved: bool,
    pub backend: Option<Backend>,
}

pub struct Engine {
    resolver: Box<dyn Resolver>,
    /// Sequential path for small datasets, regardless of the main backend.
    small_path: CpuResolver,
    buckets: LodBuckets,
    stats: Stats,
    config: BucketConfig,
    threshold: u64,
    camera_dirty: bool,
    /// Generation and entity count of the pass currently in the buckets.
    /// A snapshot that no longer matches means the dataset was regenerated
    /// and the buckets are for a dead generation, camera parked or not.
    last_resolved: Option<(u64, u64)>,
}

impl Engine {
    pub fn new(resolver: Box<dyn Resolver>) -> Self {
        Self::with_config(resolver, BucketConfig::default(), SMALL_DATASET_THRESHOLD)
    }

    pub fn with_config(resolver: Box<dyn Resolver>, config: BucketConfig, threshold: u64) -> Self {
        Self {
            resolver,
            small_path: CpuResolver::new(),
            buckets: LodBuckets::new(),
            stats: Stats::default(),
            config,
            threshold,
            // first frame always resolves
            camera_dirty: true,
            last_resolved: None,
        }
    }

    /// Record that the camera mutated (position, target, FOV, aspect) or a
    /// forced refresh was requested. Cleared when a resolution pass
    /// completes for that camera snapshot.
    pub fn notify_camera_changed(&mut self) {
        self.camera_dirty = true;
    }

    pub fn backend(&self) -> Backend {
        self.resolver.backend()
    }

    pub fn buckets(&self) -> &LodBuckets {
        &self.buckets
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Run one frame: decide whether a resolution pass is needed, run it,
    /// and rebuild the buckets from its records.
    ///
    /// A pass whose output no longer matches the live snapshot (dataset
    /// regenerated underneath it) is discarded; the prior buckets survive
    /// and the dirty flag stays set so the next frame re-resolves.
    pub fn frame(
        &mut self,
        dataset: &DatasetSnapshot<'_>,
        camera: &CameraState,
    ) -> Result<FrameOutcome, EngineError> {
        camera.validate()?;

        let small = dataset.entity_count() <= self.threshold;
        let dataset_changed = self.last_resolved.map_or(true, |(generation, count)| {
            generation != dataset.generation() || count != dataset.entity_count()
        });
        if !small && !self.camera_dirty && !dataset_changed {
            return Ok(FrameOutcome {
                resolved: false,
                backend: None,
            });
        }

        let resolver: &dyn Resolver = if small {
            &self.small_path
        } else {
            self.resolver.as_ref()
        };

        let started = Instant::now();
        let frame = resolver.resolve(dataset, camera)?;
        let elapsed_ms = started.elapsed().as_secs_f32() * 1_000.0;

        if frame.generation != dataset.generation()
            || frame.records.len() as u64 != dataset.entity_count()
        {
            let stale = EngineError::StaleResult {
                expected: dataset.generation(),
                got: frame.generation,
            };
            debug!("discarding resolution pass: {stale}");
            return Ok(FrameOutcome {
                resolved: false,
                backend: None,
            });
        }

        self.buckets.rebuild(&frame.records, &self.config);
        self.stats = Stats {
            total: dataset.entity_count(),
            visible: frame.records.iter().filter(|r| r.visible).count() as u64,
            bucket_counts: self.buckets.counts(),
            last_pass_ms: elapsed_ms,
        };
        self.camera_dirty = false;
        self.last_resolved = Some((dataset.generation(), dataset.entity_count()));

        Ok(FrameOutcome {
            resolved: true,
            backend: Some(resolver.backend()),
        })
    }
}
