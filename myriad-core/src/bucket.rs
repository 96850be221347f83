//! Bucketing and instance assembly.
//!
//! Partitions resolution results by LOD tier into render-ready collections.
//! Tier 0 is a flat point list with no instance cap; tiers 1..=3 are
//! capacity-bounded instance arrays sized for the render backend's maximum
//! instance count. A full bucket silently drops further entities for the
//! frame rather than promoting them to another tier.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::lod::LodTier;
use crate::resolve::ResultRecord;

/// RGBA color per known element class. Index is the element id.
pub const ELEMENT_COLORS: [[f32; 4]; 4] = [
    [0.90, 0.90, 0.90, 1.0],
    [0.30, 0.30, 0.30, 1.0],
    [0.20, 0.30, 0.90, 1.0],
    [0.90, 0.15, 0.10, 1.0],
];

/// Color for element classes outside the known table.
pub const DEFAULT_COLOR: [f32; 4] = [0.80, 0.20, 0.80, 1.0];

pub fn element_color(element: u8) -> [f32; 4] {
    ELEMENT_COLORS
        .get(element as usize)
        .copied()
        .unwrap_or(DEFAULT_COLOR)
}

/// One vertex of the tier-0 point list. GPU-uploadable as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

/// One instance of a mesh tier. GPU-uploadable as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
}

/// Bucketing limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Maximum instances per mesh tier (tiers 1..=3). The point tier is
    /// uncapped.
    pub instance_capacity: usize,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            instance_capacity: 100_000,
        }
    }
}

/// Per-tier output of one frame, rebuilt wholesale by every resolution pass.
#[derive(Debug, Clone, Default)]
pub struct LodBuckets {
    points: Vec<PointVertex>,
    coarse: Vec<MeshInstance>,
    medium: Vec<MeshInstance>,
    fine: Vec<MeshInstance>,
}

impl LodBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all bucket contents from one pass's records.
    ///
    /// Non-visible records are discarded; visible records append to the
    /// bucket matching their tier until capacity, then drop.
    pub fn rebuild(&mut self, records: &[ResultRecord], config: &BucketConfig) {
        self.points.clear();
        self.coarse.clear();
        self.medium.clear();
        self.fine.clear();

        for record in records {
            if !record.visible {
                continue;
            }
            let color = element_color(record.element);
            match record.lod {
                LodTier::Point => self.points.push(PointVertex {
                    position: record.position,
                    radius: record.radius,
                    color,
                }),
                tier => {
                    let bucket = match tier {
                        LodTier::Coarse => &mut self.coarse,
                        LodTier::Medium => &mut self.medium,
                        _ => &mut self.fine,
                    };
                    if bucket.len() < config.instance_capacity {
                        bucket.push(MeshInstance {
                            position: record.position,
                            radius: record.radius,
                            color,
                        });
                    }
                }
            }
        }
    }

    pub fn points(&self) -> &[PointVertex] {
        &self.points
    }

    /// Instance array for a mesh tier. Tier 0 has no instance form; asking
    /// for it yields an empty slice.
    pub fn instances(&self, tier: LodTier) -> &[MeshInstance] {
        match tier {
            LodTier::Point => &[],
            LodTier::Coarse => &self.coarse,
            LodTier::Medium => &self.medium,
            LodTier::Fine => &self.fine,
        }
    }

    /// Entity count per tier, point tier included.
    pub fn counts(&self) -> [usize; LodTier::COUNT] {
        [
            self.points.len(),
            self.coarse.len(),
            self.medium.len(),
            self.fine.len(),
        ]
    }

    pub fn visible_total(&self) -> usize {
        self.counts().iter().sum()
    }
}
