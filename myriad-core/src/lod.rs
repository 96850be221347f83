//! Aggression policy and LOD tier selection.
//!
//! Fixed distance thresholds would leave O(N) entities at full detail as the
//! dataset grows; the aggression factor scales every threshold with total
//! entity count so the detail-weighted render workload stays roughly bounded
//! regardless of N.

use serde::{Deserialize, Serialize};

/// Discrete detail tier, ordered coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LodTier {
    /// Point-sprite rendering, one vertex per entity.
    Point = 0,
    /// Coarse instanced mesh.
    Coarse = 1,
    /// Medium instanced mesh.
    Medium = 2,
    /// Fine instanced mesh.
    Fine = 3,
}

impl LodTier {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Point),
            1 => Some(Self::Coarse),
            2 => Some(Self::Medium),
            3 => Some(Self::Fine),
            _ => None,
        }
    }
}

/// Threshold scale factor for a given total entity count.
///
/// Monotone non-decreasing; codomain {1, 2, 4, 8, 16, 32}. Tier bounds are
/// inclusive, so exactly 10^3 entities still resolve at factor 1.
pub fn aggression_factor(total_count: u64) -> f32 {
    if total_count <= 1_000 {
        1.0
    } else if total_count <= 10_000 {
        2.0
    } else if total_count <= 100_000 {
        4.0
    } else if total_count <= 1_000_000 {
        8.0
    } else if total_count <= 10_000_000 {
        16.0
    } else {
        32.0
    }
}

/// Map camera distance to a detail tier under the given aggression factor.
///
/// Comparisons are strict `>`, so a distance exactly on a threshold resolves
/// to the coarser tier.
pub fn select_lod(distance: f32, aggression: f32) -> LodTier {
    let point_t = 50.0 * aggression;
    let low_t = 20.0 * aggression;
    let mid_t = 10.0 * aggression;

    if distance > point_t {
        LodTier::Point
    } else if distance > low_t {
        LodTier::Coarse
    } else if distance > mid_t {
        LodTier::Medium
    } else {
        LodTier::Fine
    }
}
