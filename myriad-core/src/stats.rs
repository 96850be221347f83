//! Per-pass statistics for the observability layer.

use serde::{Deserialize, Serialize};

use crate::lod::LodTier;

/// Snapshot of the last completed resolution pass. Rebuilt every pass,
/// read-only to consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Total entities in the dataset at resolution time.
    pub total: u64,
    /// Entities that classified visible.
    pub visible: u64,
    /// Bucketed entity count per LOD tier (post-truncation).
    pub bucket_counts: [usize; LodTier::COUNT],
    /// Wall-clock duration of the last resolution pass, in milliseconds.
    pub last_pass_ms: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zeroed() {
        let stats = Stats::default();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.visible, 0);
        assert_eq!(stats.bucket_counts, [0; 4]);
    }
}
