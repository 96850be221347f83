//! Myriad Core Library
//!
//! Visibility classification, LOD selection, radius animation, bucketing,
//! and the change-gated frame scheduler for massive point datasets.
//!
//! The engine consumes a read-only dataset snapshot plus a camera state and
//! produces render-ready instance buckets. Draw submission, windowing, and
//! dataset generation live outside this crate.

pub mod bucket;
pub mod camera;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod lod;
pub mod radius;
pub mod resolve;
pub mod stats;
pub mod visibility;

// Re-export commonly used types and functions
pub use bucket::{BucketConfig, LodBuckets, MeshInstance, PointVertex};
pub use camera::CameraState;
pub use dataset::DatasetSnapshot;
pub use engine::{Engine, FrameOutcome, SMALL_DATASET_THRESHOLD};
pub use error::EngineError;
pub use lod::{aggression_factor, select_lod, LodTier};
pub use radius::animated_radius;
pub use resolve::{Backend, CpuResolver, ResolvedFrame, Resolver, ResultRecord};
pub use stats::Stats;
pub use visibility::is_visible;

/// Version information for the Myriad core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
