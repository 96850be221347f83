use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use myriad_core::{
    aggression_factor, select_lod, CameraState, CpuResolver, DatasetSnapshot, Engine, LodTier,
};

/// Seeded stand-in for the external dataset provider: uniform positions in a
/// cube ahead of the default camera, element classes cycling 0..4.
fn synthetic_dataset(n: usize, seed: u64) -> (Vec<f32>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = Vec::with_capacity(n * 3);
    let mut elements = Vec::with_capacity(n);
    for i in 0..n {
        positions.push(rng.gen_range(-40.0..40.0));
        positions.push(rng.gen_range(-40.0..40.0));
        positions.push(rng.gen_range(-40.0..40.0));
        elements.push((i % 4) as u8);
    }
    (positions, elements)
}

fn camera_at_origin_looking_z(far: f32) -> CameraState {
    CameraState::new(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, 1.0),
        std::f32::consts::FRAC_PI_4,
        16.0 / 9.0,
        0.1,
        far,
    )
}

#[test]
fn large_dataset_skips_when_camera_unchanged() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (positions, elements) = synthetic_dataset(50_000, 11);
    let snap = DatasetSnapshot::new(&positions, &elements, 0).unwrap();
    let mut engine = Engine::new(Box::new(CpuResolver::new()));
    let cam = CameraState::default();

    // first frame resolves unconditionally
    let outcome = engine.frame(&snap, &cam).unwrap();
    assert!(outcome.resolved);
    let counts_after_first = engine.buckets().counts();
    let stats_after_first = *engine.stats();

    // camera untouched: pass skipped, buckets and stats identical
    let outcome = engine.frame(&snap, &cam).unwrap();
    assert!(!outcome.resolved);
    assert_eq!(engine.buckets().counts(), counts_after_first);
    assert_eq!(*engine.stats(), stats_after_first);

    // marking the camera dirty re-resolves
    engine.notify_camera_changed();
    let outcome = engine.frame(&snap, &cam).unwrap();
    assert!(outcome.resolved);
}

#[test]
fn small_dataset_resolves_every_frame() {
    let (positions, elements) = synthetic_dataset(500, 12);
    let snap = DatasetSnapshot::new(&positions, &elements, 0).unwrap();
    let mut engine = Engine::new(Box::new(CpuResolver::new()));
    // eye pulled back so part of the cube sits past the point-tier threshold
    let mut cam = CameraState::default();

    let outcome = engine.frame(&snap, &cam).unwrap();
    assert!(outcome.resolved);
    assert!(!engine.buckets().points().is_empty());
    let first_radius = engine.buckets().points().first().map(|p| p.radius);

    // no camera change notification, only time advancing; resolution must
    // still run so the breathing animation stays live
    cam.time = 1.5;
    let outcome = engine.frame(&snap, &cam).unwrap();
    assert!(outcome.resolved);
    let second_radius = engine.buckets().points().first().map(|p| p.radius);

    assert!(first_radius.is_some());
    assert_ne!(first_radius, second_radius);
}

#[test]
fn scenario_ten_entities_ahead_all_visible() {
    // 10 entities of element class 0 strung out along +z, camera at the
    // origin looking down +z with far=100: everything classifies visible
    // and tiers follow raw distance at aggression 1.0.
    let depths = [2.0, 5.0, 9.0, 11.0, 15.0, 19.0, 25.0, 40.0, 55.0, 70.0];
    let mut positions = Vec::new();
    for d in depths {
        positions.extend_from_slice(&[0.0, 0.0, d]);
    }
    let elements = vec![0u8; depths.len()];
    let snap = DatasetSnapshot::new(&positions, &elements, 0).unwrap();

    let mut engine = Engine::new(Box::new(CpuResolver::new()));
    let cam = camera_at_origin_looking_z(100.0);
    engine.frame(&snap, &cam).unwrap();

    let stats = engine.stats();
    assert_eq!(stats.total, 10);
    assert_eq!(stats.visible, 10);
    // distances >50 -> point, >20 -> coarse, >10 -> medium, else fine
    assert_eq!(stats.bucket_counts, [2, 2, 3, 3]);
}

#[test]
fn scenario_entity_past_far_cutoff_never_visible() {
    let cam = camera_at_origin_looking_z(100.0);
    let d = cam.far * 0.9;
    // dead ahead, sideways, behind: angle never rescues a far entity
    let offsets = [
        Vec3::new(0.0, 0.0, d),
        Vec3::new(d, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -d),
    ];

    let mut positions = Vec::new();
    for o in offsets {
        positions.extend_from_slice(&o.to_array());
    }
    let elements = vec![0u8; offsets.len()];
    let snap = DatasetSnapshot::new(&positions, &elements, 0).unwrap();

    let mut engine = Engine::new(Box::new(CpuResolver::new()));
    engine.frame(&snap, &cam).unwrap();
    assert_eq!(engine.stats().visible, 0);
    assert_eq!(engine.buckets().visible_total(), 0);
}

#[test]
fn scenario_aggression_scales_thresholds() {
    // counts in the 10^5..10^6 band resolve at factor 8, so the LOD
    // thresholds become 400/160/80 and distance 100 lands in the medium
    // tier instead of point
    let aggression = aggression_factor(200_000);
    assert_eq!(aggression, 8.0);
    assert_eq!(select_lod(100.0, aggression), LodTier::Medium);
    assert_eq!(select_lod(100.0, 1.0), LodTier::Point);

    // past the next band boundary the factor keeps growing
    assert_eq!(aggression_factor(2_000_000), 16.0);
    assert_eq!(aggression_factor(20_000_000), 32.0);
}

#[test]
fn regeneration_between_frames_resolves_fresh() {
    let (positions, elements) = synthetic_dataset(2_000, 21);
    let snap = DatasetSnapshot::new(&positions, &elements, 0).unwrap();
    let mut engine = Engine::new(Box::new(CpuResolver::new()));
    let cam = CameraState::default();
    engine.frame(&snap, &cam).unwrap();

    // wholesale replacement bumps the generation; no camera notification
    let (positions2, elements2) = synthetic_dataset(3_000, 22);
    let snap2 = DatasetSnapshot::new(&positions2, &elements2, 1).unwrap();
    let outcome = engine.frame(&snap2, &cam).unwrap();
    assert!(outcome.resolved);
    assert_eq!(engine.stats().total, 3_000);
}

#[test]
fn regeneration_with_parked_camera_resolves_fresh() {
    let (positions, elements) = synthetic_dataset(50_000, 31);
    let snap = DatasetSnapshot::new(&positions, &elements, 0).unwrap();
    let mut engine = Engine::new(Box::new(CpuResolver::new()));
    let cam = CameraState::default();
    engine.frame(&snap, &cam).unwrap();
    let first_point = engine.buckets().points().first().copied();
    assert!(first_point.is_some());

    // same count, new generation, new positions, camera untouched: the
    // buckets belong to a dead generation and must be rebuilt
    let (positions2, elements2) = synthetic_dataset(50_000, 32);
    let snap2 = DatasetSnapshot::new(&positions2, &elements2, 1).unwrap();
    let outcome = engine.frame(&snap2, &cam).unwrap();
    assert!(outcome.resolved);
    let second_point = engine.buckets().points().first().copied();
    assert_ne!(
        first_point.map(|p| p.position),
        second_point.map(|p| p.position)
    );

    // unchanged snapshot and camera still skips
    let outcome = engine.frame(&snap2, &cam).unwrap();
    assert!(!outcome.resolved);
}
