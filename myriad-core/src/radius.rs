//! Per-element base radii and the time-varying "breathing" animation.

use glam::Vec3;

/// Base radius per known element class. Index is the element id.
pub const ELEMENT_RADII: [f32; 4] = [0.30, 0.50, 0.45, 0.40];

/// Radius for element classes outside the known table.
pub const DEFAULT_RADIUS: f32 = 0.35;

/// Amplitude of the breathing animation.
pub const BREATH_AMPLITUDE: f32 = 0.02;

/// Base radius for an element class, defaulting for unknown classes.
pub fn base_radius(element: u8) -> f32 {
    ELEMENT_RADII
        .get(element as usize)
        .copied()
        .unwrap_or(DEFAULT_RADIUS)
}

/// Instantaneous rendered radius at `time` seconds.
///
/// The phase offset is keyed by the spatial coordinates so nearby entities
/// pulse out of sync instead of breathing in lockstep. Stateless.
pub fn animated_radius(element: u8, position: Vec3, time: f32) -> f32 {
    base_radius(element) + BREATH_AMPLITUDE * (time + position.x + position.y + position.z).sin()
}
