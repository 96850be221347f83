//! Read-only dataset snapshot at the engine boundary.
//!
//! The dataset provider owns entity storage and replaces it wholesale on
//! regeneration; the engine borrows flat arrays for the duration of one
//! resolution pass. `generation` is the staleness token: a resolved frame
//! carries the generation it was computed against, and bucketing rejects
//! results whose generation no longer matches the live snapshot.

use glam::Vec3;

use crate::error::EngineError;

/// Borrowed view over one generation of the dataset.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSnapshot<'a> {
    /// Packed xyz coordinates, 3 per entity.
    positions: &'a [f32],
    /// Element class per entity; unknown classes map to default radius/color.
    elements: &'a [u8],
    /// Incremented by the provider on every wholesale regeneration.
    generation: u64,
}

impl<'a> DatasetSnapshot<'a> {
    pub fn new(
        positions: &'a [f32],
        elements: &'a [u8],
        generation: u64,
    ) -> Result<Self, EngineError> {
        if positions.len() != elements.len() * 3 {
            return Err(EngineError::MalformedDataset {
                reason: format!(
                    "{} position floats for {} elements (expected {})",
                    positions.len(),
                    elements.len(),
                    elements.len() * 3
                ),
            });
        }
        Ok(Self {
            positions,
            elements,
            generation,
        })
    }

    pub fn entity_count(&self) -> u64 {
        self.elements.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn positions(&self) -> &'a [f32] {
        self.positions
    }

    pub fn elements(&self) -> &'a [u8] {
        self.elements
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * 3;
        Vec3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    pub fn element(&self, index: usize) -> u8 {
        self.elements[index]
    }
}
