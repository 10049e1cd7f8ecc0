//! Per-deck working structure threaded through the generation stages.

use crate::constants::GRID_SIZE;
use crate::grid::HullMask;
use crate::tiles::Layers;

/// Mutable state for one deck, owned by a single generation call.
///
/// Stages take `&mut LevelBuildContext` and run in a fixed order (anchors,
/// spine, rooms, walls, finalize). The hull is fixed at construction and only
/// exposed by shared reference.
#[derive(Debug, Clone)]
pub struct LevelBuildContext {
    pub layers: Layers,
    valid_hull: HullMask,
}

impl LevelBuildContext {
    pub const WIDTH: i32 = GRID_SIZE;
    pub const HEIGHT: i32 = GRID_SIZE;

    pub fn new(valid_hull: HullMask) -> Self {
        Self {
            layers: Layers::default(),
            valid_hull,
        }
    }

    pub fn valid_hull(&self) -> &HullMask {
        &self.valid_hull
    }

    /// Borrow the hull and the layers at the same time.
    pub fn hull_and_layers_mut(&mut self) -> (&HullMask, &mut Layers) {
        (&self.valid_hull, &mut self.layers)
    }
}
