//! Spawn and exit anchors.
//!
//! An anchor starts at an ideal point chosen from the side the deck is entered
//! from, then walks in one-unit steps toward the grid center until its rounded
//! position lands inside the hull. If the walk runs out of budget the rounded
//! ideal point is kept as-is; later stages tolerate an anchor outside the hull.

use serde::{Deserialize, Serialize};

use crate::constants::anchors::{
    EXIT, SNAP_BUDGET, SPAWN_DEFAULT, SPAWN_FROM_LEFT, SPAWN_FROM_RIGHT,
};
use crate::constants::GRID_CENTER;
use crate::context::LevelBuildContext;
use crate::graph::IncomingVector;
use crate::grid::{GridPos, HullMask};
use crate::tiles::{LayerKind, Tile, TileProperties};

/// Cardinal rotations, quarter turns clockwise from "forward".
pub mod rotation {
    pub const FORWARD: u8 = 0;
    pub const RIGHT: u8 = 1;
    pub const BACKWARD: u8 = 2;
    pub const LEFT: u8 = 3;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub pos: GridPos,
    pub rotation: u8,
}

/// Outcome of snapping an ideal point into the hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snap {
    pub anchor: Anchor,
    /// One-unit steps walked before landing in the hull.
    pub steps: u32,
    /// False when the budget ran out and the unsnapped point was kept.
    pub in_hull: bool,
}

/// Ideal spawn point and facing for a deck entered from `incoming`.
pub fn ideal_spawn(incoming: IncomingVector) -> ((f32, f32), u8) {
    match incoming {
        IncomingVector::FromLeft => (SPAWN_FROM_LEFT, rotation::RIGHT),
        IncomingVector::FromRight => (SPAWN_FROM_RIGHT, rotation::LEFT),
        IncomingVector::Start | IncomingVector::FromRear => (SPAWN_DEFAULT, rotation::FORWARD),
    }
}

pub fn ideal_exit() -> ((f32, f32), u8) {
    (EXIT, rotation::BACKWARD)
}

/// Walk `(x, y)` toward the grid center until its rounded position is inside
/// `hull`, for at most [`SNAP_BUDGET`] steps.
pub fn snap_to_hull(x: f32, y: f32, rotation: u8, hull: &HullMask) -> Snap {
    let center = GRID_CENTER as f32;
    let (mut px, mut py) = (x, y);

    for steps in 0..=SNAP_BUDGET {
        let pos = GridPos::round(px, py);
        if hull.contains(pos) {
            return Snap {
                anchor: Anchor { pos, rotation },
                steps,
                in_hull: true,
            };
        }
        if steps == SNAP_BUDGET {
            break;
        }
        let (dx, dy) = (center - px, center - py);
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= 1.0 {
            px = center;
            py = center;
        } else {
            px += dx / dist;
            py += dy / dist;
        }
    }

    let pos = GridPos::round(x, y);
    log::debug!("Anchor at {} found no hull within {} steps", pos, SNAP_BUDGET);
    Snap {
        anchor: Anchor { pos, rotation },
        steps: SNAP_BUDGET,
        in_hull: false,
    }
}

/// Resolve the spawn and exit anchors for a deck.
pub fn resolve_anchors(incoming: IncomingVector, hull: &HullMask) -> (Snap, Snap) {
    let ((sx, sy), spawn_rotation) = ideal_spawn(incoming);
    let ((ex, ey), exit_rotation) = ideal_exit();
    (
        snap_to_hull(sx, sy, spawn_rotation, hull),
        snap_to_hull(ex, ey, exit_rotation, hull),
    )
}

/// Mark the anchors on the deck: the spawn point, and the exit dock naming
/// the decks it leads to.
pub fn place_markers(ctx: &mut LevelBuildContext, spawn: Anchor, exit: Anchor, targets: &[usize]) {
    ctx.layers[LayerKind::Spawns].insert(
        spawn.pos,
        Tile::new("spawn_point").with_rotation(spawn.rotation),
    );
    ctx.layers[LayerKind::Dock].insert(
        exit.pos,
        Tile::new("exit_dock")
            .with_rotation(exit.rotation)
            .with_properties(TileProperties {
                target: Some(targets.to_vec()),
                ..Default::default()
            }),
    );
}
