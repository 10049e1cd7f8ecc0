//! Wall inference from floor adjacency.
//!
//! Walls are derived, never painted directly: every grid cell that touches a
//! floor tile (8-neighborhood) and is neither floor nor water becomes a
//! three-tier wall stack. Diagonal-only neighbors count, so concave corners get
//! their stray corner block.

use indexmap::IndexMap;

use crate::context::LevelBuildContext;
use crate::faction::Faction;
use crate::grid::{GridPos, NEIGHBORS_8};
use crate::tiles::{LayerKind, Tile, TileProperties};

/// Rebuild all three wall tiers. Returns the number of wall stacks written.
pub fn synthesize_walls(ctx: &mut LevelBuildContext) -> usize {
    for kind in LayerKind::WALL_TIERS {
        ctx.layers[kind].clear();
    }

    // First floor tile to claim a cell decides its style.
    let mut placements: IndexMap<GridPos, Faction> = IndexMap::new();
    for (pos, floor) in ctx.layers[LayerKind::Floor].iter() {
        let style = floor.style().unwrap_or(Faction::PRIMARY);
        for (dx, dy) in NEIGHBORS_8 {
            let neighbor = pos.offset(dx, dy);
            if !neighbor.in_bounds()
                || ctx.layers.is_walkable_surface(neighbor)
                || placements.contains_key(&neighbor)
            {
                continue;
            }
            placements.insert(neighbor, style);
        }
    }

    for (&pos, &style) in &placements {
        for (tier, kind) in (1u8..).zip(LayerKind::WALL_TIERS) {
            ctx.layers[kind].insert(
                pos,
                Tile::styled("wall", style).with_properties(TileProperties {
                    style: Some(style),
                    tier: Some(tier),
                    ..Default::default()
                }),
            );
        }
    }

    log::debug!("Synthesized {} wall stacks", placements.len());
    placements.len()
}
