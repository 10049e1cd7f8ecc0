//! Spine routing and carving.
//!
//! The spine is the guaranteed walkable corridor between a deck's spawn and
//! exit. It is routed with 4-directional A* over the hull (Manhattan heuristic,
//! unit step cost, binary min-heap with insertion-order tie-breaking). When
//! the hull offers no route the spine falls back to a straight Bresenham line,
//! which always connects the two anchors even if it crosses void.
//!
//! Score and parent data live in dense `Vec`s indexed by the packed cell
//! index, so the search allocates three grids and a heap and nothing else.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::constants::spine::{CARVE_RADIUS, LIGHT_INTERVAL};
use crate::constants::GRID_CELLS;
use crate::context::LevelBuildContext;
use crate::faction::Faction;
use crate::grid::{GridPos, HullMask, ORTHOGONAL};
use crate::tiles::{AreaType, LayerKind, Tile, TileProperties};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpineRoute {
    /// A* found a path inside the hull.
    Searched,
    /// No hull path existed; the spine is a Bresenham line.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spine {
    /// Path from start to goal, both inclusive.
    pub points: Vec<GridPos>,
    pub route: SpineRoute,
}

/// Route a spine between two anchors. Never fails.
pub fn plan_spine(start: GridPos, goal: GridPos, hull: &HullMask) -> Spine {
    match find_path(start, goal, hull) {
        Some(points) => Spine {
            points,
            route: SpineRoute::Searched,
        },
        None => {
            log::debug!("No hull path from {} to {}, falling back to a line", start, goal);
            Spine {
                points: bresenham(start, goal),
                route: SpineRoute::Fallback,
            }
        }
    }
}

/// A* from `start` to `goal` over cells inside `hull`.
///
/// The goal cell is always enterable, so an anchor left outside the hull by a
/// failed snap can still be reached from inside. Returns `None` when no route
/// exists or either endpoint is off the grid.
pub fn find_path(start: GridPos, goal: GridPos, hull: &HullMask) -> Option<Vec<GridPos>> {
    let start_index = start.index()?;
    let goal_index = goal.index()?;
    if start_index == goal_index {
        return Some(vec![start]);
    }

    let mut g_score = vec![u32::MAX; GRID_CELLS];
    let mut came_from: Vec<Option<usize>> = vec![None; GRID_CELLS];
    let mut closed = vec![false; GRID_CELLS];
    // (f, insertion sequence, cell): equal f pops in insertion order.
    let mut open: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
    let mut sequence: u64 = 0;

    g_score[start_index] = 0;
    open.push(Reverse((start.manhattan(goal), sequence, start_index)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if current == goal_index {
            return Some(reconstruct_path(&came_from, current));
        }
        if closed[current] {
            continue;
        }
        closed[current] = true;

        let pos = GridPos::from_index(current);
        let next_g = g_score[current] + 1;
        for (dx, dy) in ORTHOGONAL {
            let next = pos.offset(dx, dy);
            let Some(next_index) = next.index() else {
                continue;
            };
            if closed[next_index] || !(next_index == goal_index || hull.contains(next)) {
                continue;
            }
            if next_g < g_score[next_index] {
                g_score[next_index] = next_g;
                came_from[next_index] = Some(current);
                sequence += 1;
                open.push(Reverse((next_g + next.manhattan(goal), sequence, next_index)));
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &[Option<usize>], goal: usize) -> Vec<GridPos> {
    let mut path = vec![GridPos::from_index(goal)];
    let mut node = goal;
    while let Some(prev) = came_from[node] {
        path.push(GridPos::from_index(prev));
        node = prev;
    }
    path.reverse();
    path
}

/// Integer line from `start` to `end`, both inclusive, 8-connected.
pub fn bresenham(start: GridPos, end: GridPos) -> Vec<GridPos> {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let sx = if start.x < end.x { 1 } else { -1 };
    let sy = if start.y < end.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (start.x, start.y);

    let mut points = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        points.push(GridPos::new(x, y));
        if x == end.x && y == end.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Carve the spine into the floor: a radius-3 disk around every point, plus a
/// light on every fifth point. Only the floor and lights layers are written;
/// existing floor tiles under the disk are replaced.
pub fn carve_spine(ctx: &mut LevelBuildContext, spine: &Spine, style: Faction) {
    let floor = Tile::styled("floor", style).with_properties(TileProperties {
        style: Some(style),
        area_type: Some(AreaType::Spine),
        ..Default::default()
    });
    let radius_sq = CARVE_RADIUS * CARVE_RADIUS;

    for (i, &point) in spine.points.iter().enumerate() {
        for dy in -CARVE_RADIUS..=CARVE_RADIUS {
            for dx in -CARVE_RADIUS..=CARVE_RADIUS {
                if dx * dx + dy * dy <= radius_sq {
                    ctx.layers[LayerKind::Floor].insert(point.offset(dx, dy), floor.clone());
                }
            }
        }
        if i % LIGHT_INTERVAL == 0 {
            ctx.layers[LayerKind::Lights].insert(point, Tile::new("light_point"));
        }
    }

    log::debug!(
        "Carved {:?} spine of {} points ({} floor tiles)",
        spine.route,
        spine.points.len(),
        ctx.layers[LayerKind::Floor].len()
    );
}
