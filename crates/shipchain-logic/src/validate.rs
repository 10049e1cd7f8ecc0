//! Invariant checks for generated decks and campaign graphs.
//!
//! Pure functions over finished data that return a list of findings. Nothing
//! here mutates or repairs; callers decide what an error means (the tests
//! assert none, the simtest harness reports them).

use std::collections::{HashSet, VecDeque};

use crate::graph::{ChainGraph, IncomingVector};
use crate::grid::{GridPos, NEIGHBORS_8, ORTHOGONAL};
use crate::level::DeckBuild;
use crate::tiles::{LayerKind, Layers};

/// A validation finding.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Error,
    Warning,
}

fn error(category: &'static str, message: String) -> ValidationError {
    ValidationError {
        category,
        severity: Severity::Error,
        message,
    }
}

pub fn has_errors(findings: &[ValidationError]) -> bool {
    findings.iter().any(|f| f.severity == Severity::Error)
}

// ── A. Tile layers ──────────────────────────────────────────────────────

/// Check that every tile in every layer lies on the grid.
pub fn check_layer_bounds(layers: &Layers) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (kind, layer) in layers.iter() {
        for pos in layer.positions().filter(|p| !p.in_bounds()) {
            errors.push(error(
                "bounds",
                format!("{} tile at {} is off the grid", kind.name(), pos),
            ));
        }
    }
    errors
}

/// Check that every non-floor, non-water 8-neighbor of a floor tile carries
/// all three wall tiers.
pub fn check_wall_coverage(layers: &Layers) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for pos in layers[LayerKind::Floor].positions() {
        for (dx, dy) in NEIGHBORS_8 {
            let n = pos.offset(dx, dy);
            if !n.in_bounds() || layers.is_walkable_surface(n) || !seen.insert(n) {
                continue;
            }
            for kind in LayerKind::WALL_TIERS {
                if !layers[kind].contains(n) {
                    errors.push(error(
                        "walls",
                        format!("{} beside floor {} has no {} tile", n, pos, kind.name()),
                    ));
                }
            }
        }
    }
    errors
}

/// Check that no wall tier sits on floor or water.
pub fn check_walls_off_surfaces(layers: &Layers) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for kind in LayerKind::WALL_TIERS {
        for pos in layers[kind].positions() {
            if layers.is_walkable_surface(pos) {
                errors.push(error(
                    "walls",
                    format!("{} tile at {} covers a walkable surface", kind.name(), pos),
                ));
            }
        }
    }
    errors
}

/// Check that every NPC stands on floor and never in water.
pub fn check_npcs_on_floor(layers: &Layers) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (pos, npc) in layers[LayerKind::Npcs].iter() {
        if layers[LayerKind::Water].contains(pos) {
            errors.push(error(
                "npcs",
                format!("NPC {} at {} is standing in water", npc.key, pos),
            ));
        } else if !layers[LayerKind::Floor].contains(pos) {
            errors.push(error(
                "npcs",
                format!("NPC {} at {} has no floor", npc.key, pos),
            ));
        }
    }
    errors
}

/// Check that every floor and wall cell is roofed.
pub fn check_ceiling_coverage(layers: &Layers) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for kind in [LayerKind::Floor, LayerKind::Wall] {
        for pos in layers[kind].positions() {
            if !layers[LayerKind::Ceiling].contains(pos) {
                errors.push(error(
                    "ceiling",
                    format!("{} tile at {} has no ceiling", kind.name(), pos),
                ));
            }
        }
    }
    errors
}

// ── B. Traversal ────────────────────────────────────────────────────────

/// Check that `exit` is reachable from `spawn` through orthogonally adjacent
/// floor cells.
pub fn check_spine_connected(layers: &Layers, spawn: GridPos, exit: GridPos) -> Vec<ValidationError> {
    let floor = &layers[LayerKind::Floor];
    for (name, pos) in [("spawn", spawn), ("exit", exit)] {
        if !floor.contains(pos) {
            return vec![error("spine", format!("{} anchor {} is not on floor", name, pos))];
        }
    }

    let mut visited = HashSet::from([spawn]);
    let mut queue = VecDeque::from([spawn]);
    while let Some(pos) = queue.pop_front() {
        if pos == exit {
            return Vec::new();
        }
        for (dx, dy) in ORTHOGONAL {
            let n = pos.offset(dx, dy);
            if floor.contains(n) && visited.insert(n) {
                queue.push_back(n);
            }
        }
    }

    vec![error(
        "spine",
        format!("exit {} unreachable from spawn {} over floor", exit, spawn),
    )]
}

// ── C. Whole deck ───────────────────────────────────────────────────────

/// Run every deck check. Anchors left outside the hull are warnings.
pub fn validate_deck(build: &DeckBuild) -> Vec<ValidationError> {
    let layers = &build.context.layers;
    let mut findings = Vec::new();
    findings.extend(check_layer_bounds(layers));
    findings.extend(check_wall_coverage(layers));
    findings.extend(check_walls_off_surfaces(layers));
    findings.extend(check_npcs_on_floor(layers));
    findings.extend(check_ceiling_coverage(layers));
    findings.extend(check_spine_connected(
        layers,
        build.spawn.anchor.pos,
        build.exit.anchor.pos,
    ));

    for (name, snap) in [("spawn", &build.spawn), ("exit", &build.exit)] {
        if !snap.in_hull {
            findings.push(ValidationError {
                category: "anchors",
                severity: Severity::Warning,
                message: format!("{} anchor {} never reached the hull", name, snap.anchor.pos),
            });
        }
    }
    if layers[LayerKind::Skybox].len() != 1 {
        findings.push(error(
            "skybox",
            format!("expected one skybox tile, found {}", layers[LayerKind::Skybox].len()),
        ));
    }
    findings
}

// ── D. Campaign graph ───────────────────────────────────────────────────

/// Check trellis shape: a lone depth-1 start node, a center lane at every
/// depth, edges one depth forward and at most one lane sideways.
pub fn validate_graph(graph: &ChainGraph) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let nodes = graph.nodes();

    let first: Vec<_> = graph.at_depth(1).collect();
    if graph.depth_count() > 0
        && (first.len() != 1 || first[0].lateral != 0 || first[0].incoming != IncomingVector::Start)
    {
        errors.push(error(
            "graph",
            format!("depth 1 should be a single center start node, found {}", first.len()),
        ));
    }

    for depth in 1..=graph.depth_count() {
        if !graph.at_depth(depth).any(|n| n.lateral == 0) {
            errors.push(error("graph", format!("depth {} has no center lane", depth)));
        }
    }

    for (i, node) in nodes.iter().enumerate() {
        if node.index != i {
            errors.push(error(
                "graph",
                format!("{} stores index {} at position {}", node.id, node.index, i),
            ));
        }
        if node.exits.len() != node.targets.len() {
            errors.push(error(
                "graph",
                format!("{} has {} exits but {} targets", node.id, node.exits.len(), node.targets.len()),
            ));
        }
        for (dir, &target) in node.exits.iter().zip(&node.targets) {
            let Some(to) = nodes.get(target) else {
                errors.push(error(
                    "graph",
                    format!("{} exit {:?} points past the node list", node.id, dir),
                ));
                continue;
            };
            if to.depth != node.depth + 1 || to.lateral != node.lateral + dir.lane_delta() {
                errors.push(error(
                    "graph",
                    format!("{} exit {:?} leads to illegal node {}", node.id, dir, to.id),
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::level::Campaign;
    use crate::tiles::Tile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_deck() -> DeckBuild {
        let config = GenerationConfig {
            depth_count: 3,
            ..GenerationConfig::with_seed(31)
        };
        let campaign = Campaign::with_builtin_catalog(config).unwrap();
        campaign.build_deck(0).unwrap()
    }

    fn errors_in(findings: &[ValidationError], category: &str) -> usize {
        findings
            .iter()
            .filter(|f| f.category == category && f.severity == Severity::Error)
            .count()
    }

    #[test]
    fn test_generated_deck_is_clean() {
        let findings = validate_deck(&sample_deck());
        assert!(!has_errors(&findings), "{:?}", findings);
    }

    #[test]
    fn test_missing_wall_detected() {
        let mut build = sample_deck();
        let pos = build.context.layers[LayerKind::Wall2].positions().next().unwrap();
        let mut rebuilt = crate::tiles::Layer::default();
        for (p, tile) in build.context.layers[LayerKind::Wall2].iter() {
            if p != pos {
                rebuilt.insert(p, tile.clone());
            }
        }
        build.context.layers[LayerKind::Wall2] = rebuilt;
        assert_eq!(errors_in(&validate_deck(&build), "walls"), 1);
    }

    #[test]
    fn test_npc_in_water_detected() {
        let mut layers = Layers::default();
        let pos = GridPos::new(12, 12);
        layers[LayerKind::Water].insert(pos, Tile::new("water_navy"));
        layers[LayerKind::Npcs].insert(pos, Tile::new("navy_trooper_t1"));
        layers[LayerKind::Npcs].insert(GridPos::new(30, 30), Tile::new("navy_trooper_t2"));
        let findings = check_npcs_on_floor(&layers);
        assert_eq!(findings.len(), 2);
        assert!(findings[0].message.contains("water"));
    }

    #[test]
    fn test_disconnected_floor_detected() {
        let mut layers = Layers::default();
        for x in 0..5 {
            layers[LayerKind::Floor].insert(GridPos::new(x, 0), Tile::new("floor_navy"));
            layers[LayerKind::Floor].insert(GridPos::new(x, 10), Tile::new("floor_navy"));
        }
        let spawn = GridPos::new(0, 0);
        assert!(check_spine_connected(&layers, spawn, GridPos::new(4, 0)).is_empty());
        assert_eq!(check_spine_connected(&layers, spawn, GridPos::new(4, 10)).len(), 1);
        // Diagonal contact is not a path.
        layers[LayerKind::Floor].insert(GridPos::new(5, 1), Tile::new("floor_navy"));
        assert_eq!(check_spine_connected(&layers, spawn, GridPos::new(5, 1)).len(), 1);
    }

    #[test]
    fn test_wall_on_floor_detected() {
        let mut layers = Layers::default();
        layers[LayerKind::Floor].insert(GridPos::new(8, 8), Tile::new("floor_navy"));
        layers[LayerKind::Wall3].insert(GridPos::new(8, 8), Tile::new("wall_navy"));
        assert_eq!(check_walls_off_surfaces(&layers).len(), 1);
    }

    #[test]
    fn test_generated_graph_is_clean() {
        let mut rng = StdRng::seed_from_u64(17);
        let graph = ChainGraph::generate(50, 0.7, &mut rng);
        assert!(validate_graph(&graph).is_empty());
    }

    #[test]
    fn test_tampered_graph_detected() {
        let mut rng = StdRng::seed_from_u64(17);
        let graph = ChainGraph::generate(4, 1.0, &mut rng);
        let mut json = serde_json::to_value(&graph).unwrap();
        json["nodes"][0]["targets"][0] = serde_json::json!(0);
        let tampered: ChainGraph = serde_json::from_value(json).unwrap();
        assert_eq!(validate_graph(&tampered).len(), 1);
    }
}
