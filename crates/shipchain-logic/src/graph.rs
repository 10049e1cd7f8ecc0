//! Campaign graph: the trellis of decks a run travels through.
//!
//! Depth 1 holds a single center node. Every later depth always holds the
//! center lane and rolls each side lane independently, so the graph is
//! connected depth-to-depth through the center. Edges only run one depth
//! forward and at most one lane sideways.
//!
//! The graph is built once per campaign and read-only afterwards; decks are
//! looked up by their position in the flattened node list.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::campaign::LANES;
use crate::faction::Faction;
use crate::hull::HullStyle;

/// The side a deck is entered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncomingVector {
    Start,
    FromRear,
    FromLeft,
    FromRight,
}

/// Direction of an edge leaving a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitDir {
    Forward,
    Left,
    Right,
}

impl ExitDir {
    pub const ALL: [ExitDir; 3] = [ExitDir::Forward, ExitDir::Left, ExitDir::Right];

    pub fn lane_delta(self) -> i8 {
        match self {
            ExitDir::Forward => 0,
            ExitDir::Left => -1,
            ExitDir::Right => 1,
        }
    }

    /// Incoming vector of the deck this exit leads to: travelling left enters
    /// the next deck from its right side, and vice versa.
    pub fn arrival(self) -> IncomingVector {
        match self {
            ExitDir::Forward => IncomingVector::FromRear,
            ExitDir::Left => IncomingVector::FromRight,
            ExitDir::Right => IncomingVector::FromLeft,
        }
    }
}

/// One deck slot in the campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    /// 1-based depth.
    pub depth: u32,
    /// Lane: -1 left, 0 center, +1 right.
    pub lateral: i8,
    pub incoming: IncomingVector,
    /// Exit directions in discovery order, each at most once.
    pub exits: Vec<ExitDir>,
    /// Flat-list indices the exits lead to, parallel to `exits`.
    pub targets: Vec<usize>,
    pub faction: Faction,
    pub hull_style: HullStyle,
    /// Position in the flattened node list.
    pub index: usize,
}

impl GraphNode {
    fn new(depth: u32, lateral: i8, index: usize, rng: &mut impl Rng) -> Self {
        let lane = match lateral {
            -1 => "port",
            0 => "center",
            _ => "starboard",
        };
        Self {
            id: format!("deck-{:02}-{}", depth, lane),
            depth,
            lateral,
            incoming: if depth == 1 {
                IncomingVector::Start
            } else {
                IncomingVector::FromRear
            },
            exits: Vec::new(),
            targets: Vec::new(),
            faction: Faction::random(rng),
            hull_style: HullStyle::random(rng),
            index,
        }
    }

    /// Flat-list index reached through `dir`, if this node has that exit.
    pub fn target(&self, dir: ExitDir) -> Option<usize> {
        self.exits
            .iter()
            .position(|d| *d == dir)
            .map(|i| self.targets[i])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainGraph {
    nodes: Vec<GraphNode>,
    depth_count: u32,
}

impl ChainGraph {
    /// Build the trellis. `side_lane_chance` is clamped to [0, 1].
    pub fn generate(depth_count: u32, side_lane_chance: f64, rng: &mut impl Rng) -> Self {
        let chance = if side_lane_chance.is_nan() {
            0.0
        } else {
            side_lane_chance.clamp(0.0, 1.0)
        };

        let mut nodes = Vec::with_capacity(depth_count as usize * LANES.len());
        if depth_count == 0 {
            return Self { nodes, depth_count };
        }
        nodes.push(GraphNode::new(1, 0, 0, rng));
        let mut previous: Vec<usize> = vec![0];

        for depth in 2..=depth_count {
            let mut current: Vec<usize> = Vec::with_capacity(LANES.len());
            for lateral in LANES {
                if lateral == 0 || rng.gen_bool(chance) {
                    let index = nodes.len();
                    nodes.push(GraphNode::new(depth, lateral, index, rng));
                    current.push(index);
                }
            }

            for &from in &previous {
                let lateral = nodes[from].lateral;
                for dir in ExitDir::ALL {
                    let wanted = lateral + dir.lane_delta();
                    let Some(&to) = current.iter().find(|&&i| nodes[i].lateral == wanted) else {
                        continue;
                    };
                    nodes[from].exits.push(dir);
                    nodes[from].targets.push(to);
                    nodes[to].incoming = dir.arrival();
                }
            }

            previous = current;
        }

        Self { nodes, depth_count }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn depth_count(&self) -> u32 {
        self.depth_count
    }

    pub fn at_depth(&self, depth: u32) -> impl Iterator<Item = &GraphNode> + '_ {
        self.nodes.iter().filter(move |n| n.depth == depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn graph(seed: u64, chance: f64) -> ChainGraph {
        let mut rng = StdRng::seed_from_u64(seed);
        ChainGraph::generate(50, chance, &mut rng)
    }

    #[test]
    fn test_depth_one_is_single_start_node() {
        let g = graph(1, 0.7);
        let first: Vec<_> = g.at_depth(1).collect();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].lateral, 0);
        assert_eq!(first[0].incoming, IncomingVector::Start);
        assert_eq!(first[0].index, 0);
    }

    #[test]
    fn test_center_lane_at_every_depth() {
        for seed in 0..20 {
            let g = graph(seed, 0.7);
            for depth in 2..=50 {
                assert!(
                    g.at_depth(depth).any(|n| n.lateral == 0),
                    "seed {} depth {} has no center lane",
                    seed,
                    depth
                );
            }
        }
    }

    #[test]
    fn test_node_count_bounds() {
        assert_eq!(graph(3, 0.0).len(), 50);
        assert_eq!(graph(3, 1.0).len(), 148);
        for seed in 0..20 {
            let n = graph(seed, 0.7).len();
            assert!((50..=148).contains(&n), "seed {} produced {} nodes", seed, n);
        }
    }

    #[test]
    fn test_index_matches_position() {
        let g = graph(9, 0.7);
        for (i, node) in g.nodes().iter().enumerate() {
            assert_eq!(node.index, i);
            assert_eq!(g.node(i).map(|n| n.index), Some(i));
        }
        assert!(g.node(g.len()).is_none());
    }

    #[test]
    fn test_edges_are_legal() {
        let g = graph(11, 0.7);
        for node in g.nodes() {
            assert_eq!(node.exits.len(), node.targets.len());
            for (dir, &target) in node.exits.iter().zip(&node.targets) {
                let to = &g.nodes()[target];
                assert_eq!(to.depth, node.depth + 1);
                assert_eq!(to.lateral, node.lateral + dir.lane_delta());
            }
        }
    }

    #[test]
    fn test_full_trellis_connectivity() {
        let g = graph(4, 1.0);
        let center = g.at_depth(10).find(|n| n.lateral == 0).unwrap();
        assert_eq!(center.exits, vec![ExitDir::Forward, ExitDir::Left, ExitDir::Right]);
        let left = g.at_depth(10).find(|n| n.lateral == -1).unwrap();
        assert_eq!(left.exits, vec![ExitDir::Forward, ExitDir::Right]);
        let right = g.at_depth(10).find(|n| n.lateral == 1).unwrap();
        assert_eq!(right.exits, vec![ExitDir::Forward, ExitDir::Left]);
        assert!(g.at_depth(50).all(|n| n.exits.is_empty()));
    }

    #[test]
    fn test_incoming_vector_last_edge_wins() {
        let g = graph(4, 1.0);
        // At full width the left lane is last reached by the center's LEFT
        // edge, the center lane by the right lane's LEFT edge, and the right
        // lane by its own FORWARD edge.
        let at = |lateral| g.at_depth(7).find(|n| n.lateral == lateral).unwrap().incoming;
        assert_eq!(at(-1), IncomingVector::FromRight);
        assert_eq!(at(0), IncomingVector::FromRight);
        assert_eq!(at(1), IncomingVector::FromRear);
    }

    #[test]
    fn test_center_only_chain_is_all_forward() {
        let g = graph(5, 0.0);
        for node in g.nodes().iter().skip(1) {
            assert_eq!(node.incoming, IncomingVector::FromRear);
        }
        assert_eq!(g.nodes()[0].target(ExitDir::Forward), Some(1));
        assert_eq!(g.nodes()[0].target(ExitDir::Left), None);
    }

    #[test]
    fn test_same_seed_same_graph() {
        assert_eq!(graph(77, 0.7), graph(77, 0.7));
    }
}
