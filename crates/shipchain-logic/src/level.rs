//! Campaign and the per-deck generation pipeline.
//!
//! A [`Campaign`] owns the trellis graph (built once from the configured seed)
//! and an NPC catalog. Decks are generated on demand by flat node index:
//!   1. hull mask        -- from the node's hull style or the configured override
//!   2. resolve_anchors  -- ideal spawn/exit points snapped into the hull
//!   3. plan/carve spine -- A* (or line fallback) corridor in the node's style
//!   4. place_markers    -- spawn point and exit dock
//!   5. grow_rooms       -- faction-zoned rooms, furniture, squads
//!   6. synthesize_walls -- three-tier walls around every floor tile
//!   7. finalize         -- ceilings, skybox
//!
//! Each deck draws from its own `StdRng` seeded from the campaign seed and the
//! node index, so any deck can be regenerated alone and comes out identical.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::anchor::{place_markers, resolve_anchors, Snap};
use crate::catalog::{NpcCatalog, StaticCatalog};
use crate::config::{ConfigError, GenerationConfig};
use crate::context::LevelBuildContext;
use crate::faction::Faction;
use crate::finalize::{finalize, serialize_level, LevelOutput};
use crate::graph::{ChainGraph, GraphNode};
use crate::hull::{hull_mask, HullStyle};
use crate::rooms::{grow_rooms, GrowthParams, GrowthReport};
use crate::spine::{carve_spine, plan_spine, Spine};
use crate::walls::synthesize_walls;

/// Seed for one deck's room growth.
pub fn deck_seed(campaign_seed: u64, index: usize) -> u64 {
    campaign_seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Everything one deck build produced, kept for inspection and validation.
#[derive(Debug, Clone)]
pub struct DeckBuild {
    pub node_index: usize,
    pub hull_style: HullStyle,
    pub spawn: Snap,
    pub exit: Snap,
    pub spine: Spine,
    pub growth: GrowthReport,
    pub walls: usize,
    /// Style of the first floor tile; drives wall ceilings and the skybox.
    pub dominant: Faction,
    pub context: LevelBuildContext,
}

impl DeckBuild {
    pub fn to_output(&self, music: &str) -> LevelOutput {
        serialize_level(&self.context, music)
    }
}

#[derive(Debug)]
pub struct Campaign<C = StaticCatalog> {
    config: GenerationConfig,
    graph: ChainGraph,
    catalog: C,
}

impl Campaign<StaticCatalog> {
    /// Campaign with the built-in NPC roster.
    pub fn with_builtin_catalog(config: GenerationConfig) -> Result<Self, ConfigError> {
        Self::new(config, StaticCatalog::builtin())
    }
}

impl<C: NpcCatalog> Campaign<C> {
    /// Validate the configuration and build the campaign graph.
    pub fn new(config: GenerationConfig, catalog: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let graph = ChainGraph::generate(config.depth_count, config.side_lane_chance, &mut rng);
        log::info!(
            "Campaign seed {}: {} decks over {} depths",
            config.seed,
            graph.len(),
            graph.depth_count()
        );
        Ok(Self {
            config,
            graph,
            catalog,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn graph(&self) -> &ChainGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn deck_count(&self) -> usize {
        self.graph.len()
    }

    fn hull_style_for(&self, node: &GraphNode) -> HullStyle {
        match &self.config.hull_override {
            Some(name) => HullStyle::from_name(name),
            None => node.hull_style,
        }
    }

    /// Run the full pipeline for the deck at flat index `index`. `None` when
    /// the index is past the end of the node list.
    pub fn build_deck(&self, index: usize) -> Option<DeckBuild> {
        let node = self.graph.node(index)?;
        let hull_style = self.hull_style_for(node);
        let mut ctx = LevelBuildContext::new(hull_mask(hull_style));

        let (spawn, exit) = resolve_anchors(node.incoming, ctx.valid_hull());
        let spine = plan_spine(spawn.anchor.pos, exit.anchor.pos, ctx.valid_hull());
        carve_spine(&mut ctx, &spine, node.faction);
        place_markers(&mut ctx, spawn.anchor, exit.anchor, &node.targets);

        let mut rng = StdRng::seed_from_u64(deck_seed(self.config.seed, index));
        let growth = grow_rooms(
            &mut ctx,
            node.faction,
            &GrowthParams::from(&self.config),
            &self.catalog,
            &mut rng,
        );
        let walls = synthesize_walls(&mut ctx);
        let dominant = finalize(&mut ctx);

        log::debug!(
            "Built {} ({} hull, {:?} incoming): spine {} points, {} rooms, {} walls",
            node.id,
            hull_style.name(),
            node.incoming,
            spine.points.len(),
            growth.rooms,
            walls
        );

        Some(DeckBuild {
            node_index: index,
            hull_style,
            spawn,
            exit,
            spine,
            growth,
            walls,
            dominant,
            context: ctx,
        })
    }

    /// Generate the renderer-facing level for deck `index`.
    pub fn generate_level(&self, index: usize) -> Option<LevelOutput> {
        let build = self.build_deck(index)?;
        Some(build.to_output(&self.config.music))
    }
}
