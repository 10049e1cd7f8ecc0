//! Output finalization: ceiling gap fill, skybox, and the renderer-facing
//! serialized form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::output::SKYBOX_SENTINEL;
use crate::context::LevelBuildContext;
use crate::faction::Faction;
use crate::grid::GridPos;
use crate::tiles::{LayerKind, Tile};

/// Style of the first floor tile, or the primary faction on an empty deck.
pub fn dominant_style(ctx: &LevelBuildContext) -> Faction {
    ctx.layers[LayerKind::Floor]
        .iter()
        .next()
        .and_then(|(_, tile)| tile.style())
        .unwrap_or(Faction::PRIMARY)
}

/// Cover every floor and wall cell that still lacks a ceiling. Floor gets its
/// own style (primary when unstyled), walls get `dominant`. Returns the
/// number of ceilings added.
pub fn fill_ceilings(ctx: &mut LevelBuildContext, dominant: Faction) -> usize {
    let mut missing: Vec<(GridPos, Faction)> = Vec::new();
    for (pos, floor) in ctx.layers[LayerKind::Floor].iter() {
        if !ctx.layers[LayerKind::Ceiling].contains(pos) {
            missing.push((pos, floor.style().unwrap_or(Faction::PRIMARY)));
        }
    }
    for pos in ctx.layers[LayerKind::Wall].positions() {
        if !ctx.layers[LayerKind::Ceiling].contains(pos) {
            missing.push((pos, dominant));
        }
    }

    for &(pos, style) in &missing {
        ctx.layers[LayerKind::Ceiling].insert(pos, Tile::styled("ceiling", style));
    }
    missing.len()
}

pub fn place_skybox(ctx: &mut LevelBuildContext, dominant: Faction) {
    let (x, y) = SKYBOX_SENTINEL;
    ctx.layers[LayerKind::Skybox].insert(GridPos::new(x, y), Tile::styled("skybox", dominant));
}

/// Final stage: ceilings then skybox. Returns the dominant style used.
pub fn finalize(ctx: &mut LevelBuildContext) -> Faction {
    let dominant = dominant_style(ctx);
    let added = fill_ceilings(ctx, dominant);
    place_skybox(ctx, dominant);
    log::debug!("Finalized deck in {:?} style, {} ceilings filled", dominant, added);
    dominant
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefaults {
    pub music: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSettings {
    pub width: i32,
    pub height: i32,
    pub defaults: LevelDefaults,
}

/// Renderer-facing level: settings plus every layer as `["x,y", tile]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOutput {
    pub settings: LevelSettings,
    pub layers: IndexMap<String, Vec<(String, Tile)>>,
}

impl LevelOutput {
    pub fn layer(&self, kind: LayerKind) -> &[(String, Tile)] {
        self.layers
            .get(kind.name())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Snapshot the deck into its output form. Every layer is present, in fixed
/// order, even when empty.
pub fn serialize_level(ctx: &LevelBuildContext, music: &str) -> LevelOutput {
    let layers = ctx
        .layers
        .iter()
        .map(|(kind, layer)| {
            let entries = layer
                .iter()
                .map(|(pos, tile)| (pos.key(), tile.clone()))
                .collect();
            (kind.name().to_string(), entries)
        })
        .collect();

    LevelOutput {
        settings: LevelSettings {
            width: LevelBuildContext::WIDTH,
            height: LevelBuildContext::HEIGHT,
            defaults: LevelDefaults {
                music: music.to_string(),
            },
        },
        layers,
    }
}
