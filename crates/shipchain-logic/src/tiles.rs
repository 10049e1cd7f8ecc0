//! Tiles, tile properties, and the insertion-ordered layers they live in.
//!
//! Layer order matters to the renderer (later writes draw over earlier ones),
//! so every layer is an `IndexMap`: re-inserting a coordinate replaces the tile
//! but keeps its original position.

use std::ops::{Index, IndexMut};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::faction::Faction;
use crate::grid::GridPos;

/// The fixed set of named layers, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Floor,
    Wall,
    Wall2,
    Wall3,
    Spawns,
    Door,
    Dock,
    Skybox,
    Decor,
    Ceiling,
    Water,
    Lights,
    Npcs,
    Furniture,
    Items,
}

impl LayerKind {
    pub const ALL: [LayerKind; 15] = [
        LayerKind::Floor,
        LayerKind::Wall,
        LayerKind::Wall2,
        LayerKind::Wall3,
        LayerKind::Spawns,
        LayerKind::Door,
        LayerKind::Dock,
        LayerKind::Skybox,
        LayerKind::Decor,
        LayerKind::Ceiling,
        LayerKind::Water,
        LayerKind::Lights,
        LayerKind::Npcs,
        LayerKind::Furniture,
        LayerKind::Items,
    ];

    /// The three stacked wall tiers.
    pub const WALL_TIERS: [LayerKind; 3] = [LayerKind::Wall, LayerKind::Wall2, LayerKind::Wall3];

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Floor => "floor",
            LayerKind::Wall => "wall",
            LayerKind::Wall2 => "wall2",
            LayerKind::Wall3 => "wall3",
            LayerKind::Spawns => "spawns",
            LayerKind::Door => "door",
            LayerKind::Dock => "dock",
            LayerKind::Skybox => "skybox",
            LayerKind::Decor => "decor",
            LayerKind::Ceiling => "ceiling",
            LayerKind::Water => "water",
            LayerKind::Lights => "lights",
            LayerKind::Npcs => "npcs",
            LayerKind::Furniture => "furniture",
            LayerKind::Items => "items",
        }
    }
}

/// What carved or painted a floor/water tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaType {
    Spine,
    Room,
    Pool,
}

/// Optional per-tile metadata. Empty properties are omitted from output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Faction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction: Option<Faction>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub contested: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_type: Option<AreaType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub elevated: bool,
    /// Wall stack tier, 1 (base) to 3 (cap).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<u8>,
}

impl TileProperties {
    pub fn styled(style: Faction) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<u8>,
    #[serde(default, skip_serializing_if = "TileProperties::is_empty")]
    pub properties: TileProperties,
}

impl Tile {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rotation: None,
            properties: TileProperties::default(),
        }
    }

    /// Tile keyed `"{prefix}_{style}"` and carrying the style property.
    pub fn styled(prefix: &str, style: Faction) -> Self {
        Self::new(format!("{}_{}", prefix, style.slug())).with_properties(TileProperties::styled(style))
    }

    pub fn with_rotation(mut self, rotation: u8) -> Self {
        self.rotation = Some(rotation % 4);
        self
    }

    pub fn with_properties(mut self, properties: TileProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn style(&self) -> Option<Faction> {
        self.properties.style
    }
}

/// One named layer: an insertion-ordered coordinate → tile map bounded to the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layer {
    tiles: IndexMap<GridPos, Tile>,
}

impl Layer {
    /// Write a tile. Coordinates outside the grid are rejected (returns
    /// `false`); an existing entry is replaced in place.
    pub fn insert(&mut self, pos: GridPos, tile: Tile) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        self.tiles.insert(pos, tile);
        true
    }

    pub fn get(&self, pos: GridPos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.tiles.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Tile)> + '_ {
        self.tiles.iter().map(|(pos, tile)| (*pos, tile))
    }

    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.tiles.keys().copied()
    }
}

/// All layers of a deck, indexed by [`LayerKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layers {
    layers: [Layer; 15],
}

impl Layers {
    /// Layers with their kinds, in output order.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, &Layer)> + '_ {
        LayerKind::ALL.into_iter().map(move |kind| (kind, &self[kind]))
    }

    /// True when the cell holds floor or water.
    pub fn is_walkable_surface(&self, pos: GridPos) -> bool {
        self[LayerKind::Floor].contains(pos) || self[LayerKind::Water].contains(pos)
    }
}

impl Index<LayerKind> for Layers {
    type Output = Layer;

    fn index(&self, kind: LayerKind) -> &Layer {
        &self.layers[kind as usize]
    }
}

impl IndexMut<LayerKind> for Layers {
    fn index_mut(&mut self, kind: LayerKind) -> &mut Layer {
        &mut self.layers[kind as usize]
    }
}
