//! Factions that control decks and rooms.
//!
//! A faction doubles as a visual style: floor, wall, ceiling and skybox keys
//! are all derived from its slug. Each faction has one fixed rival, which is
//! the "faction B" of a room roll and the opposing side in contested rooms.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Navy,
    Corsair,
    Zealot,
    Synthetic,
    Salvager,
}

impl Faction {
    pub const ALL: [Faction; 5] = [
        Faction::Navy,
        Faction::Corsair,
        Faction::Zealot,
        Faction::Synthetic,
        Faction::Salvager,
    ];

    /// Style used when a deck has no floor to take one from.
    pub const PRIMARY: Faction = Faction::Navy;

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Texture/style prefix, identical to the serialized name.
    pub fn slug(self) -> &'static str {
        match self {
            Faction::Navy => "navy",
            Faction::Corsair => "corsair",
            Faction::Zealot => "zealot",
            Faction::Synthetic => "synthetic",
            Faction::Salvager => "salvager",
        }
    }

    /// NPC catalog macro category for this faction's units.
    pub fn macro_category(self) -> &'static str {
        match self {
            Faction::Navy => "military",
            Faction::Corsair => "raider",
            Faction::Zealot => "cultist",
            Faction::Synthetic => "machine",
            Faction::Salvager => "scavenger",
        }
    }

    pub fn rival(self) -> Faction {
        match self {
            Faction::Navy => Faction::Corsair,
            Faction::Corsair => Faction::Navy,
            Faction::Zealot => Faction::Synthetic,
            Faction::Synthetic => Faction::Salvager,
            Faction::Salvager => Faction::Zealot,
        }
    }
}
