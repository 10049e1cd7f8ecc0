//! Pure deck generation logic for ShipChain.
//!
//! A campaign is a chain of starships laid out as a 50-depth, 3-lane trellis.
//! Every node of that trellis is one deck, and every deck is generated on a
//! fixed 64×64 tile grid: a hull silhouette, a carved spine between the spawn
//! and exit anchors, faction-zoned rooms grown into the remaining void, walls
//! inferred from floor adjacency, and a finalized layer structure ready for an
//! external renderer.
//!
//! Nothing here touches a renderer, a file system (beyond optional JSON
//! loading), or global state. Randomness is always an explicit, seeded
//! `StdRng`, so the same configuration reproduces the same decks.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`anchor`] | Ideal spawn/exit points, hull snapping, anchor markers |
//! | [`catalog`] | NPC skin catalog seam (`npcs_by_criteria`) |
//! | [`config`] | Generation configuration and its load errors |
//! | [`constants`] | Grid size, stage budgets, tile catalogs |
//! | [`context`] | Per-deck working structure threaded through the stages |
//! | [`faction`] | Factions, rivalries, and their visual styles |
//! | [`finalize`] | Ceiling gap fill, skybox, renderer serialization |
//! | [`graph`] | Campaign trellis graph of decks |
//! | [`grid`] | Grid coordinates and the dense hull mask |
//! | [`hull`] | Hull silhouettes (wedge, tube, oval) |
//! | [`level`] | `Campaign`: deck lookup and the per-deck pipeline |
//! | [`rooms`] | Stochastic room growth, furniture, NPC squads |
//! | [`spine`] | A* spine search, Bresenham fallback, corridor carving |
//! | [`tiles`] | Tiles, properties, and insertion-ordered layers |
//! | [`validate`] | Invariant checks over generated decks and graphs |
//! | [`walls`] | Wall inference from floor adjacency |

pub mod anchor;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod context;
pub mod faction;
pub mod finalize;
pub mod graph;
pub mod grid;
pub mod hull;
pub mod level;
pub mod rooms;
pub mod spine;
pub mod tiles;
pub mod validate;
pub mod walls;

pub use config::{ConfigError, GenerationConfig};
pub use level::{Campaign, DeckBuild};
