//! Room growth: faction-zoned rooms painted into the deck's remaining void.
//!
//! Each attempt seeds a room on a random void cell (a hull cell the spine did
//! not carve), rolls its faction, shape and pool flag, and paints the
//! footprint. Painting never overwrites: any cell already holding floor or
//! water is skipped, so the spine and earlier rooms are left untouched.
//! Non-pool rooms then get scattered furniture and a small NPC squad.
//!
//! Rooms are not tracked once painted; only their tiles remain.

use rand::Rng;

use crate::catalog::{NpcCatalog, NpcCriteria, ANY_SUBGROUP};
use crate::config::GenerationConfig;
use crate::constants::rooms::{
    ATTEMPTS, CROSS_REACH_MAX, CROSS_REACH_MIN, DOMINANT_BELOW, FURNITURE, FURNITURE_CHANCE,
    LEG_MAX, LEG_MIN, POOL_CHANCE, RECT_MAX, RECT_MIN, RIVAL_BELOW, SQUAD_MAX, SQUAD_MIN,
    THREAT_TIERS,
};
use crate::context::LevelBuildContext;
use crate::faction::Faction;
use crate::grid::GridPos;
use crate::tiles::{AreaType, LayerKind, Layers, Tile, TileProperties};

/// Room footprint shape and its rolled dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomShape {
    /// Rectangle centered on the seed.
    Rect { width: i32, height: i32 },
    /// Plus sign of 3-wide arms reaching `reach` cells from the seed.
    Cross { reach: i32 },
    /// Two 3-wide legs meeting at the seed, optionally mirrored.
    L {
        leg_x: i32,
        leg_y: i32,
        flip_x: bool,
        flip_y: bool,
    },
}

impl RoomShape {
    pub fn roll(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => RoomShape::Rect {
                width: rng.gen_range(RECT_MIN..=RECT_MAX),
                height: rng.gen_range(RECT_MIN..=RECT_MAX),
            },
            1 => RoomShape::Cross {
                reach: rng.gen_range(CROSS_REACH_MIN..=CROSS_REACH_MAX),
            },
            _ => RoomShape::L {
                leg_x: rng.gen_range(LEG_MIN..=LEG_MAX),
                leg_y: rng.gen_range(LEG_MIN..=LEG_MAX),
                flip_x: rng.gen_bool(0.5),
                flip_y: rng.gen_bool(0.5),
            },
        }
    }

    /// Cells covered by this shape around `seed`, each once. Not clipped.
    pub fn footprint(&self, seed: GridPos) -> Vec<GridPos> {
        let mut cells = Vec::new();
        match *self {
            RoomShape::Rect { width, height } => {
                let (x0, y0) = (seed.x - width / 2, seed.y - height / 2);
                for y in y0..y0 + height {
                    for x in x0..x0 + width {
                        cells.push(GridPos::new(x, y));
                    }
                }
            }
            RoomShape::Cross { reach } => {
                for dy in -reach..=reach {
                    for dx in -reach..=reach {
                        if dx.abs() <= 1 || dy.abs() <= 1 {
                            cells.push(seed.offset(dx, dy));
                        }
                    }
                }
            }
            RoomShape::L {
                leg_x,
                leg_y,
                flip_x,
                flip_y,
            } => {
                let sx = if flip_x { -1 } else { 1 };
                let sy = if flip_y { -1 } else { 1 };
                for dy in -1..leg_y {
                    for dx in -1..leg_x {
                        if dy <= 1 || dx <= 1 {
                            cells.push(seed.offset(dx * sx, dy * sy));
                        }
                    }
                }
            }
        }
        cells
    }
}

/// Who holds a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomFaction {
    Held(Faction),
    /// Units split between the two sides; styled as `a`.
    Contested { a: Faction, b: Faction },
}

impl RoomFaction {
    /// 60% the deck's dominant faction, 30% its rival, 10% contested.
    pub fn roll(dominant: Faction, rng: &mut impl Rng) -> Self {
        let r: f64 = rng.gen();
        if r < DOMINANT_BELOW {
            RoomFaction::Held(dominant)
        } else if r < RIVAL_BELOW {
            RoomFaction::Held(dominant.rival())
        } else {
            RoomFaction::Contested {
                a: dominant,
                b: dominant.rival(),
            }
        }
    }

    pub fn style(self) -> Faction {
        match self {
            RoomFaction::Held(f) => f,
            RoomFaction::Contested { a, .. } => a,
        }
    }

    /// Faction of one spawned unit; contested rooms flip a coin.
    pub fn unit_faction(self, rng: &mut impl Rng) -> Faction {
        match self {
            RoomFaction::Held(f) => f,
            RoomFaction::Contested { a, b } => {
                if rng.gen_bool(0.5) {
                    a
                } else {
                    b
                }
            }
        }
    }

    fn properties(self, area_type: AreaType) -> TileProperties {
        let (faction, contested) = match self {
            RoomFaction::Held(f) => (Some(f), false),
            RoomFaction::Contested { .. } => (None, true),
        };
        TileProperties {
            style: Some(self.style()),
            faction,
            contested,
            area_type: Some(area_type),
            ..Default::default()
        }
    }
}

/// Threat tier 1–4: 40% / 34% / 20% / 6%.
pub fn roll_threat(rng: &mut impl Rng) -> u8 {
    let r: f64 = rng.gen();
    THREAT_TIERS
        .iter()
        .find(|(_, upper)| r < *upper)
        .map(|(tier, _)| *tier)
        .unwrap_or(1)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthParams {
    pub attempts: u32,
    pub pool_chance: f64,
    pub furniture_chance: f64,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            attempts: ATTEMPTS,
            pool_chance: POOL_CHANCE,
            furniture_chance: FURNITURE_CHANCE,
        }
    }
}

impl From<&GenerationConfig> for GrowthParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            attempts: config.room_attempts,
            pool_chance: config.pool_chance,
            furniture_chance: config.furniture_chance,
        }
    }
}

/// Tallies from one growth pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthReport {
    pub attempts: u32,
    /// Attempts that painted at least one cell.
    pub rooms: u32,
    pub pools: u32,
    pub tiles_painted: usize,
    pub furniture: usize,
    pub npcs: usize,
    /// Spawn rolls dropped for an occupied cell or an empty catalog result.
    pub spawns_dropped: usize,
}

fn chance(rng: &mut impl Rng, p: f64) -> bool {
    rng.gen::<f64>() < p
}

/// Grow rooms into the deck's void. The void list is taken once, before the
/// first attempt; every attempt is consumed whether or not it paints.
pub fn grow_rooms(
    ctx: &mut LevelBuildContext,
    dominant: Faction,
    params: &GrowthParams,
    catalog: &dyn NpcCatalog,
    rng: &mut impl Rng,
) -> GrowthReport {
    let mut report = GrowthReport::default();
    let (hull, layers) = ctx.hull_and_layers_mut();

    let void: Vec<GridPos> = hull
        .iter()
        .filter(|p| !layers[LayerKind::Floor].contains(*p))
        .collect();
    if void.is_empty() {
        log::debug!("No void left for room growth");
        return report;
    }

    for _ in 0..params.attempts {
        report.attempts += 1;
        let seed = void[rng.gen_range(0..void.len())];
        let faction = RoomFaction::roll(dominant, rng);
        let shape = RoomShape::roll(rng);
        let pool = chance(rng, params.pool_chance);

        let footprint: Vec<GridPos> = shape
            .footprint(seed)
            .into_iter()
            .filter(|p| hull.contains(*p))
            .collect();
        let painted = paint_room(layers, &footprint, faction, pool);
        if painted.is_empty() {
            continue;
        }

        report.rooms += 1;
        report.tiles_painted += painted.len();
        if pool {
            report.pools += 1;
            continue;
        }

        report.furniture += place_furniture(layers, &painted, seed, params.furniture_chance, rng);
        let (spawned, dropped) = spawn_squad(layers, &painted, faction, catalog, rng);
        report.npcs += spawned;
        report.spawns_dropped += dropped;
    }

    log::debug!(
        "Room growth: {} rooms ({} pools), {} tiles, {} furniture, {} npcs, {} spawns dropped",
        report.rooms,
        report.pools,
        report.tiles_painted,
        report.furniture,
        report.npcs,
        report.spawns_dropped
    );
    report
}

/// Paint floor (or water) plus ceiling on every footprint cell that is not
/// already floor or water. Returns the cells painted.
fn paint_room(
    layers: &mut Layers,
    footprint: &[GridPos],
    faction: RoomFaction,
    pool: bool,
) -> Vec<GridPos> {
    let style = faction.style();
    let (surface_layer, surface) = if pool {
        (
            LayerKind::Water,
            Tile::styled("water", style).with_properties(faction.properties(AreaType::Pool)),
        )
    } else {
        (
            LayerKind::Floor,
            Tile::styled("floor", style).with_properties(faction.properties(AreaType::Room)),
        )
    };
    let ceiling = Tile::styled("ceiling", style).with_properties(TileProperties {
        style: Some(style),
        elevated: pool,
        ..Default::default()
    });

    let mut painted = Vec::with_capacity(footprint.len());
    for &pos in footprint {
        if layers.is_walkable_surface(pos) {
            continue;
        }
        if layers[surface_layer].insert(pos, surface.clone()) {
            layers[LayerKind::Ceiling].insert(pos, ceiling.clone());
            painted.push(pos);
        }
    }
    painted
}

/// Scatter furniture over a room, skipping the seed's own row and column.
fn place_furniture(
    layers: &mut Layers,
    painted: &[GridPos],
    seed: GridPos,
    furniture_chance: f64,
    rng: &mut impl Rng,
) -> usize {
    let mut placed = 0;
    for &pos in painted {
        if pos.x == seed.x || pos.y == seed.y {
            continue;
        }
        if !chance(rng, furniture_chance) {
            continue;
        }
        let item = FURNITURE[rng.gen_range(0..FURNITURE.len())];
        let rotation = rng.gen_range(0..4u8);
        if layers[LayerKind::Furniture].contains(pos) {
            continue;
        }
        layers[LayerKind::Furniture].insert(pos, Tile::new(item).with_rotation(rotation));
        placed += 1;
    }
    placed
}

/// Spawn 2–4 units on random room cells. Returns (spawned, dropped).
fn spawn_squad(
    layers: &mut Layers,
    painted: &[GridPos],
    faction: RoomFaction,
    catalog: &dyn NpcCatalog,
    rng: &mut impl Rng,
) -> (usize, usize) {
    let size = rng.gen_range(SQUAD_MIN..=SQUAD_MAX);
    let (mut spawned, mut dropped) = (0, 0);

    for _ in 0..size {
        let pos = painted[rng.gen_range(0..painted.len())];
        let threat = roll_threat(rng);
        let unit = faction.unit_faction(rng);
        if layers[LayerKind::Npcs].contains(pos) {
            dropped += 1;
            continue;
        }

        let skins = catalog.npcs_by_criteria(&NpcCriteria {
            threat,
            macro_category: unit.macro_category(),
            subgroup: ANY_SUBGROUP,
        });
        if skins.is_empty() {
            log::trace!(
                "No {} NPC at threat {}, skipping spawn",
                unit.macro_category(),
                threat
            );
            dropped += 1;
            continue;
        }

        let skin = skins[rng.gen_range(0..skins.len())].clone();
        let rotation = rng.gen_range(0..4u8);
        layers[LayerKind::Npcs].insert(
            pos,
            Tile::new(skin)
                .with_rotation(rotation)
                .with_properties(TileProperties {
                    faction: Some(unit),
                    threat: Some(threat),
                    ..Default::default()
                }),
        );
        spawned += 1;
    }

    (spawned, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::grid::HullMask;
    use crate::hull::{hull_mask, HullStyle};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn unique(cells: &[GridPos]) -> usize {
        cells.iter().collect::<HashSet<_>>().len()
    }

    #[test]
    fn test_rect_footprint_centered() {
        let seed = GridPos::new(10, 10);
        let cells = RoomShape::Rect {
            width: 5,
            height: 6,
        }
        .footprint(seed);
        assert_eq!(cells.len(), 30);
        assert_eq!(unique(&cells), 30);
        assert!(cells.contains(&seed));
        assert!(cells.contains(&GridPos::new(8, 7)));
        assert!(cells.contains(&GridPos::new(12, 12)));
        assert!(!cells.contains(&GridPos::new(13, 12)));
    }

    #[test]
    fn test_cross_footprint() {
        let seed = GridPos::new(20, 20);
        let cells = RoomShape::Cross { reach: 3 }.footprint(seed);
        assert_eq!(cells.len(), 33);
        assert_eq!(unique(&cells), 33);
        assert!(cells.contains(&GridPos::new(23, 21)));
        assert!(!cells.contains(&GridPos::new(22, 22)));
    }

    #[test]
    fn test_l_footprint_and_mirroring() {
        let seed = GridPos::new(30, 30);
        let shape = RoomShape::L {
            leg_x: 5,
            leg_y: 6,
            flip_x: false,
            flip_y: false,
        };
        let cells = shape.footprint(seed);
        assert_eq!(cells.len(), 30);
        assert_eq!(unique(&cells), 30);
        assert!(cells.contains(&GridPos::new(34, 30)));
        assert!(cells.contains(&GridPos::new(30, 35)));
        assert!(!cells.contains(&GridPos::new(34, 35)));

        let mirrored = RoomShape::L {
            leg_x: 5,
            leg_y: 6,
            flip_x: true,
            flip_y: true,
        }
        .footprint(seed);
        assert!(mirrored.contains(&GridPos::new(26, 30)));
        assert!(mirrored.contains(&GridPos::new(30, 25)));
    }

    #[test]
    fn test_rolled_shapes_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            match RoomShape::roll(&mut rng) {
                RoomShape::Rect { width, height } => {
                    assert!((5..=8).contains(&width) && (5..=8).contains(&height));
                }
                RoomShape::Cross { reach } => assert!((3..=4).contains(&reach)),
                RoomShape::L { leg_x, leg_y, .. } => {
                    assert!((5..=8).contains(&leg_x) && (5..=8).contains(&leg_y));
                }
            }
        }
    }

    #[test]
    fn test_threat_weights() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0usize; 5];
        let n = 20_000;
        for _ in 0..n {
            counts[roll_threat(&mut rng) as usize] += 1;
        }
        let share = |tier: usize| counts[tier] as f64 / n as f64;
        assert_eq!(counts[0], 0);
        assert!((share(1) - 0.40).abs() < 0.02, "tier 1 share {}", share(1));
        assert!((share(2) - 0.34).abs() < 0.02, "tier 2 share {}", share(2));
        assert!((share(3) - 0.20).abs() < 0.02, "tier 3 share {}", share(3));
        assert!((share(4) - 0.06).abs() < 0.01, "tier 4 share {}", share(4));
    }

    #[test]
    fn test_faction_roll_weights() {
        let mut rng = StdRng::seed_from_u64(5);
        let n = 20_000;
        let (mut held, mut rival, mut contested) = (0, 0, 0);
        for _ in 0..n {
            match RoomFaction::roll(Faction::Zealot, &mut rng) {
                RoomFaction::Held(Faction::Zealot) => held += 1,
                RoomFaction::Held(f) => {
                    assert_eq!(f, Faction::Zealot.rival());
                    rival += 1;
                }
                RoomFaction::Contested { a, b } => {
                    assert_eq!((a, b), (Faction::Zealot, Faction::Synthetic));
                    contested += 1;
                }
            }
        }
        assert!((held as f64 / n as f64 - 0.6).abs() < 0.02);
        assert!((rival as f64 / n as f64 - 0.3).abs() < 0.02);
        assert!((contested as f64 / n as f64 - 0.1).abs() < 0.02);
    }

    #[test]
    fn test_contested_room_splits_units() {
        let room = RoomFaction::Contested {
            a: Faction::Navy,
            b: Faction::Corsair,
        };
        let mut rng = StdRng::seed_from_u64(14);
        let n = 10_000;
        let mut side_a = 0;
        for _ in 0..n {
            match room.unit_faction(&mut rng) {
                Faction::Navy => side_a += 1,
                other => assert_eq!(other, Faction::Corsair),
            }
        }
        let share = side_a as f64 / n as f64;
        assert!((share - 0.5).abs() < 0.03, "side A share {}", share);

        let props = room.properties(AreaType::Room);
        assert_eq!(props.style, Some(Faction::Navy));
        assert_eq!(props.faction, None);
        assert!(props.contested);

        let held = RoomFaction::Held(Faction::Zealot).properties(AreaType::Pool);
        assert_eq!(held.faction, Some(Faction::Zealot));
        assert!(!held.contested);
    }

    #[test]
    fn test_growth_never_overwrites_floor_or_water() {
        let mut ctx = LevelBuildContext::new(hull_mask(HullStyle::Tube));
        for y in 0..64 {
            for x in 28..36 {
                ctx.layers[LayerKind::Floor].insert(GridPos::new(x, y), Tile::new("floor_spine"));
            }
            ctx.layers[LayerKind::Water].insert(GridPos::new(21, y), Tile::new("water_old"));
        }
        let floor_before = ctx.layers[LayerKind::Floor].clone();
        let water_before = ctx.layers[LayerKind::Water].clone();

        let mut rng = StdRng::seed_from_u64(12);
        let params = GrowthParams::default();
        let report = grow_rooms(
            &mut ctx,
            Faction::Navy,
            &params,
            &StaticCatalog::builtin(),
            &mut rng,
        );

        assert_eq!(report.attempts, 35);
        for (pos, tile) in floor_before.iter() {
            assert_eq!(ctx.layers[LayerKind::Floor].get(pos), Some(tile));
        }
        for (pos, tile) in water_before.iter() {
            assert_eq!(ctx.layers[LayerKind::Water].get(pos), Some(tile));
        }
        for pos in ctx.layers[LayerKind::Water].positions() {
            assert!(!ctx.layers[LayerKind::Floor].contains(pos));
        }
    }

    #[test]
    fn test_rooms_stay_in_hull_and_get_ceilings() {
        let mut ctx = LevelBuildContext::new(hull_mask(HullStyle::Oval));
        let mut rng = StdRng::seed_from_u64(8);
        grow_rooms(
            &mut ctx,
            Faction::Salvager,
            &GrowthParams::default(),
            &StaticCatalog::builtin(),
            &mut rng,
        );
        let hull = ctx.valid_hull();
        for kind in [LayerKind::Floor, LayerKind::Water] {
            for pos in ctx.layers[kind].positions() {
                assert!(hull.contains(pos), "{:?} tile {} outside hull", kind, pos);
                assert!(ctx.layers[LayerKind::Ceiling].contains(pos));
            }
        }
    }

    #[test]
    fn test_npcs_stand_on_room_floor() {
        let mut ctx = LevelBuildContext::new(hull_mask(HullStyle::Tube));
        let mut rng = StdRng::seed_from_u64(21);
        let params = GrowthParams {
            pool_chance: 0.0,
            ..Default::default()
        };
        let report = grow_rooms(
            &mut ctx,
            Faction::Corsair,
            &params,
            &StaticCatalog::builtin(),
            &mut rng,
        );
        assert!(report.npcs > 0);
        assert_eq!(report.npcs, ctx.layers[LayerKind::Npcs].len());
        for (pos, npc) in ctx.layers[LayerKind::Npcs].iter() {
            assert!(ctx.layers[LayerKind::Floor].contains(pos));
            let threat = npc.properties.threat.unwrap();
            assert!((1..=4).contains(&threat));
            let faction = npc.properties.faction.unwrap();
            assert!(faction == Faction::Corsair || faction == Faction::Navy);
        }
    }

    #[test]
    fn test_pools_have_no_population() {
        let mut ctx = LevelBuildContext::new(hull_mask(HullStyle::Tube));
        let mut rng = StdRng::seed_from_u64(2);
        let params = GrowthParams {
            pool_chance: 1.0,
            ..Default::default()
        };
        let report = grow_rooms(
            &mut ctx,
            Faction::Navy,
            &params,
            &StaticCatalog::builtin(),
            &mut rng,
        );
        assert_eq!(report.pools, report.rooms);
        assert!(ctx.layers[LayerKind::Floor].is_empty());
        assert!(ctx.layers[LayerKind::Npcs].is_empty());
        assert!(ctx.layers[LayerKind::Furniture].is_empty());
        for pos in ctx.layers[LayerKind::Water].positions() {
            assert!(ctx.layers[LayerKind::Ceiling].get(pos).unwrap().properties.elevated);
        }
    }

    #[test]
    fn test_empty_catalog_drops_every_spawn() {
        let mut ctx = LevelBuildContext::new(hull_mask(HullStyle::Tube));
        let mut rng = StdRng::seed_from_u64(4);
        let params = GrowthParams {
            pool_chance: 0.0,
            ..Default::default()
        };
        let report = grow_rooms(
            &mut ctx,
            Faction::Navy,
            &params,
            &StaticCatalog::default(),
            &mut rng,
        );
        assert!(report.rooms > 0);
        assert_eq!(report.npcs, 0);
        assert!(report.spawns_dropped >= 2);
        assert!(ctx.layers[LayerKind::Npcs].is_empty());
    }

    #[test]
    fn test_no_void_means_no_rooms() {
        let mut ctx = LevelBuildContext::new(HullMask::from_fn(|x, y| x < 4 && y < 4));
        for y in 0..4 {
            for x in 0..4 {
                ctx.layers[LayerKind::Floor].insert(GridPos::new(x, y), Tile::new("floor_navy"));
            }
        }
        let mut rng = StdRng::seed_from_u64(1);
        let report = grow_rooms(
            &mut ctx,
            Faction::Navy,
            &GrowthParams::default(),
            &StaticCatalog::builtin(),
            &mut rng,
        );
        assert_eq!(report, GrowthReport::default());
    }

    #[test]
    fn test_furniture_skips_seed_row_and_column() {
        let mut layers = Layers::default();
        let seed = GridPos::new(10, 10);
        let painted = RoomShape::Rect {
            width: 5,
            height: 5,
        }
        .footprint(seed);
        let mut rng = StdRng::seed_from_u64(6);
        let placed = place_furniture(&mut layers, &painted, seed, 1.0, &mut rng);
        assert_eq!(placed, 16);
        for pos in layers[LayerKind::Furniture].positions() {
            assert!(pos.x != seed.x && pos.y != seed.y);
            assert!(FURNITURE.contains(&layers[LayerKind::Furniture].get(pos).unwrap().key.as_str()));
        }
    }

    #[test]
    fn test_squad_one_npc_per_cell() {
        let mut layers = Layers::default();
        let painted = vec![GridPos::new(5, 5)];
        let mut rng = StdRng::seed_from_u64(10);
        let catalog = StaticCatalog::builtin();
        let (spawned, dropped) = spawn_squad(
            &mut layers,
            &painted,
            RoomFaction::Held(Faction::Navy),
            &catalog,
            &mut rng,
        );
        assert_eq!(spawned, 1);
        assert!((1..=3).contains(&dropped));
        assert_eq!(layers[LayerKind::Npcs].len(), 1);
    }
}
