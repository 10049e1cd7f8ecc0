//! Generation constants: grid dimensions, stage budgets and tile catalogs.
//!
//! Structural values with no dependency on the rest of the crate. The
//! probabilities a campaign may want to tune are defaulted from here into
//! [`crate::config::GenerationConfig`].

/// Width and height of every deck grid, in tiles.
pub const GRID_SIZE: i32 = 64;
/// Number of cells in a deck grid.
pub const GRID_CELLS: usize = (GRID_SIZE * GRID_SIZE) as usize;
/// Grid center, the target anchors are snapped toward.
pub const GRID_CENTER: i32 = 32;

pub mod campaign {
    /// Number of depth layers in a campaign.
    pub const DEPTH_COUNT: u32 = 50;
    /// Independent chance for each side lane to exist at a depth.
    pub const SIDE_LANE_CHANCE: f64 = 0.7;
    /// Lane order used everywhere nodes are enumerated.
    pub const LANES: [i8; 3] = [-1, 0, 1];
}

pub mod anchors {
    pub const SPAWN_DEFAULT: (f32, f32) = (32.0, 5.0);
    pub const SPAWN_FROM_LEFT: (f32, f32) = (5.0, 32.0);
    pub const SPAWN_FROM_RIGHT: (f32, f32) = (58.0, 32.0);
    pub const EXIT: (f32, f32) = (32.0, 58.0);
    /// Maximum one-unit steps toward the grid center while snapping.
    pub const SNAP_BUDGET: u32 = 32;
}

pub mod spine {
    /// Radius of the disk carved around every spine point.
    pub const CARVE_RADIUS: i32 = 3;
    /// Every Nth spine point gets a light.
    pub const LIGHT_INTERVAL: usize = 5;
}

pub mod rooms {
    pub const ATTEMPTS: u32 = 35;
    pub const POOL_CHANCE: f64 = 0.15;
    pub const FURNITURE_CHANCE: f64 = 0.10;

    /// Room faction roll: dominant below this, rival below `RIVAL_BELOW`,
    /// contested otherwise.
    pub const DOMINANT_BELOW: f64 = 0.60;
    pub const RIVAL_BELOW: f64 = 0.90;

    pub const RECT_MIN: i32 = 5;
    pub const RECT_MAX: i32 = 8;
    pub const CROSS_REACH_MIN: i32 = 3;
    pub const CROSS_REACH_MAX: i32 = 4;
    pub const LEG_MIN: i32 = 5;
    pub const LEG_MAX: i32 = 8;

    pub const SQUAD_MIN: u32 = 2;
    pub const SQUAD_MAX: u32 = 4;

    /// Cumulative threat tier table, highest tier first: (tier, roll upper bound).
    /// 6% tier 4, 20% tier 3, 34% tier 2, 40% tier 1.
    pub const THREAT_TIERS: [(u8, f64); 4] = [(4, 0.06), (3, 0.26), (2, 0.60), (1, 1.0)];

    pub const FURNITURE: [&str; 6] = [
        "furniture_crate",
        "furniture_terminal",
        "furniture_locker",
        "furniture_bunk",
        "furniture_table",
        "furniture_barrel",
    ];
}

pub mod output {
    /// Coordinate the single skybox tile is written at.
    pub const SKYBOX_SENTINEL: (i32, i32) = (0, 0);
    pub const DEFAULT_MUSIC: &str = "music/ambient_hull_drone";
}
