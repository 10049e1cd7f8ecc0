//! Hull silhouettes for the 64×64 deck grid.
//!
//! Each style is a closed-form test over the grid. The resulting mask is the
//! deck's valid interior; it is never painted into the floor layer, which is
//! filled later by the spine and room growth.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::GRID_CENTER;
use crate::grid::HullMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HullStyle {
    /// Triangle tapering from bow (y = 0) to stern (y = 63).
    Wedge,
    /// Uniform-width corridor ship.
    Tube,
    /// Rounded ellipse.
    Oval,
}

impl HullStyle {
    pub const ALL: [HullStyle; 3] = [HullStyle::Wedge, HullStyle::Tube, HullStyle::Oval];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Parse a style name case-insensitively; anything unrecognized is a tube.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "wedge" => HullStyle::Wedge,
            "oval" => HullStyle::Oval,
            "tube" => HullStyle::Tube,
            other => {
                log::debug!("Unknown hull style {:?}, using tube", other);
                HullStyle::Tube
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HullStyle::Wedge => "wedge",
            HullStyle::Tube => "tube",
            HullStyle::Oval => "oval",
        }
    }

    /// Whether cell (x, y) is inside this silhouette.
    pub fn contains(self, x: i32, y: i32) -> bool {
        let center = GRID_CENTER as f32;
        match self {
            HullStyle::Wedge => {
                let half_width = 30.0 * (1.0 - y as f32 / 63.0);
                (x as f32 - center).abs() <= half_width
            }
            HullStyle::Tube => (20..44).contains(&x),
            HullStyle::Oval => {
                let nx = (x as f32 - center) / 28.0;
                let ny = (y as f32 - center) / 30.0;
                nx * nx + ny * ny <= 1.0
            }
        }
    }
}

/// Build the valid interior mask for a hull style.
pub fn hull_mask(style: HullStyle) -> HullMask {
    HullMask::from_fn(|x, y| style.contains(x, y))
}
