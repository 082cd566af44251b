use std::f64::consts::TAU;

use foundation::PixelOffset;
use serde::{Deserialize, Serialize};

/// Where one leg of an expanded cluster ends, relative to the cluster center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LegPlacement {
    pub angle_rad: f64,
    pub radius_px: f64,
}

impl LegPlacement {
    pub fn offset(&self) -> PixelOffset {
        PixelOffset::polar(self.angle_rad, self.radius_px)
    }
}

/// Places `count` leaves around a cluster center.
///
/// Implementations must be deterministic: the same count always yields the
/// same placements.
pub trait LeafLayout {
    fn layout(&self, count: usize) -> Vec<LegPlacement>;
}

/// Circle for small clusters, Archimedean-style spiral for larger ones.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralLayout {
    /// Leaf count from which the spiral replaces the circle.
    pub circle_spiral_switchover: usize,
    pub circle_foot_separation: f64,
    pub spiral_foot_separation: f64,
    pub spiral_length_start: f64,
    pub spiral_length_factor: f64,
}

impl Default for SpiralLayout {
    fn default() -> Self {
        Self {
            circle_spiral_switchover: 9,
            circle_foot_separation: 70.0,
            spiral_foot_separation: 60.0,
            spiral_length_start: 30.0,
            spiral_length_factor: 8.0,
        }
    }
}

impl SpiralLayout {
    fn circle(&self, count: usize) -> Vec<LegPlacement> {
        let circumference = self.circle_foot_separation * (2.0 + count as f64);
        let radius_px = circumference / TAU;
        let step = TAU / count as f64;
        (0..count)
            .map(|i| LegPlacement {
                angle_rad: i as f64 * step,
                radius_px,
            })
            .collect()
    }

    fn spiral(&self, count: usize) -> Vec<LegPlacement> {
        let mut leg = self.spiral_length_start;
        let mut angle = 0.0f64;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            angle += self.spiral_foot_separation / leg + i as f64 * 0.0005;
            out.push(LegPlacement {
                angle_rad: angle,
                radius_px: leg,
            });
            leg += TAU * self.spiral_length_factor / angle;
        }
        out
    }
}

impl LeafLayout for SpiralLayout {
    fn layout(&self, count: usize) -> Vec<LegPlacement> {
        if count == 0 {
            return Vec::new();
        }
        if count >= self.circle_spiral_switchover {
            self.spiral(count)
        } else {
            self.circle(count)
        }
    }
}
