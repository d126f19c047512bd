use crate::foundation::core::{Point, Vec2};
use crate::foundation::rng::RandomSource;

/// Tuning for [`place_clones`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlacementOpts {
    /// Radius of the circle clones are distributed on, in pixels.
    pub base_radius: f64,
    /// Maximum absolute random offset applied to each clone's radius.
    pub radius_jitter: f64,
    /// Minimum center-to-center distance the separation pass tries to enforce.
    pub min_distance: f64,
    /// Cap on separation passes.
    pub max_iterations: usize,
}

impl Default for PlacementOpts {
    fn default() -> Self {
        Self {
            base_radius: 150.0,
            radius_jitter: 20.0,
            min_distance: 80.0,
            max_iterations: 10,
        }
    }
}

/// Result of a placement run.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// One position per requested clone, in spawn order.
    pub positions: Vec<Point>,
    /// Separation passes that moved at least one point.
    pub passes: usize,
    /// Whether every pair ended at least `min_distance` apart. `false` means the iteration cap was
    /// hit with residual overlap, which is an accepted approximation.
    pub converged: bool,
}

/// Distribute `count` points around `center` and relax them apart.
///
/// Points start evenly spaced on a circle of `base_radius` (with per-point radius jitter), then
/// every pair closer than `min_distance` is pushed apart along its connecting line, half the
/// deficit each, for at most `max_iterations` passes.
pub fn place_clones(
    center: Point,
    count: usize,
    opts: &PlacementOpts,
    rng: &mut dyn RandomSource,
) -> Placement {
    if count == 0 {
        return Placement {
            positions: Vec::new(),
            passes: 0,
            converged: true,
        };
    }

    let step = std::f64::consts::TAU / count as f64;
    let mut positions: Vec<Point> = (0..count)
        .map(|i| {
            let angle = step * i as f64;
            let radius = (opts.base_radius + rng.signed_unit() * opts.radius_jitter).max(0.0);
            center + Vec2::from_angle(angle) * radius
        })
        .collect();

    let min_distance = opts.min_distance.max(0.0);
    let mut passes = 0;
    let mut converged = !has_overlap(&positions, min_distance);
    while !converged && passes < opts.max_iterations {
        separate_once(&mut positions, min_distance);
        passes += 1;
        converged = !has_overlap(&positions, min_distance);
    }

    Placement {
        positions,
        passes,
        converged,
    }
}

fn separate_once(positions: &mut [Point], min_distance: f64) {
    let n = positions.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let delta = positions[j] - positions[i];
            let dist = delta.hypot();
            if dist >= min_distance {
                continue;
            }
            // Coincident points have no connecting line; split them along a per-pair angle.
            let dir = if dist > f64::EPSILON {
                delta / dist
            } else {
                Vec2::from_angle((i * n + j) as f64)
            };
            let push = dir * ((min_distance - dist) / 2.0);
            positions[i] -= push;
            positions[j] += push;
        }
    }
}

fn has_overlap(positions: &[Point], min_distance: f64) -> bool {
    positions.iter().enumerate().any(|(i, a)| {
        positions[i + 1..]
            .iter()
            .any(|b| (*b - *a).hypot() < min_distance - 1e-9)
    })
}

/// Smallest pairwise distance, or `None` for fewer than two points.
pub fn min_pairwise_distance(positions: &[Point]) -> Option<f64> {
    let mut best: Option<f64> = None;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            let d = (*b - *a).hypot();
            best = Some(best.map_or(d, |m| m.min(d)));
        }
    }
    best
}

#[cfg(test)]
#[path = "../../tests/unit/clones/placement.rs"]
mod tests;
