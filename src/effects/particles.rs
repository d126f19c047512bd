use crate::foundation::core::{Point, Vec2};
use crate::foundation::rng::RandomSource;

/// Reference frame duration velocities and per-tick factors are expressed in.
const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Life at or below this is dead; absorbs float drift from repeated subtraction.
const LIFE_EPSILON: f64 = 1e-9;

/// Which transition emitted a particle. Sets the initial vertical bias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    /// Rises from the spawn point.
    Spawn,
    /// Falls from the dismiss point.
    Dismiss,
}

impl ParticleKind {
    /// Initial vertical direction in canvas space (y grows downward).
    fn launch_sign(self) -> f64 {
        match self {
            Self::Spawn => -1.0,
            Self::Dismiss => 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Point,
    /// Pixels per reference frame.
    pub velocity: Vec2,
    /// Radius in pixels.
    pub size: f64,
    /// Remaining life in `[0, 1]`; drives opacity.
    pub life: f64,
    pub max_life_ms: f64,
    /// Time left before the particle starts moving and aging.
    pub start_delay_ms: f64,
    pub kind: ParticleKind,
}

impl Particle {
    /// Still waiting out its emission delay.
    pub fn is_pending(&self) -> bool {
        self.start_delay_ms > 0.0
    }

    pub fn is_alive(&self) -> bool {
        self.life > LIFE_EPSILON
    }

    /// Opacity for drawing: zero while pending, then proportional to remaining life.
    pub fn opacity(&self) -> f64 {
        if self.is_pending() {
            0.0
        } else {
            self.life.clamp(0.0, 1.0)
        }
    }
}

/// Tuning for bursts and simulation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParticleOpts {
    /// Population cap. Emitting past it drops the oldest particles.
    pub capacity: usize,
    /// Particles emitted per clone transition.
    pub burst_count: usize,
    /// Scatter radius around the emission origin.
    pub origin_jitter: f64,
    /// Maximum lateral speed, pixels per reference frame.
    pub lateral_speed: f64,
    /// Vertical launch speed range, pixels per reference frame.
    pub launch_speed_min: f64,
    pub launch_speed_max: f64,
    /// Multiplicative velocity damping per reference frame, in `(0, 1]`.
    pub drag: f64,
    /// Vertical acceleration opposing the launch direction, scaled by how much life was spent.
    pub counter_bias: f64,
    /// Radius growth, pixels per reference frame.
    pub growth: f64,
    pub size_min: f64,
    pub size_max: f64,
    pub life_min_ms: f64,
    pub life_max_ms: f64,
    /// Maximum per-particle emission delay.
    pub max_start_delay_ms: f64,
    /// Straight-alpha color of spawn particles.
    pub spawn_rgba: [u8; 4],
    /// Straight-alpha color of dismiss particles.
    pub dismiss_rgba: [u8; 4],
}

impl Default for ParticleOpts {
    fn default() -> Self {
        Self {
            capacity: 200,
            burst_count: 20,
            origin_jitter: 30.0,
            lateral_speed: 2.0,
            launch_speed_min: 1.5,
            launch_speed_max: 3.5,
            drag: 0.96,
            counter_bias: 0.05,
            growth: 0.05,
            size_min: 2.0,
            size_max: 6.0,
            life_min_ms: 600.0,
            life_max_ms: 1200.0,
            max_start_delay_ms: 150.0,
            spawn_rgba: [120, 220, 255, 255],
            dismiss_rgba: [255, 140, 220, 255],
        }
    }
}

impl ParticleOpts {
    pub fn color_for(&self, kind: ParticleKind) -> [u8; 4] {
        match kind {
            ParticleKind::Spawn => self.spawn_rgba,
            ParticleKind::Dismiss => self.dismiss_rgba,
        }
    }
}

/// Free-standing particle simulation. Knows nothing about clones; callers emit bursts.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    opts: ParticleOpts,
    // Oldest first.
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new(opts: ParticleOpts) -> Self {
        Self {
            opts,
            particles: Vec::new(),
        }
    }

    pub fn opts(&self) -> &ParticleOpts {
        &self.opts
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.opts.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.opts.capacity = capacity;
        self.enforce_capacity();
    }

    /// Emit `count` particles around `origin`.
    pub fn emit(
        &mut self,
        origin: Point,
        count: usize,
        kind: ParticleKind,
        rng: &mut dyn RandomSource,
    ) {
        if count == 0 || self.opts.capacity == 0 {
            return;
        }
        let o = &self.opts;
        let sign = kind.launch_sign();
        // Only the newest `capacity` of this burst could survive the cap anyway.
        let count = count.min(o.capacity);
        self.particles.reserve(count);
        for _ in 0..count {
            let offset = Vec2::from_angle(rng.range(0.0, std::f64::consts::TAU))
                * rng.range(0.0, o.origin_jitter.max(0.0));
            let velocity = Vec2::new(
                rng.signed_unit() * o.lateral_speed,
                sign * rng.range(o.launch_speed_min, o.launch_speed_max),
            );
            let max_life_ms = rng.range(o.life_min_ms, o.life_max_ms).max(1.0);
            self.particles.push(Particle {
                position: origin + offset,
                velocity,
                size: rng.range(o.size_min, o.size_max),
                life: 1.0,
                max_life_ms,
                start_delay_ms: rng.range(0.0, o.max_start_delay_ms.max(0.0)),
                kind,
            });
        }
        self.enforce_capacity();
    }

    /// Integrate motion, age every particle past its delay, and cull the dead.
    pub fn update(&mut self, dt_ms: f64) {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let o = self.opts;

        self.particles.retain_mut(|p| {
            let mut t = dt_ms;
            if p.start_delay_ms > 0.0 {
                if t < p.start_delay_ms {
                    p.start_delay_ms -= t;
                    return true;
                }
                t -= p.start_delay_ms;
                p.start_delay_ms = 0.0;
            }
            if t <= 0.0 {
                return p.is_alive();
            }

            let frames = t / REFERENCE_FRAME_MS;
            p.position += p.velocity * frames;
            p.velocity *= o.drag.clamp(0.0, 1.0).powf(frames);
            let spent = 1.0 - p.life.clamp(0.0, 1.0);
            p.velocity.y -= p.kind.launch_sign() * o.counter_bias * spent * frames;
            p.size += o.growth * frames;
            p.life -= t / p.max_life_ms;
            p.is_alive()
        });
    }

    /// Drop every particle immediately.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    fn enforce_capacity(&mut self) {
        let excess = self.particles.len().saturating_sub(self.opts.capacity);
        if excess > 0 {
            self.particles.drain(..excess);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/particles.rs"]
mod tests;
