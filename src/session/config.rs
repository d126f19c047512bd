use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::clones::animator::CloneAnimatorOpts;
use crate::clones::placement::PlacementOpts;
use crate::effects::particles::ParticleOpts;
use crate::foundation::error::{ShadowcastError, ShadowcastResult};
use crate::frames::ring::DEFAULT_HISTORY_CAPACITY;

/// Frame history sizing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Frames retained for delayed playback.
    pub capacity: usize,
    /// Resolution factor snapshots are stored at, in `(0, 1]`.
    pub snapshot_scale: f32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            snapshot_scale: 1.0,
        }
    }
}

/// Complete engine configuration, loadable from JSON. Every section is optional.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub history: HistoryConfig,
    pub clones: CloneAnimatorOpts,
    pub placement: PlacementOpts,
    pub particles: ParticleOpts,
    /// Straight-alpha color the output is cleared to each tick.
    pub background_rgba: [u8; 4],
    pub segmentation_enabled: bool,
    /// Seed for placement and particle jitter. `None` seeds from the clock.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            clones: CloneAnimatorOpts::default(),
            placement: PlacementOpts::default(),
            particles: ParticleOpts::default(),
            background_rgba: [0, 0, 0, 255],
            segmentation_enabled: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ShadowcastResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| ShadowcastError::serde(format!("parse engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> ShadowcastResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse and validate a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ShadowcastResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ShadowcastError::validation(format!("open engine config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> ShadowcastResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ShadowcastError::serde(format!("serialize engine config: {e}")))
    }

    pub fn validate(&self) -> ShadowcastResult<()> {
        if self.history.capacity == 0 {
            return Err(ShadowcastError::validation("history.capacity must be > 0"));
        }
        check_scale("history.snapshot_scale", self.history.snapshot_scale)?;

        let c = &self.clones;
        check_positive("clones.spawn_duration_ms", c.spawn_duration_ms)?;
        check_positive("clones.dismiss_duration_ms", c.dismiss_duration_ms)?;
        check_non_negative("clones.stagger_ms", c.stagger_ms)?;
        check_unit("clones.look.rest_opacity", c.look.rest_opacity)?;
        check_positive("clones.look.rest_scale", c.look.rest_scale)?;
        check_non_negative("clones.look.pop_amplitude", c.look.pop_amplitude)?;
        check_unit("clones.look.pop_start", c.look.pop_start)?;
        if !c.look.opacity_gain.is_finite() || c.look.opacity_gain < 1.0 {
            return Err(ShadowcastError::validation(
                "clones.look.opacity_gain must be finite and >= 1",
            ));
        }

        let p = &self.placement;
        check_non_negative("placement.base_radius", p.base_radius)?;
        check_non_negative("placement.radius_jitter", p.radius_jitter)?;
        check_non_negative("placement.min_distance", p.min_distance)?;

        let q = &self.particles;
        if !q.drag.is_finite() || q.drag <= 0.0 || q.drag > 1.0 {
            return Err(ShadowcastError::validation("particles.drag must be in (0, 1]"));
        }
        check_positive("particles.life_min_ms", q.life_min_ms)?;
        check_positive("particles.life_max_ms", q.life_max_ms)?;
        if q.life_max_ms < q.life_min_ms {
            return Err(ShadowcastError::validation(
                "particles.life_max_ms must be >= life_min_ms",
            ));
        }
        if q.size_max < q.size_min {
            return Err(ShadowcastError::validation(
                "particles.size_max must be >= size_min",
            ));
        }
        if q.launch_speed_max < q.launch_speed_min {
            return Err(ShadowcastError::validation(
                "particles.launch_speed_max must be >= launch_speed_min",
            ));
        }
        check_non_negative("particles.size_min", q.size_min)?;
        check_non_negative("particles.max_start_delay_ms", q.max_start_delay_ms)?;
        check_non_negative("particles.counter_bias", q.counter_bias)?;
        check_non_negative("particles.growth", q.growth)?;
        Ok(())
    }

    /// Adaptive-quality view of this config.
    pub fn quality(&self) -> QualitySettings {
        QualitySettings {
            max_clones: self.clones.max_clones,
            ring_buffer_capacity: self.history.capacity,
            snapshot_scale: self.history.snapshot_scale,
            segmentation_enabled: self.segmentation_enabled,
        }
    }

    /// Overwrite the adaptive-quality fields.
    pub fn with_quality(mut self, q: QualitySettings) -> Self {
        self.clones.max_clones = q.max_clones;
        self.history.capacity = q.ring_buffer_capacity.max(1);
        self.history.snapshot_scale = q.snapshot_scale;
        self.segmentation_enabled = q.segmentation_enabled;
        self
    }
}

fn check_positive(name: &str, v: f64) -> ShadowcastResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ShadowcastError::validation(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn check_non_negative(name: &str, v: f64) -> ShadowcastResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(ShadowcastError::validation(format!(
            "{name} must be finite and >= 0"
        )));
    }
    Ok(())
}

fn check_unit(name: &str, v: f64) -> ShadowcastResult<()> {
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(ShadowcastError::validation(format!("{name} must be in [0, 1]")));
    }
    Ok(())
}

fn check_scale(name: &str, v: f32) -> ShadowcastResult<()> {
    if !v.is_finite() || v <= 0.0 || v > 1.0 {
        return Err(ShadowcastError::validation(format!("{name} must be in (0, 1]")));
    }
    Ok(())
}

/// Settings an adaptive-performance collaborator may change while running.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualitySettings {
    pub max_clones: usize,
    pub ring_buffer_capacity: usize,
    pub snapshot_scale: f32,
    pub segmentation_enabled: bool,
}

/// Device capability presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    pub fn settings(self) -> QualitySettings {
        match self {
            Self::Low => QualitySettings {
                max_clones: 2,
                ring_buffer_capacity: 15,
                snapshot_scale: 0.5,
                segmentation_enabled: false,
            },
            Self::Medium => QualitySettings {
                max_clones: 3,
                ring_buffer_capacity: 24,
                snapshot_scale: 0.75,
                segmentation_enabled: true,
            },
            Self::High => QualitySettings {
                max_clones: 5,
                ring_buffer_capacity: DEFAULT_HISTORY_CAPACITY,
                snapshot_scale: 1.0,
                segmentation_enabled: true,
            },
        }
    }
}

impl std::str::FromStr for QualityTier {
    type Err = ShadowcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ShadowcastError::validation(format!(
                "unknown quality tier '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
