use crate::animation::ease::{Ease, fast_ramp, pop_overshoot};
use crate::foundation::core::Rect;
use crate::foundation::math::{clamp01, lerp};

/// Vertical slice of a clone image that is visible, as fractions of its height (0 = top edge).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealWindow {
    pub top: f64,
    pub bottom: f64,
}

impl RevealWindow {
    pub const FULL: Self = Self {
        top: 0.0,
        bottom: 1.0,
    };

    /// Window anchored at the bottom edge covering `fraction` of the height.
    pub fn from_bottom(fraction: f64) -> Self {
        Self {
            top: 1.0 - clamp01(fraction),
            bottom: 1.0,
        }
    }

    pub fn height(self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    pub fn is_empty(self) -> bool {
        self.height() <= 0.0
    }

    /// Clip rectangle in pixel space of an image `width x height`.
    pub fn to_rect(self, width: f64, height: f64) -> Rect {
        Rect::new(0.0, self.top * height, width, self.bottom * height)
    }
}

/// Resting look and transition curve shape for clones.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CloneLook {
    /// Opacity of an active clone. Below 1 for the translucent "ghost" look.
    pub rest_opacity: f64,
    /// Scale of an active clone relative to the live foreground.
    pub rest_scale: f64,
    /// Spawn opacity reaches `rest_opacity` at progress `1 / opacity_gain`.
    pub opacity_gain: f64,
    /// Spawn progress at which the scale pop begins.
    pub pop_start: f64,
    /// Peak relative scale overshoot of the pop.
    pub pop_amplitude: f64,
    /// Curve applied to progress before sizing the reveal window.
    pub reveal_ease: Ease,
}

impl Default for CloneLook {
    fn default() -> Self {
        Self {
            rest_opacity: 0.8,
            rest_scale: 0.85,
            opacity_gain: 1.5,
            pop_start: 0.8,
            pop_amplitude: 0.12,
            reveal_ease: Ease::Linear,
        }
    }
}

/// Per-frame visual parameters of one clone. Derived from state and progress, never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloneVisuals {
    pub opacity: f64,
    pub scale: f64,
    pub reveal: RevealWindow,
}

impl CloneVisuals {
    /// Bottom-up reveal, early opacity ramp and a closing scale pop.
    pub fn spawning(progress: f64, look: &CloneLook) -> Self {
        let p = clamp01(progress);
        let reveal = RevealWindow::from_bottom(look.reveal_ease.apply(p));
        let opacity = fast_ramp(p, look.opacity_gain) * look.rest_opacity;

        let pop_start = clamp01(look.pop_start);
        let scale = if p > pop_start && pop_start < 1.0 {
            let u = (p - pop_start) / (1.0 - pop_start);
            look.rest_scale * (1.0 + pop_overshoot(u, look.pop_amplitude))
        } else {
            look.rest_scale
        };

        Self {
            opacity,
            scale,
            reveal,
        }
    }

    pub fn active(look: &CloneLook) -> Self {
        Self {
            opacity: look.rest_opacity,
            scale: look.rest_scale,
            reveal: RevealWindow::FULL,
        }
    }

    /// Window shrinking from the top and a linear fade to transparent.
    pub fn dismissing(progress: f64, look: &CloneLook) -> Self {
        let p = clamp01(progress);
        Self {
            opacity: lerp(look.rest_opacity, 0.0, p),
            scale: look.rest_scale,
            reveal: RevealWindow::from_bottom(1.0 - look.reveal_ease.apply(p)),
        }
    }

    /// Nothing would be drawn.
    pub fn is_invisible(&self) -> bool {
        self.opacity <= 0.0 || self.scale <= 0.0 || self.reveal.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/clones/visuals.rs"]
mod tests;
