use crate::clones::placement::{PlacementOpts, place_clones};
use crate::clones::visuals::{CloneLook, CloneVisuals};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::rng::RandomSource;

/// Progress within this distance of 1 counts as complete, absorbing float drift from many small
/// time steps.
const PROGRESS_EPSILON: f64 = 1e-9;

/// Identity of a clone: the spawn batch plus its index within the batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CloneId {
    pub batch: u32,
    pub index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloneState {
    Spawning,
    Active,
    Dismissing,
}

/// One spawned copy of the live subject, replaying the feed `delay_frames` behind.
#[derive(Clone, Debug, PartialEq)]
pub struct DelayedClone {
    id: CloneId,
    position: Point,
    delay_frames: usize,
    state: CloneState,
    progress: f64,
    stagger_remaining_ms: f64,
    started: bool,
}

impl DelayedClone {
    pub fn id(&self) -> CloneId {
        self.id
    }

    /// Center point in canvas coordinates, fixed at spawn.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Frames behind live this clone samples from the history.
    pub fn delay_frames(&self) -> usize {
        self.delay_frames
    }

    pub fn state(&self) -> CloneState {
        self.state
    }

    /// Normalized progress of the current transition. Only meaningful once the stagger elapsed.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn stagger_remaining_ms(&self) -> f64 {
        self.stagger_remaining_ms
    }

    /// Still waiting out its stagger before the current transition starts.
    pub fn is_waiting(&self) -> bool {
        self.stagger_remaining_ms > 0.0
    }

    pub fn visuals(&self, look: &CloneLook) -> CloneVisuals {
        match self.state {
            CloneState::Spawning => CloneVisuals::spawning(self.progress, look),
            CloneState::Active => CloneVisuals::active(look),
            CloneState::Dismissing => CloneVisuals::dismissing(self.progress, look),
        }
    }

    fn begin(&mut self, state: CloneState, stagger_ms: f64) {
        self.state = state;
        self.progress = 0.0;
        self.stagger_remaining_ms = stagger_ms;
        self.started = false;
    }
}

/// Transition notifications produced by [`CloneAnimator::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CloneEvent {
    /// A clone's stagger elapsed and its spawn animation began.
    SpawnStarted { id: CloneId, position: Point },
    /// A clone finished spawning.
    Activated { id: CloneId },
    /// A clone's stagger elapsed and its dismiss animation began.
    DismissStarted { id: CloneId, position: Point },
    /// A clone finished dismissing and was deleted.
    Removed { id: CloneId },
}

/// Timing and limits for the clone lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CloneAnimatorOpts {
    /// Delay between consecutive clones starting a transition.
    pub stagger_ms: f64,
    pub spawn_duration_ms: f64,
    pub dismiss_duration_ms: f64,
    /// Delay of the first clone, in frames behind live.
    pub base_delay_frames: usize,
    /// Extra delay per subsequent clone so no two replay the same moment.
    pub delay_step_frames: usize,
    /// Upper bound on clones per batch. Requests above it are clamped.
    pub max_clones: usize,
    pub look: CloneLook,
}

impl Default for CloneAnimatorOpts {
    fn default() -> Self {
        Self {
            stagger_ms: 300.0,
            spawn_duration_ms: 1000.0,
            dismiss_duration_ms: 800.0,
            base_delay_frames: 5,
            delay_step_frames: 5,
            max_clones: 5,
            look: CloneLook::default(),
        }
    }
}

/// Owns the live clones and drives them through spawning, active and dismissing.
///
/// Removal is deletion: a clone that finishes dismissing leaves the collection and never becomes
/// active again.
#[derive(Clone, Debug)]
pub struct CloneAnimator {
    opts: CloneAnimatorOpts,
    placement: PlacementOpts,
    bounds: Option<Canvas>,
    clones: Vec<DelayedClone>,
    next_batch: u32,
}

impl CloneAnimator {
    pub fn new(opts: CloneAnimatorOpts, placement: PlacementOpts) -> Self {
        Self {
            opts,
            placement,
            bounds: None,
            clones: Vec::new(),
            next_batch: 0,
        }
    }

    pub fn opts(&self) -> &CloneAnimatorOpts {
        &self.opts
    }

    pub fn placement(&self) -> &PlacementOpts {
        &self.placement
    }

    pub fn clones(&self) -> &[DelayedClone] {
        &self.clones
    }

    pub fn len(&self) -> usize {
        self.clones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }

    pub fn max_clones(&self) -> usize {
        self.opts.max_clones
    }

    /// Takes effect on the next spawn; clones already on screen are left alone.
    pub fn set_max_clones(&mut self, max_clones: usize) {
        self.opts.max_clones = max_clones;
    }

    /// Canvas that spawn centers are clamped into. `None` disables clamping.
    pub fn set_bounds(&mut self, bounds: Option<Canvas>) {
        self.bounds = bounds.filter(|c| !c.is_empty());
    }

    /// Replace the current batch with `count` new clones placed around `center`.
    ///
    /// `count` is clamped to `max_clones`; a zero count is a no-op. Returns the number of clones
    /// spawned.
    pub fn spawn_all(
        &mut self,
        center: Point,
        count: usize,
        rng: &mut dyn RandomSource,
    ) -> usize {
        let count = count.min(self.opts.max_clones);
        if count == 0 {
            tracing::debug!("spawn ignored: zero clones requested or allowed");
            return 0;
        }
        let center = match self.bounds {
            Some(canvas) => canvas.clamp_point(center),
            None => center,
        };

        if !self.clones.is_empty() {
            tracing::debug!(replaced = self.clones.len(), "replacing previous clone batch");
        }

        let batch = self.next_batch;
        self.next_batch = self.next_batch.wrapping_add(1);

        let placement = place_clones(center, count, &self.placement, rng);
        if !placement.converged {
            tracing::debug!(
                count,
                passes = placement.passes,
                "clone placement hit its iteration cap with residual overlap"
            );
        }

        self.clones = placement
            .positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| DelayedClone {
                id: CloneId {
                    batch,
                    index: i as u32,
                },
                position,
                delay_frames: self
                    .opts
                    .base_delay_frames
                    .saturating_add(i.saturating_mul(self.opts.delay_step_frames)),
                state: CloneState::Spawning,
                progress: 0.0,
                stagger_remaining_ms: i as f64 * self.opts.stagger_ms.max(0.0),
                started: false,
            })
            .collect();

        tracing::debug!(batch, count, x = center.x, y = center.y, "spawned clones");
        count
    }

    /// Start dismissing every spawning or active clone, staggered in collection order.
    ///
    /// Clones still waiting to start their spawn were never shown, so they are dropped outright
    /// with no dismiss burst. Clones already dismissing keep their timing. Returns how many clones
    /// began dismissing; an empty or fully dismissing collection is a no-op.
    pub fn dismiss_all(&mut self) -> usize {
        let before = self.clones.len();
        self.clones
            .retain(|c| c.started || c.state != CloneState::Spawning);
        let dropped = before - self.clones.len();

        let stagger = self.opts.stagger_ms.max(0.0);
        let mut n = 0usize;
        for clone in &mut self.clones {
            if clone.state == CloneState::Dismissing {
                continue;
            }
            clone.begin(CloneState::Dismissing, n as f64 * stagger);
            n += 1;
        }
        if n > 0 || dropped > 0 {
            tracing::debug!(count = n, dropped, "dismissing clones");
        }
        n
    }

    /// Drop every clone immediately, without transitions or events.
    pub fn clear(&mut self) {
        self.clones.clear();
    }

    /// Advance all clones by `dt_ms` and report the transitions that happened.
    ///
    /// Time left over after a stagger elapses flows into progress on the same call, so a clone
    /// completes after exactly `stagger + duration` of accumulated time.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<CloneEvent> {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let spawn_ms = self.opts.spawn_duration_ms;
        let dismiss_ms = self.opts.dismiss_duration_ms;
        let mut events = Vec::new();

        self.clones.retain_mut(|clone| {
            let mut t = dt_ms;
            if clone.stagger_remaining_ms > 0.0 {
                if t < clone.stagger_remaining_ms {
                    clone.stagger_remaining_ms -= t;
                    return true;
                }
                t -= clone.stagger_remaining_ms;
                clone.stagger_remaining_ms = 0.0;
            }

            if !clone.started {
                clone.started = true;
                events.push(match clone.state {
                    CloneState::Dismissing => CloneEvent::DismissStarted {
                        id: clone.id,
                        position: clone.position,
                    },
                    _ => CloneEvent::SpawnStarted {
                        id: clone.id,
                        position: clone.position,
                    },
                });
            }

            match clone.state {
                CloneState::Spawning => {
                    clone.progress = step_progress(clone.progress, t, spawn_ms);
                    if clone.progress >= 1.0 - PROGRESS_EPSILON {
                        clone.state = CloneState::Active;
                        clone.progress = 0.0;
                        events.push(CloneEvent::Activated { id: clone.id });
                    }
                    true
                }
                CloneState::Active => true,
                CloneState::Dismissing => {
                    clone.progress = step_progress(clone.progress, t, dismiss_ms);
                    if clone.progress >= 1.0 - PROGRESS_EPSILON {
                        events.push(CloneEvent::Removed { id: clone.id });
                        return false;
                    }
                    true
                }
            }
        });

        events
    }
}

fn step_progress(progress: f64, dt_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms.is_nan() || duration_ms <= 0.0 {
        return 1.0;
    }
    (progress + dt_ms / duration_ms).min(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/clones/animator.rs"]
mod tests;
