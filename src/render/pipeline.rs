use std::sync::Arc;

use crate::clones::animator::{CloneAnimator, CloneEvent};
use crate::effects::mask::{SegmentationMask, apply_mask_into};
use crate::effects::particles::{ParticleKind, ParticleSystem};
use crate::foundation::core::{Affine, Canvas, FrameIndex, Point};
use crate::foundation::rng::Rng64;
use crate::frames::ring::FrameRingBuffer;
use crate::frames::snapshot::FrameSnapshot;
use crate::render::backend::{DrawSurface, FramePlacement, FrameRGBA};
use crate::session::collaborators::{FrameSource, Segmenter};
use crate::session::config::{EngineConfig, QualitySettings};

/// What one [`CompositingPipeline::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Index of the tick that produced this report.
    pub tick: FrameIndex,
    /// Clones that resolved a delayed frame and were drawn.
    pub clones_drawn: usize,
    /// Subset of `clones_drawn` that went through the segmentation mask.
    pub clones_masked: usize,
    /// Particles alive after the update.
    pub particles: usize,
    /// Whether the live source had a valid frame this tick.
    pub live_ready: bool,
}

/// Per-session compositor: frame history, clone lifecycle and particles, drawn onto a
/// [`DrawSurface`] once per tick.
///
/// Draw order per tick:
/// 1. background clear
/// 2. particles
/// 3. clones, each from its delayed snapshot (optionally masked), clipped to its reveal window
/// 4. live foreground over the whole surface
///
/// Nothing in the steady-state path returns an error: missing frames, short history and absent
/// masks are skipped or fall back silently.
pub struct CompositingPipeline {
    history: FrameRingBuffer<FrameSnapshot>,
    animator: CloneAnimator,
    particles: ParticleSystem,
    rng: Rng64,
    segmenter: Option<Box<dyn Segmenter>>,
    segmentation_enabled: bool,
    snapshot_scale: f32,
    background_rgba: [u8; 4],
    burst_count: usize,
    scratch: FrameRGBA,
    tick: FrameIndex,
}

impl std::fmt::Debug for CompositingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositingPipeline")
            .field("history_len", &self.history.len())
            .field("history_capacity", &self.history.capacity())
            .field("clones", &self.animator.len())
            .field("particles", &self.particles.len())
            .field("segmentation_enabled", &self.segmentation_enabled)
            .field("has_segmenter", &self.segmenter.is_some())
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl CompositingPipeline {
    /// Build a pipeline from a config. The config is trusted; call
    /// [`EngineConfig::validate`] first when it comes from outside.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => Rng64::new(seed),
            None => Rng64::from_clock(),
        };
        Self {
            history: FrameRingBuffer::new(config.history.capacity),
            animator: CloneAnimator::new(config.clones, config.placement),
            burst_count: config.particles.burst_count,
            particles: ParticleSystem::new(config.particles),
            rng,
            segmenter: None,
            segmentation_enabled: config.segmentation_enabled,
            snapshot_scale: config.history.snapshot_scale,
            background_rgba: config.background_rgba,
            scratch: FrameRGBA::empty(),
            tick: FrameIndex(0),
        }
    }

    pub fn with_segmenter(mut self, segmenter: impl Segmenter + 'static) -> Self {
        self.segmenter = Some(Box::new(segmenter));
        self
    }

    /// Install or remove the segmentation collaborator.
    pub fn set_segmenter(&mut self, segmenter: Option<Box<dyn Segmenter>>) {
        self.segmenter = segmenter;
    }

    /// Spawn up to `count` clones around `center`, replacing any current batch.
    pub fn spawn_all(&mut self, center: Point, count: usize) -> usize {
        self.animator.spawn_all(center, count, &mut self.rng)
    }

    /// Start dismissing every clone. A no-op when there is nothing to dismiss.
    pub fn dismiss_all(&mut self) -> usize {
        self.animator.dismiss_all()
    }

    pub fn set_max_clones(&mut self, max_clones: usize) {
        self.animator.set_max_clones(max_clones);
    }

    /// Resize the frame history. Shrinking drops the oldest snapshots now.
    pub fn set_ring_buffer_capacity(&mut self, capacity: usize) {
        self.history.set_capacity(capacity);
    }

    /// Resolution factor for snapshots captured from now on.
    pub fn set_snapshot_scale(&mut self, scale: f32) {
        self.snapshot_scale = scale;
    }

    pub fn set_segmentation_enabled(&mut self, enabled: bool) {
        self.segmentation_enabled = enabled;
    }

    pub fn set_background(&mut self, rgba: [u8; 4]) {
        self.background_rgba = rgba;
    }

    /// Apply adaptive-quality settings without rebuilding the pipeline.
    pub fn apply_quality(&mut self, q: QualitySettings) {
        tracing::debug!(
            max_clones = q.max_clones,
            capacity = q.ring_buffer_capacity,
            scale = q.snapshot_scale,
            segmentation = q.segmentation_enabled,
            "applying quality settings"
        );
        self.set_max_clones(q.max_clones);
        self.set_ring_buffer_capacity(q.ring_buffer_capacity);
        self.set_snapshot_scale(q.snapshot_scale);
        self.set_segmentation_enabled(q.segmentation_enabled);
    }

    /// Current adaptive-quality settings.
    pub fn quality(&self) -> QualitySettings {
        QualitySettings {
            max_clones: self.animator.max_clones(),
            ring_buffer_capacity: self.history.capacity(),
            snapshot_scale: self.snapshot_scale,
            segmentation_enabled: self.segmentation_enabled,
        }
    }

    /// Drop all clones and particles immediately. History is kept so a new spawn replays at once.
    pub fn clear_effects(&mut self) {
        self.animator.clear();
        self.particles.clear();
    }

    /// [`CompositingPipeline::clear_effects`] plus an empty frame history.
    pub fn reset(&mut self) {
        self.clear_effects();
        self.history.clear();
        self.tick = FrameIndex(0);
    }

    pub fn clones(&self) -> &CloneAnimator {
        &self.animator
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn history(&self) -> &FrameRingBuffer<FrameSnapshot> {
        &self.history
    }

    pub fn segmentation_enabled(&self) -> bool {
        self.segmentation_enabled
    }

    /// Run one tick: capture, advance, then draw everything onto `surface`.
    #[tracing::instrument(level = "trace", skip_all, fields(tick = self.tick.0))]
    pub fn tick<S: DrawSurface + ?Sized>(
        &mut self,
        dt_ms: f64,
        source: &dyn FrameSource,
        surface: &mut S,
    ) -> TickReport {
        let tick = self.tick;
        self.tick = tick.next();

        let live = source
            .dimensions()
            .filter(|c| !c.is_empty())
            .and_then(|_| source.current_frame())
            .filter(|f| f.is_ready());

        if let Some(frame) = live
            && let Some(snapshot) = FrameSnapshot::capture(frame, self.snapshot_scale, tick)
        {
            self.history.push(snapshot);
        }

        let canvas = surface.canvas();
        self.animator.set_bounds(Some(canvas));
        let events = self.animator.advance(dt_ms);
        self.particles.update(dt_ms);
        for event in &events {
            let (origin, kind) = match *event {
                CloneEvent::SpawnStarted { position, .. } => (position, ParticleKind::Spawn),
                CloneEvent::DismissStarted { position, .. } => (position, ParticleKind::Dismiss),
                CloneEvent::Activated { .. } | CloneEvent::Removed { .. } => continue,
            };
            self.particles.emit(origin, self.burst_count, kind, &mut self.rng);
        }

        surface.clear(self.background_rgba);
        if !canvas.is_empty() {
            self.draw_particles(surface);
        }

        let mut report = TickReport {
            tick,
            particles: self.particles.len(),
            live_ready: live.is_some(),
            ..TickReport::default()
        };

        let Some(live) = live else {
            tracing::trace!(particles = report.particles, "live source not ready");
            return report;
        };

        if !self.animator.is_empty() {
            let mask = self.poll_mask();
            self.draw_clones(surface, canvas, mask.as_deref(), &mut report);
        }

        surface.draw_frame(live, &FramePlacement::cover(live.canvas(), canvas));

        tracing::trace!(
            clones = report.clones_drawn,
            masked = report.clones_masked,
            particles = report.particles,
            "tick composited"
        );
        report
    }

    fn draw_particles<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        let opts = self.particles.opts();
        for p in self.particles.particles() {
            if p.is_pending() {
                continue;
            }
            surface.fill_circle(
                p.position,
                p.size,
                opts.color_for(p.kind),
                p.opacity() as f32,
            );
        }
    }

    fn poll_mask(&mut self) -> Option<Arc<SegmentationMask>> {
        if !self.segmentation_enabled {
            return None;
        }
        let segmenter = self.segmenter.as_mut()?;
        match segmenter.latest_mask() {
            Ok(mask) => mask,
            Err(e) => {
                tracing::warn!(error = %e, "segmentation failed; drawing clones unmasked");
                None
            }
        }
    }

    fn draw_clones<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        canvas: Canvas,
        mask: Option<&SegmentationMask>,
        report: &mut TickReport,
    ) {
        let look = self.animator.opts().look;
        for clone in self.animator.clones() {
            // Waiting spawns have an empty reveal; waiting dismisses hold the rest look.
            let visuals = clone.visuals(&look);
            if visuals.is_invisible() {
                continue;
            }
            let Some(snapshot) = self.history.get(clone.delay_frames()) else {
                continue;
            };
            let delayed = snapshot.frame();

            let mut frame = delayed;
            if let Some(mask) = mask {
                match apply_mask_into(delayed, mask, &mut self.scratch) {
                    Ok(()) => {
                        frame = &self.scratch;
                        report.clones_masked += 1;
                    }
                    Err(e) => tracing::warn!(error = %e, "mask not applied; drawing unmasked"),
                }
            }

            let fw = f64::from(frame.width);
            let fh = f64::from(frame.height);
            let transform = Affine::translate(clone.position().to_vec2())
                * Affine::scale(visuals.scale)
                * Affine::scale_non_uniform(
                    f64::from(canvas.width) / fw,
                    f64::from(canvas.height) / fh,
                )
                * Affine::translate((-fw / 2.0, -fh / 2.0));
            surface.draw_frame(
                frame,
                &FramePlacement {
                    transform,
                    clip: visuals.reveal.to_rect(fw, fh),
                    opacity: visuals.opacity as f32,
                },
            );
            report.clones_drawn += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
