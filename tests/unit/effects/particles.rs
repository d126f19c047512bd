use super::*;
use crate::foundation::rng::Rng64;

fn no_delay() -> ParticleOpts {
    ParticleOpts {
        max_start_delay_ms: 0.0,
        ..ParticleOpts::default()
    }
}

#[test]
fn emit_creates_requested_count_near_origin() {
    let mut ps = ParticleSystem::new(ParticleOpts::default());
    let origin = Point::new(100.0, 100.0);
    ps.emit(origin, 15, ParticleKind::Spawn, &mut Rng64::new(1));
    assert_eq!(ps.len(), 15);
    for p in ps.particles() {
        assert!((p.position - origin).hypot() <= ps.opts().origin_jitter + 1e-9);
        assert_eq!(p.life, 1.0);
        assert!(p.start_delay_ms <= ps.opts().max_start_delay_ms);
        assert!(p.size >= ps.opts().size_min && p.size <= ps.opts().size_max);
    }
}

#[test]
fn spawn_bursts_rise_and_dismiss_bursts_fall() {
    let mut ps = ParticleSystem::new(no_delay());
    let mut rng = Rng64::new(5);
    ps.emit(Point::ORIGIN, 10, ParticleKind::Spawn, &mut rng);
    ps.emit(Point::ORIGIN, 10, ParticleKind::Dismiss, &mut rng);
    for p in ps.particles() {
        match p.kind {
            ParticleKind::Spawn => assert!(p.velocity.y < 0.0),
            ParticleKind::Dismiss => assert!(p.velocity.y > 0.0),
        }
    }
}

#[test]
fn life_never_increases_and_size_grows() {
    let mut ps = ParticleSystem::new(ParticleOpts::default());
    ps.emit(Point::ORIGIN, 30, ParticleKind::Dismiss, &mut Rng64::new(2));
    let mut prev: Vec<(f64, f64)> = ps.particles().iter().map(|p| (p.life, p.size)).collect();
    for _ in 0..20 {
        ps.update(16.0);
        // Nothing dies this early, so particles stay index-aligned.
        let now: Vec<(f64, f64)> = ps.particles().iter().map(|p| (p.life, p.size)).collect();
        assert_eq!(now.len(), prev.len());
        for (a, b) in prev.iter().zip(&now) {
            assert!(b.0 <= a.0);
            assert!(b.1 >= a.1);
        }
        prev = now;
    }
}

#[test]
fn particle_dies_within_ceil_life_over_dt_ticks() {
    for dt in [7.0, 16.0, 33.0] {
        let mut ps = ParticleSystem::new(no_delay());
        ps.emit(Point::ORIGIN, 1, ParticleKind::Spawn, &mut Rng64::new(11));
        let max_life = ps.particles()[0].max_life_ms;
        let bound = (max_life / dt).ceil() as usize;
        let mut ticks = 0;
        while !ps.is_empty() {
            ps.update(dt);
            ticks += 1;
            assert!(ticks <= bound, "dt={dt} ticks={ticks} bound={bound}");
        }
    }
}

#[test]
fn pending_particles_hold_still_until_their_delay_elapses() {
    let opts = ParticleOpts {
        max_start_delay_ms: 1000.0,
        ..ParticleOpts::default()
    };
    let mut ps = ParticleSystem::new(opts);
    ps.emit(Point::new(10.0, 10.0), 50, ParticleKind::Spawn, &mut Rng64::new(3));
    let pending_before: Vec<Point> = ps
        .particles()
        .iter()
        .filter(|p| p.start_delay_ms > 5.0)
        .map(|p| p.position)
        .collect();
    assert!(!pending_before.is_empty());
    ps.update(5.0);
    for p in ps.particles().iter().filter(|p| p.is_pending()) {
        assert_eq!(p.life, 1.0);
        assert_eq!(p.opacity(), 0.0);
        assert!(pending_before.contains(&p.position));
    }
}

#[test]
fn capacity_drops_oldest_first() {
    let opts = ParticleOpts {
        capacity: 10,
        ..no_delay()
    };
    let mut ps = ParticleSystem::new(opts);
    let mut rng = Rng64::new(4);
    ps.emit(Point::new(0.0, 0.0), 8, ParticleKind::Spawn, &mut rng);
    ps.emit(Point::new(1000.0, 0.0), 8, ParticleKind::Dismiss, &mut rng);
    assert_eq!(ps.len(), 10);
    let spawn_left = ps
        .particles()
        .iter()
        .filter(|p| p.kind == ParticleKind::Spawn)
        .count();
    assert_eq!(spawn_left, 2);
    assert_eq!(ps.particles().last().map(|p| p.kind), Some(ParticleKind::Dismiss));

    ps.set_capacity(3);
    assert_eq!(ps.len(), 3);
    assert!(ps.particles().iter().all(|p| p.kind == ParticleKind::Dismiss));
}

#[test]
fn default_cap_bounds_many_bursts() {
    let mut ps = ParticleSystem::new(ParticleOpts::default());
    let mut rng = Rng64::new(8);
    for _ in 0..50 {
        ps.emit(Point::ORIGIN, 20, ParticleKind::Spawn, &mut rng);
    }
    assert_eq!(ps.len(), 200);
}

#[test]
fn clear_and_degenerate_inputs() {
    let mut ps = ParticleSystem::new(ParticleOpts::default());
    ps.emit(Point::ORIGIN, 0, ParticleKind::Spawn, &mut Rng64::new(1));
    assert!(ps.is_empty());
    ps.emit(Point::ORIGIN, 5, ParticleKind::Spawn, &mut Rng64::new(1));
    ps.update(f64::NAN);
    ps.update(-10.0);
    assert_eq!(ps.len(), 5);
    ps.clear();
    assert!(ps.is_empty());
}
