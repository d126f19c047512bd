use super::*;
use crate::foundation::rng::Rng64;

#[test]
fn returns_exactly_count_positions() {
    let mut rng = Rng64::new(1);
    let opts = PlacementOpts::default();
    for count in 1..=12 {
        let p = place_clones(Point::new(0.0, 0.0), count, &opts, &mut rng);
        assert_eq!(p.positions.len(), count);
    }
    assert!(place_clones(Point::ORIGIN, 0, &opts, &mut rng).positions.is_empty());
}

#[test]
fn pairs_are_separated_or_cap_was_reached() {
    let opts = PlacementOpts::default();
    for seed in 0..20u64 {
        let mut rng = Rng64::new(seed);
        for count in 2..=16 {
            let p = place_clones(Point::new(500.0, 500.0), count, &opts, &mut rng);
            let min = min_pairwise_distance(&p.positions).unwrap();
            if p.converged {
                assert!(min >= opts.min_distance - 1e-6, "count={count} min={min}");
            } else {
                assert_eq!(p.passes, opts.max_iterations);
            }
            assert!(p.passes <= opts.max_iterations);
        }
    }
}

#[test]
fn three_clones_around_center_scenario() {
    let center = Point::new(500.0, 500.0);
    let opts = PlacementOpts::default();
    let mut rng = Rng64::new(42);
    let p = place_clones(center, 3, &opts, &mut rng);

    assert_eq!(p.positions.len(), 3);
    for pos in &p.positions {
        let r = (*pos - center).hypot();
        assert!((130.0..=170.0).contains(&r), "radius {r}");
    }
    assert!(p.converged);
    assert_eq!(p.passes, 0);
    assert!(min_pairwise_distance(&p.positions).unwrap() >= 80.0);
}

#[test]
fn same_seed_gives_same_placement() {
    let opts = PlacementOpts::default();
    let a = place_clones(Point::new(10.0, 10.0), 5, &opts, &mut Rng64::new(9));
    let b = place_clones(Point::new(10.0, 10.0), 5, &opts, &mut Rng64::new(9));
    assert_eq!(a, b);
}

#[test]
fn tight_circle_is_relaxed_apart() {
    let opts = PlacementOpts {
        base_radius: 10.0,
        radius_jitter: 0.0,
        min_distance: 50.0,
        max_iterations: 50,
    };
    let p = place_clones(Point::ORIGIN, 4, &opts, &mut Rng64::new(3));
    assert!(p.passes > 0);
    assert!(p.converged);
    assert!(min_pairwise_distance(&p.positions).unwrap() >= 50.0 - 1e-6);
}

#[test]
fn coincident_points_are_split() {
    let opts = PlacementOpts {
        base_radius: 0.0,
        radius_jitter: 0.0,
        min_distance: 20.0,
        max_iterations: 30,
    };
    let p = place_clones(Point::new(5.0, 5.0), 2, &opts, &mut Rng64::new(0));
    assert!(min_pairwise_distance(&p.positions).unwrap() > 0.0);
}
