use super::*;

#[test]
fn canvas_clamps_points_into_bounds() {
    let c = Canvas::new(100, 50);
    assert_eq!(c.clamp_point(Point::new(-5.0, 20.0)), Point::new(0.0, 20.0));
    assert_eq!(c.clamp_point(Point::new(150.0, 80.0)), Point::new(100.0, 50.0));
    assert_eq!(c.clamp_point(Point::new(f64::NAN, 10.0)), Point::new(50.0, 10.0));
}

#[test]
fn canvas_with_zero_dimension_is_empty() {
    assert!(Canvas::new(0, 10).is_empty());
    assert!(Canvas::new(10, 0).is_empty());
    assert!(!Canvas::new(1, 1).is_empty());
}

#[test]
fn premul_from_straight_scales_color_by_alpha() {
    let c = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, 128);
    assert_eq!(c.g, 64);
    assert_eq!(c.b, 0);
    assert_eq!(Rgba8Premul::transparent().to_array(), [0, 0, 0, 0]);
}
