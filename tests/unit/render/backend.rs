use super::*;

#[test]
fn from_premul_rejects_length_mismatch() {
    assert!(FrameRGBA::from_premul(2, 2, vec![0; 15]).is_err());
    assert!(FrameRGBA::from_premul(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn from_straight_premultiplies() {
    let f = FrameRGBA::from_straight(1, 1, vec![255, 255, 255, 128]).unwrap();
    assert_eq!(f.pixel(0, 0), Some([128, 128, 128, 128]));
    let f = FrameRGBA::from_straight(1, 1, vec![90, 80, 70, 0]).unwrap();
    assert_eq!(f.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn readiness_requires_dimensions_and_matching_buffer() {
    assert!(!FrameRGBA::empty().is_ready());
    assert!(FrameRGBA::solid(3, 2, [1, 2, 3, 255]).is_ready());

    let mut broken = FrameRGBA::solid(3, 2, [1, 2, 3, 255]);
    broken.data.pop();
    assert!(!broken.is_ready());
}

#[test]
fn reset_to_resizes_and_clears() {
    let mut f = FrameRGBA::solid(2, 2, [255, 0, 0, 255]);
    f.reset_to(3, 1);
    assert_eq!(f.data.len(), 12);
    assert!(f.data.iter().all(|&b| b == 0));
    assert!(f.is_ready());
}

#[test]
fn cover_placement_stretches_to_surface() {
    let p = FramePlacement::cover(Canvas::new(320, 240), Canvas::new(640, 480));
    assert_eq!(p.transform * Point::new(320.0, 240.0), Point::new(640.0, 480.0));
    assert_eq!(p.clip, Rect::new(0.0, 0.0, 320.0, 240.0));
    assert_eq!(p.opacity, 1.0);
}
