use super::*;

fn close(a: [u8; 4], b: [u8; 4], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

#[test]
fn clear_fills_the_whole_surface() {
    let mut s = CpuSurface::new(Canvas::new(16, 8)).unwrap();
    s.clear([10, 20, 30, 255]);
    let out = s.finish();
    assert_eq!((out.width, out.height), (16, 8));
    assert_eq!(out.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(out.pixel(15, 7), Some([10, 20, 30, 255]));
}

#[test]
fn cover_frame_replaces_background() {
    let mut s = CpuSurface::new(Canvas::new(32, 32)).unwrap();
    s.clear([0, 0, 0, 255]);
    let frame = FrameRGBA::solid(8, 8, [0, 0, 255, 255]);
    s.draw_frame(&frame, &FramePlacement::cover(frame.canvas(), s.canvas()));
    let out = s.finish();
    assert!(close(out.pixel(16, 16).unwrap(), [0, 0, 255, 255], 1));
    assert!(close(out.pixel(2, 30).unwrap(), [0, 0, 255, 255], 1));
}

#[test]
fn clip_limits_drawing_to_the_reveal_slice() {
    let mut s = CpuSurface::new(Canvas::new(32, 32)).unwrap();
    s.clear([0, 0, 0, 255]);
    let frame = FrameRGBA::solid(32, 32, [255, 255, 255, 255]);
    let placement = FramePlacement {
        transform: Affine::IDENTITY,
        clip: Rect::new(0.0, 16.0, 32.0, 32.0),
        opacity: 1.0,
    };
    s.draw_frame(&frame, &placement);
    let out = s.finish();
    assert!(close(out.pixel(16, 4).unwrap(), [0, 0, 0, 255], 1));
    assert!(close(out.pixel(16, 28).unwrap(), [255, 255, 255, 255], 1));
}

#[test]
fn opacity_blends_with_what_is_below() {
    let mut s = CpuSurface::new(Canvas::new(8, 8)).unwrap();
    s.clear([0, 0, 0, 255]);
    let frame = FrameRGBA::solid(8, 8, [255, 255, 255, 255]);
    let mut placement = FramePlacement::cover(frame.canvas(), s.canvas());
    placement.opacity = 0.5;
    s.draw_frame(&frame, &placement);
    let px = s.finish().pixel(4, 4).unwrap();
    assert!(px[0].abs_diff(128) <= 3, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn invisible_draws_are_skipped() {
    let mut s = CpuSurface::new(Canvas::new(8, 8)).unwrap();
    s.clear([0, 0, 0, 255]);
    let frame = FrameRGBA::solid(8, 8, [255, 255, 255, 255]);
    let mut placement = FramePlacement::cover(frame.canvas(), s.canvas());
    placement.opacity = 0.0;
    s.draw_frame(&frame, &placement);
    placement.opacity = 1.0;
    placement.clip = Rect::new(0.0, 8.0, 8.0, 8.0);
    s.draw_frame(&frame, &placement);
    s.fill_circle(Point::new(4.0, 4.0), 0.0, [255, 0, 0, 255], 1.0);
    assert_eq!(s.finish().pixel(4, 4), Some([0, 0, 0, 255]));
}

#[test]
fn circles_paint_their_center() {
    let mut s = CpuSurface::new(Canvas::new(32, 32)).unwrap();
    s.clear([0, 0, 0, 255]);
    s.fill_circle(Point::new(16.0, 16.0), 6.0, [255, 0, 0, 255], 1.0);
    let out = s.finish();
    assert!(close(out.pixel(16, 16).unwrap(), [255, 0, 0, 255], 1));
    assert_eq!(out.pixel(1, 1), Some([0, 0, 0, 255]));
}

#[test]
fn transform_state_does_not_leak_between_draws() {
    let mut s = CpuSurface::new(Canvas::new(32, 32)).unwrap();
    s.clear([0, 0, 0, 255]);
    let small = FrameRGBA::solid(4, 4, [0, 255, 0, 255]);
    s.draw_frame(
        &small,
        &FramePlacement {
            transform: Affine::translate((20.0, 20.0)),
            clip: small.canvas().rect(),
            opacity: 1.0,
        },
    );
    // Drawn in surface space; would land at (22, 22) if the translate leaked.
    s.fill_circle(Point::new(4.0, 4.0), 2.5, [255, 0, 0, 255], 1.0);
    let out = s.finish();
    assert!(close(out.pixel(22, 22).unwrap(), [0, 255, 0, 255], 1));
    assert!(close(out.pixel(4, 4).unwrap(), [255, 0, 0, 255], 1));
}

#[test]
fn invalid_sizes_are_rejected() {
    assert!(CpuSurface::new(Canvas::new(0, 10)).is_err());
    assert!(CpuSurface::new(Canvas::new(70_000, 10)).is_err());
    let mut s = CpuSurface::new(Canvas::new(4, 4)).unwrap();
    assert!(s.resize(Canvas::new(0, 4)).is_err());
    s.resize(Canvas::new(6, 5)).unwrap();
    s.clear([1, 2, 3, 255]);
    let out = s.finish();
    assert_eq!((out.width, out.height), (6, 5));
}
