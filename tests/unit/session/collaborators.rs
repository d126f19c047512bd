use super::*;

fn mask(v: u8) -> SegmentationMask {
    SegmentationMask::new(1, 1, vec![v]).unwrap()
}

#[test]
fn frame_sources_report_readiness() {
    let ready = FrameRGBA::solid(4, 3, [0, 0, 0, 255]);
    assert_eq!(ready.dimensions(), Some(Canvas::new(4, 3)));
    assert!(ready.current_frame().is_some());

    let empty = FrameRGBA::empty();
    assert_eq!(empty.dimensions(), None);
    assert!(empty.current_frame().is_none());

    let none: Option<FrameRGBA> = None;
    assert_eq!(none.dimensions(), None);
    assert_eq!(Some(ready.clone()).dimensions(), Some(Canvas::new(4, 3)));
}

#[test]
fn shared_mask_starts_empty_and_tracks_publications() {
    let publisher = SharedMask::new();
    let mut reader = publisher.clone();
    assert!(reader.latest_mask().unwrap().is_none());

    publisher.publish(mask(7)).unwrap();
    assert_eq!(reader.latest_mask().unwrap().unwrap().alpha(), &[7]);

    publisher.publish(mask(9)).unwrap();
    assert_eq!(reader.latest_mask().unwrap().unwrap().alpha(), &[9]);

    publisher.retract().unwrap();
    assert!(reader.latest_mask().unwrap().is_none());
}

#[test]
fn reader_does_not_block_while_publisher_holds_the_lock() {
    let publisher = SharedMask::new();
    let mut reader = publisher.clone();
    publisher.publish(mask(3)).unwrap();
    assert!(reader.latest_mask().unwrap().is_some());

    let guard = publisher.slot.lock().unwrap();
    assert_eq!(reader.latest_mask().unwrap().unwrap().alpha(), &[3]);
    drop(guard);
}

#[test]
fn publishing_from_another_thread_is_visible() {
    let publisher = SharedMask::new();
    let mut reader = publisher.clone();
    std::thread::spawn(move || publisher.publish(mask(200)).unwrap())
        .join()
        .unwrap();
    assert_eq!(reader.latest_mask().unwrap().unwrap().alpha(), &[200]);
}
