use super::*;

#[test]
fn never_exceeds_capacity_and_get_zero_is_newest() {
    let k = 8;
    let mut buf = FrameRingBuffer::new(k);
    for i in 0..(k + 5) {
        buf.push(i);
        assert!(buf.len() <= k);
    }
    assert_eq!(buf.len(), k);
    assert_eq!(buf.get(0), Some(&(k + 4)));
    assert_eq!(buf.oldest(), Some(&5));
}

#[test]
fn thirty_one_pushes_evict_the_first_frame() {
    let mut buf = FrameRingBuffer::new(30);
    for i in 1..=31 {
        buf.push(i);
    }
    assert_eq!(buf.get(29), Some(&2));
    assert!(buf.iter().all(|&f| f != 1));
}

#[test]
fn delay_beyond_depth_clamps_to_oldest() {
    let mut buf = FrameRingBuffer::new(4);
    for i in 0..10 {
        buf.push(i);
    }
    assert_eq!(buf.get(3), Some(&6));
    assert_eq!(buf.get(4), Some(&6));
    assert_eq!(buf.get(100), Some(&6));
}

#[test]
fn filling_buffer_reports_no_data_for_older_frames() {
    let mut buf = FrameRingBuffer::new(30);
    assert_eq!(buf.get(0), None);
    buf.push(1);
    buf.push(2);
    assert_eq!(buf.get(1), Some(&1));
    assert_eq!(buf.get(2), None);
    assert_eq!(buf.get(29), None);
    assert_eq!(buf.get(30), Some(&1));
}

#[test]
fn shrinking_discards_oldest_immediately() {
    let mut buf = FrameRingBuffer::new(10);
    for i in 0..10 {
        buf.push(i);
    }
    buf.set_capacity(3);
    assert_eq!(buf.capacity(), 3);
    assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![7, 8, 9]);

    buf.set_capacity(6);
    buf.push(10);
    assert_eq!(buf.len(), 4);
    assert_eq!(buf.get(0), Some(&10));
}

#[test]
fn push_copy_is_isolated_from_later_mutation() {
    let mut source = vec![1u8, 2, 3];
    let mut buf = FrameRingBuffer::new(2);
    buf.push_copy(&source);
    source[0] = 99;
    assert_eq!(buf.get(0), Some(&vec![1u8, 2, 3]));
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut buf = FrameRingBuffer::new(0);
    buf.push('a');
    buf.push('b');
    assert_eq!(buf.capacity(), 1);
    assert_eq!(buf.get(0), Some(&'b'));
}
