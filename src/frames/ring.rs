use std::collections::VecDeque;

/// Default number of frames of history retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Fixed-capacity FIFO of past frames, addressed by how many frames behind the newest they are.
///
/// `get(0)` is the newest frame. Pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct FrameRingBuffer<T> {
    frames: VecDeque<T>,
    capacity: usize,
}

impl<T> Default for FrameRingBuffer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<T> FrameRingBuffer<T> {
    /// Create a buffer holding at most `capacity` frames (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    /// Append the newest frame, evicting the oldest when over capacity.
    pub fn push(&mut self, frame: T) {
        if self.frames.len() >= self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Frame `delay` steps behind the newest.
    ///
    /// - `delay < len`: the exact frame.
    /// - `delay >= capacity`: the request exceeds the buffer depth and clamps to the oldest frame.
    /// - otherwise the buffer is still filling and has no frame that old yet: `None`.
    pub fn get(&self, delay: usize) -> Option<&T> {
        let len = self.frames.len();
        if len == 0 {
            return None;
        }
        if delay < len {
            return self.frames.get(len - 1 - delay);
        }
        if delay >= self.capacity {
            return self.frames.front();
        }
        None
    }

    pub fn newest(&self) -> Option<&T> {
        self.frames.back()
    }

    pub fn oldest(&self) -> Option<&T> {
        self.frames.front()
    }

    /// Change capacity at runtime. Shrinking drops the oldest excess frames immediately.
    pub fn set_capacity(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if capacity == self.capacity {
            return;
        }
        let excess = self.frames.len().saturating_sub(capacity);
        if excess > 0 {
            self.frames.drain(..excess);
        }
        self.frames.shrink_to(capacity);
        tracing::debug!(
            from = self.capacity,
            to = capacity,
            dropped = excess,
            "frame history capacity changed"
        );
        self.capacity = capacity;
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Frames from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.frames.iter()
    }
}

impl<T: Clone> FrameRingBuffer<T> {
    /// Push a defensive copy of `frame` so later mutation of the source cannot rewrite history.
    pub fn push_copy(&mut self, frame: &T) {
        self.push(frame.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/ring.rs"]
mod tests;
