mod texture;

pub use texture::Texture;

use std::time::{Duration, Instant};

/// Paces the game loop with a fixed delay between the end of one frame and
/// the start of the next. At most one frame is requested at a time.
pub struct FrameClock {
    delay: Duration,
    next_frame: Instant,
    requested: bool,
}

impl FrameClock {
    pub fn new(delay: Duration) -> Self {
        Self::starting_at(delay, Instant::now())
    }

    pub fn starting_at(delay: Duration, now: Instant) -> Self {
        Self {
            delay,
            next_frame: now,
            requested: false,
        }
    }

    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Claims the due frame. Returns `false` while an earlier request has not
    /// been drawn yet.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.requested || !self.is_due(now) {
            return false;
        }
        self.requested = true;
        true
    }

    /// When the loop should wake next, or `None` while waiting on a
    /// requested frame.
    #[must_use]
    pub fn next_wake(&self) -> Option<Instant> {
        (!self.requested).then_some(self.next_frame)
    }

    /// Call once a frame finished; the next one is due `delay` later.
    pub fn frame_done(&mut self, now: Instant) {
        self.next_frame = now + self.delay;
        self.requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_due_immediately() {
        let now = Instant::now();
        let clock = FrameClock::starting_at(Duration::from_millis(50), now);
        assert!(clock.is_due(now));
    }

    #[test]
    fn test_delay_after_frame() {
        let now = Instant::now();
        let mut clock = FrameClock::starting_at(Duration::from_millis(50), now);
        clock.frame_done(now);

        assert!(!clock.is_due(now + Duration::from_millis(49)));
        assert!(clock.is_due(now + Duration::from_millis(50)));
        assert_eq!(clock.next_wake(), Some(now + Duration::from_millis(50)));
    }

    #[test]
    fn test_one_request_until_frame_done() {
        let now = Instant::now();
        let mut clock = FrameClock::starting_at(Duration::from_millis(50), now);

        assert!(clock.request(now));
        assert_eq!(clock.next_wake(), None);

        // Redraw held back by the platform: nothing more to wait for
        let later = now + Duration::from_secs(1);
        assert!(clock.is_due(later));
        assert!(!clock.request(later));
        assert_eq!(clock.next_wake(), None);

        clock.frame_done(later);
        assert_eq!(clock.next_wake(), Some(later + Duration::from_millis(50)));
        assert!(!clock.request(later));
        assert!(clock.request(later + Duration::from_millis(50)));
    }
}
