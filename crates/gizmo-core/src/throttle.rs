//! Leading-edge throttle gate for drag-event delivery

use std::time::{Duration, Instant};

/// Leading-edge throttle.
///
/// The first admitted event opens a cooldown window; events arriving inside
/// the window are dropped, not queued. Once the window elapses the next
/// event is admitted immediately and re-arms the window. There is no
/// trailing delivery.
#[derive(Debug)]
pub struct LeadingEdgeThrottle {
    window: Duration,
    ready_at: Option<Instant>,
}

impl LeadingEdgeThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            ready_at: None,
        }
    }

    /// Returns true if an event arriving at `now` should be delivered.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.ready_at {
            Some(ready_at) if now < ready_at => false,
            _ => {
                self.ready_at = Some(now + self.window);
                true
            }
        }
    }

    /// Forgets the current window; the next event is delivered immediately.
    pub fn reset(&mut self) {
        self.ready_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(100);

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn test_burst_within_window_delivers_once() {
        let base = Instant::now();
        let mut throttle = LeadingEdgeThrottle::new(WINDOW);

        let admitted: Vec<bool> = [0, 10, 20, 30, 40]
            .iter()
            .map(|ms| throttle.admit(at(base, *ms)))
            .collect();

        assert_eq!(admitted, vec![true, false, false, false, false]);
    }

    #[test]
    fn test_event_after_window_is_delivered_again() {
        let base = Instant::now();
        let mut throttle = LeadingEdgeThrottle::new(WINDOW);

        assert!(throttle.admit(at(base, 0)));
        assert!(!throttle.admit(at(base, 40)));
        assert!(throttle.admit(at(base, 150)));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let base = Instant::now();
        let mut throttle = LeadingEdgeThrottle::new(WINDOW);

        assert!(throttle.admit(at(base, 0)));
        assert!(!throttle.admit(at(base, 99)));
        assert!(throttle.admit(at(base, 100)));
    }

    #[test]
    fn test_dropped_events_do_not_extend_window() {
        let base = Instant::now();
        let mut throttle = LeadingEdgeThrottle::new(WINDOW);

        assert!(throttle.admit(at(base, 0)));
        // A steady stream of drops must not push the deadline out.
        for ms in (10..100).step_by(10) {
            assert!(!throttle.admit(at(base, ms)));
        }
        assert!(throttle.admit(at(base, 100)));
    }

    #[test]
    fn test_delivery_rearms_the_window() {
        let base = Instant::now();
        let mut throttle = LeadingEdgeThrottle::new(WINDOW);

        assert!(throttle.admit(at(base, 0)));
        assert!(throttle.admit(at(base, 120)));
        // The second delivery opened a fresh window ending at 220.
        assert!(!throttle.admit(at(base, 190)));
        assert!(throttle.admit(at(base, 220)));
    }

    #[test]
    fn test_reset_reopens_delivery() {
        let base = Instant::now();
        let mut throttle = LeadingEdgeThrottle::new(WINDOW);

        assert!(throttle.admit(at(base, 0)));
        throttle.reset();
        assert!(throttle.admit(at(base, 10)));
    }
}
