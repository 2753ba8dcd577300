use std::time::Duration;

/// Fixed-interval timer advanced by simulation time. Stopping it discards
/// any partial interval.
#[derive(Debug, Clone)]
pub(crate) struct RepeatTimer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl RepeatTimer {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    pub(crate) fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.elapsed = Duration::ZERO;
        }
    }

    pub(crate) fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    /// Returns how many intervals elapsed during `dt`.
    pub(crate) fn tick(&mut self, dt: Duration) -> u32 {
        if !self.running || self.interval.is_zero() {
            return 0;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

/// One-shot deferred action. Holds at most one pending action; scheduling
/// again replaces the previous one.
#[derive(Debug, Clone)]
pub(crate) struct PendingTimer<T> {
    pending: Option<(Duration, T)>,
}

impl<T> Default for PendingTimer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> PendingTimer<T> {
    /// Returns the action that was displaced, if any.
    pub(crate) fn schedule(&mut self, delay: Duration, action: T) -> Option<T> {
        self.pending
            .replace((delay, action))
            .map(|(_, previous)| previous)
    }

    pub(crate) fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, action)| action)
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Advances time; yields the action once its delay has fully elapsed.
    pub(crate) fn tick(&mut self, dt: Duration) -> Option<T> {
        let (remaining, _) = self.pending.as_mut()?;
        *remaining = remaining.saturating_sub(dt);
        if remaining.is_zero() {
            self.pending.take().map(|(_, action)| action)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn repeat_timer_fires_per_interval() {
        let mut timer = RepeatTimer::new(ms(100));
        assert_eq!(timer.tick(ms(500)), 0);

        timer.start();
        assert_eq!(timer.tick(ms(60)), 0);
        assert_eq!(timer.tick(ms(60)), 1);
        assert_eq!(timer.tick(ms(250)), 2);
    }

    #[test]
    fn stopping_discards_partial_interval() {
        let mut timer = RepeatTimer::new(ms(100));
        timer.start();
        timer.tick(ms(90));
        timer.stop();
        timer.start();

        assert_eq!(timer.tick(ms(90)), 0);
        assert_eq!(timer.tick(ms(10)), 1);
    }

    #[test]
    fn start_while_running_keeps_phase() {
        let mut timer = RepeatTimer::new(ms(100));
        timer.start();
        timer.tick(ms(90));
        timer.start();
        assert_eq!(timer.tick(ms(10)), 1);
    }

    #[test]
    fn pending_timer_fires_once_after_delay() {
        let mut timer = PendingTimer::default();
        timer.schedule(ms(1000), "opponent_turn");

        assert_eq!(timer.tick(ms(999)), None);
        assert!(timer.is_pending());
        assert_eq!(timer.tick(ms(1)), Some("opponent_turn"));
        assert_eq!(timer.tick(ms(1000)), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn scheduling_replaces_previous_action() {
        let mut timer = PendingTimer::default();
        assert_eq!(timer.schedule(ms(1000), 1), None);
        assert_eq!(timer.schedule(ms(2000), 2), Some(1));

        assert_eq!(timer.tick(ms(1500)), None);
        assert_eq!(timer.tick(ms(500)), Some(2));
    }

    #[test]
    fn cancel_drops_pending_action() {
        let mut timer = PendingTimer::default();
        timer.schedule(ms(10), 'x');
        assert_eq!(timer.cancel(), Some('x'));
        assert_eq!(timer.tick(ms(100)), None);
    }
}
