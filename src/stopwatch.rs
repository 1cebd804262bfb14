//! Solve timer shown next to the puzzle.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub(crate) struct Stopwatch {
    started: Option<Instant>,
}

impl Stopwatch {
    pub(crate) fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Starts a stopped watch, or stops and clears a running one.
    pub(crate) fn toggle(&mut self, now: Instant) {
        self.started = match self.started {
            Some(_) => None,
            None => Some(now),
        };
    }

    pub(crate) fn reset(&mut self) {
        self.started = None;
    }

    pub(crate) fn elapsed(&self, now: Instant) -> Duration {
        self.started
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }
}

/// `mm:ss`, minutes keep counting past 59.
pub(crate) fn format_clock(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_between_running_and_cleared() {
        let t0 = Instant::now();
        let mut watch = Stopwatch::default();
        assert_eq!(watch.elapsed(t0), Duration::ZERO);

        watch.toggle(t0);
        assert!(watch.is_running());
        assert_eq!(watch.elapsed(t0 + Duration::from_secs(75)), Duration::from_secs(75));

        watch.toggle(t0 + Duration::from_secs(80));
        assert!(!watch.is_running());
        assert_eq!(watch.elapsed(t0 + Duration::from_secs(90)), Duration::ZERO);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_millis(61_900)), "01:01");
        assert_eq!(format_clock(Duration::from_secs(3600)), "60:00");
    }
}
