//! The live session buffer.
//!
//! [`SessionBuffer`] is the ordered sequence of observation points for the
//! monitoring session in progress. It is append-only within a session; the
//! optional cap turns it into a sliding window that drops the oldest points
//! (the live-dashboard variant), while the archival variant leaves it
//! unbounded so archives are complete.
//!
//! The buffer itself is not thread-safe; `ouedguard-store` wraps it in a
//! mutex and mirrors every mutation to durable storage.

use crate::observation::Observation;

/// Number of points the dashboard chart window shows by default.
pub const DEFAULT_RECENT_WINDOW: usize = 10;

/// Ordered observations for the session in progress.
#[derive(Debug, Clone)]
pub struct SessionBuffer {
    points: Vec<Observation>,
    started_at: String,
    cap: Option<usize>,
}

impl SessionBuffer {
    /// Create an empty buffer. `cap` of `None` is the unbounded archival
    /// variant; `Some(n)` keeps only the `n` most recent points.
    pub fn new(started_at: String, cap: Option<usize>) -> Self {
        Self {
            points: Vec::new(),
            started_at,
            cap,
        }
    }

    /// Rebuild a buffer from persisted state (session restore after a
    /// restart).
    pub fn from_parts(points: Vec<Observation>, started_at: String, cap: Option<usize>) -> Self {
        let mut buffer = Self {
            points,
            started_at,
            cap,
        };
        buffer.enforce_cap();
        buffer
    }

    /// Append one observation to the end.
    ///
    /// In the bounded variant the oldest entries are dropped to maintain
    /// the cap: a sliding window, not a circular buffer.
    pub fn append(&mut self, point: Observation) {
        self.points.push(point);
        self.enforce_cap();
    }

    /// Clear all observations and assign a fresh session start timestamp.
    pub fn reset(&mut self, started_at: String) {
        self.points.clear();
        self.started_at = started_at;
    }

    /// Immutable copy of the current points, suitable for archival.
    ///
    /// Does not clear the buffer; the archive flow uses [`drain`](Self::drain)
    /// so that snapshot and reset happen under one caller-held lock.
    pub fn snapshot(&self) -> Vec<Observation> {
        self.points.clone()
    }

    /// Take all points and reset in one step, returning the previous start
    /// timestamp and the drained points.
    pub fn drain(&mut self, new_start: String) -> (String, Vec<Observation>) {
        let start = std::mem::replace(&mut self.started_at, new_start);
        let points = std::mem::take(&mut self.points);
        (start, points)
    }

    /// Re-stamp the session start (used when the first observation of a
    /// fresh session arrives).
    pub fn set_started_at(&mut self, started_at: String) {
        self.started_at = started_at;
    }

    pub fn started_at(&self) -> &str {
        &self.started_at
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    /// The most recent `limit` points, in insertion order.
    pub fn recent(&self, limit: usize) -> &[Observation] {
        let skip = self.points.len().saturating_sub(limit);
        &self.points[skip..]
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn enforce_cap(&mut self) {
        if let Some(cap) = self.cap {
            if self.points.len() > cap {
                let overflow = self.points.len() - cap;
                self.points.drain(..overflow);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::FloodStatus;

    fn point(level: f64) -> Observation {
        Observation {
            time: "12:00:00".into(),
            level,
            status: FloodStatus::Normal,
            img: None,
            report: None,
        }
    }

    fn levels(buffer: &SessionBuffer) -> Vec<f64> {
        buffer.points().iter().map(|p| p.level).collect()
    }

    #[test]
    fn unbounded_buffer_keeps_everything_in_order() {
        let mut buffer = SessionBuffer::new("start".into(), None);
        for i in 0..50 {
            buffer.append(point(i as f64));
        }
        assert_eq!(buffer.len(), 50);
        assert_eq!(levels(&buffer), (0..50).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn bounded_buffer_holds_min_of_n_and_cap() {
        let cap = 10;
        for n in [3usize, 10, 17] {
            let mut buffer = SessionBuffer::new("start".into(), Some(cap));
            for i in 0..n {
                buffer.append(point(i as f64));
            }
            assert_eq!(buffer.len(), n.min(cap));
            // The earliest n-cap points are dropped; the rest stay in order.
            let expected: Vec<f64> = (n.saturating_sub(cap)..n).map(|i| i as f64).collect();
            assert_eq!(levels(&buffer), expected);
        }
    }

    #[test]
    fn from_parts_enforces_cap_on_restore() {
        let points: Vec<Observation> = (0..15).map(|i| point(i as f64)).collect();
        let buffer = SessionBuffer::from_parts(points, "start".into(), Some(10));
        assert_eq!(buffer.len(), 10);
        assert_eq!(levels(&buffer)[0], 5.0);
    }

    #[test]
    fn reset_clears_and_restamps() {
        let mut buffer = SessionBuffer::new("old".into(), None);
        buffer.append(point(1.0));
        buffer.reset("new".into());
        assert!(buffer.is_empty());
        assert_eq!(buffer.started_at(), "new");
    }

    #[test]
    fn snapshot_does_not_clear() {
        let mut buffer = SessionBuffer::new("start".into(), None);
        buffer.append(point(1.0));
        buffer.append(point(2.0));
        let copy = buffer.snapshot();
        assert_eq!(copy.len(), 2);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn drain_takes_points_and_old_start() {
        let mut buffer = SessionBuffer::new("old".into(), None);
        buffer.append(point(1.0));
        buffer.append(point(2.0));
        let (start, points) = buffer.drain("new".into());
        assert_eq!(start, "old");
        assert_eq!(points.len(), 2);
        assert!(buffer.is_empty());
        assert_eq!(buffer.started_at(), "new");
    }

    #[test]
    fn recent_returns_last_points_in_order() {
        let mut buffer = SessionBuffer::new("start".into(), None);
        for i in 0..5 {
            buffer.append(point(i as f64));
        }
        let recent: Vec<f64> = buffer.recent(3).iter().map(|p| p.level).collect();
        assert_eq!(recent, vec![2.0, 3.0, 4.0]);
        // Asking for more than exists returns everything.
        assert_eq!(buffer.recent(100).len(), 5);
    }
}
