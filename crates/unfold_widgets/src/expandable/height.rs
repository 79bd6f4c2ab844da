//! Last visible height of the secondary view

/// Sentinel for "not measured yet"
pub const UNKNOWN_HEIGHT: f32 = -1.0;

/// Remembers the height the secondary view had when it was last fully shown,
/// so later expansions have a target without re-measuring.
#[derive(Clone, Copy, Debug)]
pub struct HeightTracker {
    last_visible: f32,
}

impl Default for HeightTracker {
    fn default() -> Self {
        Self {
            last_visible: UNKNOWN_HEIGHT,
        }
    }
}

impl HeightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a settled measurement.
    ///
    /// Ignored when an explicit height is configured or the value is negative.
    pub fn record_visible_height(&mut self, height: f32, configured: Option<f32>) -> bool {
        if configured.is_some() || height < 0.0 {
            return false;
        }
        self.last_visible = height;
        true
    }

    /// The stored height, or [`UNKNOWN_HEIGHT`]
    pub fn last_known(&self) -> f32 {
        self.last_visible
    }

    /// The full expanded height to measure transitions against
    pub fn reference(&self, configured: Option<f32>) -> f32 {
        configured.unwrap_or(self.last_visible)
    }

    pub fn invalidate(&mut self) {
        self.last_visible = UNKNOWN_HEIGHT;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unknown() {
        let tracker = HeightTracker::new();
        assert_eq!(tracker.last_known(), UNKNOWN_HEIGHT);
    }

    #[test]
    fn test_records_only_without_configured_height() {
        let mut tracker = HeightTracker::new();

        assert!(!tracker.record_visible_height(50.0, Some(120.0)));
        assert_eq!(tracker.last_known(), UNKNOWN_HEIGHT);

        assert!(tracker.record_visible_height(50.0, None));
        assert_eq!(tracker.last_known(), 50.0);
        assert_eq!(tracker.reference(None), 50.0);
        assert_eq!(tracker.reference(Some(120.0)), 120.0);
    }

    #[test]
    fn test_rejects_negative_and_invalidates() {
        let mut tracker = HeightTracker::new();
        tracker.record_visible_height(30.0, None);

        assert!(!tracker.record_visible_height(-1.0, None));
        assert_eq!(tracker.last_known(), 30.0);

        tracker.invalidate();
        assert_eq!(tracker.last_known(), UNKNOWN_HEIGHT);
    }
}
