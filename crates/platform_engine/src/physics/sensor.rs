//! Sensor occupancy counting

/// Number of shapes currently overlapping one sensor shape.
///
/// Clamped at zero: an unmatched end-touch is logged and ignored, so a
/// later begin-touch always reads as "in collision".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sensor {
    count: u32,
}

impl Sensor {
    /// Create an empty sensor
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a begin-touch
    pub fn begin_touch(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Record an end-touch
    pub fn end_touch(&mut self) {
        if self.count == 0 {
            log::warn!("Sensor end-touch without matching begin-touch");
            return;
        }
        self.count -= 1;
    }

    /// Current overlap count
    pub fn count(&self) -> u32 {
        self.count
    }

    /// True while anything overlaps
    pub fn in_collision(&self) -> bool {
        self.count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_tracks_begins_minus_ends() {
        let sequence = [true, true, false, true, false, false, true];
        let mut sensor = Sensor::new();
        let mut expected = 0;
        for begin in sequence {
            if begin {
                sensor.begin_touch();
                expected += 1;
            } else {
                sensor.end_touch();
                expected -= 1;
            }
            assert_eq!(sensor.count(), expected);
            assert_eq!(sensor.in_collision(), expected > 0);
        }
    }

    #[test]
    fn test_unmatched_end_clamps_at_zero() {
        let mut sensor = Sensor::new();
        sensor.end_touch();
        sensor.end_touch();
        assert_eq!(sensor.count(), 0);
        assert!(!sensor.in_collision());

        sensor.begin_touch();
        assert!(sensor.in_collision());
    }
}
