use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u32);

impl Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub id: TimerId,
    pub elapsed: u64,
    pub running: bool,
    pub color: String,
}

impl Timer {
    pub fn new(id: TimerId, color: String) -> Self {
        Self {
            id,
            elapsed: 0,
            running: false,
            color,
        }
    }

    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed)
    }
}

/// `MM:SS`, minutes are not capped at 59.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(59), "00:59");
        assert_eq!(format_elapsed(65), "01:05");
        assert_eq!(format_elapsed(3599), "59:59");
    }

    #[test]
    fn minutes_keep_growing_past_an_hour() {
        assert_eq!(format_elapsed(3600), "60:00");
        assert_eq!(format_elapsed(6000 * 60 + 7), "6000:07");
    }

    #[test]
    fn new_timer_starts_paused_at_zero() {
        let timer = Timer::new(TimerId(4), "red".into());
        assert_eq!(timer.elapsed, 0);
        assert!(!timer.running);
        assert_eq!(timer.formatted(), "00:00");
        assert_eq!(timer.id.to_string(), "4");
    }
}
