//! Time slot model.
//!
//! Time slots form an ordered finite grid: each slot belongs to a weekday
//! and starts at a fixed minute-of-day. Slots are globally ordered by
//! `(day, start)`.

use serde::{Deserialize, Serialize};

/// Weekday of a time slot.
///
/// The derived `Ord` follows declaration order (Monday first), which is
/// what the global slot ordering relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All weekdays in order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];
}

/// A schedulable time slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: String,
    /// Weekday this slot falls on.
    pub day: Day,
    /// Start time as minutes since midnight.
    pub start_min: u32,
    /// Position of this slot within its day (0-based).
    pub day_index: u32,
}

impl TimeSlot {
    /// Creates a new time slot.
    pub fn new(id: impl Into<String>, day: Day, start_min: u32, day_index: u32) -> Self {
        Self {
            id: id.into(),
            day,
            start_min,
            day_index,
        }
    }

    /// Global ordering key: `(day, start)`.
    #[inline]
    pub fn sort_key(&self) -> (Day, u32) {
        (self.day, self.start_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_ordering() {
        assert!(Day::Monday < Day::Friday);
        assert_eq!(Day::ALL.len(), 5);
    }

    #[test]
    fn test_sort_key() {
        let mon_late = TimeSlot::new("S1", Day::Monday, 600, 1);
        let mon_early = TimeSlot::new("S2", Day::Monday, 480, 0);
        let tue = TimeSlot::new("S3", Day::Tuesday, 480, 0);
        assert!(mon_early.sort_key() < mon_late.sort_key());
        assert!(mon_late.sort_key() < tue.sort_key());
    }
}
