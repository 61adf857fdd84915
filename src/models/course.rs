//! Course model.
//!
//! A course is one teaching unit to be placed into a (time slot, room)
//! pair. Its duration is derived from its credit-hour count and the
//! configured minutes-per-credit constant.

use serde::{Deserialize, Serialize};

/// A course to be scheduled.
///
/// Immutable for the duration of a run. The lecturer is fixed per course;
/// the engine only decides the (time slot, room) assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Identifier of the lecturer teaching this course.
    pub lecturer: String,
    /// Credit-hour count (positive).
    pub credit_hours: u32,
}

impl Course {
    /// Creates a new course.
    pub fn new(id: impl Into<String>, lecturer: impl Into<String>, credit_hours: u32) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            lecturer: lecturer.into(),
            credit_hours,
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Teaching duration in minutes for the given minutes-per-credit constant.
    #[inline]
    pub fn duration_min(&self, minutes_per_credit: u32) -> u32 {
        self.credit_hours * minutes_per_credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let course = Course::new("C1", "L1", 3).with_name("Algorithms");
        assert_eq!(course.duration_min(50), 150);
        assert_eq!(course.name, "Algorithms");
    }
}
