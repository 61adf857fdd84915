//! Timetabling domain models.
//!
//! Provides the immutable problem description for a run: courses,
//! time slots, rooms, and per-lecturer preference tables. All types
//! are plain serde-derived records — the evolutionary engine in
//! [`crate::ga`] never mutates them.

mod course;
mod preference;
mod room;
mod timeslot;

pub use course::Course;
pub use preference::{
    BlockedSlot, LecturerPreference, Reservation, ReservationConflict, ReservationKey,
    ReservationTable, ReservedSlot,
};
pub use room::Room;
pub use timeslot::{Day, TimeSlot};
