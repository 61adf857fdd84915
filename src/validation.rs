//! Input validation for timetabling problems.
//!
//! Checks referential integrity of the problem description before the
//! search starts. Detects:
//! - Duplicate IDs
//! - Empty course/slot/room lists
//! - Non-positive credit hours
//! - Preference entries referencing unknown slots or rooms
//! - A lecturer's reserved and blocked sets intersecting
//!
//! All problems are collected and reported together; the engine converts
//! them into a single configuration error.

use std::collections::HashSet;

use crate::models::{Course, LecturerPreference, Room, TimeSlot};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A required entity list is empty.
    EmptyInput,
    /// A course has zero credit hours.
    InvalidCredits,
    /// A preference references a time slot that doesn't exist.
    UnknownTimeSlot,
    /// A preference references a room that doesn't exist.
    UnknownRoom,
    /// A lecturer both reserves and blocks the same time slot.
    ReservedBlockedOverlap,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(
    courses: &[Course],
    slots: &[TimeSlot],
    rooms: &[Room],
    preferences: &[LecturerPreference],
) -> ValidationResult {
    let mut errors = Vec::new();

    if courses.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "no courses to schedule",
        ));
    }
    if slots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "no time slots available",
        ));
    }
    if rooms.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInput,
            "no rooms available",
        ));
    }

    let mut course_ids = HashSet::new();
    for course in courses {
        if !course_ids.insert(course.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate course ID: {}", course.id),
            ));
        }
        if course.credit_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCredits,
                format!("Course '{}' has zero credit hours", course.id),
            ));
        }
    }

    let mut slot_ids = HashSet::new();
    for slot in slots {
        if !slot_ids.insert(slot.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate time slot ID: {}", slot.id),
            ));
        }
    }

    let mut room_ids = HashSet::new();
    for room in rooms {
        if !room_ids.insert(room.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", room.id),
            ));
        }
    }

    let mut seen_lecturers = HashSet::new();
    for pref in preferences {
        if !seen_lecturers.insert(pref.lecturer.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate preference table for lecturer '{}'", pref.lecturer),
            ));
        }

        for reserved in &pref.reserved {
            if !slot_ids.contains(reserved.slot.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTimeSlot,
                    format!(
                        "Lecturer '{}' reserves unknown time slot '{}'",
                        pref.lecturer, reserved.slot
                    ),
                ));
            }
            if let Some(room) = &reserved.room {
                if !room_ids.contains(room.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownRoom,
                        format!(
                            "Lecturer '{}' reserves unknown room '{}'",
                            pref.lecturer, room
                        ),
                    ));
                }
            }
        }

        for slot in &pref.preferred {
            if !slot_ids.contains(slot.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTimeSlot,
                    format!(
                        "Lecturer '{}' prefers unknown time slot '{}'",
                        pref.lecturer, slot
                    ),
                ));
            }
        }

        let blocked: HashSet<&str> = pref.blocked.iter().map(|b| b.slot.as_str()).collect();
        for b in &pref.blocked {
            if !slot_ids.contains(b.slot.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTimeSlot,
                    format!(
                        "Lecturer '{}' blocks unknown time slot '{}'",
                        pref.lecturer, b.slot
                    ),
                ));
            }
        }
        for reserved in &pref.reserved {
            if blocked.contains(reserved.slot.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ReservedBlockedOverlap,
                    format!(
                        "Lecturer '{}' both reserves and blocks time slot '{}'",
                        pref.lecturer, reserved.slot
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
