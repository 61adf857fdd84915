//! Compiled timetabling problem.
//!
//! [`TimetableProblem`] is the engine-internal view of the domain model:
//! lecturers interned to indices, preference sets turned into index sets,
//! and the reservation table projected into `(slot, room)` index space so
//! the evaluator's hot path never hashes strings.
//!
//! Built once per run from validated input; read-only afterwards.

use std::collections::{HashMap, HashSet};

use crate::error::EngineError;
use crate::models::{Course, LecturerPreference, ReservationTable, Room, TimeSlot};
use crate::validation::validate_problem;

/// A course projected into engine index space.
#[derive(Debug, Clone)]
pub struct CompiledCourse {
    /// Course identifier.
    pub id: String,
    /// Course display name.
    pub name: String,
    /// Index into [`TimetableProblem::lecturers`].
    pub lecturer: usize,
    /// Credit-hour count.
    pub credit_hours: u32,
    /// Teaching duration in minutes.
    pub duration_min: u32,
}

/// The compiled, immutable problem a run operates on.
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    /// Courses in input order; gene `i` assigns `courses[i]`.
    pub courses: Vec<CompiledCourse>,
    /// Time slots in input order.
    pub slots: Vec<TimeSlot>,
    /// Rooms in input order.
    pub rooms: Vec<Room>,
    /// Interned lecturer identifiers.
    pub lecturers: Vec<String>,
    /// Per lecturer: preferred slot indices. Empty set = no stated preference.
    pub preferred: Vec<HashSet<usize>>,
    /// Per lecturer: blocked slot indices.
    pub blocked: Vec<HashSet<usize>>,
    /// ID-space reservation table (kept for reporting).
    pub reservations: ReservationTable,
    /// Reservation lookup in index space: `(slot, Some(room) | None)` → owner.
    reserved_index: HashMap<(usize, Option<usize>), usize>,
}

impl TimetableProblem {
    /// Validates and compiles the domain model.
    ///
    /// Fails fast with a configuration error on any referential problem;
    /// inter-lecturer reservation conflicts are *not* errors — they are
    /// collected on the reservation table and surfaced in the run result.
    pub fn compile(
        courses: &[Course],
        slots: &[TimeSlot],
        rooms: &[Room],
        preferences: &[LecturerPreference],
        minutes_per_credit: u32,
    ) -> Result<Self, EngineError> {
        validate_problem(courses, slots, rooms, preferences)?;

        let slot_index: HashMap<&str, usize> = slots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();
        let room_index: HashMap<&str, usize> = rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str(), i))
            .collect();

        // Intern lecturers: course order first, then preference-only entries.
        let mut lecturers: Vec<String> = Vec::new();
        let mut lecturer_of: HashMap<&str, usize> = HashMap::new();
        for course in courses {
            lecturer_of
                .entry(course.lecturer.as_str())
                .or_insert_with(|| {
                    lecturers.push(course.lecturer.clone());
                    lecturers.len() - 1
                });
        }
        for pref in preferences {
            lecturer_of.entry(pref.lecturer.as_str()).or_insert_with(|| {
                lecturers.push(pref.lecturer.clone());
                lecturers.len() - 1
            });
        }

        let compiled_courses = courses
            .iter()
            .map(|c| CompiledCourse {
                id: c.id.clone(),
                name: c.name.clone(),
                lecturer: lecturer_of[c.lecturer.as_str()],
                credit_hours: c.credit_hours,
                duration_min: c.duration_min(minutes_per_credit),
            })
            .collect();

        let mut preferred = vec![HashSet::new(); lecturers.len()];
        let mut blocked = vec![HashSet::new(); lecturers.len()];
        for pref in preferences {
            let l = lecturer_of[pref.lecturer.as_str()];
            for slot in &pref.preferred {
                preferred[l].insert(slot_index[slot.as_str()]);
            }
            for b in &pref.blocked {
                blocked[l].insert(slot_index[b.slot.as_str()]);
            }
        }

        let reservations = ReservationTable::build(preferences, rooms.len());
        let mut reserved_index = HashMap::new();
        for (key, reservation) in reservations.entries() {
            let slot = slot_index[key.slot.as_str()];
            let room = key.room.as_deref().map(|r| room_index[r]);
            reserved_index
                .entry((slot, room))
                .or_insert(lecturer_of[reservation.lecturer.as_str()]);
        }

        Ok(Self {
            courses: compiled_courses,
            slots: slots.to_vec(),
            rooms: rooms.to_vec(),
            lecturers,
            preferred,
            blocked,
            reservations,
            reserved_index,
        })
    }

    /// Lecturer index owning the reservation that covers `(slot, room)`,
    /// if any. A specific-room claim shadows an any-room claim.
    #[inline]
    pub fn reserved_owner(&self, slot: usize, room: usize) -> Option<usize> {
        self.reserved_index
            .get(&(slot, Some(room)))
            .or_else(|| self.reserved_index.get(&(slot, None)))
            .copied()
    }

    /// Whether `(slot, room)` is claimed by a lecturer other than `lecturer`.
    #[inline]
    pub fn reserved_for_other(&self, lecturer: usize, slot: usize, room: usize) -> bool {
        matches!(self.reserved_owner(slot, room), Some(owner) if owner != lecturer)
    }

    /// Number of genes per chromosome.
    #[inline]
    pub fn gene_count(&self) -> usize {
        self.courses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Day;

    fn small_problem() -> TimetableProblem {
        let courses = vec![
            Course::new("C1", "L1", 2),
            Course::new("C2", "L2", 3),
            Course::new("C3", "L1", 2),
        ];
        let slots = vec![
            TimeSlot::new("S1", Day::Monday, 480, 0),
            TimeSlot::new("S2", Day::Monday, 600, 1),
            TimeSlot::new("S3", Day::Tuesday, 480, 0),
        ];
        let rooms = vec![Room::new("R1", "101"), Room::new("R2", "102")];
        let prefs = vec![
            LecturerPreference::new("L1")
                .with_reserved("S1", Some("R1".into()), "research")
                .with_preferred("S2"),
            LecturerPreference::new("L2").with_blocked("S3", "off campus"),
        ];
        TimetableProblem::compile(&courses, &slots, &rooms, &prefs, 50).unwrap()
    }

    #[test]
    fn test_compile_interns_lecturers() {
        let problem = small_problem();
        assert_eq!(problem.lecturers, vec!["L1".to_string(), "L2".to_string()]);
        assert_eq!(problem.courses[0].lecturer, 0);
        assert_eq!(problem.courses[1].lecturer, 1);
        assert_eq!(problem.courses[2].lecturer, 0);
        assert_eq!(problem.courses[1].duration_min, 150);
    }

    #[test]
    fn test_reserved_owner_lookup() {
        let problem = small_problem();
        // S1 = slot 0, R1 = room 0, owned by L1 = lecturer 0.
        assert_eq!(problem.reserved_owner(0, 0), Some(0));
        assert_eq!(problem.reserved_owner(0, 1), None);
        assert!(problem.reserved_for_other(1, 0, 0));
        assert!(!problem.reserved_for_other(0, 0, 0));
    }

    #[test]
    fn test_preference_sets() {
        let problem = small_problem();
        assert!(problem.preferred[0].contains(&1));
        assert!(problem.blocked[1].contains(&2));
        assert!(problem.preferred[1].is_empty());
    }

    #[test]
    fn test_compile_rejects_invalid_input() {
        let err = TimetableProblem::compile(&[], &[], &[], &[], 50).unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }
}
