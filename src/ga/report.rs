//! Result formatting and schedule reports.
//!
//! Turns the winning chromosome back into ID-space output: display rows in
//! day/time order, a per-reservation respect report, the list of still-free
//! `(slot, room)` pairs, and a ranked availability view per lecturer.

use serde::{Deserialize, Serialize};

use super::chromosome::Chromosome;
use super::fitness::FitnessRecord;
use super::problem::TimetableProblem;
use crate::models::Day;

/// Per-row issue flags, derived from the fitness record of the schedule
/// the row belongs to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RowFlags {
    /// The course shares a room-time or lecturer-time key with another.
    pub clash: bool,
    /// The course sits on a slot/room reserved for another lecturer.
    pub reservation_violation: bool,
    /// The course sits on a blocked or not-preferred slot.
    pub preference_issue: bool,
}

/// One scheduled course in display form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Course identifier.
    pub course_id: String,
    /// Course display name.
    pub course_name: String,
    /// Lecturer identifier.
    pub lecturer: String,
    /// Assigned time slot identifier.
    pub slot_id: String,
    /// Day of the assigned slot.
    pub day: Day,
    /// Start of the slot, minutes from midnight.
    pub start_min: u32,
    /// Teaching duration in minutes.
    pub duration_min: u32,
    /// Assigned room identifier.
    pub room_id: String,
    /// Assigned room display name.
    pub room_name: String,
    /// Issue flags for this row.
    pub flags: RowFlags,
}

/// Whether a lecturer's reservation ended up respected in the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatus {
    /// Owning lecturer.
    pub lecturer: String,
    /// Reserved slot identifier.
    pub slot_id: String,
    /// Reserved room, `None` for an any-room claim.
    pub room_id: Option<String>,
    /// Free-text reason given with the reservation.
    pub reason: String,
    /// True when no other lecturer's course occupies the reserved key.
    pub respected: bool,
}

/// A lecturer's usable slots, preferred ones first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerAvailability {
    /// Lecturer identifier.
    pub lecturer: String,
    /// Slot identifiers the lecturer could teach in, ranked.
    pub slots: Vec<String>,
}

/// Builds display rows for a schedule, ordered by day, start time, room.
pub fn schedule_rows(
    problem: &TimetableProblem,
    chromosome: &Chromosome,
    record: &FitnessRecord,
) -> Vec<ScheduleRow> {
    let mut rows: Vec<ScheduleRow> = chromosome
        .genes
        .iter()
        .enumerate()
        .map(|(idx, gene)| {
            let course = &problem.courses[idx];
            let slot = &problem.slots[gene.slot];
            let room = &problem.rooms[gene.room];
            ScheduleRow {
                course_id: course.id.clone(),
                course_name: course.name.clone(),
                lecturer: problem.lecturers[course.lecturer].clone(),
                slot_id: slot.id.clone(),
                day: slot.day,
                start_min: slot.start_min,
                duration_min: course.duration_min,
                room_id: room.id.clone(),
                room_name: room.name.clone(),
                flags: RowFlags {
                    clash: record.clash_genes.binary_search(&idx).is_ok(),
                    reservation_violation: record.reserved_genes.contains(&idx),
                    preference_issue: record.preference_genes.contains(&idx),
                },
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.day, a.start_min, &a.room_id).cmp(&(b.day, b.start_min, &b.room_id))
    });
    rows
}

/// Reports, per registered reservation, whether the schedule respects it.
///
/// An any-room reservation is respected only when *no* room on that slot
/// hosts another lecturer's course.
pub fn reservation_report(
    problem: &TimetableProblem,
    chromosome: &Chromosome,
) -> Vec<ReservationStatus> {
    let mut statuses: Vec<ReservationStatus> = problem
        .reservations
        .entries()
        .map(|(key, reservation)| {
            let violated = chromosome.genes.iter().enumerate().any(|(idx, gene)| {
                let lecturer = &problem.lecturers[problem.courses[idx].lecturer];
                if lecturer == &reservation.lecturer {
                    return false;
                }
                let slot_matches = problem.slots[gene.slot].id == key.slot;
                let room_matches = match &key.room {
                    Some(room) => &problem.rooms[gene.room].id == room,
                    None => true,
                };
                slot_matches && room_matches
            });
            ReservationStatus {
                lecturer: reservation.lecturer.clone(),
                slot_id: key.slot.clone(),
                room_id: key.room.clone(),
                reason: reservation.reason.clone(),
                respected: !violated,
            }
        })
        .collect();

    statuses.sort_by(|a, b| (&a.slot_id, &a.room_id).cmp(&(&b.slot_id, &b.room_id)));
    statuses
}

/// Lists `(slot_id, room_id)` pairs no course occupies, in day/time order.
pub fn free_slots(problem: &TimetableProblem, chromosome: &Chromosome) -> Vec<(String, String)> {
    let mut slot_order: Vec<usize> = (0..problem.slots.len()).collect();
    slot_order.sort_by_key(|&s| problem.slots[s].sort_key());

    let mut free = Vec::new();
    for &slot in &slot_order {
        for room in 0..problem.rooms.len() {
            let occupied = chromosome
                .genes
                .iter()
                .any(|g| g.slot == slot && g.room == room);
            if !occupied {
                free.push((
                    problem.slots[slot].id.clone(),
                    problem.rooms[room].id.clone(),
                ));
            }
        }
    }
    free
}

/// Ranks each lecturer's usable slots: preferred slots first, then the
/// rest in day/time order. Blocked slots and slots fully reserved for
/// someone else are excluded.
pub fn availability_ranking(problem: &TimetableProblem) -> Vec<LecturerAvailability> {
    let mut slot_order: Vec<usize> = (0..problem.slots.len()).collect();
    slot_order.sort_by_key(|&s| problem.slots[s].sort_key());

    (0..problem.lecturers.len())
        .map(|lecturer| {
            let usable = |&slot: &usize| {
                if problem.blocked[lecturer].contains(&slot) {
                    return false;
                }
                // Usable if at least one room on the slot is open to this
                // lecturer.
                (0..problem.rooms.len())
                    .any(|room| !problem.reserved_for_other(lecturer, slot, room))
            };

            let mut slots: Vec<usize> = slot_order
                .iter()
                .filter(|s| usable(s))
                .copied()
                .filter(|s| problem.preferred[lecturer].contains(s))
                .collect();
            slots.extend(
                slot_order
                    .iter()
                    .filter(|s| usable(s))
                    .copied()
                    .filter(|s| !problem.preferred[lecturer].contains(s)),
            );

            LecturerAvailability {
                lecturer: problem.lecturers[lecturer].clone(),
                slots: slots
                    .into_iter()
                    .map(|s| problem.slots[s].id.clone())
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::chromosome::Gene;
    use crate::ga::config::PenaltyWeights;
    use crate::ga::fitness::Evaluator;
    use crate::models::{Course, LecturerPreference, Room, TimeSlot};

    fn problem(prefs: Vec<LecturerPreference>) -> TimetableProblem {
        let courses = vec![
            Course::new("C1", "L1", 2).with_name("Algorithms"),
            Course::new("C2", "L2", 3).with_name("Databases"),
        ];
        let slots = vec![
            TimeSlot::new("S1", Day::Monday, 480, 0),
            TimeSlot::new("S2", Day::Monday, 600, 1),
            TimeSlot::new("S3", Day::Tuesday, 480, 0),
        ];
        let rooms = vec![
            Room::new("R1", "101"),
            Room::new("R2", "102"),
        ];
        TimetableProblem::compile(&courses, &slots, &rooms, &prefs, 50).unwrap()
    }

    fn chromosome(genes: &[(usize, usize)]) -> Chromosome {
        Chromosome {
            genes: genes.iter().map(|&(slot, room)| Gene { slot, room }).collect(),
        }
    }

    #[test]
    fn test_rows_ordered_by_day_and_time() {
        let problem = problem(vec![]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        // C1 on Tuesday, C2 on Monday: rows must come back Monday first.
        let ch = chromosome(&[(2, 0), (0, 1)]);
        let record = evaluator.evaluate(&ch);

        let rows = schedule_rows(&problem, &ch, &record);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].course_id, "C2");
        assert_eq!(rows[0].day, Day::Monday);
        assert_eq!(rows[0].duration_min, 150);
        assert_eq!(rows[1].course_id, "C1");
        assert!(!rows[0].flags.clash);
    }

    #[test]
    fn test_rows_flag_issues() {
        let prefs = vec![LecturerPreference::new("L2").with_reserved("S1", None, "meeting")];
        let problem = problem(prefs);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        // C1 (L1) violates L2's reservation on S1.
        let ch = chromosome(&[(0, 0), (1, 0)]);
        let record = evaluator.evaluate(&ch);

        let rows = schedule_rows(&problem, &ch, &record);
        let c1 = rows.iter().find(|r| r.course_id == "C1").unwrap();
        assert!(c1.flags.reservation_violation);
        let c2 = rows.iter().find(|r| r.course_id == "C2").unwrap();
        assert!(!c2.flags.reservation_violation);
    }

    #[test]
    fn test_reservation_report_respected_and_violated() {
        let prefs = vec![LecturerPreference::new("L2")
            .with_reserved("S1", None, "meeting")
            .with_reserved("S3", Some("R1".into()), "lab")];
        let problem = problem(prefs);

        // C1 (L1) sits on S1: violates the any-room claim. S3/R1 is free.
        let ch = chromosome(&[(0, 0), (1, 0)]);
        let report = reservation_report(&problem, &ch);
        assert_eq!(report.len(), 2);

        let any_room = report.iter().find(|s| s.slot_id == "S1").unwrap();
        assert!(!any_room.respected);
        assert_eq!(any_room.room_id, None);

        let lab = report.iter().find(|s| s.slot_id == "S3").unwrap();
        assert!(lab.respected);
        assert_eq!(lab.room_id.as_deref(), Some("R1"));
    }

    #[test]
    fn test_owner_use_does_not_violate_reservation() {
        let prefs = vec![LecturerPreference::new("L1").with_reserved("S1", Some("R1".into()), "seminar")];
        let problem = problem(prefs);
        // C1 is L1's own course on the reserved pair.
        let ch = chromosome(&[(0, 0), (1, 1)]);
        let report = reservation_report(&problem, &ch);
        assert!(report[0].respected);
    }

    #[test]
    fn test_free_slots_excludes_occupied_pairs() {
        let problem = problem(vec![]);
        let ch = chromosome(&[(0, 0), (2, 1)]);
        let free = free_slots(&problem, &ch);

        // 3 slots × 2 rooms, 2 occupied.
        assert_eq!(free.len(), 4);
        assert!(!free.contains(&("S1".into(), "R1".into())));
        assert!(!free.contains(&("S3".into(), "R2".into())));
        // Day/time ordering: Monday pairs before Tuesday pairs.
        assert_eq!(free[0], ("S1".into(), "R2".into()));
    }

    #[test]
    fn test_availability_ranking_preferred_first() {
        let prefs = vec![
            LecturerPreference::new("L1")
                .with_preferred("S3")
                .with_blocked("S2", "admin"),
            LecturerPreference::new("L2").with_reserved("S1", None, "meeting"),
        ];
        let problem = problem(prefs);
        let ranking = availability_ranking(&problem);

        let l1 = ranking.iter().find(|a| a.lecturer == "L1").unwrap();
        // S1 is reserved for L2 (any room), S2 blocked: only S3 remains,
        // and it is preferred.
        assert_eq!(l1.slots, vec!["S3".to_string()]);

        let l2 = ranking.iter().find(|a| a.lecturer == "L2").unwrap();
        // L2 keeps its own reserved slot.
        assert_eq!(l2.slots, vec!["S1".to_string(), "S2".to_string(), "S3".to_string()]);
    }
}
