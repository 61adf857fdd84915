//! Constraint-aware fitness evaluation.
//!
//! For each individual the evaluator runs one O(n) grouping pass per clash
//! dimension — genes hashed by `(slot, room)` and by `(slot, lecturer)` —
//! plus per-gene reservation and preference checks. The weighted penalty
//! folds into the scalar fitness `1 / (1 + penalty)`, so fitness is 1.0
//! exactly when the penalty is zero.
//!
//! Hard success means no reservation violations and no clashes; remaining
//! soft preference penalties do not block it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::chromosome::Chromosome;
use super::config::PenaltyWeights;
use super::problem::TimetableProblem;

/// Per-individual evaluation result.
///
/// Recomputed every generation and replaced wholesale, never patched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessRecord {
    /// Number of room-time clashes (extra genes per occupied key).
    pub room_clashes: usize,
    /// Number of lecturer-time clashes.
    pub lecturer_clashes: usize,
    /// Number of reservation violations.
    pub reservation_violations: usize,
    /// Number of blocked-slot violations.
    pub blocked_violations: usize,
    /// Number of not-preferred soft violations.
    pub not_preferred_violations: usize,
    /// Gene indices involved in any room-time or lecturer-time clash.
    pub clash_genes: Vec<usize>,
    /// Gene indices violating a reservation.
    pub reserved_genes: Vec<usize>,
    /// Gene indices on a blocked or not-preferred slot.
    pub preference_genes: Vec<usize>,
    /// Total weighted penalty.
    pub penalty: f64,
    /// Scalar fitness in `(0, 1]`.
    pub fitness: f64,
}

impl FitnessRecord {
    /// No reservation violations and no clashes of either kind.
    #[inline]
    pub fn hard_success(&self) -> bool {
        self.reservation_violations == 0 && self.room_clashes == 0 && self.lecturer_clashes == 0
    }

    /// Total hard clash count across both dimensions.
    #[inline]
    pub fn clash_count(&self) -> usize {
        self.room_clashes + self.lecturer_clashes
    }
}

/// Evaluates chromosomes against a compiled problem.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    problem: &'a TimetableProblem,
    weights: PenaltyWeights,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator with the given penalty weights.
    pub fn new(problem: &'a TimetableProblem, weights: PenaltyWeights) -> Self {
        Self { problem, weights }
    }

    /// Evaluates one individual.
    pub fn evaluate(&self, chromosome: &Chromosome) -> FitnessRecord {
        let problem = self.problem;

        let mut room_buckets: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        let mut lecturer_buckets: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        let mut room_clashes = 0;
        let mut lecturer_clashes = 0;

        for (idx, gene) in chromosome.genes.iter().enumerate() {
            let lecturer = problem.courses[idx].lecturer;
            let room_bucket = room_buckets.entry((gene.slot, gene.room)).or_default();
            if !room_bucket.is_empty() {
                room_clashes += 1;
            }
            room_bucket.push(idx);

            let lect_bucket = lecturer_buckets.entry((gene.slot, lecturer)).or_default();
            if !lect_bucket.is_empty() {
                lecturer_clashes += 1;
            }
            lect_bucket.push(idx);
        }

        let mut clash_genes: Vec<usize> = Vec::new();
        for bucket in room_buckets.values().chain(lecturer_buckets.values()) {
            if bucket.len() > 1 {
                clash_genes.extend_from_slice(bucket);
            }
        }
        clash_genes.sort_unstable();
        clash_genes.dedup();

        let mut reserved_genes = Vec::new();
        let mut preference_genes = Vec::new();
        let mut blocked_violations = 0;
        let mut not_preferred_violations = 0;

        for (idx, gene) in chromosome.genes.iter().enumerate() {
            let lecturer = problem.courses[idx].lecturer;

            if problem.reserved_for_other(lecturer, gene.slot, gene.room) {
                reserved_genes.push(idx);
            }

            if problem.blocked[lecturer].contains(&gene.slot) {
                blocked_violations += 1;
                preference_genes.push(idx);
            } else if !problem.preferred[lecturer].is_empty()
                && !problem.preferred[lecturer].contains(&gene.slot)
            {
                // Lecturers with no stated preference get a free pass.
                not_preferred_violations += 1;
                preference_genes.push(idx);
            }
        }

        let reservation_violations = reserved_genes.len();
        let penalty = reservation_violations as f64 * self.weights.exclusive
            + (room_clashes + lecturer_clashes) as f64 * self.weights.clash
            + blocked_violations as f64 * self.weights.blocked
            + not_preferred_violations as f64 * self.weights.preferred;

        FitnessRecord {
            room_clashes,
            lecturer_clashes,
            reservation_violations,
            blocked_violations,
            not_preferred_violations,
            clash_genes,
            reserved_genes,
            preference_genes,
            penalty,
            fitness: 1.0 / (1.0 + penalty),
        }
    }
}

/// Best individual and record seen across the entire run.
///
/// Monotonically non-decreasing in fitness; ties keep the incumbent so
/// the first-found best wins.
#[derive(Debug, Clone, Default)]
pub struct BestTracker {
    best: Option<(Chromosome, FitnessRecord)>,
}

impl BestTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `(chromosome, record)` if it strictly improves on the
    /// current best. Returns `true` on improvement.
    pub fn observe(&mut self, chromosome: &Chromosome, record: &FitnessRecord) -> bool {
        let improves = match &self.best {
            Some((_, current)) => record.fitness > current.fitness,
            None => true,
        };
        if improves {
            self.best = Some((chromosome.clone(), record.clone()));
        }
        improves
    }

    /// Best fitness so far; 0.0 before anything was observed.
    pub fn fitness(&self) -> f64 {
        self.best.as_ref().map_or(0.0, |(_, r)| r.fitness)
    }

    /// Best individual and record, if any generation was evaluated.
    pub fn best(&self) -> Option<(&Chromosome, &FitnessRecord)> {
        self.best.as_ref().map(|(c, r)| (c, r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::chromosome::Gene;
    use crate::models::{Course, Day, LecturerPreference, Room, TimeSlot};

    fn problem(prefs: Vec<LecturerPreference>) -> TimetableProblem {
        let courses = vec![
            Course::new("C1", "L1", 2),
            Course::new("C2", "L1", 2),
            Course::new("C3", "L2", 2),
        ];
        let slots = vec![
            TimeSlot::new("S1", Day::Monday, 480, 0),
            TimeSlot::new("S2", Day::Monday, 600, 1),
            TimeSlot::new("S3", Day::Tuesday, 480, 0),
        ];
        let rooms = vec![Room::new("R1", "101"), Room::new("R2", "102")];
        TimetableProblem::compile(&courses, &slots, &rooms, &prefs, 50).unwrap()
    }

    fn chromosome(genes: &[(usize, usize)]) -> Chromosome {
        Chromosome {
            genes: genes.iter().map(|&(slot, room)| Gene { slot, room }).collect(),
        }
    }

    #[test]
    fn test_conflict_free_schedule_has_fitness_one() {
        let problem = problem(vec![]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        let record = evaluator.evaluate(&chromosome(&[(0, 0), (1, 0), (2, 0)]));

        assert_eq!(record.penalty, 0.0);
        assert_eq!(record.fitness, 1.0);
        assert!(record.hard_success());
        assert!(record.clash_genes.is_empty());
    }

    #[test]
    fn test_room_time_clash_counted_once_per_extra_gene() {
        let problem = problem(vec![]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        // Courses 0 and 2 (different lecturers) share slot 0 / room 0.
        let record = evaluator.evaluate(&chromosome(&[(0, 0), (1, 0), (0, 0)]));

        assert_eq!(record.room_clashes, 1);
        assert_eq!(record.lecturer_clashes, 0);
        assert_eq!(record.clash_genes, vec![0, 2]);
        assert_eq!(record.penalty, 100.0);
        assert!(!record.hard_success());
    }

    #[test]
    fn test_lecturer_time_clash_detected_across_rooms() {
        let problem = problem(vec![]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        // Courses 0 and 1 (both L1) share slot 0 in different rooms.
        let record = evaluator.evaluate(&chromosome(&[(0, 0), (0, 1), (2, 0)]));

        assert_eq!(record.room_clashes, 0);
        assert_eq!(record.lecturer_clashes, 1);
        assert_eq!(record.clash_genes, vec![0, 1]);
    }

    #[test]
    fn test_reservation_violation_scenario() {
        // L1 reserves S1 exclusively; course C3 (L2) lands on S1.
        let problem = problem(vec![
            LecturerPreference::new("L1").with_reserved("S1", None, "research meeting")
        ]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        let record = evaluator.evaluate(&chromosome(&[(1, 0), (2, 0), (0, 1)]));

        assert_eq!(record.reservation_violations, 1);
        assert_eq!(record.reserved_genes, vec![2]);
        assert_eq!(record.penalty, 1000.0);
        assert!(!record.hard_success());
    }

    #[test]
    fn test_owner_may_use_reserved_slot() {
        let problem = problem(vec![
            LecturerPreference::new("L1").with_reserved("S1", Some("R1".into()), "seminar")
        ]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        // Course 0 is taught by L1, the reservation owner.
        let record = evaluator.evaluate(&chromosome(&[(0, 0), (1, 0), (2, 0)]));
        assert_eq!(record.reservation_violations, 0);
    }

    #[test]
    fn test_blocked_and_not_preferred_soft_penalties() {
        let problem = problem(vec![LecturerPreference::new("L1")
            .with_preferred("S2")
            .with_blocked("S3", "admin duty")]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        // Course 0 (L1) on blocked S3, course 1 (L1) off-preference on S1,
        // course 2 (L2, no preferences) anywhere.
        let record = evaluator.evaluate(&chromosome(&[(2, 0), (0, 0), (1, 1)]));

        assert_eq!(record.blocked_violations, 1);
        assert_eq!(record.not_preferred_violations, 1);
        assert_eq!(record.preference_genes, vec![0, 1]);
        assert_eq!(record.penalty, 50.0 + 30.0);
        // Soft penalties alone do not break hard success.
        assert!(record.hard_success());
    }

    #[test]
    fn test_no_stated_preference_is_a_free_pass() {
        let problem = problem(vec![]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        let record = evaluator.evaluate(&chromosome(&[(0, 0), (1, 0), (2, 0)]));
        assert_eq!(record.not_preferred_violations, 0);
    }

    #[test]
    fn test_fitness_strictly_decreasing_in_penalty() {
        let problem = problem(vec![]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        let clean = evaluator.evaluate(&chromosome(&[(0, 0), (1, 0), (2, 0)]));
        let one_clash = evaluator.evaluate(&chromosome(&[(0, 0), (1, 0), (0, 0)]));
        let two_clashes = evaluator.evaluate(&chromosome(&[(0, 0), (0, 0), (0, 0)]));

        assert!(clean.fitness > one_clash.fitness);
        assert!(one_clash.fitness > two_clashes.fitness);
    }

    #[test]
    fn test_best_tracker_monotonic_and_first_found_wins() {
        let problem = problem(vec![]);
        let evaluator = Evaluator::new(&problem, PenaltyWeights::default());
        let good = chromosome(&[(0, 0), (1, 0), (2, 0)]);
        let bad = chromosome(&[(0, 0), (0, 0), (0, 0)]);
        let good_record = evaluator.evaluate(&good);
        let bad_record = evaluator.evaluate(&bad);

        let mut tracker = BestTracker::new();
        assert!(tracker.observe(&bad, &bad_record));
        assert!(tracker.observe(&good, &good_record));
        let before = tracker.fitness();

        // Worse and equal candidates never displace the incumbent.
        assert!(!tracker.observe(&bad, &bad_record));
        let tie = good.clone();
        assert!(!tracker.observe(&tie, &good_record));
        assert_eq!(tracker.fitness(), before);
        assert_eq!(tracker.best().unwrap().0, &good);
    }
}
