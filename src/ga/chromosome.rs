//! Chromosome encoding for course timetabling.
//!
//! A chromosome holds one gene per course, each gene a `(time slot, room)`
//! index pair. Genes are always fully assigned — initialization draws
//! uniformly random valid indices and never leaves a hole; constraint
//! handling is the evaluator's and repair pass's job.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::problem::TimetableProblem;

/// One course's assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    /// Index into the problem's time slot list.
    pub slot: usize,
    /// Index into the problem's room list.
    pub room: usize,
}

/// A complete candidate schedule: one gene per course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chromosome {
    /// Genes in course order; `genes[i]` assigns course `i`.
    pub genes: Vec<Gene>,
}

impl Chromosome {
    /// Creates a chromosome with uniformly random assignments.
    pub fn random<R: Rng>(problem: &TimetableProblem, rng: &mut R) -> Self {
        let genes = (0..problem.gene_count())
            .map(|_| Gene {
                slot: rng.random_range(0..problem.slots.len()),
                room: rng.random_range(0..problem.rooms.len()),
            })
            .collect();
        Self { genes }
    }

    /// Structural validity: gene count matches the course count and every
    /// index references an existing slot/room.
    pub fn is_valid(&self, problem: &TimetableProblem) -> bool {
        self.genes.len() == problem.gene_count()
            && self
                .genes
                .iter()
                .all(|g| g.slot < problem.slots.len() && g.room < problem.rooms.len())
    }
}

/// Creates `size` independent random chromosomes.
///
/// No two individuals share storage; operators always work on copies.
pub fn random_population<R: Rng>(
    problem: &TimetableProblem,
    size: usize,
    rng: &mut R,
) -> Vec<Chromosome> {
    (0..size).map(|_| Chromosome::random(problem, rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Day, Room, TimeSlot};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn problem() -> TimetableProblem {
        let courses = vec![Course::new("C1", "L1", 2), Course::new("C2", "L2", 2)];
        let slots = vec![
            TimeSlot::new("S1", Day::Monday, 480, 0),
            TimeSlot::new("S2", Day::Tuesday, 480, 0),
        ];
        let rooms = vec![Room::new("R1", "101")];
        TimetableProblem::compile(&courses, &slots, &rooms, &[], 50).unwrap()
    }

    #[test]
    fn test_random_chromosome_is_valid() {
        let problem = problem();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let ch = Chromosome::random(&problem, &mut rng);
            assert_eq!(ch.genes.len(), 2);
            assert!(ch.is_valid(&problem));
        }
    }

    #[test]
    fn test_population_individuals_are_independent() {
        let problem = problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut pop = random_population(&problem, 4, &mut rng);
        assert_eq!(pop.len(), 4);

        let snapshot = pop[1].clone();
        pop[0].genes[0].slot = (pop[0].genes[0].slot + 1) % problem.slots.len();
        assert_eq!(pop[1], snapshot);
    }

    #[test]
    fn test_invalid_chromosome_detected() {
        let problem = problem();
        let ch = Chromosome {
            genes: vec![Gene { slot: 99, room: 0 }, Gene { slot: 0, room: 0 }],
        };
        assert!(!ch.is_valid(&problem));
        let short = Chromosome {
            genes: vec![Gene { slot: 0, room: 0 }],
        };
        assert!(!short.is_valid(&problem));
    }
}
