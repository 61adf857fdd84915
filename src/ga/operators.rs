//! Genetic operators: single-point crossover, conflict repair, and
//! preference-aware mutation.
//!
//! Repair runs before stochastic mutation whenever an individual carries
//! hard clashes: genes are bucketed by `(slot, room)` and `(slot, lecturer)`
//! keys and every bucket is thinned down to one member by bounded random
//! reassignment. The pass is guaranteed to terminate — it stops after
//! `2 × gene_count` sweeps even if conflicts remain, and the evaluator
//! scores whatever is left.

use std::collections::HashMap;

use log::{debug, warn};
use rand::Rng;

use super::chromosome::Chromosome;
use super::fitness::FitnessRecord;
use super::problem::TimetableProblem;

/// Retry budget per gene reassignment inside the repair pass.
const REASSIGN_TRIES: usize = 20;

/// Probability of taking the top-ranked mutation candidate instead of a
/// uniform draw from the shortlist.
const TAKE_BEST_PROB: f64 = 0.7;

/// Shortlist length for smart mutation candidates.
const SHORTLIST: usize = 5;

// ======================== Crossover ========================

/// Swaps the gene tails of two parents at `cut`.
///
/// `cut` must lie in `[1, gene_count - 1]`. Offspring 1 is
/// `p1[..cut] + p2[cut..]`, offspring 2 is `p2[..cut] + p1[cut..]`.
pub fn single_point_crossover(
    p1: &Chromosome,
    p2: &Chromosome,
    cut: usize,
) -> (Chromosome, Chromosome) {
    debug_assert!(cut >= 1 && cut < p1.genes.len());
    let mut c1 = p1.genes[..cut].to_vec();
    c1.extend_from_slice(&p2.genes[cut..]);
    let mut c2 = p2.genes[..cut].to_vec();
    c2.extend_from_slice(&p1.genes[cut..]);
    (Chromosome { genes: c1 }, Chromosome { genes: c2 })
}

/// Applies crossover across the population.
///
/// Each individual is independently marked as a parent with probability
/// `rate`. Marked parents are paired in order; with an odd count the last
/// parent wraps around and mates with the first (only the last parent's
/// slot receives that extra offspring). Unmarked individuals are left
/// untouched. Returns the number of offspring produced.
pub fn crossover_population<R: Rng>(
    population: &mut [Chromosome],
    rate: f64,
    rng: &mut R,
) -> usize {
    if population.is_empty() || population[0].genes.len() < 2 {
        return 0;
    }

    let parents: Vec<usize> = (0..population.len())
        .filter(|_| rng.random_bool(rate))
        .collect();
    if parents.len() < 2 {
        return 0;
    }

    // Offspring are built from pre-crossover copies of the parents.
    let originals: HashMap<usize, Chromosome> = parents
        .iter()
        .map(|&i| (i, population[i].clone()))
        .collect();
    let gene_count = population[0].genes.len();
    let mut produced = 0;

    for pair in parents.chunks_exact(2) {
        let cut = rng.random_range(1..gene_count);
        let (c1, c2) = single_point_crossover(&originals[&pair[0]], &originals[&pair[1]], cut);
        population[pair[0]] = c1;
        population[pair[1]] = c2;
        produced += 2;
    }

    if parents.len() % 2 == 1 {
        let last = parents[parents.len() - 1];
        let first = parents[0];
        let cut = rng.random_range(1..gene_count);
        let (c1, _) = single_point_crossover(&originals[&last], &originals[&first], cut);
        population[last] = c1;
        produced += 1;
    }

    produced
}

// ======================== Repair ========================

/// Result of a conflict-repair pass.
#[derive(Debug, Clone, Copy)]
pub struct RepairOutcome {
    /// Whether all hard clashes were removed.
    pub resolved: bool,
    /// Number of full sweeps performed.
    pub sweeps: usize,
}

/// Removes room-time and lecturer-time clashes from one individual.
///
/// Every bucket with more than one gene keeps its first member; the rest
/// are reassigned. Terminates after at most `2 × gene_count` sweeps;
/// exhaustion is not an error — residual clashes stay in the chromosome
/// and show up in its fitness.
pub fn repair<R: Rng>(
    chromosome: &mut Chromosome,
    problem: &TimetableProblem,
    rng: &mut R,
) -> RepairOutcome {
    let max_sweeps = 2 * problem.gene_count().max(1);
    let mut sweeps = 0;

    loop {
        let mut room_buckets: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        let mut lecturer_buckets: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for (idx, gene) in chromosome.genes.iter().enumerate() {
            room_buckets.entry((gene.slot, gene.room)).or_default().push(idx);
            let lecturer = problem.courses[idx].lecturer;
            lecturer_buckets.entry((gene.slot, lecturer)).or_default().push(idx);
        }

        let room_extras: Vec<usize> = room_buckets
            .values()
            .filter(|b| b.len() > 1)
            .flat_map(|b| b[1..].iter().copied())
            .collect();
        let lecturer_extras: Vec<usize> = lecturer_buckets
            .values()
            .filter(|b| b.len() > 1)
            .flat_map(|b| b[1..].iter().copied())
            .collect();

        if room_extras.is_empty() && lecturer_extras.is_empty() {
            return RepairOutcome {
                resolved: true,
                sweeps,
            };
        }

        sweeps += 1;
        if sweeps > max_sweeps {
            warn!(
                "repair exhausted after {} sweeps with {} unresolved genes",
                max_sweeps,
                room_extras.len() + lecturer_extras.len()
            );
            return RepairOutcome {
                resolved: false,
                sweeps: sweeps - 1,
            };
        }

        for idx in room_extras {
            reassign_room(chromosome, idx, problem, rng);
        }
        for idx in lecturer_extras {
            reassign_slot(chromosome, idx, problem, rng);
        }
    }
}

/// Draws a new room for `gene_idx`, accepting the first candidate that
/// creates no new room-time clash. The last draw is kept if the retry
/// budget runs out.
fn reassign_room<R: Rng>(
    chromosome: &mut Chromosome,
    gene_idx: usize,
    problem: &TimetableProblem,
    rng: &mut R,
) {
    let slot = chromosome.genes[gene_idx].slot;
    for attempt in 0..REASSIGN_TRIES {
        let candidate = rng.random_range(0..problem.rooms.len());
        let clashes = chromosome
            .genes
            .iter()
            .enumerate()
            .any(|(i, g)| i != gene_idx && g.slot == slot && g.room == candidate);
        chromosome.genes[gene_idx].room = candidate;
        if !clashes {
            return;
        }
        if attempt == REASSIGN_TRIES - 1 {
            debug!("room reassignment kept a clashing candidate for gene {gene_idx}");
        }
    }
}

/// Draws a new slot for `gene_idx`, accepting the first candidate that
/// creates no new lecturer-time clash and is not blocked for the lecturer.
fn reassign_slot<R: Rng>(
    chromosome: &mut Chromosome,
    gene_idx: usize,
    problem: &TimetableProblem,
    rng: &mut R,
) {
    let lecturer = problem.courses[gene_idx].lecturer;
    for attempt in 0..REASSIGN_TRIES {
        let candidate = rng.random_range(0..problem.slots.len());
        let lecturer_clash = chromosome.genes.iter().enumerate().any(|(i, g)| {
            i != gene_idx && g.slot == candidate && problem.courses[i].lecturer == lecturer
        });
        let blocked = problem.blocked[lecturer].contains(&candidate);
        chromosome.genes[gene_idx].slot = candidate;
        if !lecturer_clash && !blocked {
            return;
        }
        if attempt == REASSIGN_TRIES - 1 {
            debug!("slot reassignment kept a clashing candidate for gene {gene_idx}");
        }
    }
}

// ======================== Mutation ========================

/// Applies preference-aware stochastic mutation to one individual.
///
/// Violating genes are mutated preferentially: genes on a reservation
/// owned by someone else are always retargeted, genes flagged for a
/// blocked or not-preferred slot mutate at twice the base rate, and
/// every other gene at `rate`. Hard clashes are the repair pass's job.
/// Reassignment prefers the lecturer's preferred slots in unreserved
/// rooms, falls back to any unreserved, unblocked pair, and finally to
/// an unconstrained uniform draw when no valid candidate exists.
pub fn mutate<R: Rng>(
    chromosome: &mut Chromosome,
    problem: &TimetableProblem,
    record: &FitnessRecord,
    rate: f64,
    rng: &mut R,
) {
    for &idx in &record.reserved_genes {
        smart_reassign(chromosome, idx, problem, rng);
    }
    for idx in 0..chromosome.genes.len() {
        // Already retargeted above; reserved_genes is in gene order.
        if record.reserved_genes.binary_search(&idx).is_ok() {
            continue;
        }
        // preference_genes is built in gene order.
        let p = if record.preference_genes.binary_search(&idx).is_ok() {
            (2.0 * rate).min(1.0)
        } else {
            rate
        };
        if rng.random_bool(p) {
            smart_reassign(chromosome, idx, problem, rng);
        }
    }
}

/// Reassigns one gene using the ranked candidate list.
pub fn smart_reassign<R: Rng>(
    chromosome: &mut Chromosome,
    gene_idx: usize,
    problem: &TimetableProblem,
    rng: &mut R,
) {
    let lecturer = problem.courses[gene_idx].lecturer;

    // Highest rank: preferred slots in rooms nobody has reserved. The
    // current pair stays in the running, so a gene already well placed
    // is not forced off it.
    let mut preferred: Vec<usize> = problem.preferred[lecturer].iter().copied().collect();
    preferred.sort_unstable();

    let mut candidates: Vec<(usize, usize)> = Vec::new();
    for &slot in &preferred {
        for room in 0..problem.rooms.len() {
            if problem.reserved_owner(slot, room).is_none() {
                candidates.push((slot, room));
            }
        }
    }

    // Fallback rank: any unreserved pair outside the blocked set.
    if candidates.is_empty() {
        for slot in 0..problem.slots.len() {
            if problem.blocked[lecturer].contains(&slot) {
                continue;
            }
            for room in 0..problem.rooms.len() {
                if problem.reserved_owner(slot, room).is_none() {
                    candidates.push((slot, room));
                }
            }
        }
    }

    candidates.truncate(SHORTLIST);
    let chosen = if candidates.is_empty() {
        // No valid candidate anywhere: unconstrained uniform reassignment.
        (
            rng.random_range(0..problem.slots.len()),
            rng.random_range(0..problem.rooms.len()),
        )
    } else if rng.random_bool(TAKE_BEST_PROB) {
        candidates[0]
    } else {
        candidates[rng.random_range(0..candidates.len())]
    };

    chromosome.genes[gene_idx].slot = chosen.0;
    chromosome.genes[gene_idx].room = chosen.1;
}
