//! Roulette-wheel (fitness-proportionate) selection.
//!
//! Cumulative probability boundaries are computed once per generation;
//! each output slot draws `r ~ Uniform(0,1)` and takes the first index
//! whose boundary reaches `r`, with the last index as rounding fallback.
//! A population whose total fitness is zero is left unchanged — there is
//! nothing to weight by.

use rand::Rng;

use super::chromosome::Chromosome;
use super::fitness::FitnessRecord;

/// Cumulative probability boundaries `P[0..n-1]`, or `None` when the
/// total fitness is zero.
///
/// When `Some`, the final boundary equals 1.0 within floating tolerance.
pub fn cumulative_boundaries(records: &[FitnessRecord]) -> Option<Vec<f64>> {
    let total: f64 = records.iter().map(|r| r.fitness).sum();
    if total == 0.0 {
        return None;
    }

    let mut boundaries = Vec::with_capacity(records.len());
    let mut acc = 0.0;
    for record in records {
        acc += record.fitness / total;
        boundaries.push(acc);
    }
    Some(boundaries)
}

/// First index whose boundary reaches `r`; the last index catches any
/// floating-point residue above the final boundary.
pub fn pick(boundaries: &[f64], r: f64) -> usize {
    boundaries
        .iter()
        .position(|&p| r <= p)
        .unwrap_or(boundaries.len() - 1)
}

/// Samples a full replacement population by roulette wheel.
///
/// Returns `None` (population unchanged) when total fitness is zero.
/// Every selected individual is a deep copy — the new population never
/// aliases genes with the old one.
pub fn roulette<R: Rng>(
    population: &[Chromosome],
    records: &[FitnessRecord],
    rng: &mut R,
) -> Option<Vec<Chromosome>> {
    let boundaries = cumulative_boundaries(records)?;

    let next = (0..population.len())
        .map(|_| {
            let r: f64 = rng.random();
            population[pick(&boundaries, r)].clone()
        })
        .collect();
    Some(next)
}
