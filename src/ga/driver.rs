//! Generational loop driver.
//!
//! [`Engine`] owns the compiled problem and configuration and runs the
//! evolutionary search:
//!
//! 1. evaluate the whole population (in parallel when configured)
//! 2. fold results into the best-ever tracker, serially
//! 3. report progress and check termination
//! 4. breed: roulette selection, crossover, repair, mutation
//! 5. carry the best-ever individual into slot 0 (elitism)
//!
//! Termination is cooperative: a [`CancelToken`] is checked once per
//! generation boundary, never mid-generation. Whatever ends the run, the
//! result always carries the best individual seen so far.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::chromosome::{random_population, Chromosome};
use super::config::EngineConfig;
use super::fitness::{BestTracker, Evaluator, FitnessRecord};
use super::operators::{crossover_population, mutate, repair};
use super::problem::TimetableProblem;
use super::report::{reservation_report, schedule_rows, ReservationStatus, ScheduleRow};
use super::selection::roulette;
use crate::error::EngineError;
use crate::models::{Course, LecturerPreference, ReservationConflict, Room, TimeSlot};

/// Cooperative cancellation handle.
///
/// Clone it, hand one copy to the engine and keep the other; `cancel` is
/// observed at the next generation boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// A hard-feasible schedule was found, or the fitness threshold was
    /// reached after the minimum generation count.
    Success,
    /// The generation budget ran out.
    MaxGenerationsReached,
    /// The caller cancelled the run.
    Cancelled,
    /// An internal invariant failed; the result still holds the best
    /// individual found before the failure.
    Error {
        /// Description of the failed invariant.
        message: String,
    },
}

/// Per-generation progress snapshot passed to the progress callback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Zero-based generation index.
    pub generation: usize,
    /// Configured generation budget.
    pub max_generations: usize,
    /// Best fitness seen so far across the whole run.
    pub best_fitness: f64,
    /// Mean fitness of the current population.
    pub average_fitness: f64,
}

/// Aggregate statistics of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Generations completed.
    pub generations: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Best fitness reached.
    pub best_fitness: f64,
    /// Whether the best schedule is hard-feasible.
    pub hard_success: bool,
    /// Room-time clashes in the best schedule.
    pub room_clashes: usize,
    /// Lecturer-time clashes in the best schedule.
    pub lecturer_clashes: usize,
    /// Reservation violations in the best schedule.
    pub reservation_violations: usize,
    /// Blocked-slot violations in the best schedule.
    pub blocked_violations: usize,
    /// Not-preferred-slot violations in the best schedule.
    pub not_preferred_violations: usize,
}

/// Everything a finished run hands back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Best schedule in display form, day/time ordered.
    pub rows: Vec<ScheduleRow>,
    /// Best chromosome found. A hard-feasible schedule is preferred over
    /// a higher-fitness one that still carries clashes or reservation
    /// violations.
    pub best: Chromosome,
    /// Fitness record of the best chromosome.
    pub record: FitnessRecord,
    /// Per-reservation respect report for the best schedule.
    pub reservations: Vec<ReservationStatus>,
    /// Inter-lecturer reservation conflicts detected at build time.
    pub conflicts: Vec<ReservationConflict>,
    /// Aggregate run statistics.
    pub stats: RunStats,
    /// Why the run ended.
    pub reason: TerminationReason,
}

/// The evolutionary timetabling engine.
#[derive(Debug)]
pub struct Engine {
    problem: TimetableProblem,
    config: EngineConfig,
}

impl Engine {
    /// Validates the configuration, clamps its parameters into range and
    /// compiles the problem.
    ///
    /// Referential errors in the input (unknown IDs, duplicates, empty
    /// sets) fail here; reservation conflicts between lecturers do not —
    /// they are carried into the run result.
    pub fn new(
        courses: &[Course],
        slots: &[TimeSlot],
        rooms: &[Room],
        preferences: &[LecturerPreference],
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Configuration)?;
        let config = config.clamped();
        let problem =
            TimetableProblem::compile(courses, slots, rooms, preferences, config.minutes_per_credit)?;
        Ok(Self { problem, config })
    }

    /// The compiled problem this engine searches over.
    pub fn problem(&self) -> &TimetableProblem {
        &self.problem
    }

    /// The (clamped) configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the search to completion with no progress reporting.
    pub fn run(&self) -> RunResult {
        self.run_with(|_| {}, &CancelToken::new())
    }

    /// Runs the search, invoking `progress` once per generation.
    pub fn run_with<F>(&self, mut progress: F, cancel: &CancelToken) -> RunResult
    where
        F: FnMut(&ProgressUpdate),
    {
        let start = Instant::now();
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let evaluator = Evaluator::new(&self.problem, self.config.weights);
        let mut tracker = BestTracker::new();
        // Hard-feasible individuals are tracked separately: soft penalties
        // can keep a feasible schedule below the fitness-best one, and it
        // must still end the run.
        let mut feasible = BestTracker::new();
        let mut population =
            random_population(&self.problem, self.config.population_size, &mut rng);
        let mut generation = 0;

        let reason = loop {
            let records: Vec<FitnessRecord> = if self.config.parallel {
                population.par_iter().map(|c| evaluator.evaluate(c)).collect()
            } else {
                population.iter().map(|c| evaluator.evaluate(c)).collect()
            };

            // Serial fold keeps "first found wins" deterministic regardless
            // of evaluation parallelism.
            for (individual, record) in population.iter().zip(&records) {
                tracker.observe(individual, record);
                if record.hard_success() {
                    feasible.observe(individual, record);
                }
            }

            let average =
                records.iter().map(|r| r.fitness).sum::<f64>() / records.len() as f64;
            progress(&ProgressUpdate {
                generation,
                max_generations: self.config.max_generations,
                best_fitness: tracker.fitness(),
                average_fitness: average,
            });

            if cancel.is_cancelled() {
                info!("run cancelled at generation {generation}");
                break TerminationReason::Cancelled;
            }
            if feasible.best().is_some() {
                info!(
                    "hard-feasible schedule found at generation {generation} (fitness {:.4})",
                    feasible.fitness()
                );
                break TerminationReason::Success;
            }
            if tracker.fitness() >= self.config.early_termination_threshold
                && generation >= self.config.min_generations
            {
                info!(
                    "fitness threshold reached at generation {generation} (fitness {:.4})",
                    tracker.fitness()
                );
                break TerminationReason::Success;
            }
            if generation >= self.config.max_generations {
                break TerminationReason::MaxGenerationsReached;
            }

            // Breed the next generation.
            if let Some(next) = roulette(&population, &records, &mut rng) {
                population = next;
            }
            crossover_population(&mut population, self.config.crossover_rate, &mut rng);

            for individual in population.iter_mut() {
                let before = evaluator.evaluate(individual);
                if before.clash_count() > 0 {
                    repair(individual, &self.problem, &mut rng);
                }
                // Re-evaluate so mutation targets the post-repair state.
                let repaired = evaluator.evaluate(individual);
                mutate(
                    individual,
                    &self.problem,
                    &repaired,
                    self.config.mutation_rate,
                    &mut rng,
                );
                let after = evaluator.evaluate(individual);
                tracker.observe(individual, &after);
                if after.hard_success() {
                    feasible.observe(individual, &after);
                }
            }

            if let Some(bad) = population.iter().position(|c| !c.is_valid(&self.problem)) {
                let err = EngineError::Runtime {
                    generation,
                    message: format!("individual {bad} lost structural validity"),
                };
                warn!("{err}");
                break TerminationReason::Error {
                    message: err.to_string(),
                };
            }

            // Elitism: the best-ever individual always survives in slot 0.
            if let Some((best, _)) = tracker.best() {
                population[0] = best.clone();
            }
            generation += 1;
        };

        self.finish(&tracker, &feasible, generation, reason, start.elapsed())
    }

    fn finish(
        &self,
        tracker: &BestTracker,
        feasible: &BestTracker,
        generations: usize,
        reason: TerminationReason,
        elapsed: Duration,
    ) -> RunResult {
        // A hard-feasible schedule wins over a higher-fitness infeasible one.
        let (best, record) = match feasible.best().or_else(|| tracker.best()) {
            Some((chromosome, record)) => (chromosome.clone(), record.clone()),
            // Unreachable with a non-empty population; return an empty
            // result rather than panic.
            None => (
                Chromosome { genes: Vec::new() },
                FitnessRecord {
                    room_clashes: 0,
                    lecturer_clashes: 0,
                    reservation_violations: 0,
                    blocked_violations: 0,
                    not_preferred_violations: 0,
                    clash_genes: Vec::new(),
                    reserved_genes: Vec::new(),
                    preference_genes: Vec::new(),
                    penalty: 0.0,
                    fitness: 0.0,
                },
            ),
        };

        let rows = schedule_rows(&self.problem, &best, &record);
        let reservations = reservation_report(&self.problem, &best);
        let stats = RunStats {
            generations,
            elapsed,
            best_fitness: record.fitness,
            hard_success: record.hard_success(),
            room_clashes: record.room_clashes,
            lecturer_clashes: record.lecturer_clashes,
            reservation_violations: record.reservation_violations,
            blocked_violations: record.blocked_violations,
            not_preferred_violations: record.not_preferred_violations,
        };

        RunResult {
            rows,
            best,
            record,
            reservations,
            conflicts: self.problem.reservations.conflicts().to_vec(),
            stats,
            reason,
        }
    }
}
