//! Engine configuration.
//!
//! [`EngineConfig`] holds all parameters that control the evolutionary
//! loop. Out-of-range values are clamped to the supported ranges rather
//! than rejected, so callers can pass advisor-recommended values without
//! pre-checking them.

use serde::{Deserialize, Serialize};

/// Penalty weights applied by the fitness evaluator.
///
/// Typical ordering: `exclusive ≫ clash > blocked > preferred`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PenaltyWeights {
    /// Weight per reservation violation (hard).
    pub exclusive: f64,
    /// Weight per room-time or lecturer-time clash (hard).
    pub clash: f64,
    /// Weight per blocked-slot use (soft, heavy).
    pub blocked: f64,
    /// Weight per not-preferred-slot use (soft, light).
    pub preferred: f64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            exclusive: 1000.0,
            clash: 100.0,
            blocked: 50.0,
            preferred: 30.0,
        }
    }
}

/// Configuration for the evolutionary timetabling engine.
///
/// # Clamping
///
/// Every `with_*` setter clamps its argument into the supported range:
///
/// | parameter | range |
/// |---|---|
/// | `population_size` | [4, 20] |
/// | `max_generations` | [10, 500] |
/// | `crossover_rate` | [0.1, 1.0] |
/// | `mutation_rate` | [0.01, 0.5] |
///
/// # Builder Pattern
///
/// ```
/// use timetable_evo::ga::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_population_size(12)
///     .with_max_generations(100)
///     .with_crossover_rate(0.8)
///     .with_seed(42);
/// assert_eq!(config.population_size, 12);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of individuals in the population.
    pub population_size: usize,
    /// Maximum number of generations before termination.
    pub max_generations: usize,
    /// Probability of an individual being marked as a crossover parent.
    pub crossover_rate: f64,
    /// Per-gene reassignment probability during mutation.
    pub mutation_rate: f64,
    /// Minutes of teaching per credit hour.
    pub minutes_per_credit: u32,
    /// Best-fitness threshold for early termination.
    pub early_termination_threshold: f64,
    /// Minimum generations to run before threshold-based termination.
    pub min_generations: usize,
    /// Penalty weights for the fitness evaluator.
    pub weights: PenaltyWeights,
    /// Whether to evaluate individuals in parallel using rayon.
    pub parallel: bool,
    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            max_generations: 50,
            crossover_rate: 0.75,
            mutation_rate: 0.25,
            minutes_per_credit: 50,
            early_termination_threshold: 0.95,
            min_generations: 3,
            weights: PenaltyWeights::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Sets the population size (clamped to [4, 20]).
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n.clamp(4, 20);
        self
    }

    /// Sets the maximum number of generations (clamped to [10, 500]).
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n.clamp(10, 500);
        self
    }

    /// Sets the crossover rate (clamped to [0.1, 1.0]).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.1, 1.0);
        self
    }

    /// Sets the mutation rate (clamped to [0.01, 0.5]).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.01, 0.5);
        self
    }

    /// Sets the minutes-per-credit-hour constant.
    pub fn with_minutes_per_credit(mut self, minutes: u32) -> Self {
        self.minutes_per_credit = minutes;
        self
    }

    /// Sets the early-termination fitness threshold (clamped to [0.0, 1.0]).
    pub fn with_early_termination_threshold(mut self, threshold: f64) -> Self {
        self.early_termination_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Sets the minimum generation floor for threshold-based termination.
    pub fn with_min_generations(mut self, n: usize) -> Self {
        self.min_generations = n;
        self
    }

    /// Sets the penalty weights.
    pub fn with_weights(mut self, weights: PenaltyWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Enables or disables parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns a copy with all parameters pulled into their supported
    /// ranges.
    ///
    /// Deserialized configurations bypass the clamping setters, so the
    /// driver normalizes once before running.
    pub fn clamped(&self) -> Self {
        let mut c = self.clone();
        c.population_size = c.population_size.clamp(4, 20);
        c.max_generations = c.max_generations.clamp(10, 500);
        c.crossover_rate = c.crossover_rate.clamp(0.1, 1.0);
        c.mutation_rate = c.mutation_rate.clamp(0.01, 0.5);
        c.early_termination_threshold = c.early_termination_threshold.clamp(0.0, 1.0);
        c
    }

    /// Validates parameters that clamping cannot fix.
    ///
    /// Returns `Err` with a description if any weight is non-positive or
    /// any rate is not a finite number.
    pub fn validate(&self) -> Result<(), String> {
        if !self.crossover_rate.is_finite() || !self.mutation_rate.is_finite() {
            return Err("crossover_rate and mutation_rate must be finite".into());
        }
        if !self.early_termination_threshold.is_finite() {
            return Err("early_termination_threshold must be finite".into());
        }
        let w = &self.weights;
        if w.exclusive <= 0.0 || w.clash <= 0.0 || w.blocked <= 0.0 || w.preferred <= 0.0 {
            return Err("penalty weights must be positive".into());
        }
        if self.minutes_per_credit == 0 {
            return Err("minutes_per_credit must be positive".into());
        }
        Ok(())
    }
}
