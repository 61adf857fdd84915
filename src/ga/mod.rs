//! Evolutionary search for course timetabling.
//!
//! Implements a generational GA over a fixed-length `(slot, room)` gene
//! encoding: one gene per course, fitness `1 / (1 + weighted penalty)`.
//!
//! # Submodules
//!
//! - [`config`]: Engine parameters and penalty weights (clamping setters)
//! - [`problem`]: Compiled, index-space view of the domain model
//! - [`chromosome`]: Gene encoding and random initialization
//! - [`fitness`]: Hash-bucket clash detection and penalty scoring
//! - [`selection`]: Roulette-wheel selection
//! - [`operators`]: Crossover, bounded conflict repair, smart mutation
//! - [`driver`]: Generational loop, termination, cancellation
//! - [`report`]: Schedule rows, reservation respect, free-slot listing
//!
//! # Reference
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod chromosome;
pub mod config;
pub mod driver;
pub mod fitness;
pub mod operators;
pub mod problem;
pub mod report;
pub mod selection;

pub use chromosome::{random_population, Chromosome, Gene};
pub use config::{EngineConfig, PenaltyWeights};
pub use driver::{
    CancelToken, Engine, ProgressUpdate, RunResult, RunStats, TerminationReason,
};
pub use fitness::{BestTracker, Evaluator, FitnessRecord};
pub use problem::{CompiledCourse, TimetableProblem};
pub use report::{
    availability_ranking, free_slots, LecturerAvailability, ReservationStatus, RowFlags,
    ScheduleRow,
};
