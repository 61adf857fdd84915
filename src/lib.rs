//! Evolutionary course timetabling engine.
//!
//! Assigns courses to `(time slot, room)` pairs under hard constraints
//! (no room-time or lecturer-time clashes, exclusive slot reservations)
//! and soft preferences (preferred and blocked slots per lecturer), using
//! a generational genetic algorithm with conflict repair and elitism.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Course`, `TimeSlot`, `Room`,
//!   `LecturerPreference`, `ReservationTable`
//! - **`validation`**: Input integrity checks (duplicate IDs, unknown
//!   references, reserved/blocked overlap)
//! - **`ga`**: The evolutionary engine — encoding, fitness, operators,
//!   generational driver, result reports
//! - **`error`**: Engine error types
//!
//! # Example
//!
//! ```
//! use timetable_evo::ga::{Engine, EngineConfig};
//! use timetable_evo::models::{Course, Day, Room, TimeSlot};
//!
//! let courses = vec![
//!     Course::new("algo", "dr-kim", 2),
//!     Course::new("db", "dr-lee", 3),
//! ];
//! let slots = vec![
//!     TimeSlot::new("mon-08", Day::Monday, 480, 0),
//!     TimeSlot::new("tue-08", Day::Tuesday, 480, 0),
//! ];
//! let rooms = vec![Room::new("r101", "Room 101")];
//!
//! let config = EngineConfig::default().with_seed(42);
//! let engine = Engine::new(&courses, &slots, &rooms, &[], config)?;
//! let result = engine.run();
//! assert_eq!(result.rows.len(), 2);
//! # Ok::<(), timetable_evo::error::EngineError>(())
//! ```

pub mod error;
pub mod ga;
pub mod models;
pub mod validation;

pub use error::EngineError;
pub use ga::{Engine, EngineConfig, RunResult, TerminationReason};
pub use models::{Course, Day, LecturerPreference, Room, TimeSlot};
