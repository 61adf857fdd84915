//! Room model.

use serde::{Deserialize, Serialize};

/// A room that can host courses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Seating capacity. `None` = unknown / unconstrained.
    pub capacity: Option<u32>,
}

impl Room {
    /// Creates a new room.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity: None,
        }
    }

    /// Sets the seating capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }
}
