//! Lecturer preference tables and reservation preallocation.
//!
//! Each lecturer carries three sets:
//! - **reserved**: exclusive (time slot[, room]) claims — hard constraints
//! - **preferred**: time slots rewarded by the soft fitness term
//! - **blocked**: time slots penalized heavily when used
//!
//! [`ReservationTable::build`] runs once before population creation and
//! turns all reserved entries into a keyed lookup. Two lecturers claiming
//! the same key is a configuration conflict: it is surfaced to the caller
//! and logged, but the run proceeds — the first registered claim owns the
//! slot at evaluation time.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

/// An exclusive reservation claim in a lecturer's preference table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservedSlot {
    /// Reserved time slot ID.
    pub slot: String,
    /// Reserved room ID. `None` = the claim covers the slot in any room.
    pub room: Option<String>,
    /// Why the slot is reserved (shown in reports).
    pub reason: String,
}

/// A blocked time slot in a lecturer's preference table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedSlot {
    /// Blocked time slot ID.
    pub slot: String,
    /// Why the slot is unavailable.
    pub reason: String,
}

/// Per-lecturer scheduling preferences.
///
/// Invariant (checked by [`crate::validation::validate_problem`]): the
/// reserved and blocked sets of one lecturer must not intersect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LecturerPreference {
    /// Lecturer identifier.
    pub lecturer: String,
    /// Exclusive (slot[, room]) claims.
    pub reserved: Vec<ReservedSlot>,
    /// Time slot IDs this lecturer favors.
    pub preferred: Vec<String>,
    /// Time slots this lecturer cannot teach in.
    pub blocked: Vec<BlockedSlot>,
}

impl LecturerPreference {
    /// Creates an empty preference table for a lecturer.
    pub fn new(lecturer: impl Into<String>) -> Self {
        Self {
            lecturer: lecturer.into(),
            ..Self::default()
        }
    }

    /// Adds an exclusive reservation.
    pub fn with_reserved(
        mut self,
        slot: impl Into<String>,
        room: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.reserved.push(ReservedSlot {
            slot: slot.into(),
            room,
            reason: reason.into(),
        });
        self
    }

    /// Adds a preferred time slot.
    pub fn with_preferred(mut self, slot: impl Into<String>) -> Self {
        self.preferred.push(slot.into());
        self
    }

    /// Adds a blocked time slot.
    pub fn with_blocked(mut self, slot: impl Into<String>, reason: impl Into<String>) -> Self {
        self.blocked.push(BlockedSlot {
            slot: slot.into(),
            reason: reason.into(),
        });
        self
    }
}

/// Structural key of a reservation: a time slot plus either a specific
/// room or an any-room claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationKey {
    /// Reserved time slot ID.
    pub slot: String,
    /// Reserved room ID, or `None` for an any-room claim.
    pub room: Option<String>,
}

/// A registered reservation: who owns the key and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Owning lecturer.
    pub lecturer: String,
    /// Reason given in the preference table.
    pub reason: String,
}

/// Two lecturers claiming the same reservation key.
///
/// Non-fatal: both claims stay registered, the first one wins ownership
/// at evaluation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConflict {
    /// The contested key.
    pub key: ReservationKey,
    /// Lecturer whose claim was registered first (the owner).
    pub first: String,
    /// Lecturer whose later claim collides.
    pub second: String,
}

/// Exclusive reservation lookup, built once before the search begins.
///
/// Read-only during a run.
#[derive(Debug, Clone, Default)]
pub struct ReservationTable {
    entries: HashMap<ReservationKey, Reservation>,
    conflicts: Vec<ReservationConflict>,
}

impl ReservationTable {
    /// Builds the table from all lecturers' reserved entries.
    ///
    /// `room_count` is needed to detect the degenerate collision where an
    /// any-room claim and a specific-room claim on the same slot cover the
    /// same physical room because only one room exists.
    pub fn build(preferences: &[LecturerPreference], room_count: usize) -> Self {
        let mut table = Self::default();

        for pref in preferences {
            for reserved in &pref.reserved {
                let key = ReservationKey {
                    slot: reserved.slot.clone(),
                    room: reserved.room.clone(),
                };
                table.register(key, &pref.lecturer, &reserved.reason, room_count);
            }
        }

        for conflict in &table.conflicts {
            warn!(
                "reservation conflict on slot '{}': '{}' and '{}' claim the same key",
                conflict.key.slot, conflict.first, conflict.second
            );
        }

        table
    }

    fn register(&mut self, key: ReservationKey, lecturer: &str, reason: &str, room_count: usize) {
        // An any-room claim collides with a specific-room claim on the same
        // slot when there is only one room to cover.
        if room_count == 1 {
            let cross = match &key.room {
                Some(_) => {
                    let any = ReservationKey {
                        slot: key.slot.clone(),
                        room: None,
                    };
                    self.entries.get(&any)
                }
                None => self
                    .entries
                    .iter()
                    .find(|(k, _)| k.slot == key.slot && k.room.is_some())
                    .map(|(_, r)| r),
            };
            if let Some(existing) = cross {
                if existing.lecturer != lecturer {
                    self.conflicts.push(ReservationConflict {
                        key: key.clone(),
                        first: existing.lecturer.clone(),
                        second: lecturer.to_string(),
                    });
                }
            }
        }

        match self.entries.entry(key) {
            std::collections::hash_map::Entry::Occupied(occupied) => {
                if occupied.get().lecturer != lecturer {
                    self.conflicts.push(ReservationConflict {
                        key: occupied.key().clone(),
                        first: occupied.get().lecturer.clone(),
                        second: lecturer.to_string(),
                    });
                }
                // First registered claim keeps ownership.
            }
            std::collections::hash_map::Entry::Vacant(vacant) => {
                vacant.insert(Reservation {
                    lecturer: lecturer.to_string(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    /// Looks up the reservation covering `(slot, room)`, if any.
    ///
    /// A specific-room claim takes precedence over an any-room claim on
    /// the same slot.
    pub fn owner_of(&self, slot: &str, room: &str) -> Option<&Reservation> {
        let specific = ReservationKey {
            slot: slot.to_string(),
            room: Some(room.to_string()),
        };
        if let Some(r) = self.entries.get(&specific) {
            return Some(r);
        }
        let any = ReservationKey {
            slot: slot.to_string(),
            room: None,
        };
        self.entries.get(&any)
    }

    /// All registered reservations.
    pub fn entries(&self) -> impl Iterator<Item = (&ReservationKey, &Reservation)> {
        self.entries.iter()
    }

    /// Inter-lecturer conflicts detected while building.
    pub fn conflicts(&self) -> &[ReservationConflict] {
        &self.conflicts
    }

    /// Number of registered reservation keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no reservations are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_and_lookup() {
        let prefs = vec![
            LecturerPreference::new("L1").with_reserved("S1", Some("R1".into()), "research"),
            LecturerPreference::new("L2").with_reserved("S2", None, "faculty meeting"),
        ];
        let table = ReservationTable::build(&prefs, 3);

        assert_eq!(table.len(), 2);
        assert!(table.conflicts().is_empty());
        assert_eq!(table.owner_of("S1", "R1").unwrap().lecturer, "L1");
        assert!(table.owner_of("S1", "R2").is_none());
        // Any-room claim covers every room on S2.
        assert_eq!(table.owner_of("S2", "R1").unwrap().lecturer, "L2");
        assert_eq!(table.owner_of("S2", "R9").unwrap().lecturer, "L2");
    }

    #[test]
    fn test_identical_key_conflict_first_wins() {
        let prefs = vec![
            LecturerPreference::new("L1").with_reserved("S1", Some("R1".into()), "a"),
            LecturerPreference::new("L2").with_reserved("S1", Some("R1".into()), "b"),
        ];
        let table = ReservationTable::build(&prefs, 2);

        assert_eq!(table.conflicts().len(), 1);
        assert_eq!(table.conflicts()[0].first, "L1");
        assert_eq!(table.conflicts()[0].second, "L2");
        assert_eq!(table.owner_of("S1", "R1").unwrap().lecturer, "L1");
    }

    #[test]
    fn test_any_room_vs_specific_single_room() {
        let prefs = vec![
            LecturerPreference::new("L1").with_reserved("S1", None, "a"),
            LecturerPreference::new("L2").with_reserved("S1", Some("R1".into()), "b"),
        ];
        let table = ReservationTable::build(&prefs, 1);
        assert_eq!(table.conflicts().len(), 1);

        // With more than one room the claims can coexist.
        let table = ReservationTable::build(&prefs, 2);
        assert!(table.conflicts().is_empty());
    }

    #[test]
    fn test_same_lecturer_duplicate_is_not_a_conflict() {
        let prefs = vec![LecturerPreference::new("L1")
            .with_reserved("S1", None, "a")
            .with_reserved("S1", None, "a again")];
        let table = ReservationTable::build(&prefs, 2);
        assert!(table.conflicts().is_empty());
    }
}
