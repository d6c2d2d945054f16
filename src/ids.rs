//! Surrogate key allocation for new catalog rows.

use rand::{rng, Rng};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Largest id handed out by [`RandomIdAllocator`], the positive 31-bit range.
pub const MAX_RANDOM_ID: i64 = i32::MAX as i64;

/// Produces the key for the next inserted row.
///
/// Returning `None` means the store assigns the key itself and the caller
/// reads it back after the insert.
pub trait IdAllocator {
    fn allocate(&self) -> Option<i64>;
}

/// Uniform random ids in `1..=MAX_RANDOM_ID`.
///
/// Nothing checks for collisions: a repeated id surfaces as an
/// "already exists" failure from the store.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdAllocator;

impl IdAllocator for RandomIdAllocator {
    fn allocate(&self) -> Option<i64> {
        Some(rng().random_range(1..=MAX_RANDOM_ID))
    }
}

/// Leaves key assignment to SQLite's rowid sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct StoreAssignedIds;

impl IdAllocator for StoreAssignedIds {
    fn allocate(&self) -> Option<i64> {
        None
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Random,
    Sequence,
}

impl IdStrategy {
    pub fn allocator(self) -> Box<dyn IdAllocator> {
        match self {
            IdStrategy::Random => Box::new(RandomIdAllocator),
            IdStrategy::Sequence => Box::new(StoreAssignedIds),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(IdStrategy::Random),
            "sequence" => Ok(IdStrategy::Sequence),
            other => Err(format!(
                "unknown id strategy '{}', expected 'random' or 'sequence'",
                other
            )),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Random => write!(f, "random"),
            IdStrategy::Sequence => write!(f, "sequence"),
        }
    }
}
