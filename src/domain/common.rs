//! Shared aliases, traits, and enums for project-tracking primitives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// All entity ids are allocated sequentially by the owning book.
pub type DbId = i64;

/// All audit timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Exposes a stable identifier for entities stored in the book.
pub trait Identifiable {
    fn id(&self) -> DbId;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Exposes the optimistic-concurrency revision counter of a mutable entity.
pub trait Versioned {
    fn revision(&self) -> u64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Enumerates the three take-off categories composing a BOQ item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CostCategory {
    Materials,
    Labor,
    Equipment,
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CostCategory::Materials => "Materials",
            CostCategory::Labor => "Labor",
            CostCategory::Equipment => "Equipment",
        };
        f.write_str(label)
    }
}

/// Returns whether an amount is usable as money: finite and strictly positive.
pub fn valid_money(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}
