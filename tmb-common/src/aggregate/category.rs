//! Leaderboard category defaulting
//!
//! Invoked once at person-creation time; the stored value is
//! authoritative afterwards, so later role edits do not silently
//! re-categorize anyone.

use crate::db::models::{Category, Unit};

/// Default leaderboard category for a new person
///
/// Security roles and the SGK/SOCIAL units rank in the OPERASIONAL
/// board; everyone else ranks in MIKRO.
pub fn default_category(role: &str, unit: Unit) -> Category {
    let role_lower = role.to_lowercase();
    if role_lower.contains("security") || unit == Unit::Sgk || unit == Unit::Social {
        Category::Operasional
    } else {
        Category::Mikro
    }
}

/// PIC entry form partition: does a product belong to the OPERASIONAL
/// category selector?
pub fn operational_product(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("sgk") || lower.contains("bansos") || lower.contains("secur")
}
