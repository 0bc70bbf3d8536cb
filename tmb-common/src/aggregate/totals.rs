//! Unit and category totals
//!
//! Sums achievement amounts across the members of an organizational
//! unit. Supervisors never count toward unit totals, even when they are
//! technically members of the unit.

use crate::aggregate::Snapshot;
use crate::db::models::Unit;

/// Product allow-list for the "Micro" aggregate (MBM unit only)
pub const MICRO_PRODUCTS: [&str; 2] = ["KUR", "KUM"];

/// Supervisor detection: role contains MBM, BOS or BM as a whole token,
/// case-insensitive
///
/// "BOS Supervisor" and "bm" match; "Bosun" does not.
pub fn is_supervisor(role: &str) -> bool {
    role.split(|c: char| !c.is_alphanumeric())
        .any(|token| {
            token.eq_ignore_ascii_case("MBM")
                || token.eq_ignore_ascii_case("BOS")
                || token.eq_ignore_ascii_case("BM")
        })
}

/// Sum of all achievement amounts for a unit's non-supervisor members
pub fn unit_total(snapshot: &Snapshot, unit: Unit) -> f64 {
    sum_for_unit(snapshot, unit, None)
}

/// Unit total restricted to a product allow-list (case-insensitive)
pub fn unit_product_total(snapshot: &Snapshot, unit: Unit, products: &[&str]) -> f64 {
    sum_for_unit(snapshot, unit, Some(products))
}

/// The "Micro" aggregate: KUR/KUM within the MBM unit
pub fn micro_total(snapshot: &Snapshot) -> f64 {
    unit_product_total(snapshot, Unit::Mbm, &MICRO_PRODUCTS)
}

fn sum_for_unit(snapshot: &Snapshot, unit: Unit, products: Option<&[&str]>) -> f64 {
    let allow_list: Option<Vec<String>> =
        products.map(|names| names.iter().map(|n| n.to_lowercase()).collect());

    snapshot
        .achievements
        .iter()
        .filter_map(|a| {
            let person = snapshot.person(&a.person_id)?;
            if person.unit != unit || is_supervisor(&person.role) {
                return None;
            }
            if let Some(list) = &allow_list {
                if !list.contains(&a.product.to_lowercase()) {
                    return None;
                }
            }
            Some(if a.amount.is_finite() { a.amount } else { 0.0 })
        })
        .sum()
}
