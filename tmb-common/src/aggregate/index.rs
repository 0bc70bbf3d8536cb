//! Person-product index
//!
//! Two-level mapping `person_id -> product -> sum(amount)` over a
//! collection of achievements. Backs every per-cell progress display
//! and every fairness-score computation.

use crate::db::models::Achievement;
use std::collections::HashMap;

/// Summed achievement amounts, indexed by person then product
#[derive(Debug, Clone, Default)]
pub struct PersonProductIndex {
    by_person: HashMap<String, HashMap<String, f64>>,
}

impl PersonProductIndex {
    /// Build the index by plain addition over all records
    ///
    /// Non-finite amounts contribute 0.
    pub fn from_achievements<'a, I>(achievements: I) -> Self
    where
        I: IntoIterator<Item = &'a Achievement>,
    {
        let mut by_person: HashMap<String, HashMap<String, f64>> = HashMap::new();

        for a in achievements {
            let amount = if a.amount.is_finite() { a.amount } else { 0.0 };
            *by_person
                .entry(a.person_id.clone())
                .or_default()
                .entry(a.product.clone())
                .or_insert(0.0) += amount;
        }

        Self { by_person }
    }

    /// Sum for a (person, product) pair; absent pair returns 0
    pub fn get(&self, person_id: &str, product: &str) -> f64 {
        self.by_person
            .get(person_id)
            .and_then(|m| m.get(product))
            .copied()
            .unwrap_or(0.0)
    }

    /// Grand total across all products for one person
    pub fn person_total(&self, person_id: &str) -> f64 {
        self.by_person
            .get(person_id)
            .map(|m| m.values().sum())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ach(person: &str, product: &str, amount: f64) -> Achievement {
        Achievement {
            id: format!("{}-{}-{}", person, product, amount),
            person_id: person.to_string(),
            product: product.to_string(),
            amount,
            date: "2024-03-10".to_string(),
        }
    }

    #[test]
    fn test_index_sums_by_person_and_product() {
        let achievements = vec![
            ach("p1", "KUR", 100.0),
            ach("p1", "KUR", 50.0),
            ach("p2", "KUR", 10.0),
        ];

        let idx = PersonProductIndex::from_achievements(&achievements);

        assert_eq!(idx.get("p1", "KUR"), 150.0);
        assert_eq!(idx.get("p2", "KUR"), 10.0);
    }

    #[test]
    fn test_absent_pair_returns_zero() {
        let achievements = vec![ach("p1", "KUR", 100.0)];
        let idx = PersonProductIndex::from_achievements(&achievements);

        assert_eq!(idx.get("p1", "LIVIN"), 0.0);
        assert_eq!(idx.get("p3", "KUR"), 0.0);
        assert_eq!(idx.person_total("p3"), 0.0);
    }

    #[test]
    fn test_non_finite_amounts_treated_as_zero() {
        let achievements = vec![
            ach("p1", "KUR", 100.0),
            ach("p1", "KUR", f64::NAN),
            ach("p1", "KUR", f64::INFINITY),
        ];

        let idx = PersonProductIndex::from_achievements(&achievements);

        assert_eq!(idx.get("p1", "KUR"), 100.0);
    }

    #[test]
    fn test_person_total_spans_products() {
        let achievements = vec![
            ach("p1", "KUR", 100.0),
            ach("p1", "LIVIN", 3.0),
        ];

        let idx = PersonProductIndex::from_achievements(&achievements);

        assert_eq!(idx.person_total("p1"), 103.0);
    }
}
