//! Achievement aggregation and fair-ranking engine
//!
//! Pure, synchronous functions over an in-memory [`Snapshot`] of the
//! record store. Every view refresh and export loads a fresh snapshot
//! and recomputes from scratch; there is no incremental update model.

pub mod category;
pub mod index;
pub mod progress;
pub mod score;
pub mod totals;
pub mod window;

pub use category::default_category;
pub use index::PersonProductIndex;
pub use progress::{percent, ratio};
pub use score::{fairness_score, leaderboards, LeaderboardEntry, Leaderboards};
pub use totals::{is_supervisor, micro_total, unit_product_total, unit_total, MICRO_PRODUCTS};
pub use window::MonthWindow;

use crate::db::models::{Achievement, AllowedMap, Person, Product, TargetMap};
use crate::db::store;
use crate::Result;
use sqlx::SqlitePool;

/// In-memory snapshot of the record store
///
/// Aggregation never assumes write-time invariants hold for historical
/// data: achievements for revoked (person, product) pairs are still
/// present and still sum.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub persons: Vec<Person>,
    pub products: Vec<Product>,
    pub achievements: Vec<Achievement>,
    pub targets: TargetMap,
    pub allowed: AllowedMap,
}

impl Snapshot {
    /// Load a fresh snapshot from the store
    pub async fn load(pool: &SqlitePool) -> Result<Snapshot> {
        Ok(Snapshot {
            persons: store::list_persons(pool).await?,
            products: store::list_products(pool).await?,
            achievements: store::list_all_achievements(pool).await?,
            targets: store::load_targets(pool).await?,
            allowed: store::load_allowed(pool).await?,
        })
    }

    /// Target for a (person, product) pair; absent pair reads as 0
    pub fn target(&self, person_id: &str, product: &str) -> f64 {
        self.targets
            .get(person_id)
            .and_then(|m| m.get(product))
            .copied()
            .unwrap_or(0.0)
    }

    /// Permission for a (person, product) pair; absent pair reads as false
    pub fn is_allowed(&self, person_id: &str, product: &str) -> bool {
        self.allowed
            .get(person_id)
            .and_then(|m| m.get(product))
            .copied()
            .unwrap_or(false)
    }

    /// Look up a person by id
    pub fn person(&self, person_id: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == person_id)
    }

    /// Achievements falling inside a month window, in snapshot order
    pub fn achievements_in(&self, window: &MonthWindow) -> Vec<&Achievement> {
        self.achievements
            .iter()
            .filter(|a| window.contains(&a.date))
            .collect()
    }
}
