//! Fairness score and leaderboard ranking
//!
//! The fairness score is a person's average clamped goal-completion
//! fraction across only the products they are permitted for and which
//! carry a nonzero target. Products with no target neither penalize nor
//! inflate the score.

use crate::aggregate::index::PersonProductIndex;
use crate::aggregate::progress::ratio;
use crate::aggregate::window::MonthWindow;
use crate::aggregate::Snapshot;
use crate::db::models::{Category, Unit};
use serde::Serialize;

/// One ranked leaderboard row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based rank, assigned after sorting
    pub rank: usize,
    pub person_id: String,
    pub name: String,
    pub role: String,
    pub unit: Unit,
    /// Average goal-completion fraction in `[0, 1]`
    pub score: f64,
    /// Sum of all achievement amounts in the window
    pub total: f64,
}

/// The two independent category leaderboards for one window
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboards {
    pub mikro: Vec<LeaderboardEntry>,
    pub operasional: Vec<LeaderboardEntry>,
}

/// Average clamped ratio across counted products
///
/// Returns `(score, counted_products)`. Products the person is not
/// permitted for are skipped entirely; permitted products with a zero
/// target contribute to neither sum. Zero counted products scores
/// exactly 0.
pub fn fairness_score(
    snapshot: &Snapshot,
    index: &PersonProductIndex,
    person_id: &str,
) -> (f64, u32) {
    let mut counted: u32 = 0;
    let mut sum_ratio = 0.0;

    for cfg in &snapshot.products {
        if !snapshot.is_allowed(person_id, &cfg.name) {
            continue;
        }
        let value = index.get(person_id, &cfg.name);
        if let Some(r) = ratio(value, snapshot.target(person_id, &cfg.name)) {
            sum_ratio += r;
            counted += 1;
        }
    }

    if counted > 0 {
        (sum_ratio / counted as f64, counted)
    } else {
        (0.0, 0)
    }
}

/// Ranked MIKRO and OPERASIONAL leaderboards for one month window
///
/// Within each category: descending score, ties broken by descending
/// window total, remaining ties stable by enumeration order. A person
/// with zero counted products and a zero window total is omitted.
pub fn leaderboards(snapshot: &Snapshot, window: &MonthWindow) -> Leaderboards {
    let index = PersonProductIndex::from_achievements(
        snapshot.achievements_in(window).into_iter(),
    );

    let mut mikro = Vec::new();
    let mut operasional = Vec::new();

    for person in &snapshot.persons {
        if person.unit == Unit::Lead {
            continue;
        }

        let (score, counted) = fairness_score(snapshot, &index, &person.id);
        let total = index.person_total(&person.id);

        if counted == 0 && total == 0.0 {
            continue;
        }

        let entry = LeaderboardEntry {
            rank: 0,
            person_id: person.id.clone(),
            name: person.name.clone(),
            role: person.role.clone(),
            unit: person.unit,
            score,
            total,
        };

        match person.category {
            Category::Mikro => mikro.push(entry),
            Category::Operasional => operasional.push(entry),
        }
    }

    rank(&mut mikro);
    rank(&mut operasional);

    Leaderboards { mikro, operasional }
}

fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.total
                    .partial_cmp(&a.total)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Achievement, Person, Product, ProductKind};

    fn person(id: &str, category: Category) -> Person {
        Person {
            id: id.to_string(),
            name: id.to_string(),
            role: "SGP".to_string(),
            unit: Unit::Mbm,
            category,
        }
    }

    fn product(name: &str) -> Product {
        Product {
            name: name.to_string(),
            kind: ProductKind::Money,
        }
    }

    fn ach(id: &str, person: &str, product: &str, amount: f64, date: &str) -> Achievement {
        Achievement {
            id: id.to_string(),
            person_id: person.to_string(),
            product: product.to_string(),
            amount,
            date: date.to_string(),
        }
    }

    fn base_snapshot() -> Snapshot {
        Snapshot {
            persons: vec![person("p1", Category::Mikro), person("p2", Category::Mikro)],
            products: vec![product("KUR"), product("KUM")],
            ..Default::default()
        }
    }

    fn allow(snapshot: &mut Snapshot, person: &str, product: &str) {
        snapshot
            .allowed
            .entry(person.to_string())
            .or_default()
            .insert(product.to_string(), true);
    }

    fn target(snapshot: &mut Snapshot, person: &str, product: &str, value: f64) {
        snapshot
            .targets
            .entry(person.to_string())
            .or_default()
            .insert(product.to_string(), value);
    }

    #[test]
    fn test_score_averages_counted_products_only() {
        let mut snap = base_snapshot();
        allow(&mut snap, "p1", "KUR");
        allow(&mut snap, "p1", "KUM");
        target(&mut snap, "p1", "KUR", 100.0);
        // KUM has no target: not counted, no penalty

        snap.achievements = vec![ach("a1", "p1", "KUR", 30.0, "2024-03-05")];

        let idx = PersonProductIndex::from_achievements(&snap.achievements);
        let (score, counted) = fairness_score(&snap, &idx, "p1");

        assert_eq!(counted, 1);
        assert!((score - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_score_skips_unpermitted_products() {
        let mut snap = base_snapshot();
        // Permitted for KUR only; KUM would be a perfect 1.0
        allow(&mut snap, "p1", "KUR");
        target(&mut snap, "p1", "KUR", 100.0);
        target(&mut snap, "p1", "KUM", 10.0);

        snap.achievements = vec![
            ach("a1", "p1", "KUR", 50.0, "2024-03-05"),
            ach("a2", "p1", "KUM", 10.0, "2024-03-05"),
        ];

        let idx = PersonProductIndex::from_achievements(&snap.achievements);
        let (score, counted) = fairness_score(&snap, &idx, "p1");

        assert_eq!(counted, 1);
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounds() {
        let mut snap = base_snapshot();
        allow(&mut snap, "p1", "KUR");
        target(&mut snap, "p1", "KUR", 100.0);

        // Overachievement clamps at 1
        snap.achievements = vec![ach("a1", "p1", "KUR", 5000.0, "2024-03-05")];
        let idx = PersonProductIndex::from_achievements(&snap.achievements);
        let (score, _) = fairness_score(&snap, &idx, "p1");
        assert_eq!(score, 1.0);

        // Zero counted products scores exactly 0
        let (score, counted) = fairness_score(&snap, &idx, "p2");
        assert_eq!((score, counted), (0.0, 0));
    }

    #[test]
    fn test_leaderboard_orders_by_score() {
        let mut snap = base_snapshot();
        for p in ["p1", "p2"] {
            allow(&mut snap, p, "KUR");
            target(&mut snap, p, "KUR", 100.0);
        }

        snap.achievements = vec![
            ach("a1", "p1", "KUR", 80.0, "2024-03-05"),
            ach("a2", "p2", "KUR", 50.0, "2024-03-06"),
        ];

        let window = MonthWindow::parse("2024-03").unwrap();
        let boards = leaderboards(&snap, &window);

        assert_eq!(boards.mikro.len(), 2);
        assert_eq!(boards.mikro[0].person_id, "p1");
        assert_eq!(boards.mikro[0].rank, 1);
        assert_eq!(boards.mikro[1].person_id, "p2");
        assert_eq!(boards.mikro[1].rank, 2);
        assert!(boards.operasional.is_empty());
    }

    #[test]
    fn test_leaderboard_ties_break_on_window_total() {
        let mut snap = base_snapshot();
        for p in ["p1", "p2"] {
            allow(&mut snap, p, "KUR");
            allow(&mut snap, p, "KUM");
            target(&mut snap, p, "KUR", 1000.0);
        }

        // Equal scores (0.5), different window totals via untargeted KUM
        snap.achievements = vec![
            ach("a1", "p1", "KUR", 500.0, "2024-03-05"),
            ach("a2", "p2", "KUR", 500.0, "2024-03-05"),
            ach("a3", "p2", "KUM", 500.0, "2024-03-06"),
        ];

        let window = MonthWindow::parse("2024-03").unwrap();
        let boards = leaderboards(&snap, &window);

        assert_eq!(boards.mikro[0].person_id, "p2");
        assert_eq!(boards.mikro[0].total, 1000.0);
        assert_eq!(boards.mikro[1].person_id, "p1");
        assert_eq!(boards.mikro[1].total, 500.0);
    }

    #[test]
    fn test_leaderboard_window_filters_achievements() {
        let mut snap = base_snapshot();
        allow(&mut snap, "p1", "KUR");
        target(&mut snap, "p1", "KUR", 100.0);

        snap.achievements = vec![
            ach("a1", "p1", "KUR", 100.0, "2024-02-28"),
            ach("a2", "p1", "KUR", 25.0, "2024-03-05"),
        ];

        let window = MonthWindow::parse("2024-03").unwrap();
        let boards = leaderboards(&snap, &window);

        assert!((boards.mikro[0].score - 0.25).abs() < 1e-9);
        assert_eq!(boards.mikro[0].total, 25.0);
    }

    #[test]
    fn test_leaderboard_omits_idle_uncounted_person() {
        let mut snap = base_snapshot();
        // p1 counted (has a target), p2 has neither targets nor entries
        allow(&mut snap, "p1", "KUR");
        target(&mut snap, "p1", "KUR", 100.0);

        let window = MonthWindow::parse("2024-03").unwrap();
        let boards = leaderboards(&snap, &window);

        assert_eq!(boards.mikro.len(), 1);
        assert_eq!(boards.mikro[0].person_id, "p1");
        assert_eq!(boards.mikro[0].score, 0.0);
    }

    #[test]
    fn test_leaderboard_partitions_by_category() {
        let mut snap = base_snapshot();
        snap.persons.push(person("p3", Category::Operasional));
        for p in ["p1", "p3"] {
            allow(&mut snap, p, "KUR");
            target(&mut snap, p, "KUR", 100.0);
        }

        snap.achievements = vec![
            ach("a1", "p1", "KUR", 10.0, "2024-03-05"),
            ach("a2", "p3", "KUR", 90.0, "2024-03-05"),
        ];

        let window = MonthWindow::parse("2024-03").unwrap();
        let boards = leaderboards(&snap, &window);

        assert_eq!(boards.mikro.len(), 1);
        assert_eq!(boards.mikro[0].person_id, "p1");
        assert_eq!(boards.operasional.len(), 1);
        assert_eq!(boards.operasional[0].person_id, "p3");
        assert_eq!(boards.operasional[0].rank, 1);
    }
}
