//! Monthly CSV export
//!
//! One row per achievement in the window, joined to its person, followed
//! by the two category leaderboard tables computed over the same window.
//! Numbers are plain decimal text, never currency-formatted.

use crate::aggregate::{leaderboards, LeaderboardEntry, MonthWindow, Snapshot};
use crate::db::models::Category;

/// Escape a single CSV field
///
/// A field containing the delimiter, a double quote, CR or LF is wrapped
/// in double quotes with internal quotes doubled.
pub fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Plain decimal amount: integral values print without a fraction
pub fn fmt_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

/// Render the monthly recap CSV for one window
pub fn monthly_export(snapshot: &Snapshot, window: &MonthWindow) -> String {
    let mut lines = Vec::new();

    lines.push("date,name,role,unit,product,amount".to_string());

    let mut entries = snapshot.achievements_in(window);
    entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    for a in entries {
        // A deleted person leaves the raw id behind
        let (name, role, unit) = match snapshot.person(&a.person_id) {
            Some(p) => (p.name.clone(), p.role.clone(), p.unit.as_str().to_string()),
            None => (a.person_id.clone(), "-".to_string(), "-".to_string()),
        };

        lines.push(format!(
            "{},{},{},{},{},{}",
            csv_field(&a.date),
            csv_field(&name),
            csv_field(&role),
            csv_field(&unit),
            csv_field(&a.product),
            fmt_amount(a.amount),
        ));
    }

    let boards = leaderboards(snapshot, window);
    push_leaderboard(&mut lines, Category::Mikro, &boards.mikro);
    push_leaderboard(&mut lines, Category::Operasional, &boards.operasional);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_leaderboard(lines: &mut Vec<String>, category: Category, entries: &[LeaderboardEntry]) {
    lines.push(String::new());
    lines.push(category.as_str().to_string());
    lines.push("rank,name,role,unit,score,total".to_string());

    for e in entries {
        lines.push(format!(
            "{},{},{},{},{:.4},{}",
            e.rank,
            csv_field(&e.name),
            csv_field(&e.role),
            csv_field(e.unit.as_str()),
            e.score,
            fmt_amount(e.total),
        ));
    }
}
