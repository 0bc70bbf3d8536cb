//! View composer: dashboard data contracts
//!
//! Pure projection over a fresh aggregation snapshot; no math beyond
//! what the engine provides. A cell is absent (`null`) when the person
//! is not permitted for the product, which hides historical credit on a
//! revoked product from the per-product grid.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{Datelike, Local};
use serde::Serialize;
use std::str::FromStr;
use tmb_common::aggregate::{
    is_supervisor, micro_total, percent, unit_total, PersonProductIndex, Snapshot,
};
use tmb_common::api::types::ApiOk;
use tmb_common::db::models::{Person, Product, Unit};
use tmb_common::Error;

use crate::api::ApiError;
use crate::AppState;

/// One person-product cell of a dashboard grid
#[derive(Debug, Serialize)]
pub struct CellView {
    pub value: f64,
    pub target: f64,
    /// Bar percentage; absent when the target is 0 ("no goal")
    pub percent: Option<u8>,
}

/// One person row, cells aligned with the section's product columns
#[derive(Debug, Serialize)]
pub struct PersonRowView {
    pub id: String,
    pub name: String,
    pub role: String,
    /// `None` = not permitted for that product (rendered as a dash)
    pub cells: Vec<Option<CellView>>,
}

/// One unit's grid: visible product columns and member rows
#[derive(Debug, Serialize)]
pub struct UnitSectionView {
    pub unit: Unit,
    pub products: Vec<Product>,
    pub rows: Vec<PersonRowView>,
}

/// GET /api/views/overview response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewView {
    pub member_count: usize,
    pub entries_this_month: usize,
    pub micro_total: f64,
    pub operational_total: f64,
    pub sections: Vec<UnitSectionView>,
}

/// GET /api/views/unit/:unit response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitBoardView {
    pub unit: Unit,
    pub unit_total: f64,
    pub section: UnitSectionView,
    pub recent_entries: Vec<RecentEntry>,
}

/// One line of the "latest entries" table
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    pub id: String,
    pub date: String,
    pub person_id: String,
    pub name: String,
    pub product: String,
    pub amount: f64,
}

/// One person card on the individuals view
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualView {
    pub id: String,
    pub name: String,
    pub role: String,
    pub unit: Unit,
    pub products: Vec<IndividualProductView>,
}

#[derive(Debug, Serialize)]
pub struct IndividualProductView {
    pub name: String,
    pub kind: tmb_common::db::models::ProductKind,
    pub value: f64,
    pub target: f64,
    pub percent: Option<u8>,
}

/// GET /api/views/overview
pub async fn overview(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<OverviewView>>, ApiError> {
    let snapshot = Snapshot::load(&state.db).await?;
    let index = PersonProductIndex::from_achievements(&snapshot.achievements);

    let member_count = snapshot
        .persons
        .iter()
        .filter(|p| p.unit != Unit::Lead)
        .count();

    let now = Local::now().date_naive();
    let month_prefix = format!("{:04}-{:02}", now.year(), now.month());
    let entries_this_month = snapshot
        .achievements
        .iter()
        .filter(|a| a.date.starts_with(&month_prefix))
        .count();

    let sections = Unit::DASHBOARD_UNITS
        .iter()
        .map(|unit| unit_section(&snapshot, &index, *unit))
        .collect();

    Ok(Json(ApiOk::new(OverviewView {
        member_count,
        entries_this_month,
        micro_total: micro_total(&snapshot),
        operational_total: unit_total(&snapshot, Unit::Bos),
        sections,
    })))
}

/// GET /api/views/unit/:unit
pub async fn unit_board(
    State(state): State<AppState>,
    Path(unit): Path<String>,
) -> Result<Json<ApiOk<UnitBoardView>>, ApiError> {
    let unit = Unit::from_str(&unit)?;
    if unit == Unit::Lead {
        return Err(Error::InvalidInput("LEAD has no unit board".to_string()).into());
    }

    let snapshot = Snapshot::load(&state.db).await?;
    let index = PersonProductIndex::from_achievements(&snapshot.achievements);

    let mut recent: Vec<RecentEntry> = snapshot
        .achievements
        .iter()
        .filter_map(|a| {
            let person = snapshot.person(&a.person_id)?;
            (person.unit == unit).then(|| RecentEntry {
                id: a.id.clone(),
                date: a.date.clone(),
                person_id: a.person_id.clone(),
                name: person.name.clone(),
                product: a.product.clone(),
                amount: a.amount,
            })
        })
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    recent.truncate(25);

    Ok(Json(ApiOk::new(UnitBoardView {
        unit,
        unit_total: unit_total(&snapshot, unit),
        section: unit_section(&snapshot, &index, unit),
        recent_entries: recent,
    })))
}

/// GET /api/views/individuals
pub async fn individuals(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<Vec<IndividualView>>>, ApiError> {
    let snapshot = Snapshot::load(&state.db).await?;
    let index = PersonProductIndex::from_achievements(&snapshot.achievements);

    let cards = snapshot
        .persons
        .iter()
        .filter(|p| p.unit != Unit::Lead && !is_supervisor(&p.role))
        .map(|p| IndividualView {
            id: p.id.clone(),
            name: p.name.clone(),
            role: p.role.clone(),
            unit: p.unit,
            products: snapshot
                .products
                .iter()
                .filter(|cfg| snapshot.is_allowed(&p.id, &cfg.name))
                .map(|cfg| {
                    let value = index.get(&p.id, &cfg.name);
                    let target = snapshot.target(&p.id, &cfg.name);
                    IndividualProductView {
                        name: cfg.name.clone(),
                        kind: cfg.kind,
                        value,
                        target,
                        percent: percent(value, target),
                    }
                })
                .collect(),
        })
        .collect();

    Ok(Json(ApiOk::new(cards)))
}

/// Build one unit's grid section
///
/// Columns are the products permitted for at least one member;
/// supervisors are not members for display purposes either.
fn unit_section(snapshot: &Snapshot, index: &PersonProductIndex, unit: Unit) -> UnitSectionView {
    let members: Vec<&Person> = snapshot
        .persons
        .iter()
        .filter(|p| p.unit == unit && !is_supervisor(&p.role))
        .collect();

    let products: Vec<Product> = snapshot
        .products
        .iter()
        .filter(|cfg| members.iter().any(|p| snapshot.is_allowed(&p.id, &cfg.name)))
        .cloned()
        .collect();

    let rows = members
        .iter()
        .map(|p| PersonRowView {
            id: p.id.clone(),
            name: p.name.clone(),
            role: p.role.clone(),
            cells: products
                .iter()
                .map(|cfg| {
                    snapshot.is_allowed(&p.id, &cfg.name).then(|| {
                        let value = index.get(&p.id, &cfg.name);
                        let target = snapshot.target(&p.id, &cfg.name);
                        CellView {
                            value,
                            target,
                            percent: percent(value, target),
                        }
                    })
                })
                .collect(),
        })
        .collect();

    UnitSectionView {
        unit,
        products,
        rows,
    }
}
