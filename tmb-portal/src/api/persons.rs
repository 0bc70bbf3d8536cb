//! Person management
//!
//! Bulk upsert and single delete. Deleting a person cascades to their
//! achievements, targets and permissions in one transaction. The LEAD
//! person is the organizational root: it can be renamed but never
//! deleted, and no second LEAD may appear.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tmb_common::aggregate::default_category;
use tmb_common::api::types::ApiOk;
use tmb_common::db::models::{Category, Person, Unit};
use tmb_common::db::store;
use tmb_common::Error;
use uuid::Uuid;

use crate::api::ApiError;
use crate::AppState;

/// Incoming person payload
#[derive(Debug, Deserialize)]
pub struct PersonPayload {
    /// Empty or missing id: server assigns a UUID
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub role: String,
    pub unit: Unit,
    /// Defaults from role/unit when absent
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Deserialize)]
pub struct UpsertPersonsRequest {
    pub persons: Vec<PersonPayload>,
}

#[derive(Debug, Serialize)]
pub struct UpsertPersonsResponse {
    pub count: usize,
    pub persons: Vec<Person>,
}

/// GET /api/persons
pub async fn list_persons(
    State(state): State<AppState>,
) -> Result<Json<ApiOk<Vec<Person>>>, ApiError> {
    let persons = store::list_persons(&state.db).await?;
    Ok(Json(ApiOk::new(persons)))
}

/// POST /api/persons
///
/// Insert or update by id, idempotent. Triggers the target/permission
/// grid backfill so every person holds an entry for every product.
pub async fn upsert_persons(
    State(state): State<AppState>,
    Json(request): Json<UpsertPersonsRequest>,
) -> Result<Json<ApiOk<UpsertPersonsResponse>>, ApiError> {
    if request.persons.is_empty() {
        return Err(Error::InvalidInput("No persons".to_string()).into());
    }

    let existing_lead = store::list_persons(&state.db)
        .await?
        .into_iter()
        .find(|p| p.unit == Unit::Lead);

    let mut persons = Vec::with_capacity(request.persons.len());
    for payload in request.persons {
        let name = payload.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidInput("Person name is required".to_string()).into());
        }

        let id = match payload.id.map(|s| s.trim().to_string()) {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };

        // Exactly one organizational root: a LEAD upsert may only
        // target the existing LEAD row
        if payload.unit == Unit::Lead {
            match &existing_lead {
                Some(lead) if lead.id == id => {}
                _ => {
                    return Err(Error::InvalidInput(
                        "Exactly one LEAD person is allowed".to_string(),
                    )
                    .into())
                }
            }
        }

        let role = if payload.role.trim().is_empty() {
            "Staff".to_string()
        } else {
            payload.role.trim().to_string()
        };

        let category = payload
            .category
            .unwrap_or_else(|| default_category(&role, payload.unit));

        persons.push(Person {
            id,
            name,
            role,
            unit: payload.unit,
            category,
        });
    }

    store::upsert_persons(&state.db, &persons).await?;
    store::ensure_product_grid(&state.db).await?;

    Ok(Json(ApiOk::new(UpsertPersonsResponse {
        count: persons.len(),
        persons,
    })))
}

/// DELETE /api/persons/:id
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiOk<()>>, ApiError> {
    store::delete_person(&state.db, &id).await?;
    Ok(Json(ApiOk::new(())))
}
