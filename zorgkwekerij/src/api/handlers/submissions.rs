//! HTTP handlers for the four submission endpoints and the read-back endpoint.

use crate::AppState;
use crate::api::models::submissions::{SubmissionCreated, SubmissionList, SubmissionsQuery};
use crate::db;
use crate::errors::{Error, Result};
use crate::schemas::EntityKind;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;

/// Default number of documents returned by the read-back endpoint.
const DEFAULT_LIMIT: i64 = 10;
/// Clamp bounds for the caller-supplied limit.
const MIN_LIMIT: i64 = 1;
const MAX_LIMIT: i64 = 100;

/// Resolve the caller-supplied limit: default when absent, clamped otherwise.
fn effective_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(MIN_LIMIT, MAX_LIMIT)
}

/// Validate a submission body and persist it into the kind's collection.
///
/// Shared by all four write endpoints; only the entity kind differs.
async fn insert_submission(state: &AppState, kind: EntityKind, body: &Value) -> Result<(StatusCode, Json<SubmissionCreated>)> {
    let record = kind.validate(body).map_err(|errors| Error::Validation { errors })?;

    let pool = state.db.as_ref().ok_or(Error::DatabaseUnavailable)?;

    let created = db::documents::create_document(pool, kind.collection(), record)
        .await?
        .ok_or(Error::Internal {
            operation: "create document".to_string(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SubmissionCreated {
            success: true,
            id: created.id.to_string(),
        }),
    ))
}

/// Submit a client application
#[utoipa::path(
    post,
    path = "/api/applications/clients",
    tag = "submissions",
    summary = "Submit a client application",
    responses(
        (status = 201, description = "Submission stored", body = SubmissionCreated),
        (status = 422, description = "Validation failed, response lists every offending field"),
        (status = 500, description = "Document could not be stored"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn submit_client_application(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SubmissionCreated>)> {
    insert_submission(&state, EntityKind::ClientApplication, &body).await
}

/// Submit a partner inquiry
#[utoipa::path(
    post,
    path = "/api/inquiries/partners",
    tag = "submissions",
    summary = "Submit a partner inquiry",
    responses(
        (status = 201, description = "Submission stored", body = SubmissionCreated),
        (status = 422, description = "Validation failed, response lists every offending field"),
        (status = 500, description = "Document could not be stored"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn submit_partner_inquiry(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SubmissionCreated>)> {
    insert_submission(&state, EntityKind::PartnerInquiry, &body).await
}

/// Submit a volunteer application
#[utoipa::path(
    post,
    path = "/api/applications/volunteers",
    tag = "submissions",
    summary = "Submit a volunteer application",
    responses(
        (status = 201, description = "Submission stored", body = SubmissionCreated),
        (status = 422, description = "Validation failed, response lists every offending field"),
        (status = 500, description = "Document could not be stored"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn submit_volunteer_application(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SubmissionCreated>)> {
    insert_submission(&state, EntityKind::VolunteerApplication, &body).await
}

/// Submit a contact message
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "submissions",
    summary = "Submit a contact message",
    responses(
        (status = 201, description = "Submission stored", body = SubmissionCreated),
        (status = 422, description = "Validation failed, response lists every offending field"),
        (status = 500, description = "Document could not be stored"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn submit_contact_message(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<SubmissionCreated>)> {
    insert_submission(&state, EntityKind::ContactMessage, &body).await
}

/// Read back the latest submissions from one collection
#[utoipa::path(
    get,
    path = "/api/submissions/{collection}",
    tag = "submissions",
    summary = "Latest submissions",
    params(
        ("collection" = String, Path, description = "One of the four known collection names"),
        SubmissionsQuery,
    ),
    responses(
        (status = 200, description = "Latest documents, newest first", body = SubmissionList),
        (status = 400, description = "Collection name outside the allow-list"),
        (status = 500, description = "Document store unavailable"),
    )
)]
#[tracing::instrument(skip_all, fields(collection = %collection))]
pub async fn get_latest_submissions(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<SubmissionsQuery>,
) -> Result<Json<SubmissionList>> {
    let kind = EntityKind::from_collection(&collection).ok_or(Error::InvalidCollection { name: collection })?;

    let pool = state.db.as_ref().ok_or(Error::DatabaseUnavailable)?;

    let limit = effective_limit(query.limit);
    let filter = serde_json::Map::new();
    let documents = db::documents::get_documents(pool, kind.collection(), &filter, limit).await?;

    let items = documents.into_iter().map(|doc| doc.into_item()).collect();
    Ok(Json(SubmissionList { items }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_when_absent() {
        assert_eq!(effective_limit(None), DEFAULT_LIMIT);
    }

    #[test]
    fn limit_is_clamped_at_both_ends() {
        assert_eq!(effective_limit(Some(0)), 1);
        assert_eq!(effective_limit(Some(-5)), 1);
        assert_eq!(effective_limit(Some(10_000)), 100);
        assert_eq!(effective_limit(Some(3)), 3);
    }
}
