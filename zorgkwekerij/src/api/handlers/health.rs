//! Liveness and diagnostic endpoints.

use crate::AppState;
use crate::api::models::diagnostics::{DatabaseProbe, DiagnosticReport, RootMessage};
use crate::db;
use axum::{extract::State, response::Json};
use sqlx::PgPool;

/// How many collection names the diagnostic probe reports at most.
const COLLECTION_LIST_LIMIT: i64 = 10;

/// Static liveness acknowledgement
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    summary = "Liveness check",
    responses(
        (status = 200, description = "Service is running", body = RootMessage),
    )
)]
pub async fn read_root() -> Json<RootMessage> {
    Json(RootMessage {
        message: "Zorgkwekerij API running".to_string(),
    })
}

/// Best-effort database diagnostic
#[utoipa::path(
    get,
    path = "/test",
    tag = "health",
    summary = "Database diagnostic",
    description = "Probes the persistence backend and reports its state. Never fails: \
                   probe errors are rendered as degraded status strings.",
    responses(
        (status = 200, description = "Diagnostic report", body = DiagnosticReport),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticReport> {
    let probe = match state.db.as_ref() {
        None => DatabaseProbe::HandleAbsent,
        Some(pool) => probe_pool(pool).await,
    };

    let database_url_set = state.config.database_url.is_some();
    Json(DiagnosticReport::from_probe(probe, database_url_set))
}

/// Walk the probe stages against a live handle, stopping at the first failure.
async fn probe_pool(pool: &PgPool) -> DatabaseProbe {
    let name = match db::documents::database_name(pool).await {
        Ok(name) => name,
        Err(e) => {
            return DatabaseProbe::ConnectionFailed { error: truncate(&e.to_string()) };
        }
    };

    match db::documents::list_collections(pool, COLLECTION_LIST_LIMIT).await {
        Ok(collections) => DatabaseProbe::Working { name, collections },
        Err(e) => DatabaseProbe::ListingFailed {
            name,
            error: truncate(&e.to_string()),
        },
    }
}

/// Keep probe error strings short enough for a status line.
fn truncate(message: &str) -> String {
    const MAX: usize = 120;
    if message.len() <= MAX {
        message.to_string()
    } else {
        let cut = message
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &message[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_messages_alone() {
        assert_eq!(truncate("connection refused"), "connection refused");
    }

    #[test]
    fn truncate_cuts_long_messages() {
        let long = "x".repeat(500);
        let cut = truncate(&long);
        assert!(cut.len() < 130);
        assert!(cut.ends_with("..."));
    }
}
