use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of the best-effort database probe behind `GET /test`.
///
/// Each failure mode gets its own variant instead of a catch-all, so the
/// rendered status string says exactly where the probe stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseProbe {
    /// No handle was configured at startup
    HandleAbsent,
    /// A handle exists but the connection test failed
    ConnectionFailed { error: String },
    /// Connected, but listing collection names failed
    ListingFailed { name: String, error: String },
    /// Connected and fully working
    Working { name: String, collections: Vec<String> },
}

/// Diagnostic object returned by `GET /test`.
///
/// This is informational output for operators, never an error response:
/// whatever the probe finds is folded into these strings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiagnosticReport {
    /// Service process status, always "running" if the request was answered
    pub backend: String,
    /// Database reachability summary
    pub database: String,
    /// Whether a connection string is configured ("set" / "not set")
    pub database_url: String,
    /// Name of the connected database, or "unknown"
    pub database_name: String,
    /// Connection status ("connected" / "not connected")
    pub connection_status: String,
    /// Up to 10 collection names, empty when listing was not possible
    pub collections: Vec<String>,
}

impl DiagnosticReport {
    /// Render a probe outcome into the operator-facing report.
    pub fn from_probe(probe: DatabaseProbe, database_url_set: bool) -> Self {
        let database_url = if database_url_set { "set" } else { "not set" }.to_string();

        match probe {
            DatabaseProbe::HandleAbsent => Self {
                backend: "running".to_string(),
                database: "not configured".to_string(),
                database_url,
                database_name: "unknown".to_string(),
                connection_status: "not connected".to_string(),
                collections: Vec::new(),
            },
            DatabaseProbe::ConnectionFailed { error } => Self {
                backend: "running".to_string(),
                database: format!("connection failed: {error}"),
                database_url,
                database_name: "unknown".to_string(),
                connection_status: "not connected".to_string(),
                collections: Vec::new(),
            },
            DatabaseProbe::ListingFailed { name, error } => Self {
                backend: "running".to_string(),
                database: format!("connected but listing failed: {error}"),
                database_url,
                database_name: name,
                connection_status: "connected".to_string(),
                collections: Vec::new(),
            },
            DatabaseProbe::Working { name, collections } => Self {
                backend: "running".to_string(),
                database: "connected and working".to_string(),
                database_url,
                database_name: name,
                connection_status: "connected".to_string(),
                collections,
            },
        }
    }
}

/// Static liveness message for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_absent_renders_degraded_but_well_formed() {
        let report = DiagnosticReport::from_probe(DatabaseProbe::HandleAbsent, false);
        assert_eq!(report.backend, "running");
        assert_eq!(report.database, "not configured");
        assert_eq!(report.database_url, "not set");
        assert_eq!(report.database_name, "unknown");
        assert_eq!(report.connection_status, "not connected");
        assert!(report.collections.is_empty());
    }

    #[test]
    fn listing_failure_keeps_the_database_name() {
        let report = DiagnosticReport::from_probe(
            DatabaseProbe::ListingFailed {
                name: "zorg".to_string(),
                error: "permission denied".to_string(),
            },
            true,
        );
        assert_eq!(report.database, "connected but listing failed: permission denied");
        assert_eq!(report.database_name, "zorg");
        assert_eq!(report.connection_status, "connected");
    }

    #[test]
    fn working_probe_reports_collections() {
        let report = DiagnosticReport::from_probe(
            DatabaseProbe::Working {
                name: "zorg".to_string(),
                collections: vec!["contactmessage".to_string()],
            },
            true,
        );
        assert_eq!(report.database, "connected and working");
        assert_eq!(report.database_url, "set");
        assert_eq!(report.collections, vec!["contactmessage"]);
    }
}
