use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// Response for a successfully persisted submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionCreated {
    /// Always `true` on this response shape
    pub success: bool,
    /// Identifier assigned by the document store
    pub id: String,
}

/// Latest documents from one collection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionList {
    /// Stored field maps, each with `id` and `created_at` added, newest first
    pub items: Vec<Value>,
}

/// Query parameters for the read-back endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SubmissionsQuery {
    /// Maximum number of documents to return (default 10, clamped to 1..=100)
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn created_response_has_the_success_and_id_shape() {
        let created = SubmissionCreated {
            success: true,
            id: "1f0d8a4e-0000-4000-8000-000000000000".to_string(),
        };
        let value = serde_json::to_value(&created).unwrap();
        assert_eq!(value["success"], json!(true));
        assert!(!value["id"].as_str().unwrap().is_empty());
    }
}
