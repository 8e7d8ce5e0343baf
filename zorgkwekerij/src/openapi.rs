//! OpenAPI documentation configuration.
//!
//! The rendered documentation is served at `/docs`, backed by the JSON
//! description at `/api-docs/openapi.json`.

use crate::api;
use crate::api::models::{
    diagnostics::{DiagnosticReport, RootMessage},
    submissions::{SubmissionCreated, SubmissionList},
};
use crate::schemas::FieldError;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Zorgkwekerij Plant en Tuin Noordbroek API",
        description = "Form submission backend for the Zorgkwekerij website"
    ),
    paths(
        api::handlers::health::read_root,
        api::handlers::health::test_database,
        api::handlers::submissions::submit_client_application,
        api::handlers::submissions::submit_partner_inquiry,
        api::handlers::submissions::submit_volunteer_application,
        api::handlers::submissions::submit_contact_message,
        api::handlers::submissions::get_latest_submissions,
    ),
    components(schemas(RootMessage, DiagnosticReport, SubmissionCreated, SubmissionList, FieldError)),
    tags(
        (name = "health", description = "Liveness and diagnostics"),
        (name = "submissions", description = "Form submission and read-back endpoints"),
    )
)]
pub struct ApiDoc;
