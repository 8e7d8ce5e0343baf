//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers for all endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Health & diagnostics** (`/`, `/test`): liveness message and a
//!   best-effort database probe
//! - **Submissions** (`/api/applications/*`, `/api/inquiries/*`,
//!   `/api/contact`): one write endpoint per entity kind
//! - **Read-back** (`/api/submissions/{collection}`): latest documents from an
//!   allow-listed collection
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`;
//! the rendered documentation is served at `/docs`.

pub mod handlers;
pub mod models;
