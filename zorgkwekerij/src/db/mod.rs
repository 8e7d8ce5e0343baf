//! Database layer for the submission document store.
//!
//! Submissions are persisted as JSONB documents in a single PostgreSQL table,
//! one logical collection per entity kind. The layer is deliberately thin:
//! a write-once insert, a latest-N read, and the two probes the `/test`
//! diagnostic needs.
//!
//! The connection pool is optional at the process level. A missing
//! `DATABASE_URL` leaves the application running with no handle, and every
//! consumer checks for that at the call site instead of assuming a live
//! database.
//!
//! # Modules
//!
//! - [`documents`]: the document store operations and record type
//! - [`errors`]: database-specific error types

pub mod documents;
pub mod errors;
