//! Axum route handlers.

pub mod health;
pub mod submissions;
