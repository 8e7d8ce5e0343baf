//! Request/response data structures for the API.

pub mod diagnostics;
pub mod submissions;
