//! HTTP middleware: request ID, bearer-token authentication, and rate limiting.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
