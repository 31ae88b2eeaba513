//! Server-level tests, one module per domain.

mod common;
mod content;
mod routes;
