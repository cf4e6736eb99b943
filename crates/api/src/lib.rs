//! HTTP API: catalog gateway server, routing, and request/response mapping.

pub mod app;
pub mod middleware;
