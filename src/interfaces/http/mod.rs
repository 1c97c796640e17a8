//! HTTP REST API
//!
//! - `common`: error body and request extractors
//! - `middleware`: bearer-token guard
//! - `rate_limit`: per-client request budget
//! - `modules`: handlers grouped by resource
//! - `router`: route table, OpenAPI document and Swagger UI

pub mod common;
pub mod middleware;
pub mod modules;
pub mod rate_limit;
pub mod router;

pub use router::{create_api_router, ApiDoc, RouterContext};
