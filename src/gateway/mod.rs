//! HTTP gateway in front of the resolver
//!
//! # Modules
//!
//! - [`middleware`]: access log and security headers
//! - [`routes`]: router, handler and outcome to status mapping
//! - [`server`]: resolver wiring, bind and graceful shutdown
//! - [`validate`]: path parameter checks producing 400 responses

pub mod middleware;
pub mod routes;
pub mod server;
pub mod validate;
