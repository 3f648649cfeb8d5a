#![allow(dead_code)]

mod http;
mod provider;

pub use http::{TestResponse, get};
pub use provider::{StubProvider, create_test_store, providers};
