//! Lingora backend library: teacher availability scheduling and curriculum
//! export packaging behind an axum HTTP API. The binary in `main.rs` is a
//! thin wrapper; integration tests drive the router from here.

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod logic;
pub mod protocol;
pub mod routes;
pub mod schedule;
pub mod seeds;
pub mod state;
pub mod storage;
pub mod store;
pub mod telemetry;
pub mod util;
