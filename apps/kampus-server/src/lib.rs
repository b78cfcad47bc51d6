#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! KampusCMS front server: request gate, site rewriting and page routes.

pub mod app;
pub mod config;
pub mod logging;
pub mod routes;
pub mod server;

pub use app::{AppState, build_app};
pub use config::AppConfig;
