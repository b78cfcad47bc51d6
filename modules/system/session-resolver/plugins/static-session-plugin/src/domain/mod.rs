//! Domain layer for the static session plugin.

pub mod client;
pub mod service;

pub use service::Service;
