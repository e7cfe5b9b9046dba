//! Population Query Gateway Library
//!
//! A stateless HTTP proxy in front of the Seoul open-data population API.
//! Reshapes the upstream's inconsistent JSON into a stable envelope and
//! serves it with a permissive CORS policy.

pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;

pub use config::GatewayConfig;
pub use gateway::{PopulationGateway, QueryRequest, ResponseEnvelope};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
