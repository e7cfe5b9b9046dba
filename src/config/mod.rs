//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (SEOUL_API_KEY, PORT)
//!     → loader.rs (read & assemble)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → handed to the server at construction time
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no per-request env reads
//! - All fields have defaults so the gateway runs with zero setup
//! - Validation separates syntactic (parsing) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::TimeoutConfig;
pub use schema::UpstreamConfig;
