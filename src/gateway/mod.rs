//! Population query gateway core.
//!
//! # Data Flow
//! ```text
//! inbound query params
//!     → query.rs (QueryRequest, orchestration)
//!     → client.rs (url construction, single GET)
//!     → normalize.rs (filter + alias coalescing)
//!     → envelope.rs (OK / NO_DATA / ERROR wrapper)
//!     → handler serializes to the caller
//! ```
//!
//! # Design Decisions
//! - Everything is request-scoped; the gateway holds only the HTTP client
//! - Empty results are NO_DATA, a successful outcome distinct from ERROR
//! - Malformed upstream nesting degrades to NO_DATA rather than failing

pub mod client;
pub mod envelope;
pub mod error;
pub mod normalize;
pub mod query;

pub use envelope::{NormalizedRecord, QueryStatus, ResponseEnvelope};
pub use error::{GatewayError, GatewayResult};
pub use query::{PopulationGateway, QueryRequest};
