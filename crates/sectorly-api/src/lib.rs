// sectorly-api: Async Rust client for the Sector Alarm cloud REST API
//
// Bearer-token session handling, the per-panel endpoint table, bounded
// retry with exponential backoff, and one method per remote capability.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod options;
pub mod retry;
pub mod transport;

pub use auth::{Credentials, Session};
pub use client::actions::ArmMode;
pub use client::data::ApiData;
pub use client::SectorClient;
pub use endpoints::{ActionEndpoint, DataEndpoint, Endpoint, EndpointTable, HttpMethod, API_URL};
pub use error::Error;
pub use options::{FetchOption, FetchOptions};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use transport::{TlsMode, TransportConfig};
