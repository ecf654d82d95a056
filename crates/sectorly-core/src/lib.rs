// sectorly-core: Update coordinator between sectorly-api and hosts.
//
// Polls the panel, flattens the raw endpoint bodies into a device
// registry, groups lock events, and publishes immutable snapshots.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod normalize;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::PanelConfig;
pub use coordinator::Coordinator;
pub use error::CoreError;

pub use model::{
    AlarmState, Device, Devices, EventRecord, GroupedEvents, PanelStatus, SensorKey, SensorValue,
    Sensors, Snapshot,
};

// Re-exported so hosts need only one dependency for common API types.
pub use sectorly_api::{ArmMode, Credentials, FetchOption, FetchOptions, TlsMode, TransportConfig};
