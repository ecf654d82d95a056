// Domain model published by the coordinator.

pub mod device;
pub mod event;
pub mod panel;
pub mod snapshot;

pub use device::{Device, Devices, SMART_LOCK_MODEL, SensorKey, SensorValue, Sensors};
pub use event::{EventRecord, GroupedEvents, LogEntry};
pub use panel::{AlarmState, PanelStatus};
pub use snapshot::Snapshot;
