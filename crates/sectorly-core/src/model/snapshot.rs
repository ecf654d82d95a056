use chrono::{DateTime, Utc};
use serde::Serialize;

use super::device::Devices;
use super::event::GroupedEvents;
use super::panel::PanelStatus;

/// Result of one successful update cycle. Never mutated after publishing.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub devices: Devices,
    pub panel_status: PanelStatus,
    pub logs: GroupedEvents,
    pub refreshed_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn locks(&self) -> impl Iterator<Item = &super::Device> {
        self.devices.values().filter(|d| d.is_lock())
    }
}
