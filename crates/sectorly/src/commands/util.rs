//! Shared helpers for command handlers.

use std::io::IsTerminal;

use sectorly_core::{Device, Snapshot};

use crate::error::CliError;

use super::Context;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Latest snapshot after a fresh update cycle.
pub async fn fresh_snapshot(ctx: &Context<'_>) -> Result<std::sync::Arc<Snapshot>, CliError> {
    Ok(ctx.coordinator.refresh().await?)
}

/// One-line sensor summary, e.g. `closed=true low_battery=false`.
pub fn sensor_summary(device: &Device) -> String {
    device
        .sensors
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use sectorly_core::{SensorKey, SensorValue, Sensors};

    use super::*;

    #[test]
    fn summary_lists_sensors_in_key_order() {
        let mut sensors = Sensors::new();
        sensors.insert(SensorKey::LowBattery, SensorValue::Bool(false));
        sensors.insert(SensorKey::Closed, SensorValue::Bool(true));
        let device = Device {
            name: Some("Hall".into()),
            serial_no: "D1".into(),
            sensors,
            model: "Door/Window Sensor".into(),
            device_type: None,
        };
        assert_eq!(sensor_summary(&device), "closed=true low_battery=false");
    }
}
