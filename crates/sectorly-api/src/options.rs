// Selective fetching of optional data endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

use crate::endpoints::DataEndpoint;

/// Configuration keys gating the optional data endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FetchOption {
    FetchTemperatures,
    FetchHumidity,
    #[strum(serialize = "fetch_leakage_detectors")]
    FetchLeakage,
    #[strum(serialize = "fetch_smoke_detectors")]
    FetchSmoke,
    FetchDoorsWindows,
    FetchCameras,
    FetchSmartplugs,
}

impl FetchOption {
    /// Polling order used by `retrieve_all_data`.
    pub const ALL: [Self; 7] = [
        Self::FetchTemperatures,
        Self::FetchHumidity,
        Self::FetchLeakage,
        Self::FetchSmoke,
        Self::FetchDoorsWindows,
        Self::FetchCameras,
        Self::FetchSmartplugs,
    ];

    /// The data endpoint this option gates.
    pub fn endpoint(self) -> DataEndpoint {
        match self {
            Self::FetchTemperatures => DataEndpoint::Temperatures,
            Self::FetchHumidity => DataEndpoint::Humidity,
            Self::FetchLeakage => DataEndpoint::LeakageDetectors,
            Self::FetchSmoke => DataEndpoint::SmokeDetectors,
            Self::FetchDoorsWindows => DataEndpoint::DoorsAndWindows,
            Self::FetchCameras => DataEndpoint::Cameras,
            Self::FetchSmartplugs => DataEndpoint::SmartplugStatus,
        }
    }

    pub fn key(self) -> &'static str {
        self.into()
    }
}

/// Which optional endpoints are polled. Lock status, panel status and logs
/// are always fetched and have no switch here.
///
/// Temperatures are off by default; the endpoint is slow and rarely useful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    pub fetch_temperatures: bool,
    pub fetch_humidity: bool,
    pub fetch_leakage_detectors: bool,
    pub fetch_smoke_detectors: bool,
    pub fetch_doors_windows: bool,
    pub fetch_cameras: bool,
    pub fetch_smartplugs: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            fetch_temperatures: false,
            fetch_humidity: true,
            fetch_leakage_detectors: true,
            fetch_smoke_detectors: true,
            fetch_doors_windows: true,
            fetch_cameras: true,
            fetch_smartplugs: true,
        }
    }
}

impl FetchOptions {
    /// Build from persisted key/value options, falling back to defaults
    /// for missing keys. Unknown keys are ignored.
    pub fn from_map(options: &HashMap<String, bool>) -> Self {
        let mut out = Self::default();
        for option in FetchOption::ALL {
            if let Some(&enabled) = options.get(option.key()) {
                out.set(option, enabled);
            }
        }
        out
    }

    pub fn is_enabled(&self, option: FetchOption) -> bool {
        match option {
            FetchOption::FetchTemperatures => self.fetch_temperatures,
            FetchOption::FetchHumidity => self.fetch_humidity,
            FetchOption::FetchLeakage => self.fetch_leakage_detectors,
            FetchOption::FetchSmoke => self.fetch_smoke_detectors,
            FetchOption::FetchDoorsWindows => self.fetch_doors_windows,
            FetchOption::FetchCameras => self.fetch_cameras,
            FetchOption::FetchSmartplugs => self.fetch_smartplugs,
        }
    }

    pub fn set(&mut self, option: FetchOption, enabled: bool) {
        let slot = match option {
            FetchOption::FetchTemperatures => &mut self.fetch_temperatures,
            FetchOption::FetchHumidity => &mut self.fetch_humidity,
            FetchOption::FetchLeakage => &mut self.fetch_leakage_detectors,
            FetchOption::FetchSmoke => &mut self.fetch_smoke_detectors,
            FetchOption::FetchDoorsWindows => &mut self.fetch_doors_windows,
            FetchOption::FetchCameras => &mut self.fetch_cameras,
            FetchOption::FetchSmartplugs => &mut self.fetch_smartplugs,
        };
        *slot = enabled;
    }
}
