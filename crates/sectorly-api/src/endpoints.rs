// Endpoint table
//
// Logical endpoint names mapped to (method, URL), built once per panel.
// Data endpoints are polled by `retrieve_all_data`; action endpoints are
// the write side (arm, disarm, locks, smart plugs).

use std::collections::HashMap;

use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};
use url::Url;

use crate::error::Error;

/// Production API host.
pub const API_URL: &str = "https://mypagesapi.sectoralarm.net";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

/// Read-side endpoints. The display name is the key used in [`ApiData`](crate::ApiData).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum DataEndpoint {
    #[strum(serialize = "Temperatures")]
    Temperatures,
    #[strum(serialize = "Humidity")]
    Humidity,
    #[strum(serialize = "Leakage Detectors")]
    LeakageDetectors,
    #[strum(serialize = "Smoke Detectors")]
    SmokeDetectors,
    #[strum(serialize = "Doors and Windows")]
    DoorsAndWindows,
    #[strum(serialize = "Cameras")]
    Cameras,
    #[strum(serialize = "Smartplug Status")]
    SmartplugStatus,
    #[strum(serialize = "Panel Status")]
    PanelStatus,
    #[strum(serialize = "Lock Status")]
    LockStatus,
    #[strum(serialize = "Logs")]
    Logs,
}

impl DataEndpoint {
    pub fn display_name(self) -> &'static str {
        self.into()
    }
}

/// Write-side endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ActionEndpoint {
    Arm,
    PartialArm,
    Disarm,
    Lock,
    Unlock,
    TurnOnSmartplug,
    TurnOffSmartplug,
}

/// One remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub url: Url,
}

/// Immutable endpoint table for one panel.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    login: Url,
    panel_list: Url,
    camera_image: Url,
    data: HashMap<DataEndpoint, Endpoint>,
    actions: HashMap<ActionEndpoint, Endpoint>,
}

impl EndpointTable {
    /// Build every endpoint URL for `panel_id` under `base_url`.
    pub fn new(base_url: &Url, panel_id: &str) -> Result<Self, Error> {
        let mut data = HashMap::new();
        for endpoint in DataEndpoint::iter() {
            data.insert(endpoint, data_endpoint(base_url, panel_id, endpoint)?);
        }

        let mut actions = HashMap::new();
        for action in ActionEndpoint::iter() {
            let segments: &[&str] = match action {
                ActionEndpoint::Arm => &["api", "Panel", "Arm"],
                ActionEndpoint::PartialArm => &["api", "Panel", "PartialArm"],
                ActionEndpoint::Disarm => &["api", "Panel", "Disarm"],
                ActionEndpoint::Lock => &["api", "Panel", "Lock"],
                ActionEndpoint::Unlock => &["api", "Panel", "Unlock"],
                ActionEndpoint::TurnOnSmartplug => &["api", "smartplugs", "on"],
                ActionEndpoint::TurnOffSmartplug => &["api", "smartplugs", "off"],
            };
            actions.insert(
                action,
                Endpoint {
                    method: HttpMethod::Post,
                    url: endpoint_url(base_url, segments, &[])?,
                },
            );
        }

        Ok(Self {
            login: endpoint_url(base_url, &["api", "Login", "Login"], &[])?,
            panel_list: endpoint_url(base_url, &["api", "account", "GetPanelList"], &[])?,
            camera_image: endpoint_url(base_url, &["api", "panel", "GetCameraImage"], &[])?,
            data,
            actions,
        })
    }

    /// Look up a data endpoint. `None` means the table has no entry for it.
    pub fn data(&self, endpoint: DataEndpoint) -> Option<&Endpoint> {
        self.data.get(&endpoint)
    }

    pub fn action(&self, action: ActionEndpoint) -> Option<&Endpoint> {
        self.actions.get(&action)
    }

    pub fn login_url(&self) -> &Url {
        &self.login
    }

    pub fn panel_list_url(&self) -> &Url {
        &self.panel_list
    }

    pub fn camera_image_url(&self) -> &Url {
        &self.camera_image
    }
}

fn data_endpoint(base: &Url, panel_id: &str, endpoint: DataEndpoint) -> Result<Endpoint, Error> {
    let panel_query = [("panelId", panel_id)];
    let (method, url) = match endpoint {
        DataEndpoint::Temperatures => (
            HttpMethod::Post,
            endpoint_url(base, &["api", "v2", "housecheck", "temperatures"], &[])?,
        ),
        DataEndpoint::Humidity => (
            HttpMethod::Get,
            endpoint_url(base, &["api", "housecheck", "panels", panel_id, "humidity"], &[])?,
        ),
        DataEndpoint::LeakageDetectors => (
            HttpMethod::Get,
            endpoint_url(
                base,
                &["api", "housecheck", "panels", panel_id, "leakagedetectors"],
                &[],
            )?,
        ),
        DataEndpoint::SmokeDetectors => (
            HttpMethod::Get,
            endpoint_url(
                base,
                &["api", "housecheck", "panels", panel_id, "smokedetectors"],
                &[],
            )?,
        ),
        DataEndpoint::DoorsAndWindows => (
            HttpMethod::Post,
            endpoint_url(base, &["api", "v2", "housecheck", "doorsandwindows"], &[])?,
        ),
        DataEndpoint::Cameras => (
            HttpMethod::Get,
            endpoint_url(base, &["api", "v2", "household", "cameras"], &panel_query)?,
        ),
        DataEndpoint::SmartplugStatus => (
            HttpMethod::Get,
            endpoint_url(base, &["api", "smartplug", "status"], &panel_query)?,
        ),
        DataEndpoint::PanelStatus => (
            HttpMethod::Get,
            endpoint_url(base, &["api", "panel", "GetPanelStatus"], &panel_query)?,
        ),
        DataEndpoint::LockStatus => (
            HttpMethod::Get,
            endpoint_url(base, &["api", "panel", "GetLockStatus"], &panel_query)?,
        ),
        DataEndpoint::Logs => (
            HttpMethod::Get,
            endpoint_url(
                base,
                &["api", "v2", "panel", "logs"],
                &[("panelid", panel_id), ("pageNumber", "1"), ("pageSize", "40")],
            )?,
        ),
    };
    Ok(Endpoint { method, url })
}

/// Append path segments (percent-encoded) and query pairs to `base`.
fn endpoint_url(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}
