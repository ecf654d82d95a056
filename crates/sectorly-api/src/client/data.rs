// Read-side endpoints: aggregate fetch, lock status, panel list.

use indexmap::IndexMap;
use serde_json::{Value, json};
use tracing::{debug, error, info};

use crate::client::SectorClient;
use crate::endpoints::{DataEndpoint, Endpoint, HttpMethod};
use crate::error::Error;
use crate::options::FetchOption;
use crate::retry::retry_with_backoff;

/// Raw decoded bodies keyed by endpoint display name, in fetch order.
pub type ApiData = IndexMap<String, Value>;

impl SectorClient {
    /// Fetch every enabled data endpoint plus panel status, lock status
    /// and logs.
    ///
    /// Per-endpoint failures are logged and the key is omitted. An
    /// authentication error aborts the whole call.
    pub async fn retrieve_all_data(&self) -> Result<ApiData, Error> {
        self.ensure_authenticated().await?;

        let mut data = ApiData::new();

        for option in FetchOption::ALL {
            let endpoint = option.endpoint();
            if !self.fetch.is_enabled(option) {
                debug!(endpoint = %endpoint, "skipping disabled endpoint");
                continue;
            }
            let Some(ep) = self.endpoints.data(endpoint) else {
                debug!(endpoint = %endpoint, "endpoint not found in data endpoints");
                continue;
            };

            match self.fetch_endpoint(ep).await {
                Ok(Some(body)) if has_content(&body) => {
                    data.insert(endpoint.to_string(), body);
                }
                Ok(_) => info!(endpoint = %endpoint, "no data retrieved"),
                Err(err) if err.is_auth() => {
                    error!(error = %err, "authentication error during data retrieval");
                    return Err(err);
                }
                Err(err) => error!(endpoint = %endpoint, error = %err, "error retrieving data"),
            }
        }

        // Always fetched, regardless of options.
        if let Some(body) = self.fetch_always(DataEndpoint::PanelStatus).await? {
            data.insert(DataEndpoint::PanelStatus.to_string(), body);
        }

        let locks = match self.lock_status().await {
            Ok(locks) => locks,
            Err(err) if err.is_auth() => return Err(err),
            Err(err) => {
                error!(error = %err, "error retrieving lock status");
                Vec::new()
            }
        };
        data.insert(DataEndpoint::LockStatus.to_string(), Value::Array(locks));

        if let Some(body) = self.fetch_always(DataEndpoint::Logs).await? {
            data.insert(DataEndpoint::Logs.to_string(), body);
        }

        Ok(data)
    }

    /// Lock states for the panel. Empty on any failure.
    ///
    /// `GET /api/panel/GetLockStatus?panelId={id}`
    pub async fn get_lock_status(&self) -> Vec<Value> {
        let result = async {
            self.ensure_authenticated().await?;
            self.lock_status().await
        }
        .await;

        result.unwrap_or_else(|err| {
            error!(error = %err, "error retrieving lock status");
            Vec::new()
        })
    }

    /// Panels visible to the account, `PanelId → DisplayName`. Empty on any failure.
    ///
    /// `GET /api/account/GetPanelList`
    pub async fn get_panel_list(&self) -> IndexMap<String, String> {
        let url = self.endpoints.panel_list_url();
        let result = async {
            self.ensure_authenticated().await?;
            retry_with_backoff(&self.retry, || self.get(url)).await
        }
        .await;

        match result {
            Ok(Some(Value::Array(items))) => {
                debug!(count = items.len(), "panel list retrieved");
                items
                    .iter()
                    .filter_map(|item| {
                        let id = scalar_string(item.get("PanelId")?)?;
                        let name = item
                            .get("DisplayName")
                            .and_then(scalar_string)
                            .unwrap_or_default();
                        Some((id, name))
                    })
                    .collect()
            }
            Ok(_) => {
                error!("failed to retrieve any panels");
                IndexMap::new()
            }
            Err(err) => {
                error!(error = %err, "error retrieving panel list");
                IndexMap::new()
            }
        }
    }

    // ── Internal helpers ─────────────────────────────────────────────

    /// Lock status without the catch-all, so callers can tell auth
    /// failures apart.
    async fn lock_status(&self) -> Result<Vec<Value>, Error> {
        let Some(ep) = self.endpoints.data(DataEndpoint::LockStatus) else {
            return Ok(Vec::new());
        };
        match retry_with_backoff(&self.retry, || self.get(&ep.url)).await? {
            Some(Value::Array(locks)) => Ok(locks),
            _ => {
                error!("failed to retrieve lock status");
                Ok(Vec::new())
            }
        }
    }

    /// Fetch an always-on endpoint. Non-auth failures yield `None`.
    async fn fetch_always(&self, endpoint: DataEndpoint) -> Result<Option<Value>, Error> {
        let Some(ep) = self.endpoints.data(endpoint) else {
            return Ok(None);
        };
        match self.fetch_endpoint(ep).await {
            Ok(Some(body)) if has_content(&body) => Ok(Some(body)),
            Ok(_) => Ok(None),
            Err(err) if err.is_auth() => Err(err),
            Err(err) => {
                error!(endpoint = %endpoint, error = %err, "error retrieving data");
                Ok(None)
            }
        }
    }

    /// Issue the endpoint's method through the retry wrapper. POST data
    /// endpoints take the panel ID in the body.
    async fn fetch_endpoint(&self, ep: &Endpoint) -> Result<Option<Value>, Error> {
        match ep.method {
            HttpMethod::Get => retry_with_backoff(&self.retry, || self.get(&ep.url)).await,
            HttpMethod::Post => {
                let payload = json!({ "PanelId": self.panel_id });
                retry_with_backoff(&self.retry, || self.post(&ep.url, &payload)).await
            }
        }
    }
}

/// Falsy bodies (`null`, `false`, `0`, `[]`, `{}`, `""`) count as "no data".
fn has_content(body: &Value) -> bool {
    match body {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::String(s) => !s.is_empty(),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
