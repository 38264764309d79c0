use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::{ApiRequest, DataEnvelope, Device};
use crate::error::Error;
use crate::pipeline::Pipeline;
use crate::token_store::TokenStore;

/// Progress lines for whoever hosts the client (a UI renders these live).
/// Diagnostics go to `tracing` separately.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Client for the licensed-devices API: list the active devices and
/// disconnect one by id. All requests run through the refresh-aware pipeline.
pub struct DeviceClient {
    pipeline: Pipeline,
    addr: String,
    cancel: CancellationToken,
}

impl DeviceClient {
    pub fn new(addr: &str, store: Arc<dyn TokenStore>, log: LogSink) -> Result<Self, Error> {
        let client = reqwest::Client::builder().build()?;
        let addr = addr.trim_end_matches('/').to_string();
        let cancel = CancellationToken::new();
        let pipeline = Pipeline::new(client, addr.clone(), store, cancel.clone(), log);
        Ok(Self {
            pipeline,
            addr,
            cancel,
        })
    }

    /// Lists the account's active devices. An account with no devices yields
    /// an empty list, not an error, and logs nothing.
    pub async fn fetch_active_devices(&self) -> Result<Vec<Device>, Error> {
        let url = format!("{}/devices", self.addr);
        let request = ApiRequest::get(&url);
        let response = self.pipeline.execute(&request).await?;
        let body = response.text().await?;
        let parsed: DataEnvelope<Vec<Device>> =
            serde_json::from_str(&body).map_err(|source| Error::Parse { url, source })?;
        let devices = parsed.data;
        if !devices.is_empty() {
            let names = devices
                .iter()
                .map(|device| device.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            self.pipeline.log(&format!("fetched devices: {names}"));
        }
        Ok(devices)
    }

    /// Disconnects one device. The response body is ignored; any pipeline
    /// failure propagates unchanged.
    pub async fn disconnect_device(&self, id: i64) -> Result<(), Error> {
        self.pipeline.log(&format!("start disconnecting device {id}"));
        let request = ApiRequest::delete(format!("{}/devices/{}", self.addr, id));
        self.pipeline.execute(&request).await?;
        self.pipeline.log(&format!("device {id} disconnected"));
        Ok(())
    }

    /// Cancels every outstanding and future call on this client. Idempotent;
    /// cancelled calls fail with `Error::Aborted`.
    pub fn dispose(&self) {
        self.cancel.cancel();
    }
}
