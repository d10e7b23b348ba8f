//! Player control endpoints

use super::BrightSignClient;
use anyhow::{Context, Result};
use brightsign_core::{
    DwsPassword, DwsPasswordInfo, Flexible, LocalDwsConfig, Method, RebootOptions, RequestBody,
    SnapshotOptions,
};

impl BrightSignClient {
    /// Reboot the player
    pub async fn reboot(&self, options: &RebootOptions) -> Result<()> {
        let body = RequestBody::json(options).context("Failed to encode reboot options")?;
        self.send_unit(Method::Put, "/control/reboot/", body).await
    }

    /// Whether a DWS password is set
    pub async fn get_dws_password(&self) -> Result<DwsPasswordInfo> {
        self.get_result("/control/dws-password/").await
    }

    /// Change or reset the DWS password
    pub async fn set_dws_password(&self, password: &DwsPassword) -> Result<()> {
        let body = RequestBody::json(password).context("Failed to encode DWS password")?;
        self.send_unit(Method::Put, "/control/dws-password/", body)
            .await
    }

    pub async fn get_local_dws(&self) -> Result<LocalDwsConfig> {
        self.get_result("/control/local-dws/").await
    }

    pub async fn set_local_dws(&self, enabled: bool) -> Result<()> {
        let body = RequestBody::json(&LocalDwsConfig { enabled })
            .context("Failed to encode local DWS setting")?;
        self.send_unit(Method::Put, "/control/local-dws/", body).await
    }

    /// Capture a screenshot of the current output.
    ///
    /// The player answers with a file path or an encoded image depending on
    /// firmware.
    pub async fn take_snapshot(&self, options: &SnapshotOptions) -> Result<Flexible<String>> {
        self.send_json(Method::Post, "/snapshot/", options).await
    }

    /// Have the player fetch firmware from `url` and reboot into it
    pub async fn download_firmware(&self, url: &str) -> Result<()> {
        let path = format!("/download-firmware/?url={}", urlencoding::encode(url));
        self.send_unit(Method::Get, &path, RequestBody::Empty).await
    }
}
