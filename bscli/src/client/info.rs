//! Device information endpoints

use super::BrightSignClient;
use anyhow::Result;
use brightsign_core::{DeviceInfo, Flexible, HealthInfo, Method, TimeInfo, VideoMode};

impl BrightSignClient {
    /// Retrieve model, serial, firmware and network details.
    ///
    /// Falls back to the raw JSON when the player's schema does not match
    /// [`DeviceInfo`].
    pub async fn get_info(&self) -> Result<Flexible<DeviceInfo>> {
        self.get_result("/info/").await
    }

    pub async fn get_health(&self) -> Result<HealthInfo> {
        self.get_result("/health/").await
    }

    pub async fn get_time(&self) -> Result<TimeInfo> {
        self.get_result("/time/").await
    }

    /// Set the player clock
    pub async fn set_time(&self, time: &TimeInfo) -> Result<()> {
        let _: serde_json::Value = self.send_json(Method::Put, "/time/", time).await?;
        Ok(())
    }

    pub async fn get_video_mode(&self) -> Result<VideoMode> {
        self.get_result("/video-mode/").await
    }

    /// List the API endpoints the player advertises
    pub async fn list_apis(&self) -> Result<serde_json::Value> {
        self.get_result("/").await
    }
}
