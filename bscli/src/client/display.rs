//! Display control endpoints

use super::BrightSignClient;
use anyhow::{bail, Result};
use brightsign_core::error::DwsError;
use brightsign_core::{
    DisplayInfo, DisplaySettings, LevelSetting, Method, PowerSettings, RequestBody,
};
use serde_json::json;

/// Power states the display accepts
pub const POWER_STATES: [&str; 2] = ["on", "standby"];

impl BrightSignClient {
    /// All display settings in one call
    pub async fn display_settings(&self) -> Result<DisplaySettings> {
        self.get_result("/display-control/").await
    }

    pub async fn get_brightness(&self) -> Result<LevelSetting> {
        self.get_result("/display-control/brightness/").await
    }

    pub async fn set_brightness(&self, value: i64) -> Result<()> {
        self.set_level("/display-control/brightness/", value).await
    }

    pub async fn get_contrast(&self) -> Result<LevelSetting> {
        self.get_result("/display-control/contrast/").await
    }

    pub async fn set_contrast(&self, value: i64) -> Result<()> {
        self.set_level("/display-control/contrast/", value).await
    }

    pub async fn get_volume(&self) -> Result<LevelSetting> {
        self.get_result("/display-control/volume/").await
    }

    pub async fn set_volume(&self, value: i64) -> Result<()> {
        self.set_level("/display-control/volume/", value).await
    }

    pub async fn get_power(&self) -> Result<PowerSettings> {
        self.get_result("/display-control/power-settings/").await
    }

    /// Switch the display `on` or to `standby`
    pub async fn set_power(&self, state: &str) -> Result<()> {
        if !POWER_STATES.contains(&state) {
            bail!(DwsError::InvalidInput(format!(
                "power state must be one of {}, got '{}'",
                POWER_STATES.join(", "),
                state
            )));
        }
        let body = RequestBody::json(&PowerSettings {
            state: state.to_string(),
        })?;
        self.send_unit(Method::Put, "/display-control/power-settings/", body)
            .await
    }

    /// Identity of the attached display
    pub async fn display_info(&self) -> Result<DisplayInfo> {
        self.get_result("/display-control/info/").await
    }

    /// Ask the display to update its own firmware from `source`
    pub async fn update_display_firmware(&self, source: &str) -> Result<()> {
        if source.trim().is_empty() {
            bail!(DwsError::InvalidInput(
                "firmware source must not be empty".to_string()
            ));
        }
        let body = RequestBody::json(&json!({ "source": source }))?;
        self.send_unit(Method::Put, "/display-control/firmware/", body)
            .await
    }

    async fn set_level(&self, path: &str, value: i64) -> Result<()> {
        let body = RequestBody::json(&LevelSetting::new(value))?;
        self.send_unit(Method::Put, path, body).await
    }
}
