//! Log endpoints

use super::BrightSignClient;
use anyhow::{bail, Result};
use brightsign_core::error::DwsError;
use brightsign_core::{Flexible, Method};
use serde_json::json;

/// Highest supervisor logging level (0 error, 1 warn, 2 info, 3 trace)
pub const MAX_SUPERVISOR_LEVEL: u8 = 3;

impl BrightSignClient {
    /// Fetch the player's serial log
    pub async fn get_logs(&self) -> Result<String> {
        let logs: Flexible<String> = self.get_result("/logs/").await?;
        Ok(match logs {
            Flexible::Typed(text) => text,
            Flexible::Raw(value) => serde_json::to_string_pretty(&value)?,
        })
    }

    /// Current supervisor logging level, as the player reports it
    pub async fn get_supervisor_logging_level(&self) -> Result<serde_json::Value> {
        self.get_result("/system/supervisor/logging/").await
    }

    /// Set the supervisor logging level.
    ///
    /// # Errors
    ///
    /// Levels above 3 are rejected before any request is sent.
    pub async fn set_supervisor_logging_level(&self, level: u8) -> Result<()> {
        if level > MAX_SUPERVISOR_LEVEL {
            bail!(DwsError::InvalidInput(format!(
                "logging level must be 0-{}, got {}",
                MAX_SUPERVISOR_LEVEL, level
            )));
        }
        let _: serde_json::Value = self
            .send_json(
                Method::Put,
                "/system/supervisor/logging/",
                &json!({ "level": level }),
            )
            .await?;
        Ok(())
    }
}
