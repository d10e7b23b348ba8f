//! Video output endpoints

use super::{segment, BrightSignClient};
use anyhow::{bail, Result};
use brightsign_core::error::DwsError;
use brightsign_core::{
    EdidInfo, Method, PowerSaveStatus, RequestBody, VideoModeInfo, VideoOutputInfo,
};
use serde_json::json;

fn output_path(connector: &str, device: &str, leaf: &str) -> String {
    format!(
        "/video/{}/output/{}/{}",
        segment(connector),
        segment(device),
        leaf
    )
}

impl BrightSignClient {
    /// Output status for a connector (`hdmi`) and device (`0`)
    pub async fn video_output(&self, connector: &str, device: &str) -> Result<VideoOutputInfo> {
        self.get_result(&output_path(connector, device, "")).await
    }

    pub async fn video_modes(&self, connector: &str, device: &str) -> Result<Vec<VideoModeInfo>> {
        self.get_result(&output_path(connector, device, "modes/"))
            .await
    }

    pub async fn video_current_mode(&self, connector: &str, device: &str) -> Result<VideoModeInfo> {
        self.get_result(&output_path(connector, device, "mode/"))
            .await
    }

    pub async fn set_video_mode(&self, connector: &str, device: &str, mode: &str) -> Result<()> {
        let body = RequestBody::json(&json!({ "mode": mode }))?;
        self.send_unit(Method::Put, &output_path(connector, device, "mode/"), body)
            .await
    }

    /// EDID reported by the monitor on this output
    pub async fn video_edid(&self, connector: &str, device: &str) -> Result<EdidInfo> {
        self.get_result(&output_path(connector, device, "edid/"))
            .await
    }

    pub async fn get_power_save(&self, connector: &str, device: &str) -> Result<PowerSaveStatus> {
        self.get_result(&output_path(connector, device, "power-save/"))
            .await
    }

    pub async fn set_power_save(&self, connector: &str, device: &str, enabled: bool) -> Result<()> {
        let body = RequestBody::json(&PowerSaveStatus { enabled })?;
        self.send_unit(
            Method::Put,
            &output_path(connector, device, "power-save/"),
            body,
        )
        .await
    }

    /// Send a raw CEC frame out of the HDMI port
    pub async fn send_cec(&self, hex_command: &str) -> Result<()> {
        let valid = !hex_command.is_empty()
            && hex_command.len() % 2 == 0
            && hex_command.chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            bail!(DwsError::InvalidInput(format!(
                "CEC command must be an even number of hex digits, got '{}'",
                hex_command
            )));
        }

        let body = RequestBody::json(&json!({ "hexCommand": hex_command }))?;
        self.send_unit(Method::Post, "/sendCecX/", body).await
    }
}

#[cfg(test)]
mod tests {
    use super::output_path;
    use crate::client::tests::client_for;
    use crate::test_utils::MockDws;
    use serde_json::json;

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("hdmi", "0", ""), "/video/hdmi/output/0/");
        assert_eq!(output_path("hdmi", "0", "modes/"), "/video/hdmi/output/0/modes/");
    }

    #[tokio::test]
    async fn test_video_modes() {
        let (_server, client) = client_for(MockDws::new().respond(
            "GET",
            "/api/v1/video/hdmi/output/0/modes/",
            200,
            json!({"data": {"result": [
                {"mode": "1920x1080x60p", "width": 1920, "height": 1080, "refreshRate": 60},
                {"mode": "3840x2160x30p", "width": 3840, "height": 2160, "refreshRate": 30}
            ]}}),
        ))
        .await;

        let modes = client.video_modes("hdmi", "0").await.unwrap();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[1].width, 3840);
    }

    #[tokio::test]
    async fn test_video_edid() {
        let (server, client) = client_for(MockDws::new()).await;

        let edid = client.video_edid("hdmi", "0").await.unwrap();
        assert_eq!(edid.manufacturer, "SAM");
        assert!(edid.digital);
        assert_eq!(edid.supported_modes.len(), 2);
        assert_eq!(server.requests()[1].uri, "/api/v1/video/hdmi/output/0/edid/");
    }

    #[tokio::test]
    async fn test_power_save() {
        let (server, client) = client_for(MockDws::new()).await;

        assert!(!client.get_power_save("hdmi", "0").await.unwrap().enabled);
        client.set_power_save("hdmi", "0", true).await.unwrap();
        assert!(client.get_power_save("hdmi", "0").await.unwrap().enabled);

        let put = server
            .requests()
            .into_iter()
            .find(|r| r.method == "PUT" && r.authorization.is_some())
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&put.body).unwrap();
        assert_eq!(body, json!({"enabled": true}));
    }

    #[tokio::test]
    async fn test_send_cec_validates_hex() {
        let (server, client) = client_for(MockDws::new()).await;

        assert!(client.send_cec("4G").await.is_err());
        assert!(client.send_cec("404").await.is_err());
        assert_eq!(server.request_count(), 0);
    }
}
