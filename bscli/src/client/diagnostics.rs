//! Network diagnostics and remote shell endpoints

use super::{segment, BrightSignClient};
use anyhow::Result;
use brightsign_core::{
    DnsLookupResult, Flexible, Method, NetworkConfig, PacketCaptureConfig, PacketCaptureStatus,
    PingResult, RemoteShellConfig, RequestBody, TraceRouteResult,
};

fn with_resolve(mut path: String, resolve_address: bool) -> String {
    if resolve_address {
        path.push_str("?resolveAddress=true");
    }
    path
}

impl BrightSignClient {
    /// Run the player's built-in network diagnostics
    pub async fn run_diagnostics(&self) -> Result<serde_json::Value> {
        self.get_result("/diagnostics/").await
    }

    pub async fn dns_lookup(&self, address: &str, resolve_address: bool) -> Result<DnsLookupResult> {
        let path = with_resolve(
            format!("/diagnostics/dns-lookup/{}", segment(address)),
            resolve_address,
        );
        self.get_result(&path).await
    }

    pub async fn ping(&self, address: &str) -> Result<PingResult> {
        self.get_result(&format!("/diagnostics/ping/{}", segment(address)))
            .await
    }

    pub async fn trace_route(&self, address: &str, resolve_address: bool) -> Result<TraceRouteResult> {
        let path = with_resolve(
            format!("/diagnostics/trace-route/{}", segment(address)),
            resolve_address,
        );
        self.get_result(&path).await
    }

    /// Names of the configured network interfaces
    pub async fn network_interfaces(&self) -> Result<Flexible<Vec<String>>> {
        self.get_result("/diagnostics/interfaces/").await
    }

    pub async fn get_network_configuration(&self, interface: &str) -> Result<NetworkConfig> {
        self.get_result(&format!(
            "/diagnostics/network-configuration/{}/",
            segment(interface)
        ))
        .await
    }

    /// Apply a new configuration to `interface`
    pub async fn set_network_configuration(
        &self,
        interface: &str,
        config: &NetworkConfig,
    ) -> Result<()> {
        let body = RequestBody::json(config)?;
        let path = format!(
            "/diagnostics/network-configuration/{}/",
            segment(interface)
        );
        self.send_unit(Method::Put, &path, body).await
    }

    /// Hosts the player has seen on its local network, keyed by address
    pub async fn network_neighborhood(&self) -> Result<serde_json::Value> {
        self.get_result("/diagnostics/network-neighborhood/").await
    }

    pub async fn packet_capture_status(&self) -> Result<PacketCaptureStatus> {
        self.get_result("/diagnostics/packet-capture/").await
    }

    pub async fn start_packet_capture(&self, config: &PacketCaptureConfig) -> Result<()> {
        let body = RequestBody::json(config)?;
        self.send_unit(Method::Post, "/diagnostics/packet-capture/", body)
            .await
    }

    pub async fn stop_packet_capture(&self) -> Result<()> {
        self.send_unit(Method::Delete, "/diagnostics/packet-capture/", RequestBody::Empty)
            .await
    }

    pub async fn get_telnet(&self) -> Result<RemoteShellConfig> {
        self.get_result("/diagnostics/telnet/").await
    }

    pub async fn set_telnet(&self, config: &RemoteShellConfig) -> Result<()> {
        let body = RequestBody::json(config)?;
        self.send_unit(Method::Put, "/diagnostics/telnet/", body).await
    }

    pub async fn get_ssh(&self) -> Result<RemoteShellConfig> {
        self.get_result("/diagnostics/ssh/").await
    }

    pub async fn set_ssh(&self, config: &RemoteShellConfig) -> Result<()> {
        let body = RequestBody::json(config)?;
        self.send_unit(Method::Put, "/diagnostics/ssh/", body).await
    }
}
