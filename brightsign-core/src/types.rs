//! Data types exchanged with the DWS API
//!
//! Field names follow the DWS JSON. Missing fields default, so older
//! firmware that omits a field still decodes.

use serde::{Deserialize, Serialize};

// =========================================================================
// Device information
// =========================================================================

/// Basic player information from `/info/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInfo {
    pub model: String,
    pub serial: String,
    pub family: String,
    pub boot_version: String,
    pub fw_version: String,
    pub network: NetworkInfo,
    pub uptime: String,
    pub uptime_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkInfo {
    pub interfaces: Vec<NetworkInterface>,
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkInterface {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub proto: String,
    pub ip: String,
    pub netmask: String,
    pub gateway: String,
    pub dns: String,
    pub mac: String,
    pub metric: i64,
}

/// Player health from `/health/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthInfo {
    pub status: String,
    pub status_time: String,
}

/// A date reported either as text or as an epoch number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateField {
    Text(String),
    Epoch(i64),
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateField::Text(text) => f.write_str(text),
            DateField::Epoch(secs) => write!(f, "{}", secs),
        }
    }
}

/// Clock configuration from `/time/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateField>,
    pub time: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timezone: String,
}

/// Active video mode from `/video-mode/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoMode {
    pub resolution: String,
    pub frame_rate: i64,
    pub scan_method: String,
    pub preferred_mode: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub overscan_mode: String,
}

// =========================================================================
// Storage
// =========================================================================

/// A file or directory on player storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub size: i64,
    #[serde(
        rename = "lastModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub modified: Option<String>,
}

impl FileInfo {
    pub fn is_directory(&self) -> bool {
        self.kind == "directory" || self.kind == "dir"
    }
}

// =========================================================================
// Registry
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryValue {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryUrl {
    #[serde(default)]
    pub url: String,
}

// =========================================================================
// Control
// =========================================================================

/// Options for `/control/reboot/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RebootOptions {
    #[serde(default, skip_serializing_if = "is_false")]
    pub crash_report: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub factory_reset: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_autorun: bool,
}

/// DWS password status (never the password itself)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DwsPasswordInfo {
    pub is_set: bool,
}

/// Request to set or reset the DWS password
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DwsPassword {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub reset: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalDwsConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Options for `/snapshot/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub should_capture_full_resolution: bool,
}

// =========================================================================
// Diagnostics
// =========================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsLookupResult {
    pub success: bool,
    pub hostname: String,
    pub addresses: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PingResult {
    pub success: bool,
    pub address: String,
    pub packets_sent: i64,
    #[serde(rename = "packetsReceived")]
    pub packets_recv: i64,
    pub packet_loss: f64,
    pub min_time: f64,
    pub max_time: f64,
    pub avg_time: f64,
    #[serde(rename = "error", skip_serializing_if = "String::is_empty")]
    pub error_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceRouteResult {
    pub success: bool,
    pub target: String,
    pub hops: Vec<TraceHop>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceHop {
    pub number: i64,
    pub address: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(rename = "rtt")]
    pub round_trip_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfig {
    pub interface: String,
    pub dhcp: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub netmask: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub gateway: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dns: Vec<String>,
    #[serde(rename = "vlanId", skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u16>,
}

/// Packet capture state from `/diagnostics/packet-capture/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PacketCaptureStatus {
    pub running: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub interface: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_captured: Option<u64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output_file: String,
}

/// Request to start a packet capture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PacketCaptureConfig {
    pub interface: String,
    /// Seconds
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output_file: String,
}

/// Remote shell access settings, shared by telnet and SSH
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteShellConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_number: Option<u16>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip_serializing_if = "is_false")]
    pub reboot: bool,
}

// =========================================================================
// Display and video
// =========================================================================

/// A ranged display setting (brightness, contrast, volume)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSetting {
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl LevelSetting {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerSettings {
    /// "on" or "standby"
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<LevelSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<LevelSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<LevelSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_settings: Option<PowerSettings>,
}

/// Attached display identity from `/display-control/info/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayInfo {
    pub model: String,
    pub serial_number: String,
    pub version: String,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoOutputInfo {
    pub connector: String,
    pub device: String,
    pub connected: bool,
    pub width: i64,
    pub height: i64,
    pub refresh_rate: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub interlace_mode: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub preferred_mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoModeInfo {
    pub mode: String,
    pub width: i64,
    pub height: i64,
    pub refresh_rate: i64,
    pub interlaced: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub preferred_mode: bool,
}

/// Decoded EDID of the monitor on a video output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdidInfo {
    pub manufacturer: String,
    pub product: String,
    pub serial_number: String,
    pub week_of_manufacture: i64,
    pub year_of_manufacture: i64,
    pub version: String,
    pub digital: bool,
    pub width: i64,
    pub height: i64,
    pub supported_modes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerSaveStatus {
    pub enabled: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}
