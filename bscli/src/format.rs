//! Output formatting utilities for the CLI
//!
//! Provides table and JSON formatting with colors.

use crate::client::RegistryMatch;
use crate::config::CliConfig;
use anyhow::Result;
use brightsign_core::{
    DeviceInfo, DnsLookupResult, FileInfo, FileListing, Flexible, HealthInfo, PingResult,
    TimeInfo, TraceRouteResult, VideoModeInfo,
};
use colored::*;
use serde::Serialize;
use serde_json::Value;

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Parse a validated config value; anything but `json` is a table
    pub fn from_config(value: &str) -> Self {
        if value == "json" {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }
}

/// Pretty JSON for any serializable value
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format a titled list of label/value pairs
pub fn format_key_values(title: &str, rows: &[(&str, String)]) -> String {
    let mut output = title.bold().to_string();
    for (label, value) in rows {
        output.push('\n');
        output.push_str(&format!("{}: {}", label, value.cyan()));
    }
    output
}

/// Format an untyped result: pretty JSON in both modes
pub fn format_value(value: &Value, _format: &OutputFormat) -> Result<String> {
    format_json(value)
}

/// Human readable byte count
pub fn human_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

fn yes_no(value: bool) -> ColoredString {
    if value {
        "Yes".green()
    } else {
        "No".red()
    }
}

/// Format device information
pub fn format_device_info(info: &Flexible<DeviceInfo>, format: &OutputFormat) -> Result<String> {
    let info = match (format, info) {
        (OutputFormat::Json, _) => return format_json(&info.to_value()),
        (OutputFormat::Table, Flexible::Raw(value)) => return format_json(value),
        (OutputFormat::Table, Flexible::Typed(info)) => info,
    };

    let mut output = format_key_values(
        "BrightSign Player Information",
        &[
            ("Model", info.model.clone()),
            ("Serial", info.serial.clone()),
            ("Family", info.family.clone()),
            ("Firmware", info.fw_version.clone()),
            ("Boot Version", info.boot_version.clone()),
            ("Hostname", info.network.hostname.clone()),
            ("Uptime", info.uptime.clone()),
        ],
    );

    if !info.network.interfaces.is_empty() {
        #[derive(Tabled)]
        struct InterfaceRow {
            #[tabled(rename = "Interface")]
            name: String,
            #[tabled(rename = "Type")]
            kind: String,
            #[tabled(rename = "Proto")]
            proto: String,
            #[tabled(rename = "IP")]
            ip: String,
            #[tabled(rename = "MAC")]
            mac: String,
        }

        let rows: Vec<InterfaceRow> = info
            .network
            .interfaces
            .iter()
            .map(|iface| InterfaceRow {
                name: iface.name.clone(),
                kind: iface.kind.clone(),
                proto: iface.proto.clone(),
                ip: iface.ip.green().to_string(),
                mac: iface.mac.clone(),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        output.push_str(&format!("\n\n{}\n{}", "Network Interfaces:".bold(), table));
    }

    Ok(output)
}

pub fn format_health(health: &HealthInfo, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(health),
        OutputFormat::Table => {
            let status = if health.status == "active" {
                health.status.green()
            } else {
                health.status.yellow()
            };
            Ok(format!(
                "{}\nStatus: {}\nSince: {}",
                "Player Health".bold(),
                status,
                health.status_time.cyan()
            ))
        }
    }
}

pub fn format_time(time: &TimeInfo, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(time),
        OutputFormat::Table => {
            let mut rows = vec![
                (
                    "Date",
                    time.date
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                ),
                ("Time", time.time.clone()),
            ];
            if !time.timezone.is_empty() {
                rows.push(("Timezone", time.timezone.clone()));
            }
            Ok(format_key_values("Player Time", &rows))
        }
    }
}

/// Format a directory listing
pub fn format_file_listing(listing: &FileListing, format: &OutputFormat) -> Result<String> {
    match (format, listing.clone().into_entries()) {
        (OutputFormat::Json, _) => format_json(listing),
        (OutputFormat::Table, None) => format_json(listing),
        (OutputFormat::Table, Some(files)) => Ok(format_files(&files)),
    }
}

/// Table of files
pub fn format_files(files: &[FileInfo]) -> String {
    #[derive(Tabled)]
    struct FileRow {
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Type")]
        kind: String,
        #[tabled(rename = "Size")]
        size: String,
        #[tabled(rename = "Modified")]
        modified: String,
    }

    if files.is_empty() {
        return "No files found".dimmed().to_string();
    }

    let rows: Vec<FileRow> = files
        .iter()
        .map(|file| FileRow {
            name: if file.is_directory() {
                format!("{}/", file.name).blue().bold().to_string()
            } else {
                file.name.clone()
            },
            kind: file.kind.clone(),
            size: if file.is_directory() {
                "-".to_string()
            } else {
                human_size(file.size)
            },
            modified: file.modified.clone().unwrap_or_default(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format a registry dump as section/key/value rows
pub fn format_registry(dump: &Value, format: &OutputFormat) -> Result<String> {
    let Some(sections) = dump.as_object().filter(|_| *format == OutputFormat::Table) else {
        return format_json(dump);
    };

    #[derive(Tabled)]
    struct RegistryRow {
        #[tabled(rename = "Section")]
        section: String,
        #[tabled(rename = "Key")]
        key: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let mut rows = Vec::new();
    for (section, keys) in sections {
        match keys.as_object() {
            Some(keys) => {
                for (key, value) in keys {
                    rows.push(RegistryRow {
                        section: section.yellow().to_string(),
                        key: key.cyan().to_string(),
                        value: value
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| value.to_string()),
                    });
                }
            }
            None => rows.push(RegistryRow {
                section: section.yellow().to_string(),
                key: String::new(),
                value: keys.to_string(),
            }),
        }
    }

    let table = Table::new(rows).with(Style::rounded()).to_string();
    Ok(format!("{}\n{}", "Registry:".bold(), table))
}

/// Format registry search hits as `section/key = value` lines
pub fn format_registry_matches(matches: &[RegistryMatch], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(matches),
        OutputFormat::Table if matches.is_empty() => Ok("No matches found".dimmed().to_string()),
        OutputFormat::Table => Ok(matches
            .iter()
            .map(|m| format!("{}/{} = {}", m.section.yellow(), m.key.cyan(), m.value))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

pub fn format_ping(result: &PingResult, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(result),
        OutputFormat::Table => {
            let mut rows = vec![
                ("Success", yes_no(result.success).to_string()),
                (
                    "Packets",
                    format!("{}/{} received", result.packets_recv, result.packets_sent),
                ),
                ("Loss", format!("{}%", result.packet_loss)),
                (
                    "RTT min/avg/max",
                    format!(
                        "{:.2}/{:.2}/{:.2} ms",
                        result.min_time, result.avg_time, result.max_time
                    ),
                ),
            ];
            if !result.error_message.is_empty() {
                rows.push(("Error", result.error_message.red().to_string()));
            }
            Ok(format_key_values(&format!("Ping {}", result.address), &rows))
        }
    }
}

pub fn format_dns_lookup(result: &DnsLookupResult, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(result),
        OutputFormat::Table => {
            let mut rows = vec![
                ("Success", yes_no(result.success).to_string()),
                ("Addresses", result.addresses.join(", ")),
            ];
            if !result.error.is_empty() {
                rows.push(("Error", result.error.red().to_string()));
            }
            Ok(format_key_values(
                &format!("DNS lookup {}", result.hostname),
                &rows,
            ))
        }
    }
}

pub fn format_trace_route(result: &TraceRouteResult, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(result),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct HopRow {
                #[tabled(rename = "Hop")]
                number: i64,
                #[tabled(rename = "Address")]
                address: String,
                #[tabled(rename = "Hostname")]
                hostname: String,
                #[tabled(rename = "RTT (ms)")]
                rtt: String,
            }

            let rows: Vec<HopRow> = result
                .hops
                .iter()
                .map(|hop| HopRow {
                    number: hop.number,
                    address: hop.address.clone(),
                    hostname: hop.hostname.clone(),
                    rtt: format!("{:.2}", hop.round_trip_ms),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            let mut output = format!("{}\n{}", format!("Route to {}:", result.target).bold(), table);
            if !result.error.is_empty() {
                output.push_str(&format!("\n{}", result.error.red()));
            }
            Ok(output)
        }
    }
}

pub fn format_video_modes(modes: &[VideoModeInfo], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_json(modes),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct ModeRow {
                #[tabled(rename = "Mode")]
                mode: String,
                #[tabled(rename = "Resolution")]
                resolution: String,
                #[tabled(rename = "Refresh")]
                refresh: String,
                #[tabled(rename = "Preferred")]
                preferred: String,
            }

            let rows: Vec<ModeRow> = modes
                .iter()
                .map(|mode| ModeRow {
                    mode: mode.mode.cyan().to_string(),
                    resolution: format!("{}x{}", mode.width, mode.height),
                    refresh: format!(
                        "{}{}",
                        mode.refresh_rate,
                        if mode.interlaced { "i" } else { "p" }
                    ),
                    preferred: if mode.preferred_mode {
                        "✓".green().to_string()
                    } else {
                        String::new()
                    },
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Video Modes:".bold(), table))
        }
    }
}

/// Format the CLI configuration; the password is never shown
pub fn format_config(config: &CliConfig, format: &OutputFormat) -> Result<String> {
    let password = if config.password.is_some() {
        "********"
    } else {
        "(prompt)"
    };

    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(config)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("password".to_string(), Value::from(password));
            }
            format_json(&value)
        }
        OutputFormat::Table => Ok(format_key_values(
            "CLI Configuration",
            &[
                ("Host", config.host.clone().unwrap_or_else(|| "(not set)".to_string())),
                ("API", config.api_base_url().unwrap_or_default()),
                ("Username", config.username.clone()),
                ("Password", password.to_string()),
                ("Format", config.output_format.clone()),
                ("Verbose", config.verbose.to_string()),
                ("Timeout", format!("{}s", config.timeout)),
                ("Insecure TLS", config.insecure.to_string()),
            ],
        )),
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
