//! Command execution handlers

use anyhow::{bail, Context, Result};
use brightsign_core::{
    DateField, DwsPassword, Flexible, NetworkConfig, PacketCaptureConfig, RebootOptions,
    RemoteShellConfig, SnapshotOptions, StoragePath, TimeInfo,
};
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::client::BrightSignClient;
use crate::config::CliConfig;
use crate::format::{
    format_config, format_device_info, format_dns_lookup, format_file_listing,
    format_health, format_json, format_key_values, format_ping, format_registry,
    format_registry_matches, format_success,
    format_time, format_trace_route, format_value, format_video_modes,
};
use crate::transfer::FileTransfer;

use super::commands::*;

/// Print `value` as JSON, or render it with `table` in table mode
fn emit<T: Serialize>(format: &OutputFormat, value: &T, table: impl FnOnce(&T) -> String) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(value)?),
        OutputFormat::Table => println!("{}", table(value)),
    }
    Ok(())
}

/// Print a confirmation, as `{"success": true, "message": ...}` in JSON mode
fn emit_success(format: &OutputFormat, message: &str) -> Result<()> {
    match format {
        OutputFormat::Json => println!(
            "{}",
            format_json(&serde_json::json!({ "success": true, "message": message }))?
        ),
        OutputFormat::Table => println!("{}", format_success(message)),
    }
    Ok(())
}

fn on_off(enabled: bool) -> String {
    if enabled {
        "enabled".green().to_string()
    } else {
        "disabled".red().to_string()
    }
}

/// Handle info commands
pub async fn handle_info(
    client: &BrightSignClient,
    command: InfoCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        InfoCommands::Show => {
            let info = client.get_info().await?;
            println!("{}", format_device_info(&info, &format.into())?);
        }
        InfoCommands::Health => {
            let health = client.get_health().await?;
            println!("{}", format_health(&health, &format.into())?);
        }
        InfoCommands::Time => {
            let time = client.get_time().await?;
            println!("{}", format_time(&time, &format.into())?);
        }
        InfoCommands::SetTime {
            time,
            date,
            timezone,
        } => {
            let request = TimeInfo {
                date: date.map(DateField::Text),
                time,
                timezone: timezone.unwrap_or_default(),
            };
            client.set_time(&request).await?;
            emit_success(format, &format!("Clock set to {}", request.time))?;
        }
        InfoCommands::VideoMode => {
            let mode = client.get_video_mode().await?;
            emit(format, &mode, |mode| {
                format_key_values(
                    "Video Mode",
                    &[
                        ("Resolution", mode.resolution.clone()),
                        ("Frame rate", mode.frame_rate.to_string()),
                        ("Scan", mode.scan_method.clone()),
                        ("Preferred", mode.preferred_mode.to_string()),
                    ],
                )
            })?;
        }
        InfoCommands::Apis => {
            let apis = client.list_apis().await?;
            println!("{}", format_value(&apis, &format.into())?);
        }
    }

    Ok(())
}

/// Handle control commands
pub async fn handle_control(
    client: &BrightSignClient,
    command: ControlCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ControlCommands::Reboot {
            crash_report,
            factory_reset,
            disable_autorun,
        } => {
            let options = RebootOptions {
                crash_report,
                factory_reset,
                disable_autorun,
            };
            client.reboot(&options).await?;
            emit_success(format, "Reboot requested")?;
        }
        ControlCommands::DwsPassword => {
            let info = client.get_dws_password().await?;
            emit(format, &info, |info| {
                format_key_values("DWS Password", &[("Set", info.is_set.to_string())])
            })?;
        }
        ControlCommands::SetDwsPassword {
            new_password,
            reset,
        } => {
            let request = DwsPassword {
                password: new_password.unwrap_or_default(),
                reset,
            };
            client.set_dws_password(&request).await?;
            let message = if reset {
                "DWS password removed"
            } else {
                "DWS password changed"
            };
            emit_success(format, message)?;
        }
        ControlCommands::LocalDws => {
            let config = client.get_local_dws().await?;
            emit(format, &config, |config| {
                format_key_values("Local DWS", &[("Status", on_off(config.enabled))])
            })?;
        }
        ControlCommands::SetLocalDws { enabled } => {
            client.set_local_dws(enabled).await?;
            emit_success(
                format,
                &format!("Local DWS {}", if enabled { "enabled" } else { "disabled" }),
            )?;
        }
        ControlCommands::Snapshot {
            width,
            height,
            full,
        } => {
            let options = SnapshotOptions {
                width,
                height,
                should_capture_full_resolution: full,
            };
            match client.take_snapshot(&options).await? {
                Flexible::Typed(location) => emit(format, &location, |location| {
                    format_success(&format!("Snapshot saved to {}", location))
                })?,
                Flexible::Raw(value) => println!("{}", format_value(&value, &format.into())?),
            }
        }
        ControlCommands::DownloadFirmware { url } => {
            client.download_firmware(&url).await?;
            emit_success(format, &format!("Firmware download started from {}", url))?;
        }
    }

    Ok(())
}

fn local_file_name(local: &Path) -> Result<String> {
    local
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow::anyhow!("'{}' does not name a file", local.display()))
}

/// Handle file commands
pub async fn handle_file(
    client: &BrightSignClient,
    command: FileCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        FileCommands::List { path, raw } => {
            let path = StoragePath::resolve(&path)?;
            let listing = client.list_files(&path, raw).await?;
            println!("{}", format_file_listing(&listing, &format.into())?);
        }
        FileCommands::Upload { file, remote } => {
            let remote = match remote {
                Some(remote) => StoragePath::resolve(&remote)?,
                None => StoragePath::resolve(&local_file_name(&file)?)?,
            };
            let reply = client.upload_file(&file, &remote).await?;
            match format {
                OutputFormat::Json => println!("{}", format_json(&reply)?),
                OutputFormat::Table => println!(
                    "{}",
                    format_success(&format!("Uploaded {} to {}", file.display(), remote))
                ),
            }
        }
        FileCommands::Push {
            file,
            device,
            no_verify,
        } => {
            let remote = format!("/storage/{}/{}", device, local_file_name(&file)?);
            let transfer = FileTransfer::new(client.dispatcher().clone());
            let result = transfer.upload_root_file(&file, &remote).await?;
            if !no_verify && !transfer.verify_file_exists(&remote).await? {
                bail!("Upload reported success but {} is not on the player", remote);
            }
            match format {
                OutputFormat::Json => println!("{}", format_json(&result)?),
                OutputFormat::Table => {
                    println!("{}", format_success(&format!("Pushed {} to {}", file.display(), remote)));
                    if !result.message.is_empty() {
                        println!("{}", result.message);
                    }
                }
            }
        }
        FileCommands::Download { remote, output } => {
            let remote = StoragePath::resolve(&remote)?;
            let local = match output {
                Some(output) => output,
                None => PathBuf::from(remote.file_name().unwrap_or_default()),
            };
            let summary = client.download_file(&remote, &local).await?;
            emit(format, &summary, |summary| {
                format_success(&format!(
                    "Downloaded {} to {} ({} bytes)",
                    summary.remote, summary.local, summary.bytes
                ))
            })?;
        }
        FileCommands::Delete { path } => {
            let path = StoragePath::resolve(&path)?;
            client.delete_file(&path).await?;
            emit_success(format, &format!("Deleted {}", path))?;
        }
        FileCommands::Rename { path, new_name } => {
            let path = StoragePath::resolve(&path)?;
            client.rename_file(&path, &new_name).await?;
            emit_success(format, &format!("Renamed {} to {}", path, new_name))?;
        }
        FileCommands::Mkdir { path } => {
            let path = StoragePath::resolve(&path)?;
            client.create_directory(&path).await?;
            emit_success(format, &format!("Created {}", path))?;
        }
        FileCommands::Exists { path } => {
            let path = StoragePath::resolve(&path)?.to_string();
            let transfer = FileTransfer::new(client.dispatcher().clone());
            let exists = transfer.verify_file_exists(&path).await?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    format_json(&serde_json::json!({ "path": path, "exists": exists }))?
                ),
                OutputFormat::Table if exists => println!("{}", format_success(&format!("{} exists", path))),
                OutputFormat::Table => println!("{} {} not found", "✗".red().bold(), path),
            }
        }
        FileCommands::Format { device, yes } => {
            if !yes {
                bail!("Formatting erases everything on '{}'; pass --yes to confirm", device);
            }
            client.format_storage(&device).await?;
            emit_success(format, &format!("Formatted {}", device))?;
        }
    }

    Ok(())
}

/// Handle registry commands
pub async fn handle_registry(
    client: &BrightSignClient,
    command: RegistryCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        RegistryCommands::Dump => {
            let dump = client.registry_dump().await?;
            println!("{}", format_registry(&dump, &format.into())?);
        }
        RegistryCommands::Get { section, key } => {
            let value = client.registry_get(&section, &key).await?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    format_json(&serde_json::json!({
                        "section": section,
                        "key": key,
                        "value": value
                    }))?
                ),
                OutputFormat::Table => println!("{}", value),
            }
        }
        RegistryCommands::Set {
            section,
            key,
            value,
        } => {
            client.registry_set(&section, &key, &value).await?;
            emit_success(format, &format!("Set {}/{} = {}", section, key, value))?;
        }
        RegistryCommands::Delete { section, key } => {
            client.registry_delete(&section, &key).await?;
            emit_success(format, &format!("Deleted {}/{}", section, key))?;
        }
        RegistryCommands::DeleteSection { section } => {
            client.registry_delete_section(&section).await?;
            emit_success(format, &format!("Deleted section {}", section))?;
        }
        RegistryCommands::RecoveryUrl => {
            let url = client.get_recovery_url().await?;
            emit(format, &serde_json::json!({ "url": url }), |_| {
                if url.is_empty() {
                    "(not set)".to_string()
                } else {
                    url.clone()
                }
            })?;
        }
        RegistryCommands::SetRecoveryUrl { url } => {
            client.set_recovery_url(&url).await?;
            emit_success(format, &format!("Recovery URL set to {}", url))?;
        }
        RegistryCommands::Flush => {
            client.registry_flush().await?;
            emit_success(format, "Registry flushed")?;
        }
        RegistryCommands::Search { term } => {
            let matches = client.registry_search(&term).await?;
            println!("{}", format_registry_matches(&matches, &format.into())?);
        }
    }

    Ok(())
}

/// Handle log commands
pub async fn handle_logs(
    client: &BrightSignClient,
    command: LogsCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        LogsCommands::Show => {
            let logs = client.get_logs().await?;
            match format {
                OutputFormat::Json => println!("{}", format_json(&serde_json::json!({ "logs": logs }))?),
                OutputFormat::Table => println!("{}", logs),
            }
        }
        LogsCommands::Level => {
            let level = client.get_supervisor_logging_level().await?;
            match format {
                OutputFormat::Json => println!("{}", format_json(&level)?),
                OutputFormat::Table => {
                    let shown = match &level {
                        serde_json::Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    println!("Supervisor logging level: {}", shown.cyan());
                }
            }
        }
        LogsCommands::SetLevel { level } => {
            client.set_supervisor_logging_level(level).await?;
            emit_success(format, &format!("Supervisor logging level set to {}", level))?;
        }
    }

    Ok(())
}

fn shell_config(shell: ShellArgs) -> RemoteShellConfig {
    RemoteShellConfig {
        enabled: shell.enabled,
        port_number: shell.port,
        password: shell.shell_password.unwrap_or_default(),
        reboot: shell.reboot,
    }
}

fn network_config(interface: String, network: NetworkArgs) -> NetworkConfig {
    NetworkConfig {
        interface,
        dhcp: network.dhcp,
        ip: network.ip.unwrap_or_default(),
        netmask: network.netmask.unwrap_or_default(),
        gateway: network.gateway.unwrap_or_default(),
        dns: network.dns,
        vlan_id: network.vlan,
    }
}

fn format_shell(title: &str, config: &RemoteShellConfig) -> String {
    let port = config
        .port_number
        .map(|port| port.to_string())
        .unwrap_or_else(|| "default".to_string());
    format_key_values(title, &[("Status", on_off(config.enabled)), ("Port", port)])
}

/// Handle diagnostics commands
pub async fn handle_diag(
    client: &BrightSignClient,
    command: DiagCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        DiagCommands::Run => {
            let report = client.run_diagnostics().await?;
            println!("{}", format_value(&report, &format.into())?);
        }
        DiagCommands::Dns { address, resolve } => {
            let result = client.dns_lookup(&address, resolve).await?;
            println!("{}", format_dns_lookup(&result, &format.into())?);
        }
        DiagCommands::Ping { address } => {
            let result = client.ping(&address).await?;
            println!("{}", format_ping(&result, &format.into())?);
        }
        DiagCommands::Traceroute { address, resolve } => {
            let result = client.trace_route(&address, resolve).await?;
            println!("{}", format_trace_route(&result, &format.into())?);
        }
        DiagCommands::Interfaces => match client.network_interfaces().await? {
            Flexible::Typed(names) => emit(format, &names, |names| {
                format!("{}\n{}", "Network Interfaces:".bold(), names.join("\n"))
            })?,
            Flexible::Raw(value) => println!("{}", format_value(&value, &format.into())?),
        },
        DiagCommands::NetConfig { interface } => {
            let config = client.get_network_configuration(&interface).await?;
            emit(format, &config, |config| {
                let mode = if config.dhcp { "dhcp" } else { "static" };
                format_key_values(
                    &format!("Interface {}", config.interface),
                    &[
                        ("Mode", mode.to_string()),
                        ("IP", config.ip.clone()),
                        ("Netmask", config.netmask.clone()),
                        ("Gateway", config.gateway.clone()),
                        ("DNS", config.dns.join(", ")),
                    ],
                )
            })?;
        }
        DiagCommands::SetNetConfig { interface, network } => {
            let config = network_config(interface, network);
            client
                .set_network_configuration(&config.interface, &config)
                .await?;
            emit_success(format, &format!("Interface {} reconfigured", config.interface))?;
        }
        DiagCommands::Neighborhood => {
            let hosts = client.network_neighborhood().await?;
            println!("{}", format_value(&hosts, &format.into())?);
        }
        DiagCommands::PacketCapture(command) => handle_packet_capture(client, command, format).await?,
        DiagCommands::Telnet => {
            let config = client.get_telnet().await?;
            emit(format, &config, |config| format_shell("Telnet", config))?;
        }
        DiagCommands::SetTelnet { shell } => {
            client.set_telnet(&shell_config(shell)).await?;
            emit_success(format, "Telnet settings updated")?;
        }
        DiagCommands::Ssh => {
            let config = client.get_ssh().await?;
            emit(format, &config, |config| format_shell("SSH", config))?;
        }
        DiagCommands::SetSsh { shell } => {
            client.set_ssh(&shell_config(shell)).await?;
            emit_success(format, "SSH settings updated")?;
        }
    }

    Ok(())
}

async fn handle_packet_capture(
    client: &BrightSignClient,
    command: PacketCaptureCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        PacketCaptureCommands::Status => {
            let status = client.packet_capture_status().await?;
            emit(format, &status, |status| {
                let state = if status.running {
                    "running".green().to_string()
                } else {
                    "stopped".dimmed().to_string()
                };
                let mut rows = vec![("State", state)];
                if status.running {
                    rows.push(("Interface", status.interface.clone()));
                    rows.push((
                        "Captured",
                        status.bytes_captured.map(|b| b.to_string()).unwrap_or_default(),
                    ));
                    rows.push(("File", status.output_file.clone()));
                }
                format_key_values("Packet Capture", &rows)
            })?;
        }
        PacketCaptureCommands::Start {
            interface,
            duration,
            max_file_size,
            filter,
            output_file,
        } => {
            let config = PacketCaptureConfig {
                interface,
                duration,
                max_file_size,
                filter: filter.unwrap_or_default(),
                output_file: output_file.unwrap_or_default(),
            };
            client.start_packet_capture(&config).await?;
            emit_success(
                format,
                &format!("Capturing on {} for {}s", config.interface, config.duration),
            )?;
        }
        PacketCaptureCommands::Stop => {
            client.stop_packet_capture().await?;
            emit_success(format, "Packet capture stopped")?;
        }
    }

    Ok(())
}

/// Handle display commands
pub async fn handle_display(
    client: &BrightSignClient,
    command: DisplayCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        DisplayCommands::Show => {
            let settings = client.display_settings().await?;
            emit(format, &settings, |settings| {
                let level = |setting: &Option<brightsign_core::LevelSetting>| {
                    setting
                        .as_ref()
                        .map(|s| s.value.to_string())
                        .unwrap_or_else(|| "-".to_string())
                };
                format_key_values(
                    "Display",
                    &[
                        ("Brightness", level(&settings.brightness)),
                        ("Contrast", level(&settings.contrast)),
                        ("Volume", level(&settings.volume)),
                        (
                            "Power",
                            settings
                                .power_settings
                                .as_ref()
                                .map(|p| p.state.clone())
                                .unwrap_or_else(|| "-".to_string()),
                        ),
                    ],
                )
            })?;
        }
        DisplayCommands::Brightness => {
            let setting = client.get_brightness().await?;
            emit(format, &setting, |s| format!("Brightness: {}", s.value.to_string().cyan()))?;
        }
        DisplayCommands::SetBrightness { value } => {
            client.set_brightness(value).await?;
            emit_success(format, &format!("Brightness set to {}", value))?;
        }
        DisplayCommands::Contrast => {
            let setting = client.get_contrast().await?;
            emit(format, &setting, |s| format!("Contrast: {}", s.value.to_string().cyan()))?;
        }
        DisplayCommands::SetContrast { value } => {
            client.set_contrast(value).await?;
            emit_success(format, &format!("Contrast set to {}", value))?;
        }
        DisplayCommands::Volume => {
            let setting = client.get_volume().await?;
            emit(format, &setting, |s| format!("Volume: {}", s.value.to_string().cyan()))?;
        }
        DisplayCommands::SetVolume { value } => {
            client.set_volume(value).await?;
            emit_success(format, &format!("Volume set to {}", value))?;
        }
        DisplayCommands::Power => {
            let power = client.get_power().await?;
            emit(format, &power, |p| format!("Power: {}", p.state.cyan()))?;
        }
        DisplayCommands::SetPower { state } => {
            client.set_power(&state).await?;
            emit_success(format, &format!("Power set to {}", state))?;
        }
        DisplayCommands::Info => {
            let info = client.display_info().await?;
            emit(format, &info, |info| {
                format_key_values(
                    "Attached Display",
                    &[
                        ("Model", info.model.clone()),
                        ("Serial", info.serial_number.clone()),
                        ("Firmware", info.version.clone()),
                        ("Resolution", format!("{}x{}", info.width, info.height)),
                    ],
                )
            })?;
        }
        DisplayCommands::UpdateFirmware { source } => {
            client.update_display_firmware(&source).await?;
            emit_success(format, &format!("Display firmware update started from {}", source))?;
        }
    }

    Ok(())
}

/// Handle video commands
pub async fn handle_video(
    client: &BrightSignClient,
    command: VideoCommands,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        VideoCommands::Output { output } => {
            let info = client.video_output(&output.connector, &output.device).await?;
            emit(format, &info, |info| {
                format_key_values(
                    &format!("Output {}/{}", info.connector, info.device),
                    &[
                        ("Connected", info.connected.to_string()),
                        ("Resolution", format!("{}x{}", info.width, info.height)),
                        ("Refresh", format!("{}Hz", info.refresh_rate)),
                        ("Preferred", info.preferred_mode.clone()),
                    ],
                )
            })?;
        }
        VideoCommands::Modes { output } => {
            let modes = client.video_modes(&output.connector, &output.device).await?;
            println!("{}", format_video_modes(&modes, &format.into())?);
        }
        VideoCommands::Mode { output } => {
            let mode = client
                .video_current_mode(&output.connector, &output.device)
                .await?;
            emit(format, &mode, |mode| format!("Current mode: {}", mode.mode.cyan()))?;
        }
        VideoCommands::SetMode { mode, output } => {
            client
                .set_video_mode(&output.connector, &output.device, &mode)
                .await?;
            emit_success(format, &format!("Video mode set to {}", mode))?;
        }
        VideoCommands::Edid { output } => {
            let edid = client.video_edid(&output.connector, &output.device).await?;
            emit(format, &edid, |edid| {
                format_key_values(
                    &format!("EDID {}/{}", output.connector, output.device),
                    &[
                        ("Manufacturer", edid.manufacturer.clone()),
                        ("Product", edid.product.clone()),
                        ("Serial", edid.serial_number.clone()),
                        (
                            "Made",
                            format!("week {} of {}", edid.week_of_manufacture, edid.year_of_manufacture),
                        ),
                        ("Size", format!("{}x{} cm", edid.width, edid.height)),
                        ("Modes", edid.supported_modes.join(", ")),
                    ],
                )
            })?;
        }
        VideoCommands::PowerSave { output } => {
            let status = client
                .get_power_save(&output.connector, &output.device)
                .await?;
            emit(format, &status, |status| {
                format_key_values("Power Save", &[("Status", on_off(status.enabled))])
            })?;
        }
        VideoCommands::SetPowerSave { enabled, output } => {
            client
                .set_power_save(&output.connector, &output.device, enabled)
                .await?;
            emit_success(
                format,
                &format!("Power save {}", if enabled { "enabled" } else { "disabled" }),
            )?;
        }
        VideoCommands::Cec { hex } => {
            client.send_cec(&hex).await?;
            emit_success(format, &format!("CEC frame {} sent", hex))?;
        }
    }

    Ok(())
}

/// Handle config commands
///
/// `set` and `reset` rewrite the file at `config_path` only; values coming
/// from flags or the environment are never persisted.
pub async fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    config_path: &Path,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("{}", format_config(current_config, &format.into())?);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = CliConfig::load_from(config_path)?;
            config.set_value(&key, &value)?;
            config
                .save_to(config_path)
                .with_context(|| format!("Failed to save {}", config_path.display()))?;
            let shown = if key == "password" { "********" } else { value.as_str() };
            emit_success(format, &format!("Set {} = {}", key, shown))?;
        }
        ConfigCommands::Reset => {
            CliConfig::default().save_to(config_path)?;
            emit_success(format, "Configuration reset to defaults")?;
        }
        ConfigCommands::Path => match format {
            OutputFormat::Json => println!(
                "{}",
                format_json(&serde_json::json!({ "path": config_path.display().to_string() }))?
            ),
            OutputFormat::Table => println!("{}", config_path.display()),
        },
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
