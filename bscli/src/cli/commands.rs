//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BrightSign player CLI
#[derive(Parser, Debug)]
#[command(name = "bscli")]
#[command(
    version,
    about = "Manage BrightSign players over the Diagnostic Web Server API",
    long_about = None
)]
pub struct Cli {
    /// Player address, host[:port] or http(s)://host[:port] (overrides config file)
    #[arg(short = 'H', long, global = true)]
    pub host: Option<String>,

    /// DWS username (default: admin)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// DWS password (prompted for when not configured)
    #[arg(short, long, global = true)]
    pub password: Option<String>,

    /// Output format (overrides config file)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use HTTPS and accept the player's self-signed certificate
    #[arg(short, long, global = true)]
    pub local: bool,

    /// Request timeout in seconds (1-300)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Config file path (default: <config dir>/bscli/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Don't load config file
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        }
    }
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Device information
    Info {
        #[command(subcommand)]
        command: InfoCommands,
    },

    /// Reboot, snapshots and DWS settings
    Control {
        #[command(subcommand)]
        command: ControlCommands,
    },

    /// Files on player storage
    File {
        #[command(subcommand)]
        command: FileCommands,
    },

    /// Player registry
    Registry {
        #[command(subcommand)]
        command: RegistryCommands,
    },

    /// Player logs
    Logs {
        #[command(subcommand)]
        command: LogsCommands,
    },

    /// Network diagnostics
    Diag {
        #[command(subcommand)]
        command: DiagCommands,
    },

    /// Display control
    Display {
        #[command(subcommand)]
        command: DisplayCommands,
    },

    /// Video output
    Video {
        #[command(subcommand)]
        command: VideoCommands,
    },

    /// Show or manage CLI configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum InfoCommands {
    /// Model, serial, firmware and network
    Show,
    /// Player health
    Health,
    /// Player clock
    Time,
    /// Set the player clock
    SetTime {
        /// Time, HH:MM:SS
        time: String,
        /// Date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Time zone name
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Active video mode
    VideoMode,
    /// API endpoints advertised by the player
    Apis,
}

#[derive(Subcommand, Debug)]
pub enum ControlCommands {
    /// Reboot the player
    Reboot {
        /// Save a crash report before rebooting
        #[arg(long)]
        crash_report: bool,
        /// Factory reset on reboot
        #[arg(long)]
        factory_reset: bool,
        /// Disable autorun on reboot
        #[arg(long)]
        disable_autorun: bool,
    },
    /// Whether a DWS password is set
    DwsPassword,
    /// Change or reset the DWS password
    SetDwsPassword {
        /// New password
        #[arg(required_unless_present = "reset")]
        new_password: Option<String>,
        /// Remove the password
        #[arg(long)]
        reset: bool,
    },
    /// Local DWS status
    LocalDws,
    /// Enable or disable the local DWS
    SetLocalDws {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Capture a screenshot
    Snapshot {
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        /// Capture at full resolution
        #[arg(long)]
        full: bool,
    },
    /// Download firmware from a URL and reboot into it
    DownloadFirmware {
        url: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// List a directory
    List {
        /// Remote path, /storage/<device>/... or relative to /storage/sd/
        #[arg(default_value = "/storage/sd/")]
        path: String,
        /// Raw listing
        #[arg(long)]
        raw: bool,
    },
    /// Upload a file
    Upload {
        /// Local file
        file: PathBuf,
        /// Remote path (default: /storage/sd/<file name>)
        remote: Option<String>,
    },
    /// Upload a file to a device root and confirm it arrived
    Push {
        /// Local file
        file: PathBuf,
        /// Storage device
        #[arg(long, default_value = brightsign_core::storage::DEFAULT_DEVICE)]
        device: String,
        /// Skip the existence check after uploading
        #[arg(long)]
        no_verify: bool,
    },
    /// Download a file
    Download {
        /// Remote path
        remote: String,
        /// Local file (default: remote file name in the current directory)
        output: Option<PathBuf>,
    },
    /// Delete a file or directory
    Delete {
        path: String,
    },
    /// Rename a file within its directory
    Rename {
        path: String,
        new_name: String,
    },
    /// Create a directory
    Mkdir {
        path: String,
    },
    /// Check whether a root-level file exists (case-insensitive)
    Exists {
        path: String,
    },
    /// Erase a storage device
    Format {
        /// Storage device, e.g. sd or usb1
        device: String,
        /// Confirm erasing the device
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryCommands {
    /// Dump the whole registry
    Dump,
    /// Read a value
    Get {
        section: String,
        key: String,
    },
    /// Write a value
    Set {
        section: String,
        key: String,
        value: String,
    },
    /// Delete a value
    Delete {
        section: String,
        key: String,
    },
    /// Delete a whole section
    DeleteSection {
        section: String,
    },
    /// Show the recovery URL
    RecoveryUrl,
    /// Set the recovery URL
    SetRecoveryUrl {
        url: String,
    },
    /// Flush registry changes to storage
    Flush,
    /// Find values whose section, key or value contains a term
    Search {
        term: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogsCommands {
    /// Print the player log
    Show,
    /// Show the supervisor logging level
    Level,
    /// Set the supervisor logging level (0 error, 1 warn, 2 info, 3 trace)
    SetLevel {
        level: u8,
    },
}

#[derive(Subcommand, Debug)]
pub enum DiagCommands {
    /// Run the built-in network diagnostics
    Run,
    /// Resolve a host name
    Dns {
        address: String,
        /// Also reverse-resolve the result
        #[arg(long)]
        resolve: bool,
    },
    /// Ping an address
    Ping {
        address: String,
    },
    /// Trace the route to an address
    Traceroute {
        address: String,
        /// Resolve hop addresses
        #[arg(long)]
        resolve: bool,
    },
    /// List network interfaces
    Interfaces,
    /// Show an interface's configuration
    NetConfig {
        interface: String,
    },
    /// Apply a new interface configuration
    SetNetConfig {
        interface: String,
        #[command(flatten)]
        network: NetworkArgs,
    },
    /// Hosts seen on the local network
    Neighborhood,
    /// Packet capture
    #[command(subcommand)]
    PacketCapture(PacketCaptureCommands),
    /// Telnet settings
    Telnet,
    /// Change telnet settings
    SetTelnet {
        #[command(flatten)]
        shell: ShellArgs,
    },
    /// SSH settings
    Ssh,
    /// Change SSH settings
    SetSsh {
        #[command(flatten)]
        shell: ShellArgs,
    },
}

#[derive(clap::Args, Debug)]
pub struct NetworkArgs {
    /// Use DHCP instead of a static address
    #[arg(long, conflicts_with_all = ["ip", "netmask", "gateway"])]
    pub dhcp: bool,
    /// Static address
    #[arg(long, required_unless_present = "dhcp")]
    pub ip: Option<String>,
    #[arg(long)]
    pub netmask: Option<String>,
    #[arg(long)]
    pub gateway: Option<String>,
    /// DNS server (repeatable)
    #[arg(long = "dns")]
    pub dns: Vec<String>,
    /// VLAN tag
    #[arg(long)]
    pub vlan: Option<u16>,
}

#[derive(Subcommand, Debug)]
pub enum PacketCaptureCommands {
    /// Whether a capture is running
    Status,
    /// Start capturing
    Start {
        /// Interface to capture on
        #[arg(long, default_value = "eth0")]
        interface: String,
        /// Capture length in seconds
        #[arg(long, default_value = "60")]
        duration: u64,
        /// Stop after this many bytes
        #[arg(long)]
        max_file_size: Option<u64>,
        /// pcap filter expression
        #[arg(long)]
        filter: Option<String>,
        /// Capture file on the player
        #[arg(long)]
        output_file: Option<String>,
    },
    /// Stop the running capture
    Stop,
}

#[derive(clap::Args, Debug)]
pub struct ShellArgs {
    #[arg(action = clap::ArgAction::Set)]
    pub enabled: bool,
    /// Listening port
    #[arg(long)]
    pub port: Option<u16>,
    /// Login password
    #[arg(long)]
    pub shell_password: Option<String>,
    /// Reboot to apply
    #[arg(long)]
    pub reboot: bool,
}

#[derive(Subcommand, Debug)]
pub enum DisplayCommands {
    /// All display settings
    Show,
    /// Current brightness
    Brightness,
    /// Set brightness
    SetBrightness {
        #[arg(value_parser = clap::value_parser!(i64).range(0..=100))]
        value: i64,
    },
    /// Current contrast
    Contrast,
    /// Set contrast
    SetContrast {
        #[arg(value_parser = clap::value_parser!(i64).range(0..=100))]
        value: i64,
    },
    /// Current volume
    Volume,
    /// Set volume
    SetVolume {
        #[arg(value_parser = clap::value_parser!(i64).range(0..=100))]
        value: i64,
    },
    /// Power state
    Power,
    /// Set power state (on or standby)
    SetPower {
        state: String,
    },
    /// Attached display model and serial
    Info,
    /// Update the display's firmware from a URL or player path
    UpdateFirmware {
        source: String,
    },
}

#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Video connector
    #[arg(long, default_value = "hdmi")]
    pub connector: String,
    /// Output index on the connector
    #[arg(long, default_value = "0")]
    pub device: String,
}

#[derive(Subcommand, Debug)]
pub enum VideoCommands {
    /// Output status
    Output {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Modes the output supports
    Modes {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Current mode
    Mode {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Change the video mode
    SetMode {
        mode: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// EDID of the attached monitor
    Edid {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Power save state
    PowerSave {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Enable or disable power save
    SetPowerSave {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Send a raw CEC frame (hex)
    Cec {
        hex: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set configuration value
    Set {
        /// Configuration key (host, username, password, format, verbose, timeout, insecure)
        key: String,
        /// Configuration value
        value: String,
    },

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}
