//! Clap derive structures for the `sdwan` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sdwan -- command-line client for SD-WAN (vManage) controllers
#[derive(Debug, Parser)]
#[command(
    name = "sdwan",
    version,
    about = "Manage SD-WAN controllers from the command line",
    long_about = "Query devices and device templates on an SD-WAN (vManage) controller,\n\
        attach or detach templates, and follow the resulting asynchronous actions\n\
        until the controller reports them done.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "SDWAN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Full controller base URL (overrides --host/--port)
    #[arg(long, env = "SDWAN_URL", global = true)]
    pub url: Option<String>,

    /// Controller host name or IP
    #[arg(long, short = 'H', env = "SDWAN_IP", global = true)]
    pub host: Option<String>,

    /// Controller HTTPS port
    #[arg(long, short = 'P', env = "SDWAN_PORT", global = true)]
    pub port: Option<u16>,

    /// Path prefix the controller is served under
    #[arg(long, env = "SDWAN_BASE_PATH", global = true)]
    pub base_path: Option<String>,

    /// Controller username
    #[arg(long, short = 'u', env = "SDWAN_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller password
    #[arg(long, env = "SDWAN_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SDWAN_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Skip TLS certificate verification (lab controllers with self-signed certs)
    #[arg(long, short = 'k', env = "SDWAN_INSECURE", global = true)]
    pub insecure: bool,

    /// CA certificate (PEM) to trust for the controller
    #[arg(long, env = "SDWAN_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, env = "SDWAN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List devices known to the controller
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List device templates and their attachments
    #[command(alias = "tpl", alias = "t")]
    Templates(TemplatesArgs),

    /// Attach a device template to a device
    Attach(AttachArgs),

    /// Detach a device from its template (switch it to CLI mode)
    Detach(DetachArgs),

    /// Inspect or wait on an asynchronous controller action
    Action(ActionArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices
    #[command(alias = "ls")]
    List,
}

// ── Templates ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommand,
}

#[derive(Debug, Subcommand)]
pub enum TemplatesCommand {
    /// List device templates
    #[command(alias = "ls")]
    List,

    /// List devices attached to a template
    Attached {
        /// Template ID
        #[arg(long, short = 't')]
        template: String,
    },
}

// ── Attach / Detach ──────────────────────────────────────────────────

/// Shared options for commands that start an asynchronous action.
#[derive(Debug, Args)]
pub struct WaitOpts {
    /// Print the action id and return without waiting
    #[arg(long)]
    pub no_wait: bool,

    /// Delay between status polls, at least 100ms (e.g. 5s, 500ms)
    #[arg(long, default_value = "5s", value_parser = parse_poll_interval)]
    pub poll_interval: Duration,

    /// Give up waiting after this long (e.g. 10m)
    #[arg(long, default_value = "10m", value_parser = humantime::parse_duration)]
    pub wait_timeout: Duration,
}

#[derive(Debug, Args)]
pub struct AttachArgs {
    /// Device template ID
    #[arg(long, short = 't')]
    pub template: String,

    /// Target device UUID
    #[arg(long)]
    pub target: String,

    /// Host name (sets csv-host-name and //system/host-name)
    #[arg(long)]
    pub hostname: Option<String>,

    /// System IP (sets csv-deviceIP and //system/system-ip)
    #[arg(long)]
    pub sysip: Option<String>,

    /// Site ID (sets //system/site-id)
    #[arg(long)]
    pub siteid: Option<String>,

    /// Loopback1 address (sets /1/loopback1/interface/ip/address)
    #[arg(long)]
    pub loopip: Option<String>,

    /// ge0/0 address (sets /0/ge0/0/interface/ip/address)
    #[arg(long)]
    pub geip: Option<String>,

    /// Template variable as PATH=VALUE (repeatable)
    #[arg(long = "var", value_name = "PATH=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// JSON or YAML file with a PATH: VALUE mapping of template variables
    #[arg(long, value_name = "FILE")]
    pub vars_file: Option<PathBuf>,

    /// Do not ask the controller for the device's current variables first
    /// (requires --hostname and --sysip)
    #[arg(long)]
    pub skip_inputs: bool,

    #[command(flatten)]
    pub wait: WaitOpts,
}

#[derive(Debug, Args)]
pub struct DetachArgs {
    /// Target device UUID
    #[arg(long)]
    pub target: String,

    /// Device system IP
    #[arg(long)]
    pub sysip: String,

    /// Controller device class
    #[arg(long, default_value = "vedge")]
    pub device_type: String,

    #[command(flatten)]
    pub wait: WaitOpts,
}

// ── Actions ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ActionArgs {
    #[command(subcommand)]
    pub command: ActionCommand,
}

#[derive(Debug, Subcommand)]
pub enum ActionCommand {
    /// Show the current status of an action
    Status {
        /// Action ID returned by attach/detach
        id: String,
    },

    /// Poll an action until it finishes
    Wait {
        /// Action ID returned by attach/detach
        id: String,

        /// Delay between status polls (at least 100ms)
        #[arg(long, default_value = "5s", value_parser = parse_poll_interval)]
        poll_interval: Duration,

        /// Give up waiting after this long
        #[arg(long, default_value = "10m", value_parser = humantime::parse_duration)]
        wait_timeout: Duration,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (secrets masked)
    Show,

    /// Set a profile value
    Set {
        /// Key (host, port, url, base_path, username, password, insecure, timeout, ca_cert)
        key: String,
        /// Value
        value: String,
    },

    /// List profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

/// Shortest accepted delay between two status polls.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Parse a poll interval, rejecting anything below [`MIN_POLL_INTERVAL`].
fn parse_poll_interval(raw: &str) -> Result<Duration, String> {
    let interval = humantime::parse_duration(raw).map_err(|e| e.to_string())?;
    if interval < MIN_POLL_INTERVAL {
        return Err(format!(
            "must be at least {}",
            humantime::format_duration(MIN_POLL_INTERVAL)
        ));
    }
    Ok(interval)
}

/// Parse `PATH=VALUE`; the value may itself contain `=`.
fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((path, value)) if !path.trim().is_empty() => {
            Ok((path.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected PATH=VALUE, got '{raw}'")),
    }
}
