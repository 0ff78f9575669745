//! Clap derive structures for the `qubes-air` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use qubes_air_core::{QubeStatus, QubeType, ZoneStatus, ZoneType};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// qubes-air -- manage zones and qubes on a Qubes Air console
#[derive(Debug, Parser)]
#[command(
    name = "qubes-air",
    version,
    about = "Manage Qubes Air zones and qubes from the command line",
    long_about = "Command-line console for a Qubes Air management server.\n\n\
        Zones are connections to hypervisors or cloud providers; qubes are\n\
        the virtual machines running inside them.",
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
    /// Console profile to use
    #[arg(long, short = 'p', env = "QUBES_AIR_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Console server URL (overrides profile)
    #[arg(long, short = 's', env = "QUBES_AIR_SERVER", global = true)]
    pub server: Option<String>,

    /// API base path or absolute URL (default: /api/v1)
    #[arg(long, env = "QUBES_AIR_API_BASE_URL", global = true)]
    pub api_base: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "QUBES_AIR_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "QUBES_AIR_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "QUBES_AIR_TIMEOUT", global = true)]
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
    /// Manage zones (hypervisor and cloud connections)
    #[command(alias = "z")]
    Zones(ZonesArgs),

    /// Manage qubes (virtual machines)
    #[command(alias = "q", alias = "vm")]
    Qubes(QubesArgs),

    /// Check server and database health
    Health,

    /// Show server version and resource counts
    Status,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared pagination arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long, short = 'l')]
    pub page_size: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ZONES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ZonesArgs {
    #[command(subcommand)]
    pub command: ZonesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ZonesCommand {
    /// List zones
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Server-side status filter
        #[arg(long)]
        status: Option<ZoneStatus>,

        /// Server-side provider filter
        #[arg(long = "type", value_name = "TYPE")]
        zone_type: Option<ZoneType>,

        /// Only show connected zones
        #[arg(long, conflicts_with = "status")]
        connected: bool,
    },

    /// Get zone details
    Get {
        /// Zone ID
        zone: String,
    },

    /// Register a new zone
    Create {
        /// Display name
        #[arg(long, required = true)]
        name: String,

        /// Provider: proxmox, gcp, aws, azure
        #[arg(long = "type", value_name = "TYPE", required = true)]
        zone_type: ZoneType,

        #[command(flatten)]
        config: ZoneConfigArgs,
    },

    /// Update a zone's name or connection settings
    Update {
        /// Zone ID
        zone: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        config: ZoneConfigArgs,
    },

    /// Delete a zone
    #[command(alias = "rm")]
    Delete {
        /// Zone ID
        zone: String,
    },

    /// Connect a zone to its provider
    Connect {
        /// Zone ID
        zone: String,
    },

    /// Disconnect a zone from its provider
    Disconnect {
        /// Zone ID
        zone: String,
    },
}

/// Provider connection settings. On `update`, only the given flags change.
#[derive(Debug, Args)]
pub struct ZoneConfigArgs {
    /// API endpoint of the hypervisor or cloud region
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Cloud region
    #[arg(long)]
    pub region: Option<String>,

    /// Cloud project or account
    #[arg(long)]
    pub project: Option<String>,

    /// Login user on the provider
    #[arg(long)]
    pub username: Option<String>,

    /// SSH public key installed on new qubes
    #[arg(long)]
    pub public_key: Option<String>,
}

impl ZoneConfigArgs {
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.region.is_none()
            && self.project.is_none()
            && self.username.is_none()
            && self.public_key.is_none()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  QUBES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct QubesArgs {
    #[command(subcommand)]
    pub command: QubesCommand,
}

#[derive(Debug, Subcommand)]
pub enum QubesCommand {
    /// List qubes
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only qubes in this zone
        #[arg(long, short = 'z')]
        zone: Option<String>,

        /// Server-side status filter
        #[arg(long)]
        status: Option<QubeStatus>,

        /// Server-side type filter
        #[arg(long = "type", value_name = "TYPE")]
        qube_type: Option<QubeType>,

        /// Only show running qubes
        #[arg(long, conflicts_with = "status")]
        running: bool,
    },

    /// Get qube details
    Get {
        /// Qube ID
        qube: String,
    },

    /// Create a qube in a zone
    Create {
        /// Display name
        #[arg(long, required = true)]
        name: String,

        /// Owning zone ID
        #[arg(long, short = 'z', required = true)]
        zone: String,

        /// Qube type: app, work, dev, gpu, disp, sys
        #[arg(long = "type", value_name = "TYPE", required = true)]
        qube_type: QubeType,

        #[command(flatten)]
        spec: QubeSpecArgs,
    },

    /// Update a qube's name or resources
    Update {
        /// Qube ID
        qube: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        spec: QubeSpecArgs,
    },

    /// Delete a qube
    #[command(alias = "rm")]
    Delete {
        /// Qube ID
        qube: String,
    },

    /// Start a qube
    Start {
        /// Qube ID
        qube: String,
    },

    /// Stop a qube
    Stop {
        /// Qube ID
        qube: String,
    },
}

/// Resource overrides. Unset flags keep the server's defaults.
#[derive(Debug, Args)]
pub struct QubeSpecArgs {
    /// Virtual CPUs
    #[arg(long)]
    pub vcpu: Option<u32>,

    /// Memory in MB
    #[arg(long)]
    pub memory: Option<u32>,

    /// Disk in GB
    #[arg(long)]
    pub disk: Option<u32>,

    /// Template image
    #[arg(long)]
    pub template: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Key: server, api_base, insecure, timeout, load_ordering
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
