use clap::{Parser, Subcommand, ValueEnum};
use iqonboard_core::MatchMode;

#[derive(Parser)]
#[command(name = "iqonboard")]
#[command(about = "Onboard organizations and applications from a CSV import file")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server base URL (overrides config)
    #[arg(short, long, global = true, env = "IQ_URL")]
    pub url: Option<String>,

    /// Credentials as user:password; an admin account avoids onboarding errors
    #[arg(short, long, global = true, env = "IQ_AUTH", hide_env_values = true)]
    pub auth: Option<String>,

    /// CSV import file
    #[arg(short, long, alias = "file_name", global = true, env = "IQ_IMPORT_FILE")]
    pub file_name: Option<String>,

    /// Organization used for rows without an organizationName
    #[arg(short = 'o', long, alias = "default_org", global = true, env = "IQ_DEFAULT_ORG")]
    pub default_org: Option<String>,

    /// How organization and category names are matched against existing ones
    #[arg(long, global = true, env = "IQ_MATCH_MODE")]
    pub match_mode: Option<MatchModeArg>,

    /// Per-request timeout in seconds (no timeout when unset)
    #[arg(long, global = true, env = "IQ_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Config profile name
    #[arg(short, long, global = true, env = "IQ_PROFILE", default_value = "default")]
    pub profile: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MatchModeArg {
    /// Names must be identical
    Exact,
    /// An existing name containing the requested one is a match
    Containment,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Exact => MatchMode::Exact,
            MatchModeArg::Containment => MatchMode::Containment,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import the CSV file (default when no command is given)
    Run,
    /// Validate the import file header and rows without contacting the server
    Check,
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (url, default_org, match_mode, timeout_secs)
    pub key: String,
    /// Value
    pub value: String,
}
