//! Sovra CLI — Command-line interface for self-sovereign identity vaults.
//!
//! Subcommands: init, use, current, issue, set, show, present, verify,
//! prove-range, revoke, check-revoked, list-revoked, auth-request,
//! auth-respond, auth-verify.

mod commands;
mod config;
mod vault;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::CliConfig;

/// Sovra — Self-sovereign identity toolkit.
#[derive(Parser, Debug)]
#[command(name = "sovra", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "sovra.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new identity vault and make it active.
    Init(commands::init::InitArgs),
    /// Select the active identity.
    Use(commands::use_identity::UseArgs),
    /// Show the active identity.
    Current(commands::current::CurrentArgs),
    /// Issue a credential from the vault's attributes.
    Issue(commands::issue::IssueArgs),
    /// Set a subject attribute and reissue a credential.
    Set(commands::set::SetArgs),
    /// Show the DID document and stored credentials.
    Show(commands::show::ShowArgs),
    /// Build and sign a presentation.
    Present(commands::present::PresentArgs),
    /// Verify a credential or presentation file.
    Verify(commands::verify::VerifyArgs),
    /// Produce a standalone range proof for a credential attribute.
    ProveRange(commands::prove_range::ProveRangeArgs),
    /// Revoke a credential.
    Revoke(commands::revocation::RevokeArgs),
    /// Check whether a credential is revoked.
    CheckRevoked(commands::revocation::CheckRevokedArgs),
    /// List revoked credentials.
    ListRevoked(commands::revocation::ListRevokedArgs),
    /// Create a DID authentication challenge.
    AuthRequest(commands::auth::AuthRequestArgs),
    /// Sign a DID authentication challenge with the active identity.
    AuthRespond(commands::auth::AuthRespondArgs),
    /// Verify a DID authentication response.
    AuthVerify(commands::auth::AuthVerifyArgs),
}

fn init_tracing(config: &CliConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(&cli.config)?;
    init_tracing(&config, cli.log_level.as_deref());

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &mut config, &cli.config),
        Commands::Use(args) => commands::use_identity::run(args, &mut config, &cli.config),
        Commands::Current(args) => commands::current::run(args, &config),
        Commands::Issue(args) => commands::issue::run(args, &config),
        Commands::Set(args) => commands::set::run(args, &config),
        Commands::Show(args) => commands::show::run(args, &config),
        Commands::Present(args) => commands::present::run(args, &config),
        Commands::Verify(args) => commands::verify::run(args, &config),
        Commands::ProveRange(args) => commands::prove_range::run(args),
        Commands::Revoke(args) => commands::revocation::revoke(args, &config),
        Commands::CheckRevoked(args) => commands::revocation::check(args, &config),
        Commands::ListRevoked(args) => commands::revocation::list(args, &config),
        Commands::AuthRequest(args) => commands::auth::request(args),
        Commands::AuthRespond(args) => commands::auth::respond(args, &config),
        Commands::AuthVerify(args) => commands::auth::verify(args),
    }
}
