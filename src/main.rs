use anyhow::{Context, Result};
use clap::Parser;
use dnsimple_client::{ClientConfig, Credentials, DEFAULT_API_URL, DnsimpleClient};
use log::debug;
use serde::Serialize;
use std::time::Duration;

/// dnsimple - DNSimple domain management
///
/// Lists, inspects, registers and transfers domains through the DNSimple API.
///
/// Credentials are read from --username/--password or the DNSIMPLE_USERNAME
/// and DNSIMPLE_PASSWORD environment variables.
///
/// Examples:
///   dnsimple list                   # List all domains in the account
///   dnsimple show example.com       # Show one domain
#[derive(Parser, Debug)]
#[command(author, version = env!("DNSIMPLE_CLIENT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Account username (also via DNSIMPLE_USERNAME)
    #[arg(long, env = "DNSIMPLE_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password (also via DNSIMPLE_PASSWORD)
    #[arg(long, env = "DNSIMPLE_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// API URL (defaults to https://dnsimple.com)
    #[arg(long = "api-url", env = "DNSIMPLE_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        env = "DNSIMPLE_TIMEOUT",
        value_name = "SECONDS",
        default_value_t = 30,
        global = true
    )]
    pub timeout: u64,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// List all domains in the account
    List,

    /// Show the details of a single domain
    Show(NameArgs),

    /// Register a domain name
    Register(RegisterArgs),

    /// Add a domain to the account without registering it
    Add(NameArgs),

    /// Transfer a domain from another registrar
    Transfer(TransferArgs),

    /// Delete a domain from the account
    Delete(NameArgs),
}

#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// The domain name, e.g. "example.com"
    #[arg(value_name = "DOMAIN")]
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    /// The domain name to register
    #[arg(value_name = "DOMAIN")]
    pub name: String,

    /// Registrant to register the domain for (defaults to the registrant of
    /// the first domain in the account)
    #[arg(long = "registrant-id", value_name = "ID")]
    pub registrant_id: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct TransferArgs {
    /// The domain name to transfer
    #[arg(value_name = "DOMAIN")]
    pub name: String,

    /// Registrant to transfer the domain to
    #[arg(long = "registrant-id", value_name = "ID")]
    pub registrant_id: u64,

    /// Authorization (EPP) code from the current registrar
    #[arg(long = "auth-code", value_name = "CODE")]
    pub auth_code: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = build_client(&cli)?;

    match cli.command {
        Commands::List => print_json(&client.list_domains().await?)?,
        Commands::Show(args) => print_json(
            &client
                .get_domain(&args.name)
                .await
                .with_context(|| format!("Failed to fetch {}", args.name))?,
        )?,
        Commands::Register(args) => print_json(
            &client
                .register_domain(&args.name, args.registrant_id)
                .await
                .with_context(|| format!("Failed to register {}", args.name))?,
        )?,
        Commands::Add(args) => print_json(
            &client
                .add_domain(&args.name)
                .await
                .with_context(|| format!("Failed to add {}", args.name))?,
        )?,
        Commands::Transfer(args) => print_json(
            &client
                .transfer_domain(&args.name, args.registrant_id, &args.auth_code)
                .await
                .with_context(|| format!("Failed to transfer {}", args.name))?,
        )?,
        Commands::Delete(args) => {
            client
                .delete_domain(&args.name)
                .await
                .with_context(|| format!("Failed to delete {}", args.name))?;
            println!("Deleted {}", args.name);
        }
    }
    Ok(())
}

fn build_client(cli: &Cli) -> Result<DnsimpleClient> {
    // Unset credentials are treated as empty and rejected by Credentials::new
    let credentials = Credentials::new(
        cli.username.clone().unwrap_or_default(),
        cli.password.clone().unwrap_or_default(),
    )
    .context("Set DNSIMPLE_USERNAME and DNSIMPLE_PASSWORD or pass --username/--password")?;

    let api_url = cli.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
    debug!("Using API at {} with {}s timeout", api_url, cli.timeout);

    let config = ClientConfig::default()
        .with_base_url(api_url)?
        .with_timeout(Duration::from_secs(cli.timeout))?;

    Ok(DnsimpleClient::with_config(credentials, config)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
    println!("{}", output);
    Ok(())
}
