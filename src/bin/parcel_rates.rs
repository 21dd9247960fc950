//! Command-line shipping quotes.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use parcel_rates::telemetry::{LogFormat, init_tracing};
use parcel_rates::{
    Package, ServiceTier, ShippingConfig, ShippingOption, ShippingQuote, ShippingService,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parcel-rates")]
#[command(about = "Shipping-rate quotes with live carrier rates and local fallback")]
struct Cli {
    /// Configuration file (defaults to ./parcel-rates.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured origin postal code
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Quote a single service
    Quote {
        #[command(flatten)]
        package: PackageArgs,

        /// Service tier, e.g. media-mail, ground, priority, express
        #[arg(short, long)]
        service: ServiceTier,
    },
    /// Quote every service, cheapest first
    Options {
        #[command(flatten)]
        package: PackageArgs,
    },
    /// Check carrier credentials
    TestConnection,
}

#[derive(Args)]
struct PackageArgs {
    /// Destination postal code
    #[arg(short, long)]
    to: String,

    /// Weight in ounces
    #[arg(short, long)]
    weight_oz: Option<f64>,

    /// Dimensions in inches, e.g. 8x10x12
    #[arg(short, long)]
    dims: Option<String>,

    /// Print quotes as JSON
    #[arg(long)]
    json: bool,
}

impl PackageArgs {
    fn package(&self) -> Result<Package> {
        Package::from_record(
            self.weight_oz,
            self.dims.as_deref(),
            ShippingOption::Calculated,
            None,
        )
        .context("invalid package")
    }
}

fn print_quotes(quotes: &[ShippingQuote], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(quotes)?);
        return Ok(());
    }
    for quote in quotes {
        println!("{quote}");
        for line in quote.breakdown() {
            println!("    {:<18} {}", line.component.to_string(), line.amount);
        }
        for warning in quote.warnings() {
            println!("    warning: {warning}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    init_tracing(format, cli.verbose).context("failed to initialize logging")?;

    let config = ShippingConfig::load_from(cli.config.as_deref(), cli.origin.as_deref())
        .context("failed to load configuration")?;

    let service =
        ShippingService::from_config(&config).context("failed to build shipping service")?;

    match cli.command {
        Command::Quote { package, service: tier } => {
            let quote = service
                .calculate_shipping(&package.package()?, &package.to, tier)
                .await?;
            print_quotes(std::slice::from_ref(&quote), package.json)?;
        }
        Command::Options { package } => {
            let quotes = service
                .get_shipping_options(&package.package()?, &package.to)
                .await?;
            print_quotes(&quotes, package.json)?;
        }
        Command::TestConnection => {
            let status = service.test_connection().await;
            println!("{}", status.message);
            if !status.ok {
                bail!("connection test failed");
            }
        }
    }

    Ok(())
}
