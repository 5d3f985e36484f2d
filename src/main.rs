use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use mfpick::core::log::init_logging;
use mfpick::core::request::{RiskTier, Tenure};
use rust_decimal::Decimal;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RiskArg {
    Low,
    Medium,
    High,
}

impl From<RiskArg> for RiskTier {
    fn from(arg: RiskArg) -> RiskTier {
        match arg {
            RiskArg::Low => RiskTier::Low,
            RiskArg::Medium => RiskTier::Medium,
            RiskArg::High => RiskTier::High,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TenureArg {
    Short,
    Long,
}

impl From<TenureArg> for Tenure {
    fn from(arg: TenureArg) -> Tenure {
        match arg {
            TenureArg::Short => Tenure::Short,
            TenureArg::Long => Tenure::Long,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Recommend stocks to buy from the top ranked fund of a risk tier
    Recommend {
        /// Total funds available
        #[arg(short, long)]
        amount: Decimal,

        /// Percentage of funds to invest
        #[arg(short, long, default_value = "50")]
        percent: Decimal,

        /// Risk appetite
        #[arg(short, long, value_enum)]
        risk: RiskArg,

        /// Tenure of investment
        #[arg(short, long, value_enum, default_value = "short")]
        tenure: TenureArg,
    },
}

impl From<Commands> for mfpick::AppCommand {
    fn from(cmd: Commands) -> mfpick::AppCommand {
        match cmd {
            Commands::Recommend {
                amount,
                percent,
                risk,
                tenure,
            } => mfpick::AppCommand::Recommend(mfpick::RecommendOptions {
                amount,
                percent,
                risk: risk.into(),
                tenure: tenure.into(),
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => mfpick::cli::setup::setup(),
        Some(cmd) => mfpick::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
