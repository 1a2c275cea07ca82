use anyhow::Result;
use apexx::cli::OutputFormat;
use apexx::core::log::init_logging;
use apexx::core::strategy::DebtStrategy;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Highest interest rate first
    Avalanche,
    /// Smallest balance first
    Snowball,
}

impl From<StrategyArg> for DebtStrategy {
    fn from(arg: StrategyArg) -> DebtStrategy {
        match arg {
            StrategyArg::Avalanche => DebtStrategy::Avalanche,
            StrategyArg::Snowball => DebtStrategy::Snowball,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List active loans with their payoff at minimum payments
    Loans,
    /// Show the payoff schedule of a loan
    Project {
        /// Loan id from the configuration
        loan_id: String,
        /// Extra amount paid every month on top of the minimum
        #[arg(short, long, default_value_t = 0.0)]
        extra: f64,
    },
    /// Rank loans and direct an extra monthly amount at the top one
    Strategy {
        #[arg(value_enum)]
        strategy: StrategyArg,
        /// Extra amount available each month
        #[arg(short, long, default_value_t = 0.0)]
        extra: f64,
    },
    /// Recommend how to split a monthly amount between debt and investing
    Advise {
        /// Total amount available each month, minimum payments included
        amount: f64,
        /// Expected annual investment return in percent
        #[arg(short = 'r', long)]
        expected_return: Option<f64>,
    },
    /// Project investment growth against the interest owed on current loans
    Outlook {
        /// Amount invested every month
        monthly_investment: f64,
        /// Expected annual investment return in percent
        #[arg(short = 'r', long)]
        expected_return: Option<f64>,
        /// Number of years to project
        #[arg(short, long, default_value_t = 10)]
        years: u32,
    },
    /// Show how a payment would be split between interest and principal
    Pay {
        /// Loan id from the configuration
        loan_id: String,
        /// Payment amount
        amount: f64,
    },
    /// Display portfolio value and returns
    Portfolio,
}

impl From<Commands> for apexx::AppCommand {
    fn from(cmd: Commands) -> apexx::AppCommand {
        match cmd {
            Commands::Loans => apexx::AppCommand::Loans,
            Commands::Project { loan_id, extra } => apexx::AppCommand::Project { loan_id, extra },
            Commands::Strategy { strategy, extra } => apexx::AppCommand::Strategy {
                strategy: strategy.into(),
                extra,
            },
            Commands::Advise {
                amount,
                expected_return,
            } => apexx::AppCommand::Advise {
                amount,
                expected_return,
            },
            Commands::Outlook {
                monthly_investment,
                expected_return,
                years,
            } => apexx::AppCommand::Outlook {
                monthly_investment,
                expected_return,
                years,
            },
            Commands::Pay { loan_id, amount } => apexx::AppCommand::Pay { loan_id, amount },
            Commands::Portfolio => apexx::AppCommand::Portfolio,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => apexx::cli::setup::setup_at_path(path),
            None => apexx::cli::setup::setup(),
        },
        Some(cmd) => apexx::run_command(cmd.into(), cli.config_path.as_deref(), format).await,
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
