pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::OutputFormat;
use crate::core::advisor::MAX_PROJECTION_YEARS;
use crate::core::config::AppConfig;
use crate::core::loan::LoanRepository;
use crate::core::strategy::DebtStrategy;
use crate::core::{cache::Cache, ensure_amount};
use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const PRICE_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Loans,
    Project {
        loan_id: String,
        extra: f64,
    },
    Strategy {
        strategy: DebtStrategy,
        extra: f64,
    },
    Advise {
        amount: f64,
        expected_return: Option<f64>,
    },
    Outlook {
        monthly_investment: f64,
        expected_return: Option<f64>,
        years: u32,
    },
    Pay {
        loan_id: String,
        amount: f64,
    },
    Portfolio,
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    info!("apexx starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let currency = config.currency.as_str();
    let policy = config.policy;
    let limits = policy.limits();

    match command {
        AppCommand::Loans => {
            let loans = config.active_loans().await?;
            cli::loans::run(&loans, &limits, currency, format)
        }
        AppCommand::Project { loan_id, extra } => {
            let extra = ensure_amount("Extra payment", extra)?;
            let loan = config.find_loan(&loan_id)?;
            cli::project::run(loan, extra, &limits, currency, format)
        }
        AppCommand::Strategy { strategy, extra } => {
            let extra = ensure_amount("Extra amount", extra)?;
            let loans = config.active_loans().await?;
            cli::strategy::run(&loans, extra, strategy, currency, format)
        }
        AppCommand::Advise {
            amount,
            expected_return,
        } => {
            let amount = ensure_amount("Available amount", amount)?;
            let expected_return = ensure_amount(
                "Expected return",
                expected_return.unwrap_or(policy.expected_return),
            )?;
            let loans = config.active_loans().await?;
            cli::advise::run(&loans, amount, expected_return, &policy, currency, format)
        }
        AppCommand::Outlook {
            monthly_investment,
            expected_return,
            years,
        } => {
            if years > MAX_PROJECTION_YEARS {
                bail!("Years must be at most {MAX_PROJECTION_YEARS}, got {years}");
            }
            let monthly_investment = ensure_amount("Monthly investment", monthly_investment)?;
            let expected_return = ensure_amount(
                "Expected return",
                expected_return.unwrap_or(policy.expected_return),
            )?;
            let loans = config.active_loans().await?;
            cli::outlook::run(
                &loans,
                monthly_investment,
                expected_return,
                years,
                &limits,
                currency,
                format,
            )
        }
        AppCommand::Pay { loan_id, amount } => {
            let amount = ensure_amount("Payment amount", amount)?;
            let loan = config.find_loan(&loan_id)?;
            cli::pay::run(loan, amount, currency, format)
        }
        AppCommand::Portfolio => {
            let price_cache = Arc::new(Cache::with_ttl(PRICE_CACHE_TTL));
            let price_provider = providers::YahooFinanceProvider::new(
                config.providers.yahoo_base_url(),
                price_cache,
            );
            cli::portfolio::run(&config.portfolios, &price_provider, currency, format).await
        }
    }
}
