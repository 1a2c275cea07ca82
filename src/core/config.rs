use crate::core::advisor::AdvisorPolicy;
use crate::core::loan::{Loan, LoanRepository};
use crate::core::portfolio::Portfolio;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn yahoo_base_url(&self) -> &str {
        self.yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url)
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub portfolios: Vec<Portfolio>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub policy: AdvisorPolicy,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("app", "apexx", "apexx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::from_yaml(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (i, loan) in self.loans.iter().enumerate() {
            loan.validate()
                .with_context(|| format!("Invalid loan at position {}", i + 1))?;
            if self.loans[..i].iter().any(|other| other.id == loan.id) {
                bail!("Duplicate loan id: {}", loan.id);
            }
        }
        let share = self.policy.balanced_debt_share;
        if !(0.0..=1.0).contains(&share) {
            bail!("policy.balanced_debt_share must be between 0 and 1, got {share}");
        }
        if self.policy.max_months == 0 {
            bail!("policy.max_months must be positive");
        }
        Ok(())
    }

    pub fn find_loan(&self, id: &str) -> Result<&Loan> {
        self.loans
            .iter()
            .find(|l| l.id == id)
            .with_context(|| format!("Loan not found: {id}"))
    }
}

#[async_trait]
impl LoanRepository for AppConfig {
    async fn active_loans(&self) -> Result<Vec<Loan>> {
        Ok(self.loans.iter().filter(|l| l.active).cloned().collect())
    }
}
