//! Loan records and the single-payment ledger math

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanKind {
    Student,
    Auto,
    Mortgage,
    Credit,
    #[default]
    Personal,
}

impl Display for LoanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LoanKind::Student => "Student",
                LoanKind::Auto => "Auto",
                LoanKind::Mortgage => "Mortgage",
                LoanKind::Credit => "Credit",
                LoanKind::Personal => "Personal",
            }
        )
    }
}

fn default_active() -> bool {
    true
}

/// A loan as supplied by the caller. Rates are annual percentages, amounts are
/// in the configured currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: LoanKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    pub current_balance: f64,
    pub interest_rate: f64,
    pub minimum_payment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Outcome of applying one payment to a loan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSplit {
    pub amount: f64,
    pub interest: f64,
    pub principal: f64,
    pub remaining_balance: f64,
    /// Estimated months left at the minimum payment. `None` when the minimum
    /// payment no longer covers the monthly interest.
    pub remaining_months: Option<u32>,
    pub paid_off: bool,
}

impl Loan {
    pub fn new(id: &str, name: &str, balance: f64, rate: f64, minimum_payment: f64) -> Self {
        Loan {
            id: id.to_string(),
            name: name.to_string(),
            kind: LoanKind::default(),
            original_amount: None,
            current_balance: balance,
            interest_rate: rate,
            minimum_payment,
            term_months: None,
            active: true,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.interest_rate / 100.0 / 12.0
    }

    pub fn monthly_interest(&self) -> f64 {
        self.current_balance * self.monthly_rate()
    }

    /// Rejects records the projection math cannot give a meaningful answer for.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("Loan is missing an id");
        }
        if self.name.trim().is_empty() {
            bail!("Loan {} is missing a name", self.id);
        }
        if !self.current_balance.is_finite() || self.current_balance < 0.0 {
            bail!(
                "Loan {} has an invalid balance: {}",
                self.id,
                self.current_balance
            );
        }
        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            bail!(
                "Loan {} has an invalid interest rate: {}",
                self.id,
                self.interest_rate
            );
        }
        if !self.minimum_payment.is_finite() || self.minimum_payment <= 0.0 {
            bail!(
                "Loan {} has an invalid minimum payment: {}",
                self.id,
                self.minimum_payment
            );
        }
        Ok(())
    }

    /// Splits `amount` into interest and principal against the current balance
    /// and reports the state of the loan afterwards. The loan itself is not
    /// modified.
    ///
    /// `remaining_months` is the standard annuity term `-ln(1 - B·r/P) / ln(1 + r)`
    /// for the post-payment balance `B` at the minimum payment `P`.
    pub fn apply_payment(&self, amount: f64) -> PaymentSplit {
        let rate = self.monthly_rate();
        let interest = self.monthly_interest();
        let principal = (amount - interest).max(0.0);
        let remaining_balance = (self.current_balance - principal).max(0.0);

        if remaining_balance == 0.0 {
            return PaymentSplit {
                amount,
                interest,
                principal,
                remaining_balance,
                remaining_months: Some(0),
                paid_off: true,
            };
        }

        let remaining_interest = remaining_balance * rate;
        let remaining_months = if self.minimum_payment <= remaining_interest {
            None
        } else if rate == 0.0 {
            Some((remaining_balance / self.minimum_payment).ceil() as u32)
        } else {
            let n = -(1.0 - remaining_interest / self.minimum_payment).ln() / (1.0 + rate).ln();
            Some(n.ceil() as u32)
        };

        PaymentSplit {
            amount,
            interest,
            principal,
            remaining_balance,
            remaining_months,
            paid_off: false,
        }
    }
}

/// Source of the loans a user currently carries.
#[async_trait]
pub trait LoanRepository: Send + Sync {
    async fn active_loans(&self) -> Result<Vec<Loan>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_rate_and_interest() {
        let loan = Loan::new("cc", "Credit Card", 10000.0, 24.0, 300.0);
        assert!((loan.monthly_rate() - 0.02).abs() < 1e-12);
        assert!((loan.monthly_interest() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(Loan::new("a", "A", 100.0, 5.0, 10.0).validate().is_ok());
        assert!(Loan::new("a", "A", 0.0, 0.0, 10.0).validate().is_ok());

        let err = Loan::new("", "A", 100.0, 5.0, 10.0).validate().unwrap_err();
        assert!(err.to_string().contains("missing an id"));

        let err = Loan::new("a", " ", 100.0, 5.0, 10.0).validate().unwrap_err();
        assert!(err.to_string().contains("missing a name"));

        let err = Loan::new("a", "A", -1.0, 5.0, 10.0).validate().unwrap_err();
        assert!(err.to_string().contains("invalid balance"));

        let err = Loan::new("a", "A", 100.0, f64::NAN, 10.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("invalid interest rate"));

        let err = Loan::new("a", "A", 100.0, 5.0, 0.0).validate().unwrap_err();
        assert!(err.to_string().contains("invalid minimum payment"));
    }

    #[test]
    fn test_apply_payment_splits_interest_and_principal() {
        let loan = Loan::new("car", "Car", 12000.0, 6.0, 400.0);
        let split = loan.apply_payment(400.0);

        assert!((split.interest - 60.0).abs() < 1e-9);
        assert!((split.principal - 340.0).abs() < 1e-9);
        assert!((split.remaining_balance - 11660.0).abs() < 1e-9);
        assert!(!split.paid_off);
        // -ln(1 - 58.3/400) / ln(1.005) = 31.6
        assert_eq!(split.remaining_months, Some(32));
    }

    #[test]
    fn test_apply_payment_pays_off_loan() {
        let loan = Loan::new("small", "Small", 100.0, 12.0, 50.0);
        let split = loan.apply_payment(500.0);

        assert!(split.paid_off);
        assert_eq!(split.remaining_balance, 0.0);
        assert_eq!(split.remaining_months, Some(0));
    }

    #[test]
    fn test_apply_payment_below_interest_keeps_balance() {
        let loan = Loan::new("big", "Big", 10000.0, 24.0, 150.0);
        let split = loan.apply_payment(100.0);

        assert_eq!(split.principal, 0.0);
        assert_eq!(split.remaining_balance, 10000.0);
        assert_eq!(split.remaining_months, None);
    }

    #[test]
    fn test_apply_payment_zero_rate() {
        let loan = Loan::new("family", "Family", 1000.0, 0.0, 150.0);
        let split = loan.apply_payment(100.0);

        assert_eq!(split.interest, 0.0);
        assert_eq!(split.remaining_balance, 900.0);
        assert_eq!(split.remaining_months, Some(6));
    }

    #[test]
    fn test_loan_deserialization_defaults() {
        let yaml = r#"
id: "student-1"
name: "Student Loan"
current_balance: 15000
interest_rate: 4.5
minimum_payment: 180
"#;
        let loan: Loan = serde_yaml::from_str(yaml).expect("Failed to deserialize");
        assert_eq!(loan.kind, LoanKind::Personal);
        assert!(loan.active);
        assert!(loan.term_months.is_none());

        let yaml = r#"
id: "car"
name: "Car"
kind: auto
original_amount: 20000
current_balance: 12000
interest_rate: 6
minimum_payment: 400
term_months: 60
active: false
"#;
        let loan: Loan = serde_yaml::from_str(yaml).expect("Failed to deserialize");
        assert_eq!(loan.kind, LoanKind::Auto);
        assert_eq!(loan.original_amount, Some(20000.0));
        assert_eq!(loan.term_months, Some(60));
        assert!(!loan.active);
    }
}
