//! Debt payoff strategies: rank loans and direct an extra payment at the top one.

use crate::core::loan::Loan;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStrategy {
    /// Highest interest rate first.
    Avalanche,
    /// Smallest balance first.
    Snowball,
}

impl Display for DebtStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DebtStrategy::Avalanche => "avalanche",
                DebtStrategy::Snowball => "snowball",
            }
        )
    }
}

/// The loan attribute a strategy ranked by, carried along with each payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    InterestRate(f64),
    CurrentBalance(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPayment {
    pub loan_id: String,
    pub loan_name: String,
    pub minimum_payment: f64,
    pub extra_payment: f64,
    pub total_payment: f64,
    #[serde(flatten)]
    pub ranked_by: RankKey,
}

impl StrategyPayment {
    fn minimum_only(loan: &Loan, strategy: DebtStrategy) -> Self {
        let ranked_by = match strategy {
            DebtStrategy::Avalanche => RankKey::InterestRate(loan.interest_rate),
            DebtStrategy::Snowball => RankKey::CurrentBalance(loan.current_balance),
        };
        StrategyPayment {
            loan_id: loan.id.clone(),
            loan_name: loan.name.clone(),
            minimum_payment: loan.minimum_payment,
            extra_payment: 0.0,
            total_payment: loan.minimum_payment,
            ranked_by,
        }
    }
}

/// Orders `loans` by `strategy` and puts all of `extra_amount` on the first
/// ranked loan. Every other loan receives its minimum payment only. Ties keep
/// the input order.
///
/// The result has one entry per loan id, in ranked order. A repeated id
/// replaces the earlier record in its original position.
pub fn rank_and_allocate(
    loans: &[Loan],
    extra_amount: f64,
    strategy: DebtStrategy,
) -> Vec<StrategyPayment> {
    let mut ranked: Vec<&Loan> = loans.iter().collect();
    match strategy {
        DebtStrategy::Avalanche => {
            ranked.sort_by(|a, b| b.interest_rate.total_cmp(&a.interest_rate))
        }
        DebtStrategy::Snowball => {
            ranked.sort_by(|a, b| a.current_balance.total_cmp(&b.current_balance))
        }
    }

    let mut payments: Vec<StrategyPayment> = Vec::with_capacity(ranked.len());
    for loan in &ranked {
        let payment = StrategyPayment::minimum_only(loan, strategy);
        match payments.iter().position(|p| p.loan_id == loan.id) {
            Some(i) => payments[i] = payment,
            None => payments.push(payment),
        }
    }

    if extra_amount > 0.0 {
        if let Some(target) = ranked.first() {
            if let Some(payment) = payments.iter_mut().find(|p| p.loan_id == target.id) {
                debug!(
                    %strategy,
                    loan = %payment.loan_id,
                    extra_amount,
                    "Allocating extra payment"
                );
                payment.extra_payment = extra_amount;
                payment.total_payment += extra_amount;
            }
        }
    }

    payments
}
