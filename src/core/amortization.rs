//! Month-by-month loan payoff projection.
//!
//! The projection uses simple monthly interest on the outstanding balance and
//! a fixed monthly payment (minimum plus any extra). It always terminates: a
//! payment that does not cover the interest stops the run immediately, and
//! otherwise the run is capped at [`ProjectionLimits::max_months`].

use crate::core::loan::Loan;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A balance at or below this is treated as fully repaid.
pub const PAID_OFF_THRESHOLD: f64 = 0.01;
pub const DEFAULT_MAX_MONTHS: u32 = 600;
pub const DEFAULT_SCHEDULE_MONTHS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionLimits {
    /// Hard ceiling on the number of simulated months.
    pub max_months: u32,
    /// Number of schedule entries kept for display. Totals are unaffected.
    pub schedule_months: usize,
}

impl Default for ProjectionLimits {
    fn default() -> Self {
        ProjectionLimits {
            max_months: DEFAULT_MAX_MONTHS,
            schedule_months: DEFAULT_SCHEDULE_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionOutcome {
    PaidOff,
    /// The month ceiling was reached before the balance was repaid.
    Capped,
    /// The payment does not cover the monthly interest.
    NonAmortizing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentScheduleEntry {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub months_to_payoff: u32,
    pub total_interest: f64,
    pub total_payments: f64,
    pub outcome: ProjectionOutcome,
    pub remaining_balance: f64,
    pub schedule: Vec<PaymentScheduleEntry>,
}

impl ProjectionResult {
    pub fn is_paid_off(&self) -> bool {
        self.outcome == ProjectionOutcome::PaidOff
    }
}

/// Projects the payoff of `loan` with the default limits.
pub fn project(loan: &Loan, extra_payment: f64) -> ProjectionResult {
    project_with_limits(loan, extra_payment, &ProjectionLimits::default())
}

/// Runs the month-by-month payoff of `loan` paying its minimum plus
/// `extra_payment`. A payment that is not a finite number never amortizes and
/// yields [`ProjectionOutcome::NonAmortizing`] with zero months.
pub fn project_with_limits(
    loan: &Loan,
    extra_payment: f64,
    limits: &ProjectionLimits,
) -> ProjectionResult {
    let monthly_rate = loan.monthly_rate();
    let monthly_payment = loan.minimum_payment + extra_payment;
    let mut balance = loan.current_balance;
    let mut total_interest = 0.0;
    let mut month = 0;
    let mut schedule = Vec::new();

    let outcome = loop {
        if balance <= PAID_OFF_THRESHOLD {
            break ProjectionOutcome::PaidOff;
        }
        if month >= limits.max_months {
            break ProjectionOutcome::Capped;
        }

        let interest = balance * monthly_rate;
        let principal = monthly_payment - interest;
        // NaN inputs end up here too
        if !principal.is_finite() || principal <= 0.0 {
            break ProjectionOutcome::NonAmortizing;
        }
        let principal = principal.min(balance);

        balance -= principal;
        total_interest += interest;
        month += 1;

        if schedule.len() < limits.schedule_months {
            schedule.push(PaymentScheduleEntry {
                month,
                payment: principal + interest,
                principal,
                interest,
                balance: if balance <= PAID_OFF_THRESHOLD {
                    0.0
                } else {
                    balance
                },
            });
        }
    };

    debug!(
        loan = %loan.id,
        ?outcome,
        months = month,
        total_interest,
        "Projected loan payoff"
    );

    ProjectionResult {
        months_to_payoff: month,
        total_interest,
        total_payments: total_interest + loan.current_balance,
        outcome,
        remaining_balance: if outcome == ProjectionOutcome::PaidOff {
            0.0
        } else {
            balance
        },
        schedule,
    }
}
