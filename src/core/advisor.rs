//! Debt-versus-invest recommendations and long-horizon projections.
use crate::core::amortization::{self, ProjectionLimits, ProjectionResult};
use crate::core::loan::Loan;
use crate::core::strategy::{self, DebtStrategy, StrategyPayment};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, instrument};

pub const DEFAULT_EXPECTED_RETURN: f64 = 7.0;
pub const DEFAULT_BALANCED_DEBT_SHARE: f64 = 0.3;

/// Tunable policy values behind the recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorPolicy {
    /// Annual market return (percent) assumed when none is given.
    pub expected_return: f64,
    /// Fraction of the surplus sent to debt when investing is preferred.
    pub balanced_debt_share: f64,
    pub max_months: u32,
    pub schedule_months: usize,
}

impl Default for AdvisorPolicy {
    fn default() -> Self {
        let limits = ProjectionLimits::default();
        AdvisorPolicy {
            expected_return: DEFAULT_EXPECTED_RETURN,
            balanced_debt_share: DEFAULT_BALANCED_DEBT_SHARE,
            max_months: limits.max_months,
            schedule_months: limits.schedule_months,
        }
    }
}

impl AdvisorPolicy {
    pub fn limits(&self) -> ProjectionLimits {
        ProjectionLimits {
            max_months: self.max_months,
            schedule_months: self.schedule_months,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    InvestAll,
    MinimumOnly,
    DebtFirst,
    Balanced,
}

impl Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Recommendation::InvestAll => "invest_all",
                Recommendation::MinimumOnly => "minimum_only",
                Recommendation::DebtFirst => "debt_first",
                Recommendation::Balanced => "balanced",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Allocation {
    pub debt_payment: f64,
    pub investment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationRecommendation {
    pub recommendation: Recommendation,
    pub message: String,
    pub allocation: Allocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_strategy: Option<Vec<StrategyPayment>>,
    pub reasoning: String,
}

/// Recommends how to split `available_amount` between loans and investing
/// using the default policy.
pub fn recommend(
    loans: &[Loan],
    available_amount: f64,
    expected_return_rate: f64,
) -> AllocationRecommendation {
    recommend_with_policy(
        loans,
        available_amount,
        expected_return_rate,
        &AdvisorPolicy::default(),
    )
}

#[instrument(skip(loans, policy), fields(loan_count = loans.len()))]
pub fn recommend_with_policy(
    loans: &[Loan],
    available_amount: f64,
    expected_return_rate: f64,
    policy: &AdvisorPolicy,
) -> AllocationRecommendation {
    if loans.is_empty() {
        return AllocationRecommendation {
            recommendation: Recommendation::InvestAll,
            message: "No debt found - invest the full amount".to_string(),
            allocation: Allocation {
                debt_payment: 0.0,
                investment: available_amount,
            },
            debt_strategy: None,
            reasoning: "No debt to pay off".to_string(),
        };
    }

    let total_minimum_payments: f64 = loans.iter().map(|l| l.minimum_payment).sum();
    let extra_amount = (available_amount - total_minimum_payments).max(0.0);
    debug!(total_minimum_payments, extra_amount, "Computed surplus");

    if extra_amount == 0.0 {
        return AllocationRecommendation {
            recommendation: Recommendation::MinimumOnly,
            message: "Available amount only covers minimum payments".to_string(),
            allocation: Allocation {
                debt_payment: total_minimum_payments,
                investment: 0.0,
            },
            debt_strategy: None,
            reasoning: "No extra funds available for optimization".to_string(),
        };
    }

    let highest_interest_rate = loans
        .iter()
        .map(|l| l.interest_rate)
        .fold(f64::NEG_INFINITY, f64::max);

    if highest_interest_rate > expected_return_rate {
        AllocationRecommendation {
            recommendation: Recommendation::DebtFirst,
            message: format!(
                "Pay extra toward debt ({highest_interest_rate:.1}% > {expected_return_rate}% expected return)"
            ),
            allocation: Allocation {
                debt_payment: available_amount,
                investment: 0.0,
            },
            debt_strategy: Some(strategy::rank_and_allocate(
                loans,
                extra_amount,
                DebtStrategy::Avalanche,
            )),
            reasoning: "Guaranteed debt interest savings exceed expected investment returns"
                .to_string(),
        }
    } else {
        let debt_portion = extra_amount * policy.balanced_debt_share;
        let investment_portion = extra_amount * (1.0 - policy.balanced_debt_share);
        AllocationRecommendation {
            recommendation: Recommendation::Balanced,
            message: "Split between debt payoff and investment".to_string(),
            allocation: Allocation {
                debt_payment: total_minimum_payments + debt_portion,
                investment: investment_portion,
            },
            debt_strategy: Some(strategy::rank_and_allocate(
                loans,
                debt_portion,
                DebtStrategy::Avalanche,
            )),
            reasoning: "Expected investment returns justify balanced approach".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanProjection {
    pub loan_id: String,
    pub loan_name: String,
    #[serde(flatten)]
    pub projection: ProjectionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongTermProjection {
    pub investment_value: f64,
    pub total_invested: f64,
    pub investment_gains: f64,
    /// Interest owed on all loans when paying minimums only.
    pub total_debt_interest: f64,
    pub net_worth_impact: f64,
    pub debt_projections: Vec<LoanProjection>,
}

/// Longest horizon a long-term projection covers.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Future value of a monthly contribution compounded at a monthly rate.
pub fn future_value_of_annuity(monthly_payment: f64, monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate == 0.0 {
        return monthly_payment * months as f64;
    }
    monthly_payment * (((1.0 + monthly_rate).powf(months as f64) - 1.0) / monthly_rate)
}

pub fn project_long_term(
    loans: &[Loan],
    monthly_investment: f64,
    expected_return_rate: f64,
    years: u32,
) -> LongTermProjection {
    project_long_term_with_limits(
        loans,
        monthly_investment,
        expected_return_rate,
        years,
        &ProjectionLimits::default(),
    )
}

/// Compares investing `monthly_investment` for `years` against the interest the
/// current loans accrue at their minimum payments.
///
/// `years` is clamped to [`MAX_PROJECTION_YEARS`].
pub fn project_long_term_with_limits(
    loans: &[Loan],
    monthly_investment: f64,
    expected_return_rate: f64,
    years: u32,
    limits: &ProjectionLimits,
) -> LongTermProjection {
    let monthly_rate = expected_return_rate / 100.0 / 12.0;
    let months = years.min(MAX_PROJECTION_YEARS) * 12;
    let investment_value = future_value_of_annuity(monthly_investment, monthly_rate, months);
    let total_invested = monthly_investment * months as f64;

    let debt_projections: Vec<LoanProjection> = loans
        .iter()
        .map(|loan| LoanProjection {
            loan_id: loan.id.clone(),
            loan_name: loan.name.clone(),
            projection: amortization::project_with_limits(loan, 0.0, limits),
        })
        .collect();
    let total_debt_interest: f64 = debt_projections
        .iter()
        .map(|p| p.projection.total_interest)
        .sum();

    LongTermProjection {
        investment_value,
        total_invested,
        investment_gains: investment_value - total_invested,
        total_debt_interest,
        net_worth_impact: investment_value - total_debt_interest,
        debt_projections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_loans() -> Vec<Loan> {
        vec![
            Loan::new("low", "Low Rate", 5000.0, 5.0, 100.0),
            Loan::new("high", "High Rate", 1000.0, 20.0, 50.0),
        ]
    }

    #[test]
    fn test_no_loans_invests_everything() {
        let rec = recommend(&[], 1000.0, 7.0);
        assert_eq!(rec.recommendation, Recommendation::InvestAll);
        assert_eq!(rec.allocation.debt_payment, 0.0);
        assert_eq!(rec.allocation.investment, 1000.0);
        assert!(rec.debt_strategy.is_none());
    }

    #[test]
    fn test_minimum_only_when_no_surplus() {
        let loans = vec![
            Loan::new("a", "A", 5000.0, 5.0, 300.0),
            Loan::new("b", "B", 1000.0, 20.0, 200.0),
        ];
        let rec = recommend(&loans, 500.0, 7.0);
        assert_eq!(rec.recommendation, Recommendation::MinimumOnly);
        assert_eq!(rec.allocation.debt_payment, 500.0);
        assert_eq!(rec.allocation.investment, 0.0);

        // Less than the minimums still reports the minimums as the debt payment
        let rec = recommend(&loans, 300.0, 7.0);
        assert_eq!(rec.recommendation, Recommendation::MinimumOnly);
        assert_eq!(rec.allocation.debt_payment, 500.0);
    }

    #[test]
    fn test_debt_first_when_rate_beats_return() {
        let loans = two_loans();
        let rec = recommend(&loans, 150.0 + 200.0, 7.0);

        assert_eq!(rec.recommendation, Recommendation::DebtFirst);
        assert_eq!(rec.allocation.debt_payment, 350.0);
        assert_eq!(rec.allocation.investment, 0.0);
        assert_eq!(
            rec.message,
            "Pay extra toward debt (20.0% > 7% expected return)"
        );

        let plan = rec.debt_strategy.expect("debt strategy");
        assert_eq!(plan[0].loan_id, "high");
        assert_eq!(plan[0].extra_payment, 200.0);
        assert_eq!(plan[1].extra_payment, 0.0);
    }

    #[test]
    fn test_balanced_split_when_return_beats_rates() {
        let loans = vec![
            Loan::new("mortgage", "Mortgage", 200000.0, 3.5, 900.0),
            Loan::new("student", "Student", 10000.0, 4.0, 100.0),
        ];
        let rec = recommend(&loans, 2000.0, 7.0);

        assert_eq!(rec.recommendation, Recommendation::Balanced);
        assert!((rec.allocation.debt_payment - 1300.0).abs() < 1e-9);
        assert!((rec.allocation.investment - 700.0).abs() < 1e-9);

        let plan = rec.debt_strategy.expect("debt strategy");
        assert_eq!(plan[0].loan_id, "student");
        assert!((plan[0].extra_payment - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_rate_and_return_is_balanced() {
        let loans = vec![Loan::new("a", "A", 5000.0, 7.0, 100.0)];
        let rec = recommend(&loans, 200.0, 7.0);
        assert_eq!(rec.recommendation, Recommendation::Balanced);
    }

    #[test]
    fn test_policy_changes_balanced_share() {
        let loans = vec![Loan::new("a", "A", 5000.0, 4.0, 100.0)];
        let policy = AdvisorPolicy {
            balanced_debt_share: 0.5,
            ..AdvisorPolicy::default()
        };
        let rec = recommend_with_policy(&loans, 300.0, 7.0, &policy);
        assert!((rec.allocation.debt_payment - 200.0).abs() < 1e-9);
        assert!((rec.allocation.investment - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_recommendation_json_shape() {
        let rec = recommend(&[], 1000.0, 7.0);
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["recommendation"], "invest_all");
        assert_eq!(json["allocation"]["investment"], 1000.0);
        assert!(json.get("debt_strategy").is_none());
    }

    #[test]
    fn test_future_value_of_annuity() {
        // 100 a month for a year at 1% a month
        let fv = future_value_of_annuity(100.0, 0.01, 12);
        assert!((fv - 1268.2503).abs() < 1e-3);
        assert_eq!(future_value_of_annuity(100.0, 0.0, 12), 1200.0);
    }

    #[test]
    fn test_long_term_projection() {
        let loans = two_loans();
        let projection = project_long_term(&loans, 500.0, 7.0, 10);

        assert_eq!(projection.total_invested, 60000.0);
        assert!(projection.investment_value > projection.total_invested);
        assert!(
            (projection.investment_gains - (projection.investment_value - 60000.0)).abs() < 1e-9
        );
        assert_eq!(projection.debt_projections.len(), 2);

        let expected_interest: f64 = loans
            .iter()
            .map(|l| amortization::project(l, 0.0).total_interest)
            .sum();
        assert!((projection.total_debt_interest - expected_interest).abs() < 1e-9);
        assert!(
            (projection.net_worth_impact
                - (projection.investment_value - projection.total_debt_interest))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_long_term_without_loans_or_return() {
        let projection = project_long_term(&[], 100.0, 0.0, 2);
        assert_eq!(projection.investment_value, 2400.0);
        assert_eq!(projection.investment_gains, 0.0);
        assert_eq!(projection.total_debt_interest, 0.0);
        assert!(projection.debt_projections.is_empty());
    }

    #[test]
    fn test_long_term_horizon_is_clamped() {
        let capped = project_long_term(&[], 100.0, 7.0, MAX_PROJECTION_YEARS);
        for years in [MAX_PROJECTION_YEARS + 1, 200_000_000, 400_000_000, u32::MAX] {
            let projection = project_long_term(&[], 100.0, 7.0, years);
            assert_eq!(projection.total_invested, 120_000.0);
            assert_eq!(projection.investment_value, capped.investment_value);
            assert!(projection.investment_value > projection.total_invested);
        }
    }
}
