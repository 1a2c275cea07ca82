use super::{OutputFormat, print_json, ui};
use crate::core::advisor::{self, AdvisorPolicy, AllocationRecommendation, Recommendation};
use crate::core::loan::Loan;
use anyhow::Result;

pub fn render(rec: &AllocationRecommendation, currency: &str) -> String {
    let label_style = match rec.recommendation {
        Recommendation::DebtFirst | Recommendation::MinimumOnly => ui::StyleType::Error,
        Recommendation::InvestAll | Recommendation::Balanced => ui::StyleType::TotalValue,
    };

    let mut output = format!(
        "Recommendation: {}\n{}\n\n",
        ui::style_text(&rec.recommendation.to_string(), label_style),
        rec.message
    );
    output.push_str(&format!(
        "{} {} {currency}\n{} {} {currency}\n",
        ui::style_text("Debt payment:", ui::StyleType::TotalLabel),
        ui::format_money(rec.allocation.debt_payment),
        ui::style_text("Investment:  ", ui::StyleType::TotalLabel),
        ui::format_money(rec.allocation.investment),
    ));
    output.push_str(&format!(
        "\n{}\n",
        ui::style_text(&rec.reasoning, ui::StyleType::Subtle)
    ));

    if let Some(payments) = &rec.debt_strategy {
        output.push_str(&format!(
            "\n{}\n\n",
            ui::style_text("Debt payments (avalanche)", ui::StyleType::Title)
        ));
        output.push_str(&super::strategy::render_table(payments, currency));
    }
    output
}

pub fn run(
    loans: &[Loan],
    available_amount: f64,
    expected_return: f64,
    policy: &AdvisorPolicy,
    currency: &str,
    format: OutputFormat,
) -> Result<()> {
    let rec = advisor::recommend_with_policy(loans, available_amount, expected_return, policy);
    match format {
        OutputFormat::Json => print_json(&rec),
        OutputFormat::Table => {
            println!("{}", render(&rec, currency));
            Ok(())
        }
    }
}
