use super::{OutputFormat, print_json, ui};
use crate::core::loan::Loan;
use crate::core::strategy::{self, DebtStrategy, RankKey, StrategyPayment};
use anyhow::Result;
use comfy_table::Cell;

pub fn render_table(payments: &[StrategyPayment], currency: &str) -> String {
    let key_header = match payments.first().map(|p| p.ranked_by) {
        Some(RankKey::CurrentBalance(_)) => format!("Balance ({currency})"),
        _ => "Rate".to_string(),
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Loan"),
        ui::header_cell(&key_header),
        ui::header_cell("Minimum"),
        ui::header_cell("Extra"),
        ui::header_cell("Total"),
    ]);

    for (i, payment) in payments.iter().enumerate() {
        let key_cell = match payment.ranked_by {
            RankKey::InterestRate(rate) => ui::rate_cell(rate),
            RankKey::CurrentBalance(balance) => ui::money_cell(balance),
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&payment.loan_name),
            key_cell,
            ui::money_cell(payment.minimum_payment),
            ui::extra_cell(payment.extra_payment),
            ui::money_cell(payment.total_payment),
        ]);
    }

    let total: f64 = payments.iter().map(|p| p.total_payment).sum();
    format!(
        "{table}\n\n{} {} {currency}",
        ui::style_text("Monthly total:", ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_money(total), ui::StyleType::TotalValue)
    )
}

pub fn run(
    loans: &[Loan],
    extra_amount: f64,
    debt_strategy: DebtStrategy,
    currency: &str,
    format: OutputFormat,
) -> Result<()> {
    let payments = strategy::rank_and_allocate(loans, extra_amount, debt_strategy);
    match format {
        OutputFormat::Json => print_json(&payments),
        OutputFormat::Table => {
            if payments.is_empty() {
                println!("No active loans found.");
                return Ok(());
            }
            let description = match debt_strategy {
                DebtStrategy::Avalanche => "highest interest rate first",
                DebtStrategy::Snowball => "smallest balance first",
            };
            println!(
                "Debt {}: {}\n",
                ui::style_text(&debt_strategy.to_string(), ui::StyleType::Title),
                description
            );
            println!("{}", render_table(&payments, currency));
            Ok(())
        }
    }
}
