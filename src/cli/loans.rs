use super::{OutputFormat, print_json, ui};
use crate::core::amortization::{self, ProjectionLimits, ProjectionOutcome};
use crate::core::loan::{Loan, LoanKind};
use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;

/// Payoff overview of one loan at its minimum payment.
#[derive(Debug, Clone, Serialize)]
pub struct LoanOverview {
    pub id: String,
    pub name: String,
    pub kind: LoanKind,
    pub current_balance: f64,
    pub interest_rate: f64,
    pub minimum_payment: f64,
    pub months_to_payoff: u32,
    pub total_interest: f64,
    pub outcome: ProjectionOutcome,
}

pub fn overview(loans: &[Loan], limits: &ProjectionLimits) -> Vec<LoanOverview> {
    loans
        .iter()
        .map(|loan| {
            let projection = amortization::project_with_limits(loan, 0.0, limits);
            LoanOverview {
                id: loan.id.clone(),
                name: loan.name.clone(),
                kind: loan.kind,
                current_balance: loan.current_balance,
                interest_rate: loan.interest_rate,
                minimum_payment: loan.minimum_payment,
                months_to_payoff: projection.months_to_payoff,
                total_interest: projection.total_interest,
                outcome: projection.outcome,
            }
        })
        .collect()
}

pub fn render_table(rows: &[LoanOverview], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Loan"),
        ui::header_cell("Kind"),
        ui::header_cell(&format!("Balance ({currency})")),
        ui::header_cell("Rate"),
        ui::header_cell("Minimum"),
        ui::header_cell("Payoff"),
        ui::header_cell("Interest"),
        ui::header_cell("Status"),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(format!("{} ({})", row.name, row.id)),
            Cell::new(row.kind.to_string()),
            ui::money_cell(row.current_balance),
            ui::rate_cell(row.interest_rate),
            ui::money_cell(row.minimum_payment),
            Cell::new(ui::format_months(row.months_to_payoff)),
            ui::money_cell(row.total_interest),
            ui::outcome_cell(row.outcome),
        ]);
    }

    let total_balance: f64 = rows.iter().map(|r| r.current_balance).sum();
    let total_minimum: f64 = rows.iter().map(|r| r.minimum_payment).sum();
    let total_interest: f64 = rows.iter().map(|r| r.total_interest).sum();

    let mut output = format!("{}\n\n", ui::style_text("Loans", ui::StyleType::Title));
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{} {} {currency}, {} {} {currency}/month, {} {} {currency}",
        ui::style_text("Total balance:", ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_money(total_balance), ui::StyleType::TotalValue),
        ui::style_text("minimums:", ui::StyleType::TotalLabel),
        ui::format_money(total_minimum),
        ui::style_text("interest at minimums:", ui::StyleType::TotalLabel),
        ui::format_money(total_interest),
    ));
    output
}

pub fn run(
    loans: &[Loan],
    limits: &ProjectionLimits,
    currency: &str,
    format: OutputFormat,
) -> Result<()> {
    let rows = overview(loans, limits);
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No active loans found.");
            } else {
                println!("{}", render_table(&rows, currency));
            }
            Ok(())
        }
    }
}
