use super::{OutputFormat, print_json, ui};
use crate::core::advisor::{self, LongTermProjection};
use crate::core::amortization::ProjectionLimits;
use crate::core::loan::Loan;
use anyhow::Result;
use comfy_table::Cell;

pub fn render(projection: &LongTermProjection, years: u32, currency: &str) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text(&format!("{years}-year outlook"), ui::StyleType::Title)
    );

    let mut summary = ui::new_styled_table();
    summary.set_header(vec![
        ui::header_cell("Measure"),
        ui::header_cell(&format!("Amount ({currency})")),
    ]);
    summary.add_row(vec![
        Cell::new("Investment value"),
        ui::money_cell(projection.investment_value),
    ]);
    summary.add_row(vec![
        Cell::new("Total invested"),
        ui::money_cell(projection.total_invested),
    ]);
    summary.add_row(vec![
        Cell::new("Investment gains"),
        ui::change_cell(projection.investment_gains, ""),
    ]);
    summary.add_row(vec![
        Cell::new("Debt interest at minimums"),
        ui::money_cell(projection.total_debt_interest),
    ]);
    summary.add_row(vec![
        Cell::new("Net worth impact"),
        ui::change_cell(projection.net_worth_impact, ""),
    ]);
    output.push_str(&summary.to_string());

    if !projection.debt_projections.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Loan"),
            ui::header_cell("Payoff"),
            ui::header_cell("Interest"),
            ui::header_cell("Status"),
        ]);
        for debt in &projection.debt_projections {
            table.add_row(vec![
                Cell::new(&debt.loan_name),
                Cell::new(ui::format_months(debt.projection.months_to_payoff)),
                ui::money_cell(debt.projection.total_interest),
                ui::outcome_cell(debt.projection.outcome),
            ]);
        }
        output.push_str("\n\n");
        output.push_str(&table.to_string());
    }
    output
}

pub fn run(
    loans: &[Loan],
    monthly_investment: f64,
    expected_return: f64,
    years: u32,
    limits: &ProjectionLimits,
    currency: &str,
    format: OutputFormat,
) -> Result<()> {
    let projection = advisor::project_long_term_with_limits(
        loans,
        monthly_investment,
        expected_return,
        years,
        limits,
    );
    match format {
        OutputFormat::Json => print_json(&projection),
        OutputFormat::Table => {
            println!("{}", render(&projection, years, currency));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_outlook() {
        let loans = vec![Loan::new("cc", "Credit Card", 10000.0, 20.0, 300.0)];
        let projection = advisor::project_long_term(&loans, 100.0, 0.0, 1);
        let rendered = render(&projection, 1, "USD");

        assert!(rendered.contains("1-year outlook"));
        assert!(rendered.contains("1200.00"));
        assert!(rendered.contains("Credit Card"));
        assert!(rendered.contains("4y 2m"));
    }
}
