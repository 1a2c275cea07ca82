use super::{OutputFormat, print_json, ui};
use crate::core::amortization::{self, ProjectionLimits, ProjectionOutcome, ProjectionResult};
use crate::core::loan::Loan;
use anyhow::Result;
use comfy_table::Cell;

fn outcome_line(projection: &ProjectionResult, currency: &str) -> String {
    match projection.outcome {
        ProjectionOutcome::PaidOff => format!(
            "Paid off in {} ({} months)",
            ui::format_months(projection.months_to_payoff),
            projection.months_to_payoff
        ),
        ProjectionOutcome::Capped => format!(
            "Not paid off after {} months, {} {currency} still owed",
            projection.months_to_payoff,
            ui::format_money(projection.remaining_balance)
        ),
        ProjectionOutcome::NonAmortizing => {
            "The payment does not cover the monthly interest; the balance never goes down"
                .to_string()
        }
    }
}

/// Renders the payoff schedule. When `baseline` is given, the savings against
/// it are reported as well.
pub fn render_projection(
    loan: &Loan,
    extra_payment: f64,
    projection: &ProjectionResult,
    baseline: Option<&ProjectionResult>,
    currency: &str,
) -> String {
    let mut output = format!(
        "Loan: {}\n\n",
        ui::style_text(&loan.name, ui::StyleType::Title)
    );
    output.push_str(&format!(
        "Balance {} {currency} at {:.2}%, paying {} {currency}/month ({} minimum + {} extra)\n",
        ui::format_money(loan.current_balance),
        loan.interest_rate,
        ui::format_money(loan.minimum_payment + extra_payment),
        ui::format_money(loan.minimum_payment),
        ui::format_money(extra_payment),
    ));

    let status_style = if projection.is_paid_off() {
        ui::StyleType::TotalValue
    } else {
        ui::StyleType::Error
    };
    output.push_str(&ui::style_text(
        &outcome_line(projection, currency),
        status_style,
    ));
    output.push_str(&format!(
        "\n{} {} {currency}   {} {} {currency}\n",
        ui::style_text("Total interest:", ui::StyleType::TotalLabel),
        ui::format_money(projection.total_interest),
        ui::style_text("Total paid:", ui::StyleType::TotalLabel),
        ui::format_money(projection.total_payments),
    ));

    if let Some(base) = baseline {
        if projection.is_paid_off() && base.is_paid_off() {
            output.push_str(&ui::style_text(
                &format!(
                    "Saves {} {currency} in interest and {} months compared to the minimum payment",
                    ui::format_money(base.total_interest - projection.total_interest),
                    base.months_to_payoff.saturating_sub(projection.months_to_payoff),
                ),
                ui::StyleType::Highlight,
            ));
            output.push('\n');
        }
    }

    if !projection.schedule.is_empty() {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Month"),
            ui::header_cell("Payment"),
            ui::header_cell("Principal"),
            ui::header_cell("Interest"),
            ui::header_cell("Balance"),
        ]);
        for entry in &projection.schedule {
            table.add_row(vec![
                Cell::new(entry.month),
                ui::money_cell(entry.payment),
                ui::money_cell(entry.principal),
                ui::money_cell(entry.interest),
                ui::money_cell(entry.balance),
            ]);
        }
        output.push('\n');
        output.push_str(&table.to_string());

        if (projection.schedule.len() as u32) < projection.months_to_payoff {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    &format!(
                        "Showing the first {} of {} months",
                        projection.schedule.len(),
                        projection.months_to_payoff
                    ),
                    ui::StyleType::Subtle,
                )
            ));
        }
    }

    output
}

pub fn run(
    loan: &Loan,
    extra_payment: f64,
    limits: &ProjectionLimits,
    currency: &str,
    format: OutputFormat,
) -> Result<()> {
    let projection = amortization::project_with_limits(loan, extra_payment, limits);
    match format {
        OutputFormat::Json => print_json(&projection),
        OutputFormat::Table => {
            let baseline = (extra_payment > 0.0)
                .then(|| amortization::project_with_limits(loan, 0.0, limits));
            println!(
                "{}",
                render_projection(
                    loan,
                    extra_payment,
                    &projection,
                    baseline.as_ref(),
                    currency
                )
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_projection_with_savings() {
        let loan = Loan::new("cc", "Credit Card", 10000.0, 20.0, 300.0);
        let base = amortization::project(&loan, 0.0);
        let faster = amortization::project(&loan, 200.0);

        let rendered = render_projection(&loan, 200.0, &faster, Some(&base), "USD");
        assert!(rendered.contains("Credit Card"));
        assert!(rendered.contains("Paid off in"));
        assert!(rendered.contains("Saves"));
        assert!(rendered.contains("9666.67"));
    }

    #[test]
    fn test_render_non_amortizing_projection() {
        let loan = Loan::new("bad", "Underwater", 10000.0, 24.0, 150.0);
        let projection = amortization::project(&loan, 0.0);

        let rendered = render_projection(&loan, 0.0, &projection, None, "USD");
        assert!(rendered.contains("does not cover the monthly interest"));
        assert!(!rendered.contains("Month"));
    }

    #[test]
    fn test_render_truncated_schedule_note() {
        let loan = Loan::new("m", "Mortgage", 200000.0, 5.0, 1200.0);
        let projection = amortization::project(&loan, 0.0);

        let rendered = render_projection(&loan, 0.0, &projection, None, "USD");
        assert!(rendered.contains(&format!(
            "Showing the first 120 of {} months",
            projection.months_to_payoff
        )));
    }
}
