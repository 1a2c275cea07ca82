use super::{OutputFormat, print_json, ui};
use crate::core::loan::{Loan, PaymentSplit};
use anyhow::Result;

pub fn render(loan: &Loan, split: &PaymentSplit, currency: &str) -> String {
    let mut output = format!(
        "Payment of {} {currency} to {}\n\n",
        ui::format_money(split.amount),
        ui::style_text(&loan.name, ui::StyleType::Title)
    );
    output.push_str(&format!(
        "Interest:  {} {currency}\nPrincipal: {} {currency}\nBalance:   {} -> {} {currency}\n",
        ui::format_money(split.interest),
        ui::format_money(split.principal),
        ui::format_money(loan.current_balance),
        ui::format_money(split.remaining_balance),
    ));

    let status = if split.paid_off {
        ui::style_text("Loan paid off", ui::StyleType::TotalValue)
    } else {
        match split.remaining_months {
            Some(months) => format!(
                "About {} left at the minimum payment",
                ui::style_text(&ui::format_months(months), ui::StyleType::Highlight)
            ),
            None => ui::style_text(
                "The minimum payment no longer covers the monthly interest",
                ui::StyleType::Error,
            ),
        }
    };
    output.push_str(&status);
    output
}

/// Shows how a payment would be applied. The configured balance is not changed.
pub fn run(loan: &Loan, amount: f64, currency: &str, format: OutputFormat) -> Result<()> {
    let split = loan.apply_payment(amount);
    match format {
        OutputFormat::Json => print_json(&split),
        OutputFormat::Table => {
            println!("{}", render(loan, &split, currency));
            Ok(())
        }
    }
}
