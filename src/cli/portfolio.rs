use super::{OutputFormat, print_json, ui};
use crate::core::portfolio::{self, Portfolio, PortfolioValue};
use crate::core::price::{PriceProvider, PriceResult};
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use tracing::debug;

impl PortfolioValue {
    pub fn display_as_table(&self, currency: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Holding"),
            ui::header_cell("Shares"),
            ui::header_cell("Avg Cost"),
            ui::header_cell("Price"),
            ui::header_cell(&format!("Value ({currency})")),
            ui::header_cell("Return"),
        ]);

        for holding in &self.holdings {
            let name = match &holding.short_name {
                Some(short_name) => format!("{} ({})", short_name, holding.symbol),
                None => holding.symbol.clone(),
            };
            let price = if holding.error.is_some() {
                Cell::new(ui::style_text(
                    &format!("{} *", ui::format_money(holding.price)),
                    ui::StyleType::Subtle,
                ))
            } else {
                ui::money_cell(holding.price)
            };
            table.add_row(vec![
                Cell::new(name),
                Cell::new(format!("{:.2}", holding.shares)),
                ui::money_cell(holding.average_cost),
                price,
                ui::money_cell(holding.value),
                ui::change_cell(holding.total_return, ""),
            ]);
        }

        let mut output = format!(
            "Portfolio: {}\n\n",
            ui::style_text(&self.name, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        if self.holdings.iter().any(|h| h.error.is_some()) {
            output.push_str(&format!(
                "\n{}",
                ui::style_text(
                    "* price lookup failed, showing last known price",
                    ui::StyleType::Error
                )
            ));
        }

        output.push_str(&format!(
            "\n\n{} {}   {} {} ({:.2}%)",
            ui::style_text(&format!("Total Value ({currency}):"), ui::StyleType::TotalLabel),
            ui::style_text(&ui::format_money(self.total_value), ui::StyleType::TotalValue),
            ui::style_text("Total Return:", ui::StyleType::TotalLabel),
            ui::format_money(self.total_return),
            self.total_return_percent,
        ));
        output
    }
}

/// Looks up every distinct symbol across `portfolios` concurrently.
pub async fn fetch_prices(
    portfolios: &[Portfolio],
    price_provider: &(dyn PriceProvider + Send + Sync),
) -> HashMap<String, Result<PriceResult>> {
    let symbols: HashSet<String> = portfolios.iter().flat_map(|p| p.symbols()).collect();

    let pb = ui::new_progress_bar(symbols.len() as u64, true);
    pb.set_message("Fetching prices...");

    let price_futures = symbols.into_iter().map(|symbol| {
        let pb_clone = pb.clone();
        async move {
            let res = price_provider.fetch_price(&symbol).await;
            pb_clone.inc(1);
            (symbol, res)
        }
    });

    let price_results: HashMap<String, Result<PriceResult>> =
        join_all(price_futures).await.into_iter().collect();
    pb.finish_and_clear();
    debug!("Fetched {} prices", price_results.len());
    price_results
}

pub async fn valuate(
    portfolios: &[Portfolio],
    price_provider: &(dyn PriceProvider + Send + Sync),
) -> Vec<PortfolioValue> {
    let price_results = fetch_prices(portfolios, price_provider).await;
    portfolios
        .iter()
        .map(|p| portfolio::value_portfolio(p, &price_results))
        .collect()
}

pub async fn run(
    portfolios: &[Portfolio],
    price_provider: &(dyn PriceProvider + Send + Sync),
    currency: &str,
    format: OutputFormat,
) -> Result<()> {
    let values = valuate(portfolios, price_provider).await;

    match format {
        OutputFormat::Json => print_json(&values),
        OutputFormat::Table => {
            if values.is_empty() {
                println!("No portfolios configured.");
                return Ok(());
            }
            let count = values.len();
            for (i, value) in values.iter().enumerate() {
                println!("{}", value.display_as_table(currency));
                if i < count - 1 {
                    ui::print_separator();
                }
            }
            if count > 1 {
                let grand_total: f64 = values.iter().map(|v| v.total_value).sum();
                println!(
                    "\n{}",
                    ui::style_text(
                        &format!("Grand Total ({currency}): {grand_total:.2}"),
                        ui::StyleType::TotalValue
                    )
                );
            }
            Ok(())
        }
    }
}
