//! Portfolio holdings and their valuation against looked-up prices.
use crate::core::price::PriceResult;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A purchase lot, or a consolidated position once lots are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub shares: f64,
    pub average_cost: f64,
    /// Last known market price, used when a fresh lookup fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
}

fn default_portfolio_name() -> String {
    "My Portfolio".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default = "default_portfolio_name")]
    pub name: String,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    /// Adds a purchase of `shares` at `price`. An existing position in the same
    /// symbol is merged at the weighted average cost.
    pub fn add_holding(&mut self, symbol: &str, shares: f64, price: f64) {
        let symbol = symbol.to_uppercase();
        match self.holdings.iter_mut().find(|h| h.symbol == symbol) {
            Some(existing) => {
                let total_shares = existing.shares + shares;
                let total_cost = existing.shares * existing.average_cost + shares * price;
                existing.shares = total_shares;
                existing.average_cost = if total_shares != 0.0 {
                    total_cost / total_shares
                } else {
                    0.0
                };
            }
            None => self.holdings.push(Holding {
                symbol,
                shares,
                average_cost: price,
                last_price: None,
            }),
        }
    }

    /// Merges lots that share a symbol, keeping first-seen order.
    pub fn consolidated(&self) -> Portfolio {
        let mut merged = Portfolio {
            name: self.name.clone(),
            holdings: Vec::new(),
        };
        for lot in &self.holdings {
            merged.add_holding(&lot.symbol, lot.shares, lot.average_cost);
            if let Some(price) = lot.last_price {
                let symbol = lot.symbol.to_uppercase();
                if let Some(h) = merged.holdings.iter_mut().find(|h| h.symbol == symbol) {
                    h.last_price = Some(price);
                }
            }
        }
        merged
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        for h in &self.holdings {
            let symbol = h.symbol.to_uppercase();
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        symbols
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HoldingValue {
    pub symbol: String,
    pub short_name: Option<String>,
    pub shares: f64,
    pub average_cost: f64,
    pub price: f64,
    pub value: f64,
    pub cost: f64,
    pub total_return: f64,
    /// Set when the price is a fallback rather than a fresh quote.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioValue {
    pub name: String,
    pub holdings: Vec<HoldingValue>,
    pub total_value: f64,
    pub total_cost: f64,
    pub total_return: f64,
    pub total_return_percent: f64,
}

/// Values every holding of `portfolio` from pre-fetched price results keyed by
/// upper-cased symbol. A failed or missing lookup falls back to the holding's
/// last known price, then to its average cost.
pub fn value_portfolio(
    portfolio: &Portfolio,
    price_results: &HashMap<String, Result<PriceResult>>,
) -> PortfolioValue {
    let portfolio = portfolio.consolidated();
    let mut holdings = Vec::with_capacity(portfolio.holdings.len());

    for holding in &portfolio.holdings {
        let fallback = holding.last_price.unwrap_or(holding.average_cost);
        let (price, short_name, error) = match price_results.get(&holding.symbol) {
            Some(Ok(quote)) => (quote.price, quote.short_name.clone(), None),
            Some(Err(e)) => {
                debug!("Price fetch error for {}: {}", holding.symbol, e);
                (fallback, None, Some(e.to_string()))
            }
            None => (
                fallback,
                None,
                Some(format!("Price data not available for {}", holding.symbol)),
            ),
        };

        let value = holding.shares * price;
        let cost = holding.shares * holding.average_cost;
        holdings.push(HoldingValue {
            symbol: holding.symbol.clone(),
            short_name,
            shares: holding.shares,
            average_cost: holding.average_cost,
            price,
            value,
            cost,
            total_return: value - cost,
            error,
        });
    }

    let total_value: f64 = holdings.iter().map(|h| h.value).sum();
    let total_cost: f64 = holdings.iter().map(|h| h.cost).sum();
    let total_return = total_value - total_cost;
    let total_return_percent = if total_cost > 0.0 {
        total_return / total_cost * 100.0
    } else {
        0.0
    };

    PortfolioValue {
        name: portfolio.name,
        holdings,
        total_value,
        total_cost,
        total_return,
        total_return_percent,
    }
}
