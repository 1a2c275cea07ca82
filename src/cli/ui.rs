use crate::core::amortization::ProjectionOutcome;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Highlight,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Highlight => style(text).cyan().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn format_money(value: f64) -> String {
    format!("{value:.2}")
}

/// Right-aligned amount cell.
pub fn money_cell(value: f64) -> Cell {
    Cell::new(format_money(value)).set_alignment(CellAlignment::Right)
}

/// Amount cell that is dimmed when zero and bold green otherwise.
pub fn extra_cell(value: f64) -> Cell {
    if value > 0.0 {
        money_cell(value)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        money_cell(value).fg(Color::DarkGrey)
    }
}

pub fn rate_cell(rate: f64) -> Cell {
    Cell::new(format!("{rate:.2}%")).set_alignment(CellAlignment::Right)
}

/// Creates a cell for displaying a gain or loss with color coding.
pub fn change_cell(change: f64, suffix: &str) -> Cell {
    let text = format!("{change:.2}{suffix}");
    let color = if change >= 0.0 { Color::Green } else { Color::Red };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

pub fn outcome_cell(outcome: ProjectionOutcome) -> Cell {
    match outcome {
        ProjectionOutcome::PaidOff => Cell::new("Paid off").fg(Color::Green),
        ProjectionOutcome::Capped => Cell::new("Not paid off in time").fg(Color::Yellow),
        ProjectionOutcome::NonAmortizing => {
            Cell::new("Payment below interest").fg(Color::Red)
        }
    }
}

/// Formats a month count as years and months.
pub fn format_months(months: u32) -> String {
    match (months / 12, months % 12) {
        (0, m) => format!("{m}m"),
        (y, 0) => format!("{y}y"),
        (y, m) => format!("{y}y {m}m"),
    }
}

pub fn new_progress_bar(len: u64, with_message: bool) -> ProgressBar {
    let template = if with_message {
        "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}"
    } else {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}"
    };

    let pb = ProgressBar::new(len);
    if let Ok(progress_style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(progress_style.progress_chars("#>-"));
    }
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
