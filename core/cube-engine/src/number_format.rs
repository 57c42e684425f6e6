//! FILENAME: core/cube-engine/src/number_format.rs
//! PURPOSE: Display formatting for aggregated measure values.
//! CONTEXT: Inputs are already normalized by the caller (no currency
//! conversion happens here); these functions only render numbers.

use serde::{Deserialize, Serialize};

/// Built-in ways to render a measure's aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueFormat {
    /// Plain number with thousands separators.
    Number,
    /// Amount in the given ISO currency code (e.g. "EUR").
    Currency { code: String },
    /// Fraction rendered as a percentage (0.25 -> "25.0%").
    Percent,
    /// Hours rendered as "Xh Ym".
    Duration,
}

impl Default for ValueFormat {
    fn default() -> Self {
        ValueFormat::Number
    }
}

/// Format a value according to the specified format.
pub fn format_value(value: f64, format: &ValueFormat) -> String {
    match format {
        ValueFormat::Number => format_number(value),
        ValueFormat::Currency { code } => format_currency(value, code),
        ValueFormat::Percent => format_percentage(value, 1),
        ValueFormat::Duration => format_duration(value),
    }
}

/// Integers render without decimals, everything else with two.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    // -0.0 renders as "0"
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e15 {
        add_thousands_separator(&format!("{:.0}", value))
    } else {
        add_thousands_separator(&format!("{:.2}", value))
    }
}

/// Inserts `,` every three digits of the integer part of a rendered number.
fn add_thousands_separator(rendered: &str) -> String {
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(rendered.len() + integer.len() / 3);
    out.push_str(sign);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Where a currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurrencyPosition {
    Before,
    After,
}

/// Symbol and placement for a currency code. Unknown codes are written out
/// in full after the amount.
fn currency_symbol(code: &str) -> (String, CurrencyPosition) {
    match code.to_ascii_uppercase().as_str() {
        "USD" => ("$".to_string(), CurrencyPosition::Before),
        "EUR" => ("€".to_string(), CurrencyPosition::Before),
        "GBP" => ("£".to_string(), CurrencyPosition::Before),
        "JPY" => ("¥".to_string(), CurrencyPosition::Before),
        "PLN" => (" zł".to_string(), CurrencyPosition::After),
        other => (format!(" {}", other), CurrencyPosition::After),
    }
}

/// Format a number as currency. Negative amounts are wrapped in parentheses.
fn format_currency(value: f64, code: &str) -> String {
    let formatted = add_thousands_separator(&format!("{:.2}", value.abs()));
    let (symbol, position) = currency_symbol(code);

    let with_symbol = match position {
        CurrencyPosition::Before => format!("{}{}", symbol, formatted),
        CurrencyPosition::After => format!("{}{}", formatted, symbol),
    };

    if value < 0.0 {
        format!("({})", with_symbol)
    } else {
        with_symbol
    }
}

/// Format a number as percentage.
fn format_percentage(value: f64, decimal_places: u8) -> String {
    let percentage = value * 100.0;
    format!("{:.prec$}%", percentage, prec = decimal_places as usize)
}

/// Format a number of hours as "Xh Ym", rounded to the minute.
fn format_duration(hours: f64) -> String {
    if !hours.is_finite() {
        return hours.to_string();
    }
    let total_minutes = (hours.abs() * 60.0).round() as u64;
    let sign = if hours < 0.0 && total_minutes > 0 { "-" } else { "" };
    let (h, m) = (total_minutes / 60, total_minutes % 60);
    if m == 0 {
        format!("{}{}h", sign, h)
    } else {
        format!("{}{}h {}m", sign, h, m)
    }
}
