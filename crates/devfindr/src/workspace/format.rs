use std::fmt::Display;

pub const PLACEHOLDER: &str = "N/A";

pub fn or_placeholder<T: Display>(value: Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Renders a number with thousands separators and at most two decimals.
pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    if value < 0.0 && cents > 0 {
        out.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if fraction != 0 {
        let decimals = format!("{fraction:02}");
        out.push('.');
        out.push_str(decimals.trim_end_matches('0'));
    }
    out
}

pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let amount = grouped(value);
    match amount.strip_prefix('-') {
        Some(rest) => format!("-${rest}"),
        None => format!("${amount}"),
    }
}

pub fn currency_or_placeholder(value: Option<f64>) -> String {
    match value {
        Some(value) => currency(value),
        None => PLACEHOLDER.to_string(),
    }
}

/// `value` followed by `unit`, or the placeholder when absent.
pub fn measure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{}{unit}", trim_number(value)),
        None => PLACEHOLDER.to_string(),
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
