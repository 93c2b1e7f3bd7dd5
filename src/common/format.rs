//! Text formatting shared by prompts and reports

/// Marker for an indicator that has no value yet
pub const UNAVAILABLE: &str = "n/a";

/// `+5.00%` / `-1.25%`
pub fn signed_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// `$228.50`
pub fn price(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn optional_price(value: Option<f64>) -> String {
    value.map(price).unwrap_or_else(|| UNAVAILABLE.to_string())
}

pub fn optional_decimal(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Escape the characters Telegram's legacy Markdown treats as entity delimiters
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
