/// Format an amount with thousand separators, 2 decimal places and a
/// currency symbol, e.g. `1234567.891` → `"R$ 1,234,567.89"`.
pub(crate) fn format_amount(val: f64, symbol: &str) -> String {
    let formatted = format!("{:.2}", val.abs());
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let sign = if val < 0.0 && formatted != "0.00" { "-" } else { "" };
    if symbol.is_empty() {
        format!("{sign}{with_commas}.{dec_part}")
    } else {
        format!("{sign}{symbol} {with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub(crate) fn short_month_name(month: u32) -> &'static str {
    month_name(month).get(..3).unwrap_or("???")
}
