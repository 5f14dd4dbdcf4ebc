// src/util/text.rs

/// Shorten `text` to at most `max_chars` characters, marking the cut with `…`.
///
/// # Examples
///
/// ```
/// use scratch::util::text::excerpt;
///
/// assert_eq!(excerpt("Groceries for the week", 9), "Groceries…");
/// assert_eq!(excerpt("short", 9), "short");
/// ```
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
    }
}

/// Decimal byte count in the largest unit that keeps it at least 1, without
/// rounding.
///
/// ```
/// use scratch::util::text::format_size;
///
/// assert_eq!(format_size(5_000_000), "5MB");
/// assert_eq!(format_size(1_250_000), "1.25MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [(u64, &str); 2] = [(1_000_000, "MB"), (1_000, "KB")];
    for (scale, unit) in UNITS {
        if bytes >= scale {
            return format!("{}{unit}", decimal(bytes, scale));
        }
    }
    format!("{bytes} bytes")
}

fn decimal(value: u64, scale: u64) -> String {
    let whole = value / scale;
    let rest = value % scale;
    if rest == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let fraction = format!("{rest:0width$}");
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}
