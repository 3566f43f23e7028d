/// Format whole Rupiah with thousand separators.
/// e.g. `1500000` → `"Rp 1,500,000"`
pub(crate) fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let with_commas: String = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");
    format!("Rp {with_commas}")
}

/// Parse a whole amount typed by the user. Thousand separators (`,` `.` `_`)
/// and an `Rp` prefix are ignored.
pub(crate) fn parse_amount(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("Rp")
        .or_else(|| trimmed.strip_prefix("rp"))
        .unwrap_or(trimmed)
        .trim()
        .replace([',', '.', '_'], "");
    digits.parse().ok()
}

/// Parse a count typed by the user. Unlike amounts, `.` and `,` are not
/// separators here, so `2.5` is rejected instead of read as 25.
pub(crate) fn parse_quantity(input: &str) -> Option<i64> {
    input.trim().replace('_', "").parse().ok()
}
