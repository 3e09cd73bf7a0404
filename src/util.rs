use rust_decimal::Decimal;

/// Format a currency amount Brazilian style with thousand separators.
/// e.g. `1234567.89` → `"R$ 1.234.567,89"`
pub(crate) fn format_brl(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_dots: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(".");

    if val < Decimal::ZERO {
        format!("-R$ {with_dots},{dec_part}")
    } else {
        format!("R$ {with_dots},{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(dec!(0)), "R$ 0,00");
        assert_eq!(format_brl(dec!(1234.5)), "R$ 1.234,50");
        assert_eq!(format_brl(dec!(1234567.89)), "R$ 1.234.567,89");
        assert_eq!(format_brl(dec!(-5000)), "-R$ 5.000,00");
        assert_eq!(format_brl(dec!(145000)), "R$ 145.000,00");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("curto", 10), "curto");
        assert_eq!(truncate("Expansão do Galpão Industrial", 10), "Expansão …");
        assert_eq!(truncate("abc", 0), "");
        assert_eq!(truncate("exato", 5), "exato");
    }

    #[test]
    fn test_shellexpand() {
        assert_eq!(shellexpand("/tmp/x.json"), "/tmp/x.json");
        let expanded = shellexpand("~/backup.json");
        assert!(expanded.ends_with("/backup.json"));
        assert!(!expanded.starts_with('~'));
    }
}
