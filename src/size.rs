//! Byte counts <-> human readable strings

use anyhow::{bail, Result};
use serde::Serialize;

pub const KB: u64 = 1024;
pub const MB: u64 = KB * 1024;
pub const GB: u64 = MB * 1024;
pub const TB: u64 = GB * 1024;
pub const PB: u64 = TB * 1024;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with two decimals, e.g. `1536` -> `"1.5 KB"`
pub fn format_size(bytes: u64) -> String {
    format_size_with_precision(bytes, 2)
}

/// Format a byte count using 1024-based units up to PB.
///
/// Plain bytes never get decimals; for larger units trailing zeros (and a
/// dangling dot) are stripped so `1048576` renders as `"1 MB"`.
pub fn format_size_with_precision(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        return format!("{} {}", bytes, UNITS[0]);
    }

    let mut number = format!("{:.*}", decimals, value);
    if number.contains('.') {
        let trimmed = number.trim_end_matches('0').trim_end_matches('.').len();
        number.truncate(trimmed);
    }
    format!("{} {}", number, UNITS[unit])
}

/// Parse human-readable size strings to bytes
///
/// Supports B, K/KB/KiB, M/MB/MiB, G/GB/GiB, T/TB/TiB, P/PB/PiB (case-insensitive,
/// all 1024-based). Whitespace between number and unit is allowed.
/// - "100MB"  -> 104_857_600
/// - "1.5 KB" -> 1_536
/// - "512"    -> 512
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim();

    if s.is_empty() {
        bail!("Empty size string");
    }

    // Find where the number ends and unit begins
    let num_end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(s.len());

    if num_end == 0 {
        bail!("Size string must start with a number: {}", s);
    }

    let num_str = &s[..num_end];
    let num: f64 = num_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid number: {}", num_str))?;

    let unit_str = s[num_end..].trim().to_uppercase();
    let multiplier = match unit_str.as_str() {
        "" | "B" | "BYTE" | "BYTES" => 1,
        "K" | "KB" | "KIB" => KB,
        "M" | "MB" | "MIB" => MB,
        "G" | "GB" | "GIB" => GB,
        "T" | "TB" | "TIB" => TB,
        "P" | "PB" | "PIB" => PB,
        _ => bail!(
            "Unknown size unit: {}. Supported: B, KB, MB, GB, TB, PB",
            unit_str
        ),
    };

    Ok((num * multiplier as f64) as u64)
}

/// Parse a size filter expression into `(min, max)` bounds.
///
/// `">10MB"` is a lower bound, `"<1GB"` an upper bound, `"10MB-1GB"` a range,
/// anything else an exact size.
pub fn parse_size_filter(expr: &str) -> Result<(u64, Option<u64>)> {
    let expr = expr.trim();

    if let Some(rest) = expr.strip_prefix('>') {
        return Ok((parse_size(rest)?, None));
    }
    if let Some(rest) = expr.strip_prefix('<') {
        return Ok((0, Some(parse_size(rest)?)));
    }
    if let Some((low, high)) = expr.split_once('-') {
        let min = parse_size(low)?;
        let max = parse_size(high)?;
        if max < min {
            bail!("Size range is inverted: {}", expr);
        }
        return Ok((min, Some(max)));
    }

    let exact = parse_size(expr)?;
    Ok((exact, Some(exact)))
}

pub fn format_size_range(min: u64, max: u64) -> String {
    if min == max {
        return format_size(min);
    }
    format!("{} - {}", format_size(min), format_size(max))
}

/// `part` as a percentage of `total`, e.g. `"12.5%"`; whole numbers drop the `.0`
pub fn format_percentage(part: u64, total: u64, decimals: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let formatted = format!("{:.*}", decimals, percentage(part, total));
    match formatted.strip_suffix(".0") {
        Some(whole) => format!("{}%", whole),
        None => format!("{}%", formatted),
    }
}

pub fn percentage(part: u64, total: u64) -> f64 {
    part as f64 / total.max(1) as f64 * 100.0
}

/// Integer percentage rounded half up; used by the progress callbacks.
pub fn round_percent(current: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (current * 100 + total / 2) / total;
    pct.min(100) as u8
}

/// Coarse size buckets for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SizeCategory {
    Empty,
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl SizeCategory {
    pub fn of(bytes: u64) -> Self {
        match bytes {
            0 => SizeCategory::Empty,
            b if b < 10 * KB => SizeCategory::Tiny,
            b if b < MB => SizeCategory::Small,
            b if b < 100 * MB => SizeCategory::Medium,
            b if b < GB => SizeCategory::Large,
            _ => SizeCategory::Huge,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeCategory::Empty => "empty",
            SizeCategory::Tiny => "tiny",
            SizeCategory::Small => "small",
            SizeCategory::Medium => "medium",
            SizeCategory::Large => "large",
            SizeCategory::Huge => "huge",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(100), "100 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(MB), "1 MB");
        assert_eq!(format_size(1_288_490_189), "1.2 GB");
        assert_eq!(format_size(3 * PB), "3 PB");
    }

    #[test]
    fn test_format_size_caps_at_pb() {
        assert_eq!(format_size(2048 * PB), "2048 PB");
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("100MB").unwrap(), 104_857_600);
        assert_eq!(parse_size("1GB").unwrap(), 1_073_741_824);
        assert_eq!(parse_size("500KB").unwrap(), 512_000);
        assert_eq!(parse_size("1024B").unwrap(), 1024);
        assert_eq!(parse_size("2TB").unwrap(), 2_199_023_255_552);
        assert_eq!(parse_size("100").unwrap(), 100); // No unit = bytes
        assert_eq!(parse_size("1.5GB").unwrap(), 1_610_612_736);
        assert_eq!(parse_size("1.5 KB").unwrap(), 1536);
        assert_eq!(parse_size("3 MiB").unwrap(), 3 * MB);
        assert_eq!(parse_size("2k").unwrap(), 2048);
    }

    #[test]
    fn test_parse_size_errors() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("MB").is_err());
        assert!(parse_size("10 parsecs").is_err());
    }

    #[test]
    fn test_round_trip_within_rounding() {
        for &size in &[0u64, 1, 999, 1024, 1500, 65_535, 1_000_000, 123_456_789, 9 * GB + 17] {
            let parsed = parse_size(&format_size(size)).unwrap();
            // Two decimals on a value >= 1.0 is at most 0.5% off
            let tolerance = (size as f64 * 0.005).max(1.0);
            let diff = (parsed as f64 - size as f64).abs();
            assert!(diff <= tolerance, "{} -> {} -> {}", size, format_size(size), parsed);
        }
    }

    #[test]
    fn test_parse_size_filter() {
        assert_eq!(parse_size_filter(">10MB").unwrap(), (10 * MB, None));
        assert_eq!(parse_size_filter("<1GB").unwrap(), (0, Some(GB)));
        assert_eq!(parse_size_filter("10MB-1GB").unwrap(), (10 * MB, Some(GB)));
        assert_eq!(parse_size_filter("4KB").unwrap(), (4 * KB, Some(4 * KB)));
        assert!(parse_size_filter("1GB-10MB").is_err());
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1, 4, 1), "25%");
        assert_eq!(format_percentage(1, 8, 1), "12.5%");
        assert_eq!(format_percentage(5, 0, 1), "0%");
    }

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(0, 3), 0);
        assert_eq!(round_percent(1, 3), 33);
        assert_eq!(round_percent(2, 3), 67);
        assert_eq!(round_percent(3, 3), 100);
        assert_eq!(round_percent(0, 0), 100);
    }

    #[test]
    fn test_size_category() {
        assert_eq!(SizeCategory::of(0), SizeCategory::Empty);
        assert_eq!(SizeCategory::of(512), SizeCategory::Tiny);
        assert_eq!(SizeCategory::of(500 * KB), SizeCategory::Small);
        assert_eq!(SizeCategory::of(5 * MB), SizeCategory::Medium);
        assert_eq!(SizeCategory::of(500 * MB), SizeCategory::Large);
        assert_eq!(SizeCategory::of(2 * GB), SizeCategory::Huge);
    }

    #[test]
    fn test_format_size_range() {
        assert_eq!(format_size_range(KB, KB), "1 KB");
        assert_eq!(format_size_range(KB, MB), "1 KB - 1 MB");
    }
}
