//! Plain text theme - no colors, no emojis

pub struct Theme;

impl Theme {
    pub fn header(text: &str) -> String {
        format!("{}\n{}", text, Self::divider(text.len().max(20)))
    }

    pub fn divider(width: usize) -> String {
        "-".repeat(width)
    }

    /// Left-aligned label column followed by a value
    pub fn row(label: &str, value: &str) -> String {
        format!("  {:<24} {}", label, value)
    }

    pub fn success(text: &str) -> String {
        format!("[OK] {}", text)
    }

    pub fn warning(text: &str) -> String {
        format!("[WARNING] {}", text)
    }

    pub fn error(text: &str) -> String {
        format!("[ERROR] {}", text)
    }

    pub fn muted(text: &str) -> String {
        format!("  {}", text)
    }
}
