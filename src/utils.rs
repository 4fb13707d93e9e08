use std::path::PathBuf;

/// Get dataset directory from environment variable or use default
pub fn get_dataset_dir() -> PathBuf {
    std::env::var("DATASET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("dataset"))
}

/// Read a non-empty environment variable
pub fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Format an integer with thousands separators (1234567 -> "1,234,567")
pub fn format_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format an amount rounded to whole units with thousands separators
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round();
    if rounded < 0.0 {
        format!("-{}", format_thousands((-rounded) as u64))
    } else {
        format_thousands(rounded as u64)
    }
}

/// Compact display for card values (1_250_000 -> "1.25M", 4_300 -> "4.30K")
pub fn format_compact(num: f64) -> String {
    if num.abs() >= 1_000_000.0 {
        format!("{:.2}M", num / 1_000_000.0)
    } else if num.abs() >= 1_000.0 {
        format!("{:.2}K", num / 1_000.0)
    } else {
        format!("{:.0}", num)
    }
}

/// Format an optional metric with two decimals, "n/a" when undefined
pub fn format_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}
