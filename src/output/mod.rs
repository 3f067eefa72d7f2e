// Output formatting: terminal tables and JSON for the result collections.

pub mod terminal;

use anyhow::Result;
use serde::Serialize;

/// Format an optional metric for display; undefined values read "n/a".
pub fn format_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "n/a".to_string(),
    }
}

/// Pretty-printed JSON for any serializable result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_metric() {
        assert_eq!(format_metric(Some(0.5)), "0.500");
        assert_eq!(format_metric(Some(1.0)), "1.000");
        assert_eq!(format_metric(None), "n/a");
    }
}
