//! JSON reporter
//!
//! Serializes the full scan result, snapshot included, as pretty-printed
//! JSON. This is the machine-readable export; everything another tool
//! could want to recompute or chart is in here.

use crate::models::ScanResult;
use anyhow::{Context, Result};

pub fn render(result: &ScanResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize scan result to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScanResult;
    use crate::reporters::tests::test_result;

    #[test]
    fn test_json_round_trips() {
        let result = test_result();
        let rendered = render(&result).unwrap();
        let parsed: ScanResult = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_json_has_expected_top_level_fields() {
        let rendered = render(&test_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        for key in [
            "mode",
            "timestamp",
            "score",
            "band",
            "breakdown",
            "findings",
            "findings_summary",
            "snapshot",
        ] {
            assert!(value.get(key).is_some(), "missing top-level key {key}");
        }
        assert_eq!(value["mode"], "general");
        assert_eq!(value["band"], "fair");
    }
}
