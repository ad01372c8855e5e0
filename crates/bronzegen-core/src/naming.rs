//! Bronze dataset naming derivation

/// Derive the bronze dataset name from a source dataset name.
///
/// A trailing `_raw` suffix becomes `_bronze`; any other name gets `_bronze`
/// appended. Only the suffix is matched, never an interior `_raw`.
pub fn bronze_dataset_name(source_dataset: &str) -> String {
    match source_dataset.strip_suffix("_raw") {
        Some(stem) => format!("{}_bronze", stem),
        None => format!("{}_bronze", source_dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_suffix_replaced() {
        assert_eq!(bronze_dataset_name("sales_raw"), "sales_bronze");
    }

    #[test]
    fn plain_name_gets_suffix() {
        assert_eq!(bronze_dataset_name("sales"), "sales_bronze");
    }

    #[test]
    fn suffix_match_only() {
        // An interior "_raw" is not a suffix and must not be rewritten.
        assert_eq!(bronze_dataset_name("raw_sales"), "raw_sales_bronze");
        assert_eq!(bronze_dataset_name("sales_raw_events"), "sales_raw_events_bronze");
    }

    #[test]
    fn bare_raw_suffix() {
        assert_eq!(bronze_dataset_name("_raw"), "_bronze");
    }
}
