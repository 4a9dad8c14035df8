//! Restricts a color table to the categories present in a summary.

use std::collections::{BTreeMap, HashMap};

use crate::models::summary::SummaryItem;

/// Colors for the categories that appear in `present`.
///
/// Categories without a configured color are left out, as are table
/// entries nobody used. Table keys are expected lowercase.
pub fn filter_colors(
    table: &HashMap<String, String>,
    present: &[SummaryItem],
) -> BTreeMap<String, String> {
    present
        .iter()
        .filter_map(|item| {
            let key = item.key.to_lowercase();
            table.get(&key).map(|color| (key, color.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn keeps_only_present_and_configured() {
        let table = table(&[("a", "red"), ("b", "blue")]);
        let present = [SummaryItem::new("a", 10), SummaryItem::new("c", 5)];

        let colors = filter_colors(&table, &present);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors["a"], "red");
    }

    #[test]
    fn matches_case_insensitively() {
        let table = table(&[("rust", "#dea584")]);
        let present = [SummaryItem::new("Rust", 10)];

        let colors = filter_colors(&table, &present);
        assert_eq!(colors["rust"], "#dea584");
    }

    #[test]
    fn empty_inputs() {
        assert!(filter_colors(&HashMap::new(), &[SummaryItem::new("a", 1)]).is_empty());
        assert!(filter_colors(&table(&[("a", "red")]), &[]).is_empty());
    }
}
