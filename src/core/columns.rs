use crate::core::types::Row;
use std::collections::HashMap;

/// Seed a visible-column set from a sample row.
///
/// A non-empty `current` is returned unchanged; otherwise the sample row's keys
/// in natural order, or nothing when there is no sample.
pub fn seed_if_empty(current: &[String], sample: Option<&Row>) -> Vec<String> {
    if !current.is_empty() {
        return current.to_vec();
    }
    sample
        .map(|row| row.keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Add `column` if absent, remove it if present.
///
/// A column coming back is placed at its position in `natural_order`, after the
/// visible columns that precede it there. Columns unknown to `natural_order` are
/// appended.
pub fn toggle(current: &[String], column: &str, natural_order: &[String]) -> Vec<String> {
    if current.iter().any(|c| c == column) {
        return current.iter().filter(|c| *c != column).cloned().collect();
    }

    let mut next = current.to_vec();
    let Some(rank) = natural_order.iter().position(|c| c == column) else {
        next.push(column.to_string());
        return next;
    };

    let insert_at = next
        .iter()
        .position(|c| {
            natural_order
                .iter()
                .position(|n| n == c)
                .is_some_and(|r| r > rank)
        })
        .unwrap_or(next.len());
    next.insert(insert_at, column.to_string());
    next
}

/// Visible-column sets of every region, kept for the session
#[derive(Debug, Clone, Default)]
pub struct ColumnVisibility {
    per_tab: HashMap<String, Vec<String>>,
}

impl ColumnVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the seed check for a tab and return its resulting set
    pub fn seed(&mut self, tab: &str, sample: Option<&Row>) -> &[String] {
        let entry = self.per_tab.entry(tab.to_string()).or_default();
        if entry.is_empty() {
            *entry = seed_if_empty(entry, sample);
        }
        entry
    }

    pub fn visible(&self, tab: &str) -> &[String] {
        self.per_tab.get(tab).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_visible(&self, tab: &str, column: &str) -> bool {
        self.visible(tab).iter().any(|c| c == column)
    }

    pub fn set_visible(&mut self, tab: &str, columns: Vec<String>) {
        self.per_tab.insert(tab.to_string(), columns);
    }

    pub fn toggle(&mut self, tab: &str, column: &str, natural_order: &[String]) {
        let next = toggle(self.visible(tab), column, natural_order);
        self.per_tab.insert(tab.to_string(), next);
    }

    pub fn show_all(&mut self, tab: &str, natural_order: &[String]) {
        self.per_tab.insert(tab.to_string(), natural_order.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seed_from_first_row() {
        let row = Row::from_pairs([("a", 1), ("b", 2)]);
        assert_eq!(seed_if_empty(&[], Some(&row)), cols(&["a", "b"]));
    }

    #[test]
    fn test_seed_skipped_when_already_visible() {
        let row = Row::from_pairs([("a", 1), ("b", 2)]);
        assert_eq!(seed_if_empty(&cols(&["a"]), Some(&row)), cols(&["a"]));
    }

    #[test]
    fn test_seed_without_sample() {
        assert!(seed_if_empty(&[], None).is_empty());
    }

    #[test]
    fn test_toggle_removes_present_column() {
        let natural = cols(&["a", "b", "c"]);
        assert_eq!(toggle(&natural, "b", &natural), cols(&["a", "c"]));
    }

    #[test]
    fn test_toggle_reinserts_at_natural_position() {
        let natural = cols(&["a", "b", "c", "d"]);
        assert_eq!(toggle(&cols(&["a", "d"]), "c", &natural), cols(&["a", "c", "d"]));
        assert_eq!(toggle(&cols(&["c"]), "a", &natural), cols(&["a", "c"]));
        assert_eq!(toggle(&cols(&["a"]), "d", &natural), cols(&["a", "d"]));
    }

    #[test]
    fn test_toggle_unknown_column_appends() {
        let natural = cols(&["a", "b"]);
        assert_eq!(toggle(&cols(&["b"]), "z", &natural), cols(&["b", "z"]));
    }

    #[test]
    fn test_per_tab_sets_are_independent() {
        let mut visibility = ColumnVisibility::new();
        let global = Row::from_pairs([("a", 1), ("b", 2)]);
        let emea = Row::from_pairs([("x", 1)]);

        visibility.seed("GLOBAL", Some(&global));
        visibility.toggle("GLOBAL", "a", &cols(&["a", "b"]));
        visibility.seed("EMEA", Some(&emea));

        // Reseeding GLOBAL keeps the explicit toggle
        visibility.seed("GLOBAL", Some(&global));

        assert_eq!(visibility.visible("GLOBAL"), cols(&["b"]).as_slice());
        assert_eq!(visibility.visible("EMEA"), cols(&["x"]).as_slice());
        assert!(visibility.is_visible("EMEA", "x"));
    }

    #[test]
    fn test_show_all_restores_natural_order() {
        let mut visibility = ColumnVisibility::new();
        visibility.set_visible("GLOBAL", cols(&["c"]));
        visibility.show_all("GLOBAL", &cols(&["a", "b", "c"]));

        assert_eq!(visibility.visible("GLOBAL"), cols(&["a", "b", "c"]).as_slice());
    }
}
