//! Aggregated shopping list rendering.
//!
//! The persistence layer produces one [`ShoppingListItem`] per
//! `(ingredient name, measurement unit)` group, amounts summed across every
//! recipe in the user's cart; this module renders the plain-text attachment.

/// One aggregated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Render items as the downloadable text document, one line per group.
///
/// Format per line: `<name> - <summed amount> (<unit>)`. Callers pass items
/// already ordered by `(name, unit)` so output is deterministic for a fixed
/// database state.
pub fn render(items: &[ShoppingListItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} - {} ({})",
                item.name, item.total_amount, item.measurement_unit
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn renders_one_line_per_group() {
        let items = vec![
            ShoppingListItem {
                name: "flour".into(),
                measurement_unit: "g".into(),
                total_amount: 300,
            },
            ShoppingListItem {
                name: "sugar".into(),
                measurement_unit: "g".into(),
                total_amount: 50,
            },
        ];
        assert_eq!(render(&items), "flour - 300 (g)\nsugar - 50 (g)");
    }

    #[rstest]
    fn renders_empty_list_as_empty_string() {
        assert_eq!(render(&[]), "");
    }
}
