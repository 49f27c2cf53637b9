use std::collections::HashMap;

use crate::error::ShoppingListError;

/// One (ingredient, unit, quantity) association read from a recipe.
///
/// A transient view over stored data; the aggregator never owns or mutates
/// the underlying recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub name: String,
    pub unit: String,
    pub quantity: u64,
}

/// A recipe as it sits in a user's cart: its ingredient lines in stored
/// line order. Cart order carries no meaning beyond first-seen tie-breaks
/// in the rendered list.
#[derive(Debug, Clone, Default)]
pub struct CartRecipe {
    pub lines: Vec<IngredientLine>,
}

/// One merged shopping-list item. Two lines merge iff their name and unit
/// are equal; matching is case-sensitive on purpose (the stored casing is
/// preserved, never normalized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedEntry {
    pub name: String,
    pub unit: String,
    pub total_quantity: u64,
}

/// Insertion-ordered mapping from (name, unit) to its aggregated entry.
///
/// Entries keep first-seen order so the rendered list is deterministic for
/// a fixed input sequence. Built fresh per aggregation call and discarded
/// after rendering.
#[derive(Debug, Default)]
pub struct ShoppingList {
    entries: Vec<AggregatedEntry>,
    index: HashMap<(String, String), usize>,
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[AggregatedEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str, unit: &str) -> Option<&AggregatedEntry> {
        self.index
            .get(&(name.to_owned(), unit.to_owned()))
            .map(|&i| &self.entries[i])
    }

    fn add_line(&mut self, line: &IngredientLine) -> Result<(), ShoppingListError> {
        let key = (line.name.clone(), line.unit.clone());
        match self.index.get(&key) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.total_quantity = entry
                    .total_quantity
                    .checked_add(line.quantity)
                    .ok_or_else(|| ShoppingListError::AggregationOverflow {
                        name: line.name.clone(),
                        unit: line.unit.clone(),
                    })?;
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(AggregatedEntry {
                    name: line.name.clone(),
                    unit: line.unit.clone(),
                    total_quantity: line.quantity,
                });
            }
        }
        Ok(())
    }
}

/// Merge every ingredient line of every cart recipe into one deduplicated,
/// summed shopping list.
///
/// Walks recipes in the given order and each recipe's lines in stored order,
/// grouping by (name, unit). The first line for a key creates its entry;
/// later matches add to it with overflow-checked addition. Totals are exact
/// integer sums and independent of recipe order; only the entry order
/// follows first appearance.
pub fn aggregate(recipes: &[CartRecipe]) -> Result<ShoppingList, ShoppingListError> {
    let mut list = ShoppingList::default();
    for recipe in recipes {
        for line in &recipe.lines {
            list.add_line(line)?;
        }
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, unit: &str, quantity: u64) -> IngredientLine {
        IngredientLine {
            name: name.to_owned(),
            unit: unit.to_owned(),
            quantity,
        }
    }

    #[test]
    fn merges_shared_ingredients_and_keeps_first_seen_order() {
        let recipes = vec![
            CartRecipe {
                lines: vec![line("Flour", "g", 200), line("Egg", "pcs", 2)],
            },
            CartRecipe {
                lines: vec![line("Flour", "g", 100), line("Milk", "ml", 50)],
            },
        ];

        let list = aggregate(&recipes).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.get("Flour", "g").unwrap().total_quantity, 300);
        assert_eq!(list.get("Egg", "pcs").unwrap().total_quantity, 2);
        assert_eq!(list.get("Milk", "ml").unwrap().total_quantity, 50);

        let order: Vec<&str> = list.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["Flour", "Egg", "Milk"]);
    }

    #[test]
    fn same_name_different_unit_stays_separate() {
        let recipes = vec![CartRecipe {
            lines: vec![line("Milk", "ml", 200), line("Milk", "cup", 1)],
        }];

        let list = aggregate(&recipes).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.get("Milk", "ml").unwrap().total_quantity, 200);
        assert_eq!(list.get("Milk", "cup").unwrap().total_quantity, 1);
    }

    #[test]
    fn matching_is_case_sensitive() {
        // Stored casing is preserved, never folded before grouping.
        let recipes = vec![CartRecipe {
            lines: vec![line("Flour", "g", 100), line("flour", "g", 100)],
        }];

        let list = aggregate(&recipes).unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.get("Flour", "g").unwrap().total_quantity, 100);
        assert_eq!(list.get("flour", "g").unwrap().total_quantity, 100);
    }

    #[test]
    fn empty_input_yields_empty_list() {
        let list = aggregate(&[]).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn overflow_is_an_error_not_a_wraparound() {
        let recipes = vec![CartRecipe {
            lines: vec![line("Salt", "g", u64::MAX), line("Salt", "g", 1)],
        }];

        let err = aggregate(&recipes).unwrap_err();
        assert_eq!(
            err,
            ShoppingListError::AggregationOverflow {
                name: "Salt".to_owned(),
                unit: "g".to_owned(),
            }
        );
    }
}
