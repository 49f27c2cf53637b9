use crate::aggregation::ShoppingList;

/// Render the aggregated list as the plain-text report served to clients.
///
/// One line per entry, in the list's insertion order:
/// `"{name} ({unit}) - {total_quantity}\n"`. Existing clients parse this
/// exact layout, so the format is frozen. An empty list renders to an empty
/// string (the endpoint rejects empty carts before getting here).
pub fn render_text(list: &ShoppingList) -> String {
    let mut out = String::new();
    for entry in list.entries() {
        out.push_str(&format!(
            "{} ({}) - {}\n",
            entry.name, entry.unit, entry.total_quantity
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::{aggregate, CartRecipe, IngredientLine};

    fn line(name: &str, unit: &str, quantity: u64) -> IngredientLine {
        IngredientLine {
            name: name.to_owned(),
            unit: unit.to_owned(),
            quantity,
        }
    }

    #[test]
    fn renders_one_line_per_entry_in_insertion_order() {
        let recipes = vec![
            CartRecipe {
                lines: vec![line("Flour", "g", 200), line("Egg", "pcs", 2)],
            },
            CartRecipe {
                lines: vec![line("Flour", "g", 100), line("Milk", "ml", 50)],
            },
        ];

        let list = aggregate(&recipes).unwrap();
        assert_eq!(
            render_text(&list),
            "Flour (g) - 300\nEgg (pcs) - 2\nMilk (ml) - 50\n"
        );
    }

    #[test]
    fn renders_single_line() {
        let recipes = vec![CartRecipe {
            lines: vec![line("Salt", "g", 5)],
        }];

        let list = aggregate(&recipes).unwrap();
        assert_eq!(render_text(&list), "Salt (g) - 5\n");
    }

    #[test]
    fn empty_list_renders_empty_string() {
        let list = aggregate(&[]).unwrap();
        assert_eq!(render_text(&list), "");
    }
}
