//! Shopping-list aggregation for tastebook.
//!
//! Pure, I/O-free domain logic: merging the ingredient lines of every recipe
//! in a user's cart into one deduplicated, summed shopping list and rendering
//! it as plain text. Resolving the cart from storage and wrapping the result
//! in an HTTP response live in the server crate.

mod aggregation;
mod error;
mod render;

pub use aggregation::{aggregate, AggregatedEntry, CartRecipe, IngredientLine, ShoppingList};
pub use error::ShoppingListError;
pub use render::render_text;
