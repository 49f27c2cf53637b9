use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShoppingListError {
    #[error("shopping cart is empty")]
    EmptyCart,

    #[error("quantity overflow while summing '{name} ({unit})'")]
    AggregationOverflow { name: String, unit: String },
}
