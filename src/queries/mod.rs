//! Storage queries, one module per table family. Plain sqlx over SQLite;
//! handlers own validation and response shaping, these functions own SQL.

pub mod favorites;
pub mod ingredients;
pub mod recipes;
pub mod shopping;
pub mod subscriptions;
pub mod tags;
pub mod users;
