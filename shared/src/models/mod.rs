//! Data models
//!
//! Shared between the API client and the terminal front end.
//! All IDs are `i64`, money is `Decimal` serialized as a JSON number.

pub mod menu;
pub mod order;
pub mod role;

// Re-exports
pub use menu::*;
pub use order::*;
pub use role::*;
