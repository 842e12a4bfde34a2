//! Shared types for the POS client
//!
//! Wire DTOs and domain enums used by every crate that talks to the
//! restaurant backend: menu items, orders, payments, auth payloads and the
//! role capability table.

pub mod client;
pub mod error;
pub mod models;
pub mod response;

// Re-exports
pub use error::ParseError;
pub use serde::{Deserialize, Serialize};

pub use models::{
    MenuItem, OngoingOrder, OrderLineItem, OrderStatus, OrderSummary, OrderType, PaymentMethod,
    Role, Screen,
};
