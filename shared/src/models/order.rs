//! Order Model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Order type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    #[default]
    Takeaway,
    #[serde(rename = "Dine-In")]
    DineIn,
}

impl OrderType {
    /// Wire/display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Takeaway => "Takeaway",
            Self::DineIn => "Dine-In",
        }
    }

    /// Whether orders of this type need a table number
    pub fn requires_table(&self) -> bool {
        matches!(self, Self::DineIn)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "takeaway" | "take-away" | "take_away" => Ok(Self::Takeaway),
            "dine-in" | "dinein" | "dine_in" | "dine in" => Ok(Self::DineIn),
            _ => Err(ParseError::OrderType(s.to_string())),
        }
    }
}

/// Payment method accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Cash, PaymentMethod::Card];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::PaymentMethod(s.to_string()))
    }
}

/// Order status as reported by the order history endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Ongoing,
    Completed,
}

// =============================================================================
// Request payloads
// =============================================================================

/// One line of an order as sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub menu_item_id: i64,
    pub quantity: u32,
}

/// Create order payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Only sent for Dine-In orders
    pub table_number: Option<u32>,
    pub items: Vec<OrderLineItem>,
}

/// Replace-all line update payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemsUpdate {
    pub items: Vec<OrderLineItem>,
}

/// Payment payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Response entities
// =============================================================================

/// Order line as persisted by the backend (name/price captured at order time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDetail {
    pub menu_item_id: i64,
    pub name: String,
    /// Unit price in currency unit
    pub price: Decimal,
    pub quantity: u32,
}

/// Not-yet-paid order shown in the pickup list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OngoingOrder {
    pub id: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub total_price: Decimal,
    #[serde(default)]
    pub table_number: Option<u32>,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub items: Vec<OrderItemDetail>,
}

/// Entry of the order history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub total_price: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub table_number: Option<u32>,
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub items: Vec<OrderItemDetail>,
}

/// Sort ongoing orders newest-first by creation time (stable for equal times)
pub fn sort_newest_first(orders: &mut [OngoingOrder]) {
    orders.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Backend timestamp format: `2024-03-01 18:22:05`
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
