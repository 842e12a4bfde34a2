//! Parse errors for the textual forms of shared enums

use thiserror::Error;

/// Failure to parse one of the enumerated wire values from user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown order type: {0} (expected takeaway or dine-in)")]
    OrderType(String),

    #[error("unknown payment method: {0} (expected cash or card)")]
    PaymentMethod(String),

    #[error("unknown screen: {0}")]
    Screen(String),
}
