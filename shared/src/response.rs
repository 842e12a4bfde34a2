//! API response bodies
//!
//! The backend answers mutations with a short message and failures with an
//! `error` field:
//! ```json
//! { "message": "Order added successfully!", "order_id": 42 }
//! { "error": "Order type and items are required" }
//! ```

use serde::{Deserialize, Serialize};

/// Plain acknowledgement returned by most mutating endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Response to order creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    #[serde(default)]
    pub message: String,
    pub order_id: i64,
}
