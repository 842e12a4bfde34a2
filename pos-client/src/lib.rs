//! POS Client - HTTP client and order workflow for the restaurant backend
//!
//! Provides network-based HTTP calls to the backend API, the session the
//! calls authenticate with, and the controller that takes one order from
//! item selection to payment.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod session;
pub mod workflow;

pub use auth::AuthApi;
pub use cache::ListCache;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::NetworkHttpClient;
pub use service::{ApiService, DateRange, MenuCatalog, OrderService};
pub use session::{Session, SessionStore};
pub use workflow::{
    OrderWorkflow, PaymentReceipt, TicketOutcome, WorkflowError, WorkflowResult, WorkflowSnapshot,
    WorkflowState,
};

// Re-export shared types for convenience
pub use shared::models::{MenuItem, OngoingOrder, OrderType, PaymentMethod, Role, Screen};
