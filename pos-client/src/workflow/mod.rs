//! Order workflow: draft editing, placement, kitchen ticket and payment

mod controller;
mod draft;
mod error;

pub use controller::{OrderWorkflow, PaymentReceipt, TicketOutcome, WorkflowSnapshot, WorkflowState};
pub use draft::{DraftOrder, OrderLine};
pub use error::{Transition, WorkflowError, WorkflowResult};
