//! Workflow error types

use std::fmt;
use thiserror::Error;

use crate::ClientError;

/// Transitions that talk to the order service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    PlaceOrder,
    PrintTicket,
    CompletePayment,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PlaceOrder => "place order",
            Self::PrintTicket => "print ticket",
            Self::CompletePayment => "complete payment",
        })
    }
}

/// Outcome of a rejected or failed workflow transition.
///
/// The controller stays usable after every variant.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Local precondition not met; nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or server failure; draft left unchanged
    #[error("Service error: {0}")]
    Service(#[source] ClientError),

    /// Credential missing or rejected; the session layer must re-login
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Another remote transition has not settled yet
    #[error("{0} is already in progress")]
    InFlight(Transition),

    /// The draft was reset while the request was in flight; response dropped
    #[error("Draft was replaced before the response arrived")]
    Superseded,
}

impl WorkflowError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<ClientError> for WorkflowError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized(msg) => Self::Authorization(msg),
            other => Self::Service(other),
        }
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
