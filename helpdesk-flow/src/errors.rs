//! Error types for the conversation engine and ticket store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TicketStoreError {
    #[error("[Ticket Store] io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[Ticket Store] csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A previous writer panicked while holding the append lock.
    #[error("[Ticket Store] append lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("[Helpdesk Flow] ticket could not be stored: {0}")]
    TicketStore(#[from] TicketStoreError),

    #[error("[Helpdesk Flow] background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl FlowError {
    /// Stable code for API envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            FlowError::TicketStore(_) => "TICKET_STORE_FAILED",
            FlowError::Join(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
