//! Helpdesk conversation flow.
//!
//! - [`ConversationEngine`]: one message in, replies and the new state out.
//! - [`SessionStore`]: per-user sessions, each behind its own lock.
//! - [`TicketSink`]: where finished tickets go ([`CsvTicketStore`] in production).
//! - [`replies`]: user-facing copy.

mod command;
mod engine;
mod errors;
pub mod replies;
mod session;
mod state;
mod ticket;
pub mod validation;

pub use command::Command;
pub use engine::{ConversationEngine, Reply, Transition};
pub use errors::{FlowError, Result, TicketStoreError};
pub use session::{Session, SessionFields, SessionHandle, SessionStore};
pub use state::ConversationState;
pub use ticket::{CSV_HEADER, CsvTicketStore, InMemoryTicketStore, Ticket, TicketSink};
