//! Ticket records and the sinks that persist them.
//!
//! The CSV sink appends one row per ticket under the header
//! `Nombre,Correo,Descripción,Prioridad`, written only when the file is new
//! or empty. Appends are serialized by an in-process mutex.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::TicketStoreError;

pub const CSV_HEADER: [&str; 4] = ["Nombre", "Correo", "Descripción", "Prioridad"];

/// Support request collected at the end of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub name: String,
    pub email: String,
    pub description: String,
    /// Lower-cased free text; usually `baja`, `media` or `alta`.
    pub priority: String,
}

/// Append-only ticket destination.
pub trait TicketSink: Send + Sync {
    fn append(&self, ticket: &Ticket) -> Result<(), TicketStoreError>;
}

#[derive(Debug)]
pub struct CsvTicketStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CsvTicketStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TicketSink for CsvTicketStore {
    fn append(&self, ticket: &Ticket) -> Result<(), TicketStoreError> {
        let _guard = self.lock.lock().map_err(|_| TicketStoreError::Poisoned)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let fresh = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        if fresh {
            debug!(path = %self.path.display(), "writing ticket header");
            writer.write_record(CSV_HEADER)?;
        }
        writer.write_record([
            ticket.name.as_str(),
            ticket.email.as_str(),
            ticket.description.as_str(),
            ticket.priority.as_str(),
        ])?;
        writer.flush()?;

        info!(path = %self.path.display(), priority = %ticket.priority, "ticket stored");
        Ok(())
    }
}

/// Keeps tickets in memory; for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryTicketStore {
    tickets: Mutex<Vec<Ticket>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of stored tickets in append order.
    pub fn tickets(&self) -> Vec<Ticket> {
        self.tickets
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

impl TicketSink for InMemoryTicketStore {
    fn append(&self, ticket: &Ticket) -> Result<(), TicketStoreError> {
        self.tickets
            .lock()
            .map_err(|_| TicketStoreError::Poisoned)?
            .push(ticket.clone());
        Ok(())
    }
}
