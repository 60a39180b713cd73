use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::domain::ticket::{NewTicket, Ticket, TicketId, TicketPatch};
use crate::error::{StoreError, StoreResult};
use crate::services::{BlobStorage, Clock};

/// Well-known key of the persisted ticket collection.
pub const STORAGE_KEY: &str = "tickets_data";

/// blake3 digest of the raw blob a mutation started from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Revision(String);

impl Revision {
    fn of(raw: Option<&str>) -> Self {
        let digest = blake3::hash(raw.unwrap_or_default().as_bytes());
        Self(digest.to_hex().to_string())
    }
}

struct Snapshot {
    tickets: Vec<Ticket>,
    revision: Revision,
}

/// Sole owner of the persisted ticket collection.
///
/// Reads are fail-soft: an unreadable or corrupt blob is logged and treated as
/// an empty collection. Write failures are logged and returned so the caller can
/// decide whether to notify. Mutations are read-modify-write and refuse to
/// overwrite a blob that changed after it was read.
#[derive(Clone)]
pub struct TicketStore {
    storage: Arc<dyn BlobStorage>,
    clock: Arc<dyn Clock>,
}

impl TicketStore {
    pub fn new(storage: Arc<dyn BlobStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Every persisted ticket in storage order, or the reason they could not be read.
    pub fn try_load_all(&self) -> StoreResult<Vec<Ticket>> {
        let raw = self.storage.get(STORAGE_KEY)?;
        parse(raw.as_deref())
    }

    /// Every persisted ticket in storage order; empty if the blob is unreadable.
    pub fn load_all(&self) -> Vec<Ticket> {
        self.snapshot().tickets
    }

    /// Replaces the whole persisted collection.
    pub fn save_all(&self, tickets: &[Ticket]) -> StoreResult<()> {
        let result = serde_json::to_string(tickets)
            .map_err(|err| StoreError::Write(format!("failed to serialize tickets: {err}")))
            .and_then(|data| self.storage.set(STORAGE_KEY, &data));

        if let Err(err) = &result {
            error!(error = %err, count = tickets.len(), "failed to save tickets");
        }
        result
    }

    pub fn add(&self, fields: NewTicket) -> StoreResult<Ticket> {
        let Snapshot {
            mut tickets,
            revision,
        } = self.snapshot();

        let mut id = TicketId::generate();
        while tickets.iter().any(|ticket| ticket.id == id) {
            id = TicketId::generate();
        }

        let ticket = Ticket::from_new(fields, id, self.clock.now().with_timezone(&Utc));
        tickets.push(ticket.clone());
        self.commit(&tickets, &revision)?;

        debug!(id = %ticket.id, priority = %ticket.prioridade, "ticket added");
        Ok(ticket)
    }

    /// Removes the ticket with `id`; an unknown id leaves the collection unchanged.
    pub fn delete(&self, id: &TicketId) -> StoreResult<()> {
        let Snapshot {
            mut tickets,
            revision,
        } = self.snapshot();

        let before = tickets.len();
        tickets.retain(|ticket| &ticket.id != id);
        self.commit(&tickets, &revision)?;

        debug!(%id, removed = before - tickets.len(), "ticket delete applied");
        Ok(())
    }

    /// Merges `patch` into the ticket with `id`. An unknown id is a no-op.
    pub fn update(&self, id: &TicketId, patch: TicketPatch) -> StoreResult<()> {
        let Snapshot {
            mut tickets,
            revision,
        } = self.snapshot();

        let Some(ticket) = tickets.iter_mut().find(|ticket| &ticket.id == id) else {
            debug!(%id, "update skipped, ticket not found");
            return Ok(());
        };
        ticket.apply(patch, self.clock.now().with_timezone(&Utc));
        self.commit(&tickets, &revision)?;

        debug!(%id, "ticket updated");
        Ok(())
    }

    fn snapshot(&self) -> Snapshot {
        let raw = match self.storage.get(STORAGE_KEY) {
            Ok(raw) => raw,
            Err(err) => {
                error!(error = %err, "failed to read tickets, treating store as empty");
                return Snapshot {
                    tickets: Vec::new(),
                    revision: Revision::of(None),
                };
            }
        };

        let revision = Revision::of(raw.as_deref());
        let tickets = parse(raw.as_deref()).unwrap_or_else(|err| {
            error!(error = %err, "failed to load tickets, treating store as empty");
            Vec::new()
        });
        Snapshot { tickets, revision }
    }

    fn commit(&self, tickets: &[Ticket], expected: &Revision) -> StoreResult<()> {
        let current = self
            .storage
            .get(STORAGE_KEY)
            .map(|raw| Revision::of(raw.as_deref()));

        match current {
            Ok(found) if &found != expected => {
                warn!(expected = %expected.0, found = %found.0, "ticket storage changed underneath a write");
                return Err(StoreError::Conflict {
                    expected: expected.0.clone(),
                    found: found.0,
                });
            }
            Ok(_) => {}
            // Unreadable before and after; nothing to compare against.
            Err(err) => debug!(error = %err, "skipping revision check"),
        }

        self.save_all(tickets)
    }
}

fn parse(raw: Option<&str>) -> StoreResult<Vec<Ticket>> {
    match raw {
        None => Ok(Vec::new()),
        Some(data) if data.trim().is_empty() => Ok(Vec::new()),
        Some(data) => serde_json::from_str::<Option<Vec<Ticket>>>(data)
            .map(Option::unwrap_or_default)
            .map_err(|err| StoreError::Corrupt(err.to_string())),
    }
}
