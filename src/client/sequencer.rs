//! Latest-request-wins bookkeeping for superseding background requests

use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::task::AbortHandle;
use tracing::debug;

use crate::{dispatcher::Dispatcher, event::AppEvent};

/// Sequence number handed out when a request is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tags requests with increasing sequence numbers and aborts the one a newer
/// request supersedes
///
/// Results go out through [`RequestSequencer::dispatch_if_current`], which
/// checks the ticket and sends under the same lock [`RequestSequencer::issue`]
/// takes, so a result can never be sent after a newer ticket exists. Aborting
/// the superseded task drops its in-flight HTTP future, which closes the
/// connection.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
    in_flight: Mutex<Option<(Ticket, AbortHandle)>>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket; every earlier ticket becomes stale
    pub fn issue(&self) -> Ticket {
        let _in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `ticket` is still the most recently issued one
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Send `event` only if `ticket` is still current
    ///
    /// Returns whether the event was handed to the dispatcher.
    pub fn dispatch_if_current<D: Dispatcher>(
        &self,
        ticket: Ticket,
        event: AppEvent,
        dispatcher: &D,
    ) -> bool {
        let _in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_current(ticket) {
            return false;
        }
        dispatcher.dispatch(event);
        true
    }

    /// Most recently issued ticket, if any
    pub fn latest(&self) -> Option<Ticket> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            n => Some(Ticket(n)),
        }
    }

    /// Remember the task serving `ticket`, aborting the task it replaces
    ///
    /// If `ticket` is already stale the new task itself is aborted.
    pub fn track(&self, ticket: Ticket, handle: AbortHandle) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.is_current(ticket) {
            debug!(%ticket, "Aborting request issued after a newer one");
            handle.abort();
            return;
        }

        if let Some((previous, previous_handle)) = in_flight.replace((ticket, handle))
            && previous != ticket
            && !previous_handle.is_finished()
        {
            debug!(superseded = %previous, by = %ticket, "Aborting superseded request");
            previous_handle.abort();
        }
    }

    /// Abandon whatever is in flight; its result will be discarded
    pub fn cancel(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        self.latest.fetch_add(1, Ordering::SeqCst);

        if let Some((ticket, handle)) = in_flight.take() {
            debug!(%ticket, "Cancelling in-flight request");
            handle.abort();
        }
    }
}
