//! A server-backed list that is only ever replaced wholesale.
//!
//! Each fetch takes a ticket. A result is applied only if its ticket is the
//! newest one issued, so when refetches overlap the list always ends up showing
//! the answer to the most recent request, whatever order the answers arrive in.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
    issued: u64,
    loading: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            issued: 0,
            loading: false,
        }
    }
}

impl<T> ListState<T> {
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket(self.issued)
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Replaces the items if `ticket` is still the newest. Returns whether it was.
    pub fn finish(&mut self, ticket: FetchTicket, items: Vec<T>) -> bool {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, newest = self.issued, "Discarding stale list response");
            return false;
        }
        self.items = items;
        self.loading = false;
        true
    }

    /// Ends a failed fetch. Returns whether the failure belongs to the newest fetch
    /// and should therefore be shown.
    pub fn fail(&mut self, ticket: FetchTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
