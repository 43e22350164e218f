//! services/portal/src/app/navigator.rs
//!
//! Tracks which view the client is positioned at. Every navigation runs through
//! the route guard against the current session.

use classroom_core::guard::{self, View};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::app::session::SessionStore;

pub struct Navigator {
    session: Arc<SessionStore>,
    current: watch::Sender<View>,
}

impl Navigator {
    /// Starts at `initial`, or at the login view if the guard refuses it.
    pub fn new(session: Arc<SessionStore>, initial: View) -> Self {
        let landed = guard::resolve(session.get().as_ref(), initial);
        let (current, _) = watch::channel(landed);
        Self { session, current }
    }

    pub fn current(&self) -> View {
        self.current.borrow().clone()
    }

    /// Observes view changes, including forced returns to login.
    pub fn watch(&self) -> watch::Receiver<View> {
        self.current.subscribe()
    }

    /// Moves to `requested` if the guard allows it, otherwise to login.
    /// Returns the view actually landed on.
    pub fn navigate(&self, requested: View) -> View {
        let session = self.session.get();
        let landed = guard::resolve(session.as_ref(), requested.clone());
        if landed != requested {
            info!("Access to {} denied, redirecting to login", requested);
        } else {
            debug!("Navigating to {}", landed);
        }
        self.current.send_replace(landed.clone());
        landed
    }

    /// Jumps to login unconditionally.
    pub fn force_login(&self) {
        self.current.send_replace(View::Login);
    }
}
