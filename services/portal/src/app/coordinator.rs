//! services/portal/src/app/coordinator.rs
//!
//! The single owner of the "credentials are no longer valid" decision. It
//! listens to the gateway's auth signals, clears the session store and sends the
//! navigator back to login. A signal only ends the session if it names the token
//! the session still holds, so handling one late or twice is harmless.

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::gateway::AuthSignal;
use crate::app::navigator::Navigator;
use crate::app::session::SessionStore;

pub struct Coordinator {
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
    signals: broadcast::Receiver<AuthSignal>,
}

impl Coordinator {
    pub fn new(
        session: Arc<SessionStore>,
        navigator: Arc<Navigator>,
        signals: broadcast::Receiver<AuthSignal>,
    ) -> Self {
        Self {
            session,
            navigator,
            signals,
        }
    }

    /// Returns whether the signal ended the current session.
    pub fn handle(&self, signal: AuthSignal) -> bool {
        match signal {
            AuthSignal::Unauthenticated { token } => {
                if !self.session.revoke(&token) {
                    debug!("Ignoring rejection of a token the session no longer holds");
                    return false;
                }
                info!("Authentication no longer valid, returning to login");
                self.navigator.force_login();
                true
            }
        }
    }

    /// Handles every signal already queued without waiting. Returns how many
    /// sessions that ended.
    pub fn pump(&mut self) -> usize {
        let mut ended = 0;
        loop {
            match self.signals.try_recv() {
                Ok(signal) => ended += usize::from(self.handle(signal)),
                Err(TryRecvError::Lagged(missed)) => self.lagged(missed),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return ended,
            }
        }
    }

    /// Runs until `shutdown` fires or the gateway goes away. Signals still queued
    /// at shutdown are handled before returning. Returns how many sessions it
    /// ended.
    pub async fn run(mut self, shutdown: CancellationToken) -> usize {
        let mut ended = 0;
        loop {
            tokio::select! {
                biased;
                received = self.signals.recv() => match received {
                    Ok(signal) => ended += usize::from(self.handle(signal)),
                    Err(RecvError::Lagged(missed)) => self.lagged(missed),
                    Err(RecvError::Closed) => break,
                },
                _ = shutdown.cancelled() => {
                    ended += self.pump();
                    break;
                }
            }
        }
        ended
    }

    // The dropped signals named unknown tokens. If one was the current token,
    // the next request made with it is rejected again and raises a fresh signal.
    fn lagged(&self, missed: u64) {
        warn!("Coordinator lagged behind by {} auth signals", missed);
    }
}
