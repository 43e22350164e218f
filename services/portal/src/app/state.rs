//! services/portal/src/app/state.rs
//!
//! Defines the client's shared context: everything a screen needs, built once at
//! startup and handed to whoever needs it.

use classroom_core::domain::Session;
use classroom_core::guard::{home_view, View};
use classroom_core::ports::{ApiTransport, SessionStorage};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapters::{FileStorage, ReqwestTransport};
use crate::app::{
    assignments::AssignmentService,
    auth::{AuthFlow, LoginError},
    coordinator::Coordinator,
    gateway::Gateway,
    navigator::Navigator,
    session::SessionStore,
    submissions::SubmissionService,
};
use crate::config::Config;
use crate::error::ClientError;
use crate::views::{StudentDashboard, TeacherDashboard, TeacherSubmissions};

//=========================================================================================
// AppContext
//=========================================================================================

/// The shared client context. Owns the session lifecycle: restored from storage
/// on start, cleared on logout or when the server rejects the token.
pub struct AppContext {
    pub config: Arc<Config>,
    pub session: Arc<SessionStore>,
    pub gateway: Gateway,
    pub navigator: Arc<Navigator>,
    pub auth: AuthFlow,
    pub assignments: AssignmentService,
    pub submissions: SubmissionService,
    shutdown: CancellationToken,
    coordinator: JoinHandle<usize>,
}

impl AppContext {
    /// Builds the context over the given ports and starts the coordinator.
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: Config,
        transport: Arc<dyn ApiTransport>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let config = Arc::new(config);
        let session = Arc::new(SessionStore::restore(storage));
        let gateway = Gateway::new(transport, session.clone());
        let navigator = Arc::new(Navigator::new(session.clone(), View::Login));

        let shutdown = CancellationToken::new();
        let coordinator = Coordinator::new(session.clone(), navigator.clone(), gateway.subscribe());
        let coordinator = tokio::spawn(coordinator.run(shutdown.clone()));

        Self {
            config,
            auth: AuthFlow::new(gateway.clone()),
            assignments: AssignmentService::new(gateway.clone()),
            submissions: SubmissionService::new(gateway.clone()),
            session,
            gateway,
            navigator,
            shutdown,
            coordinator,
        }
    }

    /// The production wiring: HTTP transport and on-disk session storage.
    pub fn from_config(config: Config) -> Result<Self, ClientError> {
        let storage = Arc::new(FileStorage::open(&config.session_dir)?);
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Internal(format!("cannot build HTTP client: {}", e)))?;
        let transport = Arc::new(ReqwestTransport::new(client, config.api_url.clone()));
        info!("Using API at {}", transport.base_url());
        Ok(Self::start(config, transport, storage))
    }

    /// Logs in and moves to the role's home view.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Session, View), LoginError> {
        let session = self.auth.login(email, password).await?;
        let landed = self.navigator.navigate(home_view(session.role));
        Ok((session, landed))
    }

    pub fn logout(&self) {
        self.auth.logout();
        self.navigator.force_login();
    }

    pub fn teacher_dashboard(&self) -> TeacherDashboard {
        TeacherDashboard::new(self.assignments.clone(), self.config.notice_duration)
    }

    pub fn student_dashboard(&self) -> StudentDashboard {
        StudentDashboard::new(
            self.assignments.clone(),
            self.submissions.clone(),
            self.config.notice_duration,
        )
    }

    pub fn teacher_submissions(&self, assignment_id: &str) -> TeacherSubmissions {
        TeacherSubmissions::new(self.submissions.clone(), assignment_id)
    }

    /// Stops the coordinator after it has handled every signal already raised.
    /// Returns whether the server ended a session while this context ran.
    pub async fn shutdown(self) -> bool {
        self.shutdown.cancel();
        match self.coordinator.await {
            Ok(ended) => ended > 0,
            Err(e) => {
                warn!("Coordinator ended abnormally: {}", e);
                false
            }
        }
    }
}
