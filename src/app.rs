use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    core::{
        logging::init_logging,
        ApiClient,
        Config,
        Credentials,
        HortasError,
        SessionEvent,
        SessionManager,
    },
    persistence::{
        CredentialStore,
        FileCredentialStore,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Gardens,
    Courses,
    Requests,
}

#[derive(Debug)]
pub struct Navigator {
    current: Route,
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self { current: start, history: Vec::new() }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Routes left behind, oldest first.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    pub fn navigate(&mut self, to: Route) {
        if self.current != to {
            tracing::debug!(from = ?self.current, ?to, "navigate");
            self.history.push(self.current);
            self.current = to;
        }
    }
}

/// Top-level owner of the session. Reacts to session events coming out of
/// the request layer; nothing below this navigates.
pub struct AppShell {
    session: SessionManager,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    client: ApiClient,
    navigator: Navigator,
}

impl AppShell {
    pub fn new(config: &Config, store: Arc<dyn CredentialStore>) -> Result<Self, HortasError> {
        let (session, events) = SessionManager::new(store);
        let client = ApiClient::new(config, session.clone())?;
        let start = if session.is_authenticated() { Route::Gardens } else { Route::Login };

        Ok(Self { session, events, client, navigator: Navigator::new(start) })
    }

    /// Startup path: config file plus env overrides, logging, and the
    /// credential file under the app data dir.
    pub fn from_environment() -> Result<Self, HortasError> {
        let config = Config::load()?;

        if let Err(e) = init_logging(&config.log_filter) {
            eprintln!("Logging not initialised: {}", e);
        }
        tracing::info!(api = %config.api_base_url, "starting hortas admin");

        let store = FileCredentialStore::open_default()?;
        Self::new(&config, Arc::new(store))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigate(&mut self, to: Route) {
        if to != Route::Login && !self.session.is_authenticated() {
            tracing::debug!(?to, "not signed in, staying on login");
            self.navigator.navigate(Route::Login);
            return;
        }
        self.navigator.navigate(to);
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), HortasError> {
        self.client.login(credentials).await?;
        self.poll_session_events();
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), HortasError> {
        self.session.sign_out()?;
        self.poll_session_events();
        Ok(())
    }

    /// Drains session events; returns how many were handled.
    pub fn poll_session_events(&mut self) -> usize {
        let mut handled = 0;

        while let Ok(event) = self.events.try_recv() {
            handled += 1;
            match event {
                SessionEvent::SignedIn => {
                    if self.navigator.current() == Route::Login {
                        self.navigator.navigate(Route::Gardens);
                    }
                }
                SessionEvent::SignedOut => {
                    self.navigator.navigate(Route::Login);
                }
                // the session manager already cleared the rejected credential
                SessionEvent::Expired { status } => {
                    tracing::warn!(status, "session rejected by the API, returning to login");
                    self.navigator.navigate(Route::Login);
                }
            }
        }

        handled
    }
}
