//! Synchronization controller: sequences auth gating, fetches, cache
//! mutation, and notifications so the presentation layer never reads stale
//! or unauthenticated data.
//!
//! Every error a backend round-trip produces is converted into a
//! notification here; the cache is only ever mutated after a successful
//! round-trip, by re-fetching the affected collections wholesale rather
//! than patching entries in place. Concurrent writers (another tab, the
//! background poll) resolve by last-write-wins at the server; the next
//! re-fetch silently adopts whatever the server holds.

pub mod refresh;

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{
    Contractor, CreateContractor, CreateFormula, CreateJob, Formula, Job, UpdateContractor,
    UpdateFormula, UpdateJob,
};
use crate::session::SessionStore;
use crate::store::{AppStore, Severity};
use refresh::Refresher;

/// Controller lifecycle. Only `login` and system info are reachable from
/// `Unauthenticated`; everything else requires `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Unauthenticated,
    Authenticating,
    Loading,
    Ready,
    LoggingOut,
}

/// Which cached collections a mutation invalidates. Associations are
/// bidirectional (formulas reference jobs and vice versa), so a mutation
/// re-fetches every collection that may embed the changed entity's ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Formulas,
    Jobs,
    Contractors,
}

pub struct SyncController {
    store: Arc<AppStore>,
    client: Arc<ApiClient>,
    session: Arc<SessionStore>,
    refresh_interval: Duration,
    background_refresh: bool,
    token_duration_secs: u64,
    state: RwLock<SyncState>,
    refresher: Mutex<Refresher>,
}

impl SyncController {
    pub fn new(
        config: &AppConfig,
        store: Arc<AppStore>,
        client: Arc<ApiClient>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            store,
            client,
            session,
            refresh_interval: Duration::from_millis(config.sync.refresh_interval_ms),
            background_refresh: config.sync.enable_background_refresh,
            token_duration_secs: config.session.token_duration_secs,
            state: RwLock::new(SyncState::Unauthenticated),
            refresher: Mutex::new(Refresher::new()),
        }
    }

    pub fn state(&self) -> SyncState {
        *self.state.read().expect("state lock poisoned")
    }

    fn set_state(&self, next: SyncState) {
        debug!(state = ?next, "sync state transition");
        *self.state.write().expect("state lock poisoned") = next;
    }

    pub fn store(&self) -> &Arc<AppStore> {
        &self.store
    }

    /// Adopt an existing persisted session without a fresh login: if both
    /// markers are present, load everything and land in Ready.
    pub async fn resume(self: &Arc<Self>) -> bool {
        if !self.session.is_logged_in() {
            self.set_state(SyncState::Unauthenticated);
            return false;
        }

        self.store.set_session(self.session.username());
        self.store.set_login_state(true);
        self.set_state(SyncState::Loading);

        self.load_system_info().await;
        self.initial_load().await;

        self.start_background_refresh();
        self.set_state(SyncState::Ready);
        true
    }

    /// Exchange credentials for a token and bring the cache up. On failure
    /// nothing is persisted and the controller stays unauthenticated.
    pub async fn login(self: &Arc<Self>, username: &str, password: &str) -> Result<(), ApiError> {
        self.set_state(SyncState::Authenticating);

        let token = match self
            .client
            .create_token(username, password, self.token_duration_secs)
            .await
        {
            Ok(token) => token,
            Err(err) => {
                self.set_state(SyncState::Unauthenticated);
                self.store.push_snackbar("Invalid login credentials.", Severity::Error);
                return Err(err);
            }
        };

        self.session.store(username, &token)?;
        self.store.set_session(Some(username.to_string()));
        self.store.set_login_state(true);
        info!(username, "logged in");

        self.set_state(SyncState::Loading);
        self.load_system_info().await;
        self.initial_load().await;

        self.start_background_refresh();
        self.set_state(SyncState::Ready);
        Ok(())
    }

    /// Clear the session markers and all cached state. Pure local
    /// operation; the token is simply never sent again.
    pub fn logout(&self) {
        self.set_state(SyncState::LoggingOut);
        self.refresher.lock().expect("refresher lock poisoned").stop();
        self.session.clear();
        self.store.clear_collections();
        self.store.set_session(None);
        self.store.set_login_state(false);
        info!("logged out");
        self.set_state(SyncState::Unauthenticated);
    }

    /// First full fetch after login: all collections in parallel,
    /// best-effort. A failed fetch leaves that collection empty and pushes
    /// one notification rather than blocking the rest of the app.
    async fn initial_load(&self) {
        let (formulas, jobs, contractors) = futures::join!(
            self.client.list_formulas(),
            self.client.list_jobs(),
            self.client.list_contractors(),
        );

        match formulas {
            Ok(formulas) => self.store.replace_formulas(formulas),
            Err(err) => {
                warn!(error = %err, "initial formula fetch failed");
                self.store.push_snackbar("Could not load current formulas.", Severity::Error);
            }
        }
        match jobs {
            Ok(jobs) => self.store.replace_jobs(jobs),
            Err(err) => {
                warn!(error = %err, "initial job fetch failed");
                self.store.push_snackbar("Could not load current jobs.", Severity::Error);
            }
        }
        match contractors {
            Ok(contractors) => self.store.replace_contractors(contractors),
            Err(err) => {
                warn!(error = %err, "initial contractor fetch failed");
                self.store.push_snackbar("Could not load current contractors.", Severity::Error);
            }
        }

        self.store.set_initialized();
    }

    /// Periodic re-fetch of everything. Failures are logged, not surfaced;
    /// the next tick retries anyway. Overlap with a user-triggered fetch is
    /// resolved by last-write-wins per collection.
    pub async fn refresh_all(&self) {
        self.refresh_collections(&[Kind::Formulas, Kind::Jobs, Kind::Contractors]).await;
    }

    async fn refresh_collections(&self, kinds: &[Kind]) {
        for kind in kinds {
            match kind {
                Kind::Formulas => match self.client.list_formulas().await {
                    Ok(formulas) => self.store.replace_formulas(formulas),
                    Err(err) => warn!(error = %err, "formula refresh failed"),
                },
                Kind::Jobs => match self.client.list_jobs().await {
                    Ok(jobs) => self.store.replace_jobs(jobs),
                    Err(err) => warn!(error = %err, "job refresh failed"),
                },
                Kind::Contractors => match self.client.list_contractors().await {
                    Ok(contractors) => self.store.replace_contractors(contractors),
                    Err(err) => warn!(error = %err, "contractor refresh failed"),
                },
            }
        }
    }

    fn start_background_refresh(self: &Arc<Self>) {
        if !self.background_refresh {
            return;
        }
        let controller = Arc::clone(self);
        self.refresher
            .lock()
            .expect("refresher lock poisoned")
            .start(self.refresh_interval, move || {
                let controller = controller.clone();
                async move {
                    controller.refresh_all().await;
                }
            });
    }

    #[cfg(test)]
    pub fn refresh_running(&self) -> bool {
        self.refresher.lock().expect("refresher lock poisoned").is_running()
    }

    /// Fresh system info read; unauthenticated, reachable while logged out.
    pub async fn get_system_info(&self) -> Result<crate::models::SystemInfo, ApiError> {
        let info = self.client.get_system_info().await?;
        self.store.set_system_info(info.clone());
        Ok(info)
    }

    async fn load_system_info(&self) {
        match self.client.get_system_info().await {
            Ok(info) => self.store.set_system_info(info),
            // Non-fatal; the footer just stays empty.
            Err(err) => warn!(error = %err, "could not load system info"),
        }
    }

    // --- formula operations ---

    pub async fn create_formula(&self, payload: &CreateFormula) -> Result<Formula, ApiError> {
        match self.client.create_formula(payload).await {
            Ok(formula) => {
                self.refresh_collections(&[Kind::Formulas, Kind::Jobs]).await;
                self.store.close_modal();
                self.store.push_snackbar("Formula created.", Severity::Success);
                Ok(formula)
            }
            Err(err) => {
                // The one place the taxonomy branches: name collisions get a
                // message the user can act on. The modal stays open.
                if err.is_conflict() {
                    self.store.push_snackbar(
                        "Could not create formula. Please make sure the formula name is unique.",
                        Severity::Error,
                    );
                } else {
                    self.store.push_snackbar("Could not create formula.", Severity::Error);
                }
                Err(err)
            }
        }
    }

    pub async fn update_formula(&self, id: &str, payload: &UpdateFormula) -> Result<(), ApiError> {
        match self.client.update_formula(id, payload).await {
            Ok(()) => {
                self.refresh_collections(&[Kind::Formulas, Kind::Jobs]).await;
                self.store.close_modal();
                self.store.push_snackbar("Formula updated.", Severity::Success);
                Ok(())
            }
            Err(err) => {
                if err.is_conflict() {
                    self.store.push_snackbar(
                        "Could not update formula. Please make sure the formula name is unique.",
                        Severity::Error,
                    );
                } else {
                    self.store.push_snackbar("Could not update formula.", Severity::Error);
                }
                Err(err)
            }
        }
    }

    pub async fn delete_formula(&self, id: &str) -> Result<(), ApiError> {
        match self.client.delete_formula(id).await {
            Ok(()) => {
                self.refresh_collections(&[Kind::Formulas, Kind::Jobs]).await;
                self.store.close_modal();
                self.store.push_snackbar("Formula deleted.", Severity::Success);
                Ok(())
            }
            Err(err) => {
                self.store.push_snackbar("Could not delete formula.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn search_formulas(&self, term: &str) -> Result<(), ApiError> {
        if term.trim().is_empty() {
            // Empty term means "show all": an empty filter, not a filter
            // listing every id.
            self.store.set_formula_filter(Vec::new());
            return Ok(());
        }
        match self.client.search_formulas(term).await {
            Ok(ids) => {
                self.store.set_formula_filter(ids);
                Ok(())
            }
            Err(err) => {
                // Filter left unchanged on failure.
                self.store.push_snackbar("Formula search failed.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn get_formula(&self, id: &str) -> Result<Formula, ApiError> {
        self.client.get_formula(id).await
    }

    // --- job operations ---

    pub async fn create_job(&self, payload: &CreateJob) -> Result<Job, ApiError> {
        match self.client.create_job(payload).await {
            Ok(job) => {
                self.refresh_collections(&[Kind::Jobs, Kind::Formulas, Kind::Contractors]).await;
                self.store.close_modal();
                self.store.push_snackbar("Job created.", Severity::Success);
                Ok(job)
            }
            Err(err) => {
                self.store.push_snackbar("Could not create job.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn update_job(&self, id: &str, payload: &UpdateJob) -> Result<(), ApiError> {
        match self.client.update_job(id, payload).await {
            Ok(()) => {
                self.refresh_collections(&[Kind::Jobs, Kind::Formulas, Kind::Contractors]).await;
                self.store.close_modal();
                self.store.push_snackbar("Job updated.", Severity::Success);
                Ok(())
            }
            Err(err) => {
                self.store.push_snackbar("Could not update job.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn delete_job(&self, id: &str) -> Result<(), ApiError> {
        match self.client.delete_job(id).await {
            Ok(()) => {
                self.refresh_collections(&[Kind::Jobs, Kind::Formulas, Kind::Contractors]).await;
                self.store.close_modal();
                self.store.push_snackbar("Job deleted.", Severity::Success);
                Ok(())
            }
            Err(err) => {
                self.store.push_snackbar("Could not delete job.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn search_jobs(&self, term: &str) -> Result<(), ApiError> {
        if term.trim().is_empty() {
            self.store.set_job_filter(Vec::new());
            return Ok(());
        }
        match self.client.search_jobs(term).await {
            Ok(ids) => {
                self.store.set_job_filter(ids);
                Ok(())
            }
            Err(err) => {
                self.store.push_snackbar("Job search failed.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn get_job(&self, id: &str) -> Result<Job, ApiError> {
        self.client.get_job(id).await
    }

    // --- contractor operations ---

    pub async fn create_contractor(
        &self,
        payload: &CreateContractor,
    ) -> Result<Contractor, ApiError> {
        match self.client.create_contractor(payload).await {
            Ok(contractor) => {
                self.refresh_collections(&[Kind::Contractors, Kind::Jobs]).await;
                self.store.close_modal();
                self.store.push_snackbar("Contractor created.", Severity::Success);
                Ok(contractor)
            }
            Err(err) => {
                self.store.push_snackbar("Could not create contractor.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn update_contractor(
        &self,
        id: &str,
        payload: &UpdateContractor,
    ) -> Result<(), ApiError> {
        match self.client.update_contractor(id, payload).await {
            Ok(()) => {
                self.refresh_collections(&[Kind::Contractors, Kind::Jobs]).await;
                self.store.close_modal();
                self.store.push_snackbar("Contractor updated.", Severity::Success);
                Ok(())
            }
            Err(err) => {
                self.store.push_snackbar("Could not update contractor.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn delete_contractor(&self, id: &str) -> Result<(), ApiError> {
        match self.client.delete_contractor(id).await {
            Ok(()) => {
                self.refresh_collections(&[Kind::Contractors, Kind::Jobs]).await;
                self.store.close_modal();
                self.store.push_snackbar("Contractor deleted.", Severity::Success);
                Ok(())
            }
            Err(err) => {
                self.store.push_snackbar("Could not delete contractor.", Severity::Error);
                Err(err)
            }
        }
    }

    pub async fn get_contractor(&self, id: &str) -> Result<Contractor, ApiError> {
        self.client.get_contractor(id).await
    }
}
