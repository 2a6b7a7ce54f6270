//! Application store: the process-wide snapshot of each server-owned
//! collection plus the UI-facing session/notification state.
//!
//! Mutations are synchronous, perform no I/O, and are last-write-wins; the
//! store is shared as `Arc<AppStore>` and handed to whoever needs it rather
//! than living as an ambient global. Collection contents only ever change
//! through wholesale replacement after a successful fetch, so the cache
//! always reflects exactly what the server last returned.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::models::{Contractor, Formula, Job, SystemInfo};

/// An id-keyed snapshot of one server-owned entity set plus the id list
/// currently matching an active search term. An empty filter means "show
/// all", never "show none".
#[derive(Debug, Clone)]
pub struct Collection<T> {
    entries: HashMap<String, T>,
    filter: Vec<String>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { entries: HashMap::new(), filter: Vec::new() }
    }
}

impl<T: Clone> Collection<T> {
    /// Wholesale replacement; no incremental merge. The filter is left
    /// untouched so an active search survives a background refresh.
    pub fn replace(&mut self, entries: HashMap<String, T>) {
        self.entries = entries;
    }

    pub fn set_filter(&mut self, ids: Vec<String>) {
        self.filter = ids;
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &HashMap<String, T> {
        &self.entries
    }

    pub fn filter(&self) -> &[String] {
        &self.filter
    }

    /// The entries the presentation layer renders: everything when no
    /// filter is active, otherwise only the filtered ids, in filter order.
    pub fn visible(&self) -> Vec<(String, T)> {
        if self.filter.is_empty() {
            return self.entries.iter().map(|(id, e)| (id.clone(), e.clone())).collect();
        }
        self.filter
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| (id.clone(), e.clone())))
            .collect()
    }
}

/// Which modal form is currently open. The controller closes the active
/// modal only after a successful mutation's re-fetch completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Modal {
    CreateFormula,
    ManageFormula(String),
    CreateJob,
    ManageJob(String),
    CreateContractor,
    ManageContractor(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// One snackbar-style notification; queued here, drained by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Default)]
struct StoreState {
    formulas: Collection<Formula>,
    jobs: Collection<Job>,
    contractors: Collection<Contractor>,

    username: Option<String>,
    logged_in: bool,
    initialized: bool,
    system_info: Option<SystemInfo>,
    notifications: Vec<Notification>,
    active_modal: Option<Modal>,
}

/// The injectable state container. Reads clone the requested slice out of
/// the lock; writers never hold the lock across an await point.
#[derive(Debug, Default)]
pub struct AppStore {
    state: RwLock<StoreState>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.read().expect("store lock poisoned"))
    }

    fn write<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        f(&mut self.state.write().expect("store lock poisoned"))
    }

    // --- collection mutators ---

    pub fn replace_formulas(&self, formulas: HashMap<String, Formula>) {
        self.write(|s| s.formulas.replace(formulas));
    }

    pub fn set_formula_filter(&self, ids: Vec<String>) {
        self.write(|s| s.formulas.set_filter(ids));
    }

    pub fn replace_jobs(&self, jobs: HashMap<String, Job>) {
        self.write(|s| s.jobs.replace(jobs));
    }

    pub fn set_job_filter(&self, ids: Vec<String>) {
        self.write(|s| s.jobs.set_filter(ids));
    }

    pub fn replace_contractors(&self, contractors: HashMap<String, Contractor>) {
        self.write(|s| s.contractors.replace(contractors));
    }

    /// Drop all collection data and filters; used on logout.
    pub fn clear_collections(&self) {
        self.write(|s| {
            s.formulas = Collection::default();
            s.jobs = Collection::default();
            s.contractors = Collection::default();
            s.initialized = false;
        });
    }

    // --- collection reads ---

    pub fn formulas(&self) -> Collection<Formula> {
        self.read(|s| s.formulas.clone())
    }

    pub fn jobs(&self) -> Collection<Job> {
        self.read(|s| s.jobs.clone())
    }

    pub fn contractors(&self) -> Collection<Contractor> {
        self.read(|s| s.contractors.clone())
    }

    // --- session / app state ---

    pub fn set_session(&self, username: Option<String>) {
        self.write(|s| s.username = username);
    }

    pub fn set_login_state(&self, logged_in: bool) {
        self.write(|s| s.logged_in = logged_in);
    }

    pub fn set_initialized(&self) {
        self.write(|s| s.initialized = true);
    }

    pub fn set_system_info(&self, info: SystemInfo) {
        self.write(|s| s.system_info = Some(info));
    }

    pub fn username(&self) -> Option<String> {
        self.read(|s| s.username.clone())
    }

    pub fn logged_in(&self) -> bool {
        self.read(|s| s.logged_in)
    }

    pub fn initialized(&self) -> bool {
        self.read(|s| s.initialized)
    }

    pub fn system_info(&self) -> Option<SystemInfo> {
        self.read(|s| s.system_info.clone())
    }

    // --- notifications ---

    pub fn push_snackbar(&self, text: impl Into<String>, severity: Severity) {
        self.write(|s| s.notifications.push(Notification { text: text.into(), severity }));
    }

    pub fn drain_snackbar(&self) -> Vec<Notification> {
        self.write(|s| std::mem::take(&mut s.notifications))
    }

    // --- modals ---

    pub fn open_modal(&self, modal: Modal) {
        self.write(|s| s.active_modal = Some(modal));
    }

    pub fn close_modal(&self) {
        self.write(|s| s.active_modal = None);
    }

    pub fn active_modal(&self) -> Option<Modal> {
        self.read(|s| s.active_modal.clone())
    }
}
