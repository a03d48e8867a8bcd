//! Save operations that carry user free text into the record store.
//!
//! Each operation makes at most one translation call and writes every
//! provenance triple inside a single record patch.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::records::session::{SessionProvider, UserId};
use crate::records::store::{record_id, Filter, Record, RecordStore, StoreError};
use crate::translate::{ProvenanceTriple, TranslationClient, TranslationRequestItem, TranslationResult};

pub const PROFILES: &str = "profiles";
pub const WORKER_PROFILES: &str = "worker_profiles";
pub const HIRE_REQUESTS: &str = "hire_requests";

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Not signed in")]
    NotSignedIn,

    #[error("{0} not found")]
    Missing(&'static str),

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Worker,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Worker => "worker",
            Role::Customer => "customer",
        }
    }
}

/// Editable worker fields
#[derive(Debug, Clone, Default)]
pub struct WorkerEdit {
    pub bio: String,
    pub city: String,
    pub state: String,
    pub experience_years: Option<u32>,
    pub hourly_rate: Option<f64>,
    pub is_available: bool,
}

/// One save of the profile form
#[derive(Debug, Clone, Default)]
pub struct ProfileEdit {
    pub full_name: String,
    pub phone: Option<String>,
    /// Ignored unless the stored profile is a worker's
    pub worker: Option<WorkerEdit>,
}

/// Profile and hiring operations over an injected store and translation client
pub struct ProfileFlows {
    client: Arc<TranslationClient>,
    store: Arc<dyn RecordStore>,
}

impl ProfileFlows {
    pub fn new(client: Arc<TranslationClient>, store: Arc<dyn RecordStore>) -> Self {
        Self { client, store }
    }

    /// Create the profile rows for a freshly signed-up user
    pub async fn register_profile(
        &self,
        session: &dyn SessionProvider,
        email: &str,
        full_name: &str,
        role: Role,
    ) -> Result<Record, FlowError> {
        let user = current_user(session)?;

        let result = self.client.request_translation("full_name", full_name).await;

        let mut profile = Record::new();
        profile.insert("user_id".to_string(), json!(user.as_str()));
        profile.insert("email".to_string(), json!(email));
        profile.insert("role".to_string(), json!(role.as_str()));
        ProvenanceTriple::for_input(full_name, result.as_ref()).write_into("full_name", &mut profile);

        let profile = self.store.insert(PROFILES, profile).await?;

        if role == Role::Worker {
            let mut worker = Record::new();
            worker.insert("user_id".to_string(), json!(user.as_str()));
            worker.insert("is_available".to_string(), json!(true));
            self.store.insert(WORKER_PROFILES, worker).await?;
        }

        info!("Registered {} profile for {}", role.as_str(), user);
        Ok(profile)
    }

    /// Save the profile form, translating every changed text field in one batch
    pub async fn save_profile(
        &self,
        session: &dyn SessionProvider,
        edit: &ProfileEdit,
    ) -> Result<(), FlowError> {
        let user = current_user(session)?;
        let profile = self.find_by_user(PROFILES, &user, "Profile").await?;
        let profile_key = key_of(&profile)?.to_string();
        let is_worker = profile.get("role").and_then(Value::as_str) == Some(Role::Worker.as_str());

        // Both rows are resolved before anything is written. A worker without
        // a worker row still saves the profile part.
        let worker_row = match edit.worker.as_ref().filter(|_| is_worker) {
            Some(worker) => match self.find_by_user(WORKER_PROFILES, &user, "Worker profile").await {
                Ok(row) => Some((worker, key_of(&row)?.to_string())),
                Err(FlowError::Missing(_)) => {
                    warn!("No worker profile for {}, saving profile fields only", user);
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };
        let worker_edit = worker_row.as_ref().map(|(worker, _)| *worker);

        let mut items = vec![TranslationRequestItem::new("full_name", edit.full_name.as_str())];
        if let Some(worker) = worker_edit {
            items.push(TranslationRequestItem::new("bio", worker.bio.as_str()));
            items.push(TranslationRequestItem::new("city", worker.city.as_str()));
            items.push(TranslationRequestItem::new("state", worker.state.as_str()));
        }

        let results: HashMap<String, TranslationResult> = self
            .client
            .request_translations(items)
            .await
            .into_iter()
            .map(|r| (r.field.clone(), r))
            .collect();

        let mut patch = Record::new();
        ProvenanceTriple::for_input(&edit.full_name, results.get("full_name"))
            .write_into("full_name", &mut patch);
        patch.insert(
            "phone".to_string(),
            edit.phone
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .map(|p| json!(p))
                .unwrap_or(Value::Null),
        );
        self.store.update(PROFILES, &profile_key, patch).await?;

        if let Some((worker, worker_key)) = worker_row {
            let mut patch = Record::new();
            for (field, raw) in [("bio", &worker.bio), ("city", &worker.city), ("state", &worker.state)] {
                ProvenanceTriple::for_input(raw, results.get(field)).write_into(field, &mut patch);
            }
            patch.insert("experience_years".to_string(), json!(worker.experience_years));
            patch.insert("hourly_rate".to_string(), json!(worker.hourly_rate));
            patch.insert("is_available".to_string(), json!(worker.is_available));
            self.store.update(WORKER_PROFILES, &worker_key, patch).await?;
        }

        info!("Saved profile for {}", user);
        Ok(())
    }

    /// Send a hire request with a free-text message to a worker
    pub async fn send_hire_request(
        &self,
        session: &dyn SessionProvider,
        worker_id: &str,
        message: &str,
    ) -> Result<Record, FlowError> {
        let user = current_user(session)?;
        if message.trim().is_empty() {
            return Err(FlowError::EmptyMessage);
        }

        if self
            .store
            .select(WORKER_PROFILES, &Filter::eq("id", worker_id))
            .await?
            .is_empty()
        {
            return Err(FlowError::Missing("Worker"));
        }

        let result = self.client.request_translation("message", message).await;

        let mut request = Record::new();
        request.insert("worker_id".to_string(), json!(worker_id));
        request.insert("hirer_id".to_string(), json!(user.as_str()));
        request.insert("status".to_string(), json!("pending"));
        ProvenanceTriple::for_input(message, result.as_ref()).write_into("message", &mut request);

        let stored = self.store.insert(HIRE_REQUESTS, request).await?;
        info!("Hire request from {} to worker {}", user, worker_id);
        Ok(stored)
    }

    async fn find_by_user(
        &self,
        table: &str,
        user: &UserId,
        what: &'static str,
    ) -> Result<Record, FlowError> {
        self.store
            .select(table, &Filter::eq("user_id", user.as_str()))
            .await?
            .into_iter()
            .next()
            .ok_or(FlowError::Missing(what))
    }
}

fn current_user(session: &dyn SessionProvider) -> Result<UserId, FlowError> {
    session.current_identity().ok_or(FlowError::NotSignedIn)
}

fn key_of(record: &Record) -> Result<&str, FlowError> {
    record_id(record).ok_or(FlowError::Missing("Record id"))
}
