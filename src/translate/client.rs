use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config_manager::TranslationConfig;
use crate::translate::interface::{
    retain_non_blank, ErrorResponse, TranslateRequest, TranslateResponse, TranslationRequestItem,
    TranslationResult,
};
use crate::translate::service::TranslationService;

/// Reasons a batch never produced usable results
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Translation request timed out")]
    Timeout,

    #[error("Translation service unreachable: {0}")]
    Network(String),

    #[error("Translation service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unreadable translation response: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Service(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// How a batch reaches the translation service
#[async_trait]
pub trait TranslationTransport: Send + Sync {
    async fn send(
        &self,
        items: &[TranslationRequestItem],
    ) -> Result<Vec<TranslationResult>, TransportError>;
}

/// Posts batches to a remote `/translate` endpoint
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &TranslationConfig) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(config.client_timeout()).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/translate", config.service_url.trim_end_matches('/')),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }
}

#[async_trait]
impl TranslationTransport for HttpTransport {
    async fn send(
        &self,
        items: &[TranslationRequestItem],
    ) -> Result<Vec<TranslationResult>, TransportError> {
        let body = TranslateRequest {
            texts: items.to_vec(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error)
                .unwrap_or(text);
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if let Ok(ErrorResponse { error }) = serde_json::from_str::<ErrorResponse>(&text) {
            return Err(TransportError::Service(error));
        }

        serde_json::from_str::<TranslateResponse>(&text)
            .map(|r| r.results)
            .map_err(|e| TransportError::InvalidBody(e.to_string()))
    }
}

/// Calls the service in-process, for deployments that embed it
#[async_trait]
impl TranslationTransport for TranslationService {
    async fn send(
        &self,
        items: &[TranslationRequestItem],
    ) -> Result<Vec<TranslationResult>, TransportError> {
        self.translate(items.to_vec())
            .await
            .map_err(|e| TransportError::Service(e.to_string()))
    }
}

/// Holds one slot of the in-flight count; released on drop, so an abandoned
/// call does not leave the client looking busy
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Caller side of the oracle.
///
/// Never fails: when the service cannot be reached or answers with anything
/// other than a usable result set, every non-blank item comes back unchanged
/// with no detected language.
pub struct TranslationClient {
    transport: Arc<dyn TranslationTransport>,
    in_flight: AtomicUsize,
    last_error: RwLock<Option<String>>,
}

impl TranslationClient {
    pub fn new(transport: Arc<dyn TranslationTransport>) -> Self {
        Self {
            transport,
            in_flight: AtomicUsize::new(0),
            last_error: RwLock::new(None),
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// True while at least one batch is waiting on the service
    pub fn is_translating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the most recent failed batch, cleared when a new batch starts
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().ok().and_then(|e| e.clone())
    }

    fn set_error(&self, error: Option<String>) {
        if let Ok(mut guard) = self.last_error.write() {
            *guard = error;
        }
    }

    /// Translate a batch with a single service call.
    pub async fn request_translations(
        &self,
        items: Vec<TranslationRequestItem>,
    ) -> Vec<TranslationResult> {
        let items = retain_non_blank(items);
        if items.is_empty() {
            return Vec::new();
        }

        let _in_flight = InFlight::enter(&self.in_flight);
        self.set_error(None);

        let outcome = self.transport.send(&items).await.and_then(|results| {
            if results.len() == items.len() {
                Ok(results)
            } else {
                Err(TransportError::InvalidBody(format!(
                    "expected {} results, got {}",
                    items.len(),
                    results.len()
                )))
            }
        });

        match outcome {
            Ok(results) => {
                debug!("Received {} translation results", results.len());
                results
            }
            Err(e) => {
                warn!("Translation unavailable, keeping original text: {}", e);
                self.set_error(Some(e.to_string()));
                items
                    .iter()
                    .map(|item| TranslationResult::fallback(item, None))
                    .collect()
            }
        }
    }

    /// Translate one field; `None` only when the value is blank
    pub async fn request_translation(&self, field: &str, value: &str) -> Option<TranslationResult> {
        self.request_translations(vec![TranslationRequestItem::new(field, value)])
            .await
            .into_iter()
            .next()
    }
}
