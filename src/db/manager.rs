//! Document store connection manager
//!
//! Owns at most one store handle and drives it through:
//!
//! ```text
//! UNINITIALIZED -> CONNECTING -> READY
//!                  CONNECTING -> FAILED -> CONNECTING   (attempts < MAX_RETRIES)
//!                                FAILED -> ABORTED      (ceiling reached, terminal)
//! ```
//!
//! `init_guard` serializes connection attempts; `state` is only locked for the
//! check-and-transition steps around an attempt. Callers queued behind an
//! in-flight attempt get that attempt's outcome instead of starting their own.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db::credentials::Credentials;
use crate::db::mongo::MongoConnector;
use crate::db::schemas::DocumentShape;
use crate::db::store::{DocumentStore, StoreConnector};
use crate::types::{AcdefError, Result};

/// Observable connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Uninitialized,
    Connecting,
    Ready,
    Failed,
    Aborted,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Connecting => "connecting",
            Self::Ready => "ready",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
        }
    }
}

/// Snapshot of the manager's bookkeeping
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub state: ConnectionState,
    pub attempts: u32,
    pub max_retries: u32,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
enum Failure {
    Credentials(String),
    Connect { attempt: u32, reason: String },
}

enum Phase {
    Uninitialized,
    Connecting,
    Ready(Arc<dyn DocumentStore>),
    Failed(Failure),
    Aborted(String),
}

struct ManagerState {
    phase: Phase,
    /// Connection attempts started (credential failures are not attempts)
    attempts: u32,
    /// Bumped every time an initialization resolves, success or failure
    resolutions: u64,
    last_heartbeat: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Lazily connects to the document store and hands out the shared handle
pub struct ConnectionManager {
    credentials_path: Option<PathBuf>,
    connector: Arc<dyn StoreConnector>,
    max_retries: u32,
    retry_delay: Duration,
    collection_prefix: String,
    init_guard: Mutex<()>,
    state: RwLock<ManagerState>,
}

impl ConnectionManager {
    /// Create a manager; an explicit credentials path wins over the configured one
    pub fn new(
        config: &Config,
        credentials_path: Option<PathBuf>,
        connector: Arc<dyn StoreConnector>,
    ) -> Self {
        Self {
            credentials_path: credentials_path
                .or_else(|| config.store().credentials_path.clone()),
            connector,
            max_retries: config.network().max_retries,
            retry_delay: config.network().retry_delay(),
            collection_prefix: config.store().collection_prefix.clone(),
            init_guard: Mutex::new(()),
            state: RwLock::new(ManagerState {
                phase: Phase::Uninitialized,
                attempts: 0,
                resolutions: 0,
                last_heartbeat: None,
                last_error: None,
            }),
        }
    }

    /// Create a manager backed by MongoDB
    pub fn mongo(config: &Config, credentials_path: Option<PathBuf>) -> Self {
        Self::new(
            config,
            credentials_path,
            Arc::new(MongoConnector::new(config)),
        )
    }

    pub fn credentials_path(&self) -> Option<&Path> {
        self.credentials_path.as_deref()
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Full collection name with the configured prefix
    pub fn collection_name(&self, collection: &str) -> String {
        format!("{}{}", self.collection_prefix, collection)
    }

    /// Initialize the store connection.
    ///
    /// Returns the existing handle when already ready. Otherwise makes at most
    /// one connection attempt. A failure below the retry ceiling yields
    /// `ConnectionAttemptFailed` and the caller may try again after
    /// [`retry_delay`](Self::retry_delay); the failure that reaches the ceiling
    /// yields `ConnectionExhausted`, and so does every later call.
    pub async fn initialize(&self) -> Result<Arc<dyn DocumentStore>> {
        let observed = {
            let state = self.state.read().await;
            if let Some(settled) = self.settled(&state, state.resolutions) {
                debug!("Document store initialization already settled");
                return settled;
            }
            state.resolutions
        };

        let _guard = self.init_guard.lock().await;

        // An attempt may have resolved while we waited for the guard
        if let Some(settled) = self.settled(&*self.state.read().await, observed) {
            return settled;
        }

        let credentials = match Credentials::load(self.credentials_path.as_deref()) {
            Ok(credentials) => credentials,
            Err(e) => {
                let reason = match &e {
                    AcdefError::CredentialLoad(reason) => reason.clone(),
                    other => other.to_string(),
                };
                let mut state = self.state.write().await;
                state.phase = Phase::Failed(Failure::Credentials(reason));
                state.last_error = Some(e.to_string());
                state.resolutions += 1;
                warn!("Document store credentials unavailable: {}", e);
                return Err(e);
            }
        };

        let attempt = {
            let mut state = self.state.write().await;
            // Cancelled attempts still count toward the ceiling
            if state.attempts >= self.max_retries {
                let reason = state
                    .last_error
                    .clone()
                    .unwrap_or_else(|| "connection attempt cancelled".to_string());
                error!(
                    "Document store connection exhausted after {} attempts: {}",
                    state.attempts, reason
                );
                state.phase = Phase::Aborted(reason.clone());
                state.resolutions += 1;
                return Err(AcdefError::ConnectionExhausted {
                    attempts: state.attempts,
                    last_error: reason,
                });
            }
            state.attempts += 1;
            state.phase = Phase::Connecting;
            state.attempts
        };
        info!(
            "Connecting to document store (attempt {}/{})",
            attempt, self.max_retries
        );

        let outcome = self.connector.connect(&credentials).await;

        let mut state = self.state.write().await;
        state.resolutions += 1;
        match outcome {
            Ok(store) => {
                state.phase = Phase::Ready(store.clone());
                state.last_heartbeat = Some(Utc::now());
                state.last_error = None;
                info!("Document store ready after {} attempt(s)", attempt);
                Ok(store)
            }
            Err(e) => {
                let reason = e.to_string();
                state.last_error = Some(reason.clone());
                if attempt >= self.max_retries {
                    error!(
                        "Document store connection exhausted after {} attempts: {}",
                        attempt, reason
                    );
                    state.phase = Phase::Aborted(reason.clone());
                    Err(AcdefError::ConnectionExhausted {
                        attempts: attempt,
                        last_error: reason,
                    })
                } else {
                    warn!(
                        "Document store connection attempt {}/{} failed: {}",
                        attempt, self.max_retries, reason
                    );
                    let failure = Failure::Connect { attempt, reason };
                    let err = self.failure_error(&failure);
                    state.phase = Phase::Failed(failure);
                    Err(err)
                }
            }
        }
    }

    /// Call [`initialize`](Self::initialize) until it succeeds or fails terminally,
    /// sleeping the configured retry delay between attempts.
    pub async fn initialize_with_retry(&self) -> Result<Arc<dyn DocumentStore>> {
        loop {
            match self.initialize().await {
                Err(AcdefError::ConnectionAttemptFailed { .. }) => {
                    debug!("Retrying document store connection in {:?}", self.retry_delay);
                    tokio::time::sleep(self.retry_delay).await;
                }
                other => return other,
            }
        }
    }

    /// Ping the ready store and refresh the heartbeat timestamp
    pub async fn heartbeat(&self) -> Result<DateTime<Utc>> {
        let store = self.ready_store().await?;
        match store.ping().await {
            Ok(()) => {
                let now = Utc::now();
                self.state.write().await.last_heartbeat = Some(now);
                Ok(now)
            }
            Err(e) => {
                warn!("Document store heartbeat failed: {}", e);
                self.state.write().await.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Normalize and insert a document into `<prefix><collection>`
    pub async fn write<D>(&self, collection: &str, document: &D) -> Result<String>
    where
        D: DocumentShape + ?Sized,
    {
        let store = self.ready_store().await?;
        let collection = self.collection_name(collection);

        match store.insert(&collection, document.normalize()).await {
            Ok(id) => {
                debug!("Wrote document {} to {}", id, collection);
                Ok(id)
            }
            Err(e) => {
                error!("Write to {} failed: {}", collection, e);
                self.state.write().await.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The store handle, if ready
    pub async fn store(&self) -> Option<Arc<dyn DocumentStore>> {
        match &self.state.read().await.phase {
            Phase::Ready(store) => Some(store.clone()),
            _ => None,
        }
    }

    pub async fn is_ready(&self) -> bool {
        matches!(self.state.read().await.phase, Phase::Ready(_))
    }

    pub async fn status(&self) -> ConnectionStatus {
        let state = self.state.read().await;
        ConnectionStatus {
            state: match state.phase {
                Phase::Uninitialized => ConnectionState::Uninitialized,
                Phase::Connecting => ConnectionState::Connecting,
                Phase::Ready(_) => ConnectionState::Ready,
                Phase::Failed(_) => ConnectionState::Failed,
                Phase::Aborted(_) => ConnectionState::Aborted,
            },
            attempts: state.attempts,
            max_retries: self.max_retries,
            last_heartbeat: state.last_heartbeat,
            last_error: state.last_error.clone(),
        }
    }

    async fn ready_store(&self) -> Result<Arc<dyn DocumentStore>> {
        self.store().await.ok_or(AcdefError::NotInitialized)
    }

    /// Outcome already decided for a caller that observed `observed` resolutions
    fn settled(
        &self,
        state: &ManagerState,
        observed: u64,
    ) -> Option<Result<Arc<dyn DocumentStore>>> {
        match &state.phase {
            Phase::Ready(store) => Some(Ok(store.clone())),
            Phase::Aborted(last_error) => Some(Err(AcdefError::ConnectionExhausted {
                attempts: state.attempts,
                last_error: last_error.clone(),
            })),
            Phase::Failed(failure) if state.resolutions != observed => {
                Some(Err(self.failure_error(failure)))
            }
            // CONNECTING seen under the guard means the previous attempt was cancelled
            _ => None,
        }
    }

    fn failure_error(&self, failure: &Failure) -> AcdefError {
        match failure {
            Failure::Credentials(reason) => AcdefError::CredentialLoad(reason.clone()),
            Failure::Connect { attempt, reason } => AcdefError::ConnectionAttemptFailed {
                attempt: *attempt,
                max_retries: self.max_retries,
                reason: reason.clone(),
            },
        }
    }
}
