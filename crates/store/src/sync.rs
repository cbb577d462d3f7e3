//! The refresh and mutation protocol shared by every role
//!
//! A refresh issues one request, and on a successful envelope replaces the
//! cached value wholesale. A mutation issues one write and, on success,
//! lets the caller reload whatever it affected. Both absorb every failure
//! into a single error notification plus a log entry; cached state is only
//! ever touched by a successful read.

use crate::credential::Credential;
use crate::notify::Notifier;
use prescripto_core::{Cached, Envelope, Role};
use prescripto_http::client::{ApiClient, error::ClientError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Shown when a successful write carries no message
const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// A GET endpoint whose envelope carries one payload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadEndpoint {
    pub path: &'static str,
    /// Envelope field holding the payload
    pub field: &'static str,
    /// Shown when a failure carries no usable message
    pub fallback: &'static str,
}

/// A POST endpoint answering with a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteEndpoint {
    pub path: &'static str,
    /// Shown when a failure carries no usable message
    pub fallback: &'static str,
}

/// A cached server value with subscribers
///
/// Every refresh takes a generation number when it is issued. A response
/// is applied only if its generation is newer than the last applied one,
/// so a slow, older response never overwrites a newer result.
#[derive(Debug)]
pub struct Resource<T> {
    state: watch::Sender<Cached<T>>,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            state: watch::Sender::new(Cached::Unloaded),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }
}

impl<T: Clone> Resource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the cached value
    pub fn get(&self) -> Cached<T> {
        self.state.borrow().clone()
    }

    /// Watch the cached value for replacements
    pub fn subscribe(&self) -> watch::Receiver<Cached<T>> {
        self.state.subscribe()
    }

    /// Replace the value locally, outranking any refresh already in flight
    pub fn replace(&self, value: T) {
        let generation = self.begin();
        self.apply(generation, value);
    }

    fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `value` if `generation` is the newest seen; returns whether it was stored
    fn apply(&self, generation: u64, value: T) -> bool {
        // The closure runs under the channel's write lock, which orders
        // concurrent applies.
        self.state.send_if_modified(|cached| {
            if generation > self.applied.load(Ordering::SeqCst) {
                self.applied.store(generation, Ordering::SeqCst);
                *cached = Cached::Loaded(value);
                true
            } else {
                false
            }
        })
    }
}

/// One role's connection to the API
///
/// Owns the credential; every request carries its current value.
pub struct SyncSession {
    client: ApiClient,
    credential: Credential,
    notifier: Arc<dyn Notifier>,
}

impl SyncSession {
    pub fn new(client: ApiClient, credential: Credential, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            credential,
            notifier,
        }
    }

    pub fn role(&self) -> Role {
        self.credential.role()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Fetch a value and replace the cached copy
    pub async fn refresh<T>(&self, endpoint: &ReadEndpoint, resource: &Resource<T>)
    where
        T: DeserializeOwned + Clone,
    {
        self.refresh_with(endpoint, resource, |value| value).await;
    }

    /// Fetch a list and cache it in reverse order, newest first
    pub async fn refresh_list<T>(&self, endpoint: &ReadEndpoint, resource: &Resource<Vec<T>>)
    where
        T: DeserializeOwned + Clone,
    {
        self.refresh_with(endpoint, resource, |mut list: Vec<T>| {
            list.reverse();
            list
        })
        .await;
    }

    async fn refresh_with<T, F>(&self, endpoint: &ReadEndpoint, resource: &Resource<T>, shape: F)
    where
        T: DeserializeOwned + Clone,
        F: FnOnce(T) -> T,
    {
        let generation = resource.begin();
        let token = self.credential.get();

        let result = match self.client.get(endpoint.path, self.role(), &token).await {
            Ok(envelope) if !envelope.success => {
                self.declared_failure(endpoint.path, endpoint.fallback, &envelope);
                return;
            }
            Ok(mut envelope) => envelope.take::<T>(endpoint.field).map_err(ClientError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => {
                if resource.apply(generation, shape(value)) {
                    debug!(role = %self.role(), path = endpoint.path, generation, "Cache replaced");
                } else {
                    debug!(role = %self.role(), path = endpoint.path, generation, "Stale response dropped");
                }
            }
            Err(e) => self.transport_failure(endpoint.path, endpoint.fallback, &e),
        }
    }

    /// Issue a write; returns whether the server declared success
    ///
    /// Success raises a success notification with the server's message.
    pub async fn mutate<B>(&self, endpoint: &WriteEndpoint, body: &B) -> bool
    where
        B: Serialize + ?Sized,
    {
        let token = self.credential.get();

        match self
            .client
            .post(endpoint.path, self.role(), &token, body)
            .await
        {
            Ok(envelope) if envelope.success => {
                debug!(role = %self.role(), path = endpoint.path, "Write accepted");
                self.notifier
                    .success(envelope.message_or(DEFAULT_SUCCESS_MESSAGE));
                true
            }
            Ok(envelope) => {
                self.declared_failure(endpoint.path, endpoint.fallback, &envelope);
                false
            }
            Err(e) => {
                self.transport_failure(endpoint.path, endpoint.fallback, &e);
                false
            }
        }
    }

    fn declared_failure(&self, path: &str, fallback: &str, envelope: &Envelope) {
        let message = envelope.message_or(fallback);
        debug!(role = %self.role(), path, reason = message, "Request declined by server");
        self.notifier.error(message);
    }

    fn transport_failure(&self, path: &str, fallback: &str, error: &ClientError) {
        warn!(role = %self.role(), path, error = %error, "Request failed");
        self.notifier.error(&error.user_message(fallback));
    }
}

impl std::fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSession")
            .field("base_url", &self.client.base_url())
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_generation_wins() {
        let resource: Resource<u32> = Resource::new();
        let first = resource.begin();
        let second = resource.begin();

        assert!(resource.apply(second, 2));
        assert!(!resource.apply(first, 1));
        assert_eq!(resource.get(), Cached::Loaded(2));
    }

    #[test]
    fn test_older_generation_applies_when_first() {
        let resource: Resource<u32> = Resource::new();
        let first = resource.begin();
        let second = resource.begin();

        assert!(resource.apply(first, 1));
        assert!(resource.apply(second, 2));
        assert_eq!(resource.get(), Cached::Loaded(2));
    }

    #[test]
    fn test_replace_outranks_in_flight_refresh() {
        let resource: Resource<&str> = Resource::new();
        let in_flight = resource.begin();

        resource.replace("local");
        assert!(!resource.apply(in_flight, "server"));
        assert_eq!(resource.get(), Cached::Loaded("local"));
    }

    #[test]
    fn test_subscribers_see_replacements() {
        let resource: Resource<Vec<u8>> = Resource::new();
        let mut rx = resource.subscribe();
        assert!(!rx.has_changed().unwrap());

        resource.replace(vec![]);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Cached::Loaded(vec![]));
    }
}
