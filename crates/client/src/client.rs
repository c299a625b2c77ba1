//! Registry client facade.

use std::sync::Arc;

use goat_core::concept::{IDENTICAL_ENDPOINT, SEARCH_ENDPOINT};
use goat_core::{Concept, Resource};

use crate::collection::CollectionClient;
use crate::config::{ClientConfig, ConfigError};
use crate::error::ClientResult;
use crate::poller::{AsyncSearchPoller, CancelToken};
use crate::transport::{HttpTransport, Transport};

/// Configuration plus transport; every call builds its own request state.
///
/// Cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct RegistryClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl core::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("base_url", &self.config.base_url())
            .finish_non_exhaustive()
    }
}

impl RegistryClient {
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Client over the default `reqwest` transport.
    pub fn connect(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Client configured from `GOAT`, `GOAT_APP_TOKEN` and friends.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::connect(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn collections(&self) -> CollectionClient<'_> {
        CollectionClient::new(&self.config, self.transport.as_ref())
    }

    fn poller(&self, cancel: Option<CancelToken>) -> AsyncSearchPoller<'_> {
        let poller = AsyncSearchPoller::new(&self.config, self.transport.as_ref());
        match cancel {
            Some(token) => poller.with_cancel(token),
            None => poller,
        }
    }

    pub async fn list<R: Resource>(&self) -> ClientResult<Vec<R>> {
        self.collections().list::<R>().await
    }

    pub async fn create<R: Resource>(&self, instance: &mut R) -> ClientResult<()> {
        self.collections().create(instance).await
    }

    /// Free-text concept search; may be deferred by the registry.
    pub async fn search_concepts(&self, q: &str) -> ClientResult<Vec<Concept>> {
        self.search_concepts_inner(q, None).await
    }

    pub async fn search_concepts_with_cancel(
        &self,
        q: &str,
        cancel: CancelToken,
    ) -> ClientResult<Vec<Concept>> {
        self.search_concepts_inner(q, Some(cancel)).await
    }

    /// Concepts sharing `identifier`; may be deferred by the registry.
    pub async fn identical_concepts(&self, identifier: &str) -> ClientResult<Vec<Concept>> {
        self.identical_concepts_inner(identifier, None).await
    }

    pub async fn identical_concepts_with_cancel(
        &self,
        identifier: &str,
        cancel: CancelToken,
    ) -> ClientResult<Vec<Concept>> {
        self.identical_concepts_inner(identifier, Some(cancel)).await
    }

    async fn search_concepts_inner(
        &self,
        q: &str,
        cancel: Option<CancelToken>,
    ) -> ClientResult<Vec<Concept>> {
        let url = self.config.url_for(SEARCH_ENDPOINT);
        let query = vec![("q".to_string(), q.to_string())];
        self.poller(cancel).fetch::<Concept>(url, query).await
    }

    async fn identical_concepts_inner(
        &self,
        identifier: &str,
        cancel: Option<CancelToken>,
    ) -> ClientResult<Vec<Concept>> {
        let url = self.config.url_for(IDENTICAL_ENDPOINT);
        let query = vec![("identifier".to_string(), identifier.to_string())];
        self.poller(cancel).fetch::<Concept>(url, query).await
    }
}
