//! Fallback chain runner.
//!
//! A chain holds the adapters for one data class and runs them in one of two
//! modes:
//! - [`first_success`](ProviderChain::first_success): adapters in priority
//!   order, stopping at the first one that answers
//! - [`settle_all`](ProviderChain::settle_all): every adapter at once, keeping
//!   whatever succeeded
//!
//! Every call is bounded by the chain's timeout. A provider failure never
//! aborts the chain; it is recorded and the chain moves on.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::time::{timeout, Instant};

use super::diagnostics::FetchDiagnostics;
use super::policy::ChainOutcome;
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{DataClass, Provenance};
use crate::provider::ProviderAdapter;

/// Ordered set of adapters for one data class.
pub struct ProviderChain<Req, Out> {
    data_class: DataClass,
    providers: Vec<Arc<dyn ProviderAdapter<Req, Out>>>,
    timeout: Duration,
}

impl<Req, Out> ProviderChain<Req, Out>
where
    Req: Send + Sync + 'static,
    Out: Send + 'static,
{
    /// Create a chain. Providers are sorted by ascending priority; ties keep
    /// their given order.
    pub fn new(
        data_class: DataClass,
        mut providers: Vec<Arc<dyn ProviderAdapter<Req, Out>>>,
        timeout: Duration,
    ) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self {
            data_class,
            providers,
            timeout,
        }
    }

    pub fn data_class(&self) -> DataClass {
        self.data_class
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// One bounded call. Elapsed time is reported for diagnostics.
    async fn attempt(
        &self,
        provider: &dyn ProviderAdapter<Req, Out>,
        request: &Req,
    ) -> (Result<Out, MarketDataError>, Duration) {
        let started = Instant::now();
        let result = match timeout(self.timeout, provider.fetch(request)).await {
            Ok(result) => result,
            Err(_) => Err(MarketDataError::Timeout {
                provider: provider.id().to_string(),
            }),
        };
        (result, started.elapsed())
    }

    fn log_failure(&self, provider_id: &str, error: &MarketDataError) {
        match error.retry_class() {
            RetryClass::Transient => warn!(
                "[{}] provider '{}' failed transiently: {}",
                self.data_class, provider_id, error
            ),
            RetryClass::NextProvider | RetryClass::Terminal => info!(
                "[{}] provider '{}' failed: {}",
                self.data_class, provider_id, error
            ),
        }
    }

    /// Try adapters in priority order and return the first success unchanged.
    ///
    /// Fails with [`MarketDataError::AllProvidersFailed`] once every adapter
    /// has failed, or [`MarketDataError::NoProvidersAvailable`] for an empty
    /// chain.
    pub async fn first_success(&self, request: &Req) -> Result<ChainOutcome<Out>, MarketDataError> {
        if self.providers.is_empty() {
            warn!("[{}] no providers configured", self.data_class);
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let mut diagnostics = FetchDiagnostics::new();

        for provider in &self.providers {
            let provider_id = provider.id();
            debug!("[{}] trying provider '{}'", self.data_class, provider_id);

            let (result, elapsed) = self.attempt(provider.as_ref(), request).await;
            match result {
                Ok(value) => {
                    diagnostics.record_success(provider_id, elapsed);
                    debug!("[{}] {}", self.data_class, diagnostics.summary());
                    return Ok(ChainOutcome {
                        value,
                        provenance: Provenance::Live,
                        sources: vec![provider_id.to_string()],
                        attempted: diagnostics.attempted(),
                    });
                }
                Err(e) => {
                    self.log_failure(provider_id, &e);
                    diagnostics.record_error(provider_id, e.to_string(), e.retry_class(), elapsed);
                }
            }
        }

        warn!(
            "[{}] all providers failed: {}",
            self.data_class,
            diagnostics.summary()
        );
        Err(MarketDataError::AllProvidersFailed {
            attempted: diagnostics.attempted(),
        })
    }

    /// Run every adapter concurrently and wait for all of them.
    ///
    /// No call is cancelled because another failed. The outcome is
    /// [`Provenance::Live`] when all succeeded and [`Provenance::Partial`]
    /// when only some did; values keep provider priority order.
    pub async fn settle_all(&self, request: &Req) -> Result<ChainOutcome<Vec<Out>>, MarketDataError> {
        if self.providers.is_empty() {
            warn!("[{}] no providers configured", self.data_class);
            return Err(MarketDataError::NoProvidersAvailable);
        }

        let settled = join_all(
            self.providers
                .iter()
                .map(|provider| self.attempt(provider.as_ref(), request)),
        )
        .await;

        let mut diagnostics = FetchDiagnostics::new();
        let mut values = Vec::new();
        let mut sources = Vec::new();

        for (provider, (result, elapsed)) in self.providers.iter().zip(settled) {
            let provider_id = provider.id();
            match result {
                Ok(value) => {
                    diagnostics.record_success(provider_id, elapsed);
                    sources.push(provider_id.to_string());
                    values.push(value);
                }
                Err(e) => {
                    self.log_failure(provider_id, &e);
                    diagnostics.record_error(provider_id, e.to_string(), e.retry_class(), elapsed);
                }
            }
        }

        let attempted = diagnostics.attempted();
        if values.is_empty() {
            warn!(
                "[{}] all providers failed: {}",
                self.data_class,
                diagnostics.summary()
            );
            return Err(MarketDataError::AllProvidersFailed { attempted });
        }

        let provenance = if values.len() == attempted {
            Provenance::Live
        } else {
            Provenance::Partial
        };
        info!(
            "[{}] {}/{} providers answered: {}",
            self.data_class,
            values.len(),
            attempted,
            diagnostics.summary()
        );

        Ok(ChainOutcome {
            value: values,
            provenance,
            sources,
            attempted,
        })
    }
}
