//! Property-based tests for the sequential chain runner.
//!
//! These verify that:
//! 1. After any run of failures, the first adapter that answers decides the
//!    outcome, and its output is returned unchanged
//! 2. A call that outlives the chain timeout counts as a failure
//! 3. Adapters after the first success are never called

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use livetools_market_data::{DataClass, MarketDataError, ProviderAdapter, ProviderChain, Provenance};
use proptest::prelude::*;

// =============================================================================
// Mock adapter
// =============================================================================

#[derive(Clone, Copy, Debug)]
enum Behaviour {
    Answer(u64),
    Status(u16),
    Malformed,
    Hang,
}

struct ScriptedProvider {
    id: String,
    behaviour: Behaviour,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProviderAdapter<(), u64> for ScriptedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self, _request: &()) -> Result<u64, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Answer(value) => Ok(value),
            Behaviour::Status(status) => Err(MarketDataError::HttpStatus {
                provider: self.id.clone(),
                status,
            }),
            Behaviour::Malformed => Err(MarketDataError::malformed(&self.id, "unexpected shape")),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(0)
            }
        }
    }
}

// =============================================================================
// Generators
// =============================================================================

fn arb_failure() -> impl Strategy<Value = Behaviour> {
    prop_oneof![
        (400u16..600).prop_map(Behaviour::Status),
        Just(Behaviour::Malformed),
        Just(Behaviour::Hang),
    ]
}

fn arb_any() -> impl Strategy<Value = Behaviour> {
    prop_oneof![any::<u64>().prop_map(Behaviour::Answer), arb_failure()]
}

/// Failing prefix, the answer, and whatever follows it.
fn arb_chain() -> impl Strategy<Value = (Vec<Behaviour>, u64, Vec<Behaviour>)> {
    (
        prop::collection::vec(arb_failure(), 0..6),
        any::<u64>(),
        prop::collection::vec(arb_any(), 0..4),
    )
}

fn run_paused<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
        .block_on(future)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_first_answer_after_failures_is_returned_unchanged(
        (prefix, answer, suffix) in arb_chain(),
    ) {
        let behaviours: Vec<Behaviour> = prefix
            .iter()
            .copied()
            .chain(std::iter::once(Behaviour::Answer(answer)))
            .chain(suffix.iter().copied())
            .collect();
        let counters: Vec<Arc<AtomicUsize>> =
            behaviours.iter().map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let providers: Vec<Arc<dyn ProviderAdapter<(), u64>>> = behaviours
            .iter()
            .zip(&counters)
            .enumerate()
            .map(|(i, (behaviour, calls))| {
                Arc::new(ScriptedProvider {
                    id: format!("P{}", i),
                    behaviour: *behaviour,
                    calls: Arc::clone(calls),
                }) as Arc<dyn ProviderAdapter<(), u64>>
            })
            .collect();
        let chain = ProviderChain::new(DataClass::EtfQuotes, providers, Duration::from_secs(2));

        let outcome = run_paused(chain.first_success(&())).unwrap();

        let winner = prefix.len();
        prop_assert_eq!(outcome.value, answer);
        prop_assert_eq!(outcome.sources, vec![format!("P{}", winner)]);
        prop_assert_eq!(outcome.attempted, winner + 1);
        prop_assert_eq!(outcome.provenance, Provenance::Live);
        for (i, calls) in counters.iter().enumerate() {
            let expected = usize::from(i <= winner);
            prop_assert_eq!(calls.load(Ordering::SeqCst), expected, "provider P{}", i);
        }
    }

    #[test]
    fn prop_all_failures_exhaust_the_chain(
        failures in prop::collection::vec(arb_failure(), 1..6),
    ) {
        let providers: Vec<Arc<dyn ProviderAdapter<(), u64>>> = failures
            .iter()
            .enumerate()
            .map(|(i, behaviour)| {
                Arc::new(ScriptedProvider {
                    id: format!("P{}", i),
                    behaviour: *behaviour,
                    calls: Arc::new(AtomicUsize::new(0)),
                }) as Arc<dyn ProviderAdapter<(), u64>>
            })
            .collect();
        let chain = ProviderChain::new(DataClass::EtfQuotes, providers, Duration::from_secs(2));

        let err = run_paused(chain.first_success(&())).unwrap_err();
        let exhausted = matches!(
            err,
            MarketDataError::AllProvidersFailed { attempted } if attempted == failures.len()
        );
        prop_assert!(exhausted);
    }
}
