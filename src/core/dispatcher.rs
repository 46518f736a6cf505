//! Bounded-concurrency fan-out of address verification calls.
//!
//! Every request is admitted in input order by taking one permit from a
//! [`ConcurrencyBudget`], then runs as its own task (an execution unit)
//! inside a [`JoinSet`]. The permit is owned by the unit and released when
//! the unit finishes on any path, panics included. `dispatch` drains the
//! `JoinSet` before returning, so no unit outlives the call.

use crate::core::collector::ResponseCollector;
use crate::core::progress::{format_hms, CompletionCounter, ProgressReporter};
use crate::domain::model::{
    AddressRequest, Discard, DiscardReason, DispatchOutcome, ServiceResponse,
};
use crate::domain::ports::AddressService;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

pub const DEFAULT_CONCURRENCY_LIMIT: usize = 100;
pub const DEFAULT_REPORT_INTERVAL: usize = 1000;
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Upper bound on calls in flight at once.
    pub concurrency_limit: usize,
    /// Emit a progress line every this many completions; 0 disables.
    pub report_interval: usize,
    /// Sleep after each successful call, while still holding the permit.
    pub pacing_delay: Duration,
    /// Per-call deadline; expiry counts as a discard.
    pub call_timeout: Option<Duration>,
    pub progress: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            report_interval: DEFAULT_REPORT_INTERVAL,
            pacing_delay: DEFAULT_PACING_DELAY,
            call_timeout: None,
            progress: true,
        }
    }
}

/// Fixed pool of execution slots.
#[derive(Debug, Clone)]
pub struct ConcurrencyBudget {
    slots: Arc<Semaphore>,
    capacity: usize,
}

impl ConcurrencyBudget {
    /// A capacity of 0 is raised to 1 so admission can always make progress.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a free slot. The slot is returned when the permit drops.
    pub async fn admit(&self) -> std::result::Result<OwnedSemaphorePermit, AcquireError> {
        Arc::clone(&self.slots).acquire_owned().await
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn in_flight(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }
}

/// Everything one dispatch run produced, handed over after the join.
#[derive(Debug)]
pub struct Dispatched {
    pub responses: ResponseCollector<ServiceResponse>,
    /// Sorted by input row.
    pub discards: Vec<Discard>,
    pub submitted: usize,
    pub completed: usize,
    pub elapsed: Duration,
}

pub struct Dispatcher<S: AddressService> {
    service: Arc<S>,
    budget: ConcurrencyBudget,
    config: DispatchConfig,
}

impl<S: AddressService> Dispatcher<S> {
    pub fn new(service: S, config: DispatchConfig) -> Self {
        Self::with_shared(Arc::new(service), config)
    }

    pub fn with_shared(service: Arc<S>, config: DispatchConfig) -> Self {
        Self {
            service,
            budget: ConcurrencyBudget::new(config.concurrency_limit),
            config,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn budget(&self) -> &ConcurrencyBudget {
        &self.budget
    }

    /// Issues exactly one call per request and returns once all of them
    /// have reached a terminal state.
    pub async fn dispatch(&self, requests: &[AddressRequest]) -> Dispatched {
        let reporter = ProgressReporter::new(self.config.report_interval, self.config.progress);
        let responses = ResponseCollector::new();
        let discards = ResponseCollector::new();
        let counter = CompletionCounter::new();
        let mut units = JoinSet::new();
        let mut unit_rows = HashMap::with_capacity(requests.len());

        tracing::info!(
            "{}     Starting {} requests (concurrency limit {})",
            reporter.timestamp(),
            requests.len(),
            self.budget.capacity()
        );

        for (index, request) in requests.iter().enumerate() {
            let permit = match self.budget.admit().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!(
                        "Concurrency budget closed, {} requests not dispatched: {}",
                        requests.len() - index,
                        e
                    );
                    break;
                }
            };

            let unit = ExecutionUnit {
                index,
                request: request.clone(),
                service: Arc::clone(&self.service),
                responses: responses.clone(),
                discards: discards.clone(),
                counter: counter.clone(),
                reporter: reporter.clone(),
                pacing_delay: self.config.pacing_delay,
                call_timeout: self.config.call_timeout,
            };
            let handle = units.spawn(unit.run(permit));
            unit_rows.insert(handle.id(), index);
        }

        while let Some(joined) = units.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Execution unit failed: {}", e);
                if let Some(&index) = unit_rows.get(&e.id()) {
                    discards.insert(Discard {
                        index,
                        request: requests[index].clone(),
                        reason: DiscardReason::Aborted(e.to_string()),
                    });
                }
            }
        }

        let mut discards = discards.into_entries();
        discards.sort_by_key(|discard| discard.index);

        let elapsed = reporter.elapsed();
        tracing::info!(
            "{}     Dispatch finished: {} collected, {} discarded",
            format_hms(elapsed),
            responses.len(),
            discards.len()
        );

        Dispatched {
            responses,
            discards,
            submitted: requests.len(),
            completed: counter.get(),
            elapsed,
        }
    }
}

/// State moved into one spawned task.
struct ExecutionUnit<S: AddressService> {
    index: usize,
    request: AddressRequest,
    service: Arc<S>,
    responses: ResponseCollector<ServiceResponse>,
    discards: ResponseCollector<Discard>,
    counter: CompletionCounter,
    reporter: ProgressReporter,
    pacing_delay: Duration,
    call_timeout: Option<Duration>,
}

impl<S: AddressService> ExecutionUnit<S> {
    async fn run(self, _permit: OwnedSemaphorePermit) {
        let outcome = execute(self.service.as_ref(), &self.request, self.call_timeout).await;

        match outcome {
            DispatchOutcome::Collected(response) => {
                self.responses.insert(response);
                let completed = self.counter.increment();
                self.reporter.observe(completed);

                if !self.pacing_delay.is_zero() {
                    tokio::time::sleep(self.pacing_delay).await;
                }
            }
            DispatchOutcome::Discarded(reason) => {
                tracing::warn!(row = self.index, "Discarding request: {}", reason);
                self.discards.insert(Discard {
                    index: self.index,
                    request: self.request,
                    reason,
                });
            }
        }
    }
}

/// One round-trip plus the validity check. Never fails: every problem
/// becomes a [`DispatchOutcome::Discarded`].
pub async fn execute<S: AddressService>(
    service: &S,
    request: &AddressRequest,
    call_timeout: Option<Duration>,
) -> DispatchOutcome {
    let call = service.verify(request);
    let result = match call_timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => return DispatchOutcome::Discarded(DiscardReason::Timeout),
        },
        None => call.await,
    };

    match result {
        Err(e) => DispatchOutcome::Discarded(DiscardReason::Transport(e.to_string())),
        Ok(response) if !response.is_success() => {
            DispatchOutcome::Discarded(DiscardReason::Status(response.status))
        }
        Ok(response) if response.body.is_empty() => {
            DispatchOutcome::Discarded(DiscardReason::EmptyBody)
        }
        Ok(response) => DispatchOutcome::Collected(response),
    }
}
