//! Periodic telemetry refresh.
//!
//! A `TelemetrySource` produces readings for the bins currently in the
//! store; `spawn_refresh` applies them on a fixed interval until its handle
//! is cancelled or dropped.

use crate::core::fleet_store::FleetStore;
use crate::errors::FetchError;
use crate::models::status::clamp_fullness;
use crate::models::telemetry::TelemetryRecord;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Upper bound of one random fullness increment.
pub const FILL_STEP_MAX: f64 = 0.03;
/// Upper bound of one random weight increment, kg.
pub const WEIGHT_STEP_MAX_KG: f64 = 2.0;
/// Weight stops growing once it reaches this value, kg.
pub const WEIGHT_CEILING_KG: f64 = 50.0;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryReading {
    pub id: u64,
    pub fullness: f64,
    pub weight: f64,
}

#[async_trait]
pub trait TelemetrySource: Send {
    async fn poll(
        &mut self,
        current: &[TelemetryRecord],
    ) -> Result<Vec<TelemetryReading>, FetchError>;
}

/// Fixture source: every bin fills up a little on each poll.
#[derive(Debug, Clone)]
pub struct RandomWalkSource {
    rng: DeterministicRng,
}

impl RandomWalkSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(seed),
        }
    }

    pub fn step(&mut self, record: &TelemetryRecord) -> TelemetryReading {
        let fullness = clamp_fullness(record.fullness + self.rng.next_unit() * FILL_STEP_MAX);
        let weight = if record.weight < WEIGHT_CEILING_KG {
            record.weight + self.rng.next_unit() * WEIGHT_STEP_MAX_KG
        } else {
            record.weight
        };

        TelemetryReading {
            id: record.id,
            fullness,
            weight,
        }
    }
}

#[async_trait]
impl TelemetrySource for RandomWalkSource {
    async fn poll(
        &mut self,
        current: &[TelemetryRecord],
    ) -> Result<Vec<TelemetryReading>, FetchError> {
        Ok(current.iter().map(|r| self.step(r)).collect())
    }
}

/// Scope of a running refresh task. Dropping it stops the task.
pub struct RefreshHandle {
    cancel: CancellationToken,
    ticks: watch::Receiver<u64>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Number of ticks applied so far.
    pub fn tick_count(&self) -> u64 {
        *self.ticks.borrow()
    }

    /// Wait until at least `target` ticks were applied.
    /// Returns `false` if the task stopped first.
    pub async fn wait_for_ticks(&mut self, target: u64) -> bool {
        self.ticks.wait_for(|n| *n >= target).await.is_ok()
    }

    /// Follow up to `target` ticks, running `on_tick` after each one.
    /// Returns how many were observed; fewer than `target` means the task
    /// stopped first.
    pub async fn follow<F, Fut>(&mut self, target: u64, mut on_tick: F) -> u64
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut completed = 0;
        for tick in 1..=target {
            if !self.wait_for_ticks(tick).await {
                break;
            }
            completed = tick;
            on_tick(tick).await;
        }
        completed
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "refresh task ended abnormally");
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start applying readings from `source` every `every`. The first tick
/// fires one period after the call.
pub fn spawn_refresh<S>(store: Arc<RwLock<FleetStore>>, mut source: S, every: Duration) -> RefreshHandle
where
    S: TelemetrySource + 'static,
{
    let every = every.max(MIN_INTERVAL);
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    let (tick_tx, ticks) = watch::channel(0u64);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut count = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let (snapshot, taken_from) = {
                let guard = store.read().await;
                (guard.list().to_vec(), guard.snapshot_ticket())
            };
            let readings = match source.poll(&snapshot).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "telemetry poll failed; skipping tick");
                    continue;
                }
            };

            if token.is_cancelled() {
                break;
            }

            let applied = {
                let mut guard = store.write().await;
                if guard.snapshot_ticket() != taken_from {
                    debug!("fleet reloaded during poll; readings discarded");
                    continue;
                }
                readings
                    .iter()
                    .filter(|r| guard.apply_reading(r.id, r.fullness, r.weight))
                    .count()
            };

            count += 1;
            let _ = tick_tx.send(count);
            debug!(tick = count, applied, "telemetry refresh applied");
        }

        debug!(ticks = count, "telemetry refresh stopped");
    });

    RefreshHandle {
        cancel,
        ticks,
        task: Some(task),
    }
}

/// Small seeded PCG-style generator; reproducible across runs.
#[derive(Debug, Clone, Copy)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
    const INCREMENT: u64 = 1_442_695_040_888_963_407;

    const fn new(seed: u64) -> Self {
        let state = if seed == 0 {
            0x9e37_79b9_7f4a_7c15
        } else {
            seed
        };
        Self { state }
    }

    const fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        self.state
    }

    /// Uniform in [0, 1).
    fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_walk_only_moves_up_and_stays_in_range() {
        let mut source = RandomWalkSource::new(7);
        let mut record = TelemetryRecord::new(1, "Bin 1", 0.99).with_weight(49.5);

        for _ in 0..50 {
            let reading = source.step(&record);
            assert!(reading.fullness >= record.fullness);
            assert!(reading.fullness <= 1.0);
            assert!(reading.weight >= record.weight);
            record.apply_reading(reading.fullness, reading.weight);
        }

        assert_eq!(record.fullness, 1.0);
        assert!(record.weight < WEIGHT_CEILING_KG + WEIGHT_STEP_MAX_KG);
    }

    #[test]
    fn same_seed_same_walk() {
        let record = TelemetryRecord::new(3, "Bin 3", 0.2);
        let mut a = RandomWalkSource::new(42);
        let mut b = RandomWalkSource::new(42);

        for _ in 0..5 {
            assert_eq!(a.step(&record), b.step(&record));
        }
    }
}
