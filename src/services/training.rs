// src/services/training.rs

//! Remote training trigger with a simulated progress estimate.
//!
//! The training endpoint reports nothing until it finishes, so progress is
//! estimated locally: a random step every tick, clamped to a ceiling below
//! 100. The estimate and the request run as two futures joined in the same
//! task; the request cancels the estimator as soon as it resolves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use tokio::sync::watch;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{Result, TrainingError};
use crate::models::{ServiceConfig, TrainingConfig, TrainingRun, TrainingStatus};
use crate::utils::http::describe_transport_error;

pub const SUCCESS_MESSAGE: &str = "Model training completed successfully.";
pub const FAILURE_MESSAGE: &str = "Training failed. Please check your backend connection.";

/// Locally simulated progress, independent of the remote service.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEstimator {
    value: f64,
    ceiling: f64,
    max_step: f64,
}

impl ProgressEstimator {
    pub fn new(config: &TrainingConfig) -> Self {
        Self {
            value: 0.0,
            ceiling: config.ceiling,
            max_step: config.max_step,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn at_ceiling(&self) -> bool {
        self.value >= self.ceiling
    }

    /// Advance by `fraction` of the maximum step, never past the ceiling.
    pub fn advance(&mut self, fraction: f64) -> f64 {
        let step = fraction.clamp(0.0, 1.0) * self.max_step;
        self.value = (self.value + step).min(self.ceiling);
        self.value
    }
}

/// Starts training runs and publishes their state.
pub struct TrainingTrigger {
    client: Client,
    endpoint: Url,
    settings: TrainingConfig,
    running: AtomicBool,
    state: watch::Sender<TrainingRun>,
}

impl TrainingTrigger {
    pub fn new(client: Client, service: &ServiceConfig, settings: &TrainingConfig) -> Result<Self> {
        let (state, _) = watch::channel(TrainingRun::idle());
        Ok(Self {
            client,
            endpoint: service.train_url()?,
            settings: settings.clone(),
            running: AtomicBool::new(false),
            state,
        })
    }

    /// Subscribe to state updates of this trigger.
    pub fn subscribe(&self) -> watch::Receiver<TrainingRun> {
        self.state.subscribe()
    }

    /// Latest published state.
    pub fn current(&self) -> TrainingRun {
        self.state.borrow().clone()
    }

    /// Run one training request to completion.
    ///
    /// Refuses with `AlreadyRunning` while another run from this trigger is
    /// in flight.
    pub async fn start(&self) -> std::result::Result<(), TrainingError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(TrainingError::AlreadyRunning);
        }
        let _guard = RunningGuard(&self.running);

        self.state.send_replace(TrainingRun {
            status: TrainingStatus::Running,
            progress: 0.0,
            message: None,
        });
        log::info!("Starting training via {}", self.endpoint);

        let cancel = CancellationToken::new();
        let estimate = self.estimate_progress(cancel.clone());
        let request = async {
            let outcome = self.request().await;
            cancel.cancel();
            outcome
        };
        let ((), outcome) = tokio::join!(estimate, request);

        match &outcome {
            Ok(()) => {
                log::info!("Training completed");
                self.finish(TrainingStatus::Succeeded, Some(100.0), SUCCESS_MESSAGE);
            }
            Err(TrainingError::RemoteRejected { status }) => {
                log::warn!("Training rejected with status {}", status);
                self.finish(TrainingStatus::Failed, Some(100.0), FAILURE_MESSAGE);
            }
            Err(error) => {
                log::warn!("Training failed: {}", error);
                self.finish(TrainingStatus::Failed, None, FAILURE_MESSAGE);
            }
        }
        outcome
    }

    async fn request(&self) -> std::result::Result<(), TrainingError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| TrainingError::TransportFailure(describe_transport_error(&e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TrainingError::RemoteRejected {
                status: status.as_u16(),
            })
        }
    }

    /// Publish estimated progress on every tick until cancelled.
    async fn estimate_progress(&self, cancel: CancellationToken) {
        let period = Duration::from_millis(self.settings.tick_ms.max(1));
        let mut ticks = interval_at(Instant::now() + period, period);
        let mut estimator = ProgressEstimator::new(&self.settings);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticks.tick(), if !estimator.at_ceiling() => {
                    let fraction: f64 = rand::rng().random();
                    let progress = estimator.advance(fraction);
                    self.state.send_modify(|run| run.progress = progress);
                }
            }
        }
        log::debug!("Progress estimate stopped at {:.0}%", estimator.value());
    }

    /// Publish the final state; `progress` of `None` keeps the last estimate.
    fn finish(&self, status: TrainingStatus, progress: Option<f64>, message: &str) {
        self.state.send_modify(|run| {
            run.status = status;
            if let Some(p) = progress {
                run.progress = p;
            }
            run.message = Some(message.to_string());
        });
    }
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeService, unreachable_base_url};

    fn fast_settings() -> TrainingConfig {
        TrainingConfig {
            tick_ms: 20,
            ..TrainingConfig::default()
        }
    }

    fn trigger_for(base_url: String) -> TrainingTrigger {
        let service = ServiceConfig {
            base_url,
            ..ServiceConfig::default()
        };
        TrainingTrigger::new(Client::new(), &service, &fast_settings()).unwrap()
    }

    #[test]
    fn test_estimator_clamps_to_ceiling() {
        let mut estimator = ProgressEstimator::new(&TrainingConfig::default());
        assert_eq!(estimator.advance(0.5), 7.5);
        for _ in 0..20 {
            estimator.advance(0.99);
        }
        assert_eq!(estimator.value(), 90.0);
        assert!(estimator.at_ceiling());
        assert_eq!(estimator.advance(2.0), 90.0);
    }

    #[tokio::test]
    async fn test_success_snaps_to_100_and_stops_estimating() {
        let service = FakeService::start().await;
        service.delay_training(Duration::from_millis(300));
        let trigger = trigger_for(service.base_url());
        let mut updates = trigger.subscribe();

        trigger.start().await.unwrap();

        let run = trigger.current();
        assert_eq!(run.status, TrainingStatus::Succeeded);
        assert_eq!(run.progress, 100.0);
        assert_eq!(run.message.as_deref(), Some(SUCCESS_MESSAGE));

        // No estimator tick may land after completion.
        drop(updates.borrow_and_update());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!updates.has_changed().unwrap());
        assert_eq!(trigger.current().progress, 100.0);
    }

    #[tokio::test]
    async fn test_progress_stays_below_ceiling_while_in_flight() {
        let service = FakeService::start().await;
        service.delay_training(Duration::from_millis(400));
        let trigger = trigger_for(service.base_url());
        let mut updates = trigger.subscribe();

        let observe = async {
            let mut seen = Vec::new();
            while updates.changed().await.is_ok() {
                let run = updates.borrow_and_update().clone();
                if run.status != TrainingStatus::Running {
                    break;
                }
                seen.push(run.progress);
            }
            seen
        };
        let (outcome, seen) = tokio::join!(trigger.start(), observe);

        assert!(outcome.is_ok());
        assert!(seen.iter().all(|p| (0.0..=90.0).contains(p)));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_rejected_training_fails() {
        let service = FakeService::start().await;
        service.fail_training_with(503);
        let trigger = trigger_for(service.base_url());

        let err = trigger.start().await.unwrap_err();
        assert!(matches!(err, TrainingError::RemoteRejected { status: 503 }));
        let run = trigger.current();
        assert_eq!(run.status, TrainingStatus::Failed);
        assert_eq!(run.message.as_deref(), Some(FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_unreachable_training_fails() {
        let trigger = trigger_for(unreachable_base_url().await);
        let err = trigger.start().await.unwrap_err();
        assert!(matches!(err, TrainingError::TransportFailure(_)));
        assert_eq!(trigger.current().status, TrainingStatus::Failed);
    }

    #[tokio::test]
    async fn test_overlapping_start_is_refused() {
        let service = FakeService::start().await;
        service.delay_training(Duration::from_millis(100));
        let trigger = trigger_for(service.base_url());

        let (first, second) = tokio::join!(trigger.start(), trigger.start());
        assert!(first.is_ok());
        assert!(matches!(second, Err(TrainingError::AlreadyRunning)));
        assert_eq!(service.train_calls(), 1);

        // The flag is released once the run finishes.
        assert!(trigger.start().await.is_ok());
        assert_eq!(service.train_calls(), 2);
    }
}
