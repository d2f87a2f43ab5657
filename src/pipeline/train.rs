// src/pipeline/train.rs

//! Training view: trigger a run and follow the progress estimate.

use crate::error::{Result, TrainingError};
use crate::models::TrainingRun;
use crate::services::TrainingTrigger;

/// Run one training request, reporting every state change to `on_update`.
///
/// Training failures are part of the returned run, not errors.
pub async fn run_training<F>(trigger: &TrainingTrigger, mut on_update: F) -> Result<TrainingRun>
where
    F: FnMut(&TrainingRun),
{
    let mut updates = trigger.subscribe();
    let start = trigger.start();
    tokio::pin!(start);

    let outcome = loop {
        tokio::select! {
            biased;
            Ok(()) = updates.changed() => {
                let run = updates.borrow_and_update().clone();
                on_update(&run);
            }
            outcome = &mut start => break outcome,
        }
    };

    // The final state is published just before `start` returns.
    if updates.has_changed().unwrap_or(false) {
        let run = updates.borrow_and_update().clone();
        on_update(&run);
    }

    match outcome {
        Err(e @ TrainingError::AlreadyRunning) => Err(e.into()),
        Ok(()) | Err(_) => Ok(trigger.current()),
    }
}
