//! Training run state.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrainingStatus {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Snapshot of a training run as shown to the user.
///
/// `progress` is a local estimate and does not come from the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingRun {
    pub status: TrainingStatus,
    pub progress: f64,
    pub message: Option<String>,
}

impl TrainingRun {
    pub fn idle() -> Self {
        Self {
            status: TrainingStatus::Idle,
            progress: 0.0,
            message: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TrainingStatus::Running
    }

    /// Stage description for the current progress value.
    pub fn stage(&self) -> &'static str {
        match self.progress {
            p if p < 30.0 => "Initializing training...",
            p if p < 60.0 => "Processing data...",
            p if p < 90.0 => "Training model...",
            _ => "Finalizing...",
        }
    }
}

impl Default for TrainingRun {
    fn default() -> Self {
        Self::idle()
    }
}
