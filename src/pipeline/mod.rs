//! Pipeline entry points, one per view.
//!
//! - `submit`: Select a file, upload it, store the report
//! - `results`: Read the stored report, parse and summarize it
//! - `train`: Trigger remote training and follow its progress

pub mod results;
pub mod submit;
pub mod train;

pub use results::{AnalysisResults, ResultsView, load_results};
pub use submit::{Navigation, SubmitView};
pub use train::run_training;
