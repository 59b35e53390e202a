//! Workspace conversion: translation port, orchestration and aggregation.
//!
//! ```text
//! ConversionOrchestrator::run ──► OutcomeStream ──► aggregate ──► ResultTable
//!        │                              │
//!        └─ Translator (per unit)       └─ ResultWriter (optional)
//! ```

mod aggregate;
mod orchestrator;
mod outcome;
mod port;
mod progress;

pub use aggregate::{ResultTable, aggregate};
pub use orchestrator::{ConversionOrchestrator, OutcomeStream, RunSummary};
pub use outcome::TranslationOutcome;
pub use port::{TranslateError, Translation, Translator};
pub use progress::{ChannelProgress, NoProgress, ProgressSink};
