// Analysis core: feature parsing, classification metrics, intra-group
// similarity and the 2-D projection, tied together by `pipeline::run`.
//
// Everything here is synchronous and side-effect free: no I/O, no logging.
// Callers decide what to do with errors.

pub mod error;
pub mod features;
pub mod groups;
pub mod metrics;
pub mod pipeline;
pub mod projection;
pub mod similarity;

pub use error::AnalysisError;
pub use metrics::ZeroDivision;
pub use pipeline::{run, PipelineOptions, PipelineOutput};
