// vidstats: classification quality and similarity statistics for a labeled
// video dataset.
//
// This is the library root. `analysis` is the batch pipeline; the other
// modules load its input, store its output and present it.

pub mod analysis;
pub mod config;
pub mod db;
pub mod ingest;
pub mod output;
pub mod status;
